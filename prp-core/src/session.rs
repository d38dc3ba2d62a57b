//! Wizard session: the single owned store behind every wizard screen.
//!
//! One writer, one reader. Callers hold a `&mut WizardSession` and pass it
//! explicitly; there is no global instance.

use thiserror::Error;
use tracing::{debug, warn};

use crate::affordability::{self, AffordabilityReport};
use crate::goal::{Goal, GoalUpdate, new_user_id};
use crate::plan::CalculatedPlan;
use crate::priority::{PriorityComponent, PrioritySelection};
use crate::profile::{ProfileDraft, ProfileUpdate};
use crate::steps::WizardStep;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown plan component '{0}'")]
    UnknownPriority(String),
}

/// Proof that a plan fetch was started against a given profile version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTicket {
    profile_version: u64,
}

impl PlanTicket {
    pub fn profile_version(&self) -> u64 {
        self.profile_version
    }
}

#[derive(Debug, Clone, PartialEq)]
struct StoredPlan {
    plan: CalculatedPlan,
    profile_version: u64,
}

/// Everything `reset_plan` restores, kept together so a reset is one assignment.
#[derive(Debug, Clone, PartialEq, Default)]
struct SessionState {
    current_step: usize,
    profile: ProfileDraft,
    profile_version: u64,
    plan: Option<StoredPlan>,
    goals: Vec<Goal>,
    priorities: PrioritySelection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WizardSession {
    user_id: String,
    state: SessionState,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    /// Fresh session with a generated `user_<millis>` id.
    pub fn new() -> Self {
        Self::with_user_id(new_user_id())
    }

    pub fn with_user_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            state: SessionState::default(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    // --- progress -------------------------------------------------------

    /// Number of wizard steps completed so far.
    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    /// Mark `step` finished and return where the wizard goes next.
    pub fn complete_step(&mut self, step: WizardStep) -> Option<WizardStep> {
        self.state.current_step = step.index() + 1;
        let next = step.next(&self.state.profile);
        debug!(step = ?step, next = ?next, "wizard step completed");
        next
    }

    // --- profile --------------------------------------------------------

    pub fn profile(&self) -> &ProfileDraft {
        &self.state.profile
    }

    /// Merge fields into the profile. Never fails; validation is the form's job.
    pub fn update_profile(&mut self, update: ProfileUpdate) {
        self.state.profile.apply(update);
        self.state.profile_version += 1;
        debug!(version = self.state.profile_version, "profile updated");
    }

    pub fn profile_version(&self) -> u64 {
        self.state.profile_version
    }

    // --- plan -----------------------------------------------------------

    pub fn calculated_plan(&self) -> Option<&CalculatedPlan> {
        self.state.plan.as_ref().map(|s| &s.plan)
    }

    /// Replace the plan wholesale, tagging it with the current profile version.
    pub fn set_calculated_plan(&mut self, plan: CalculatedPlan) {
        self.state.plan = Some(StoredPlan {
            plan,
            profile_version: self.state.profile_version,
        });
        debug!("calculated plan replaced");
    }

    /// True when a plan is held but the profile has changed since it was fetched.
    pub fn plan_is_stale(&self) -> bool {
        self.state
            .plan
            .as_ref()
            .is_some_and(|s| s.profile_version != self.state.profile_version)
    }

    /// Start a plan fetch for the profile as it is now.
    pub fn begin_plan_fetch(&self) -> PlanTicket {
        PlanTicket {
            profile_version: self.state.profile_version,
        }
    }

    /// Install a fetched plan if the profile has not moved on since `ticket`
    /// was issued. A late response for an older profile is dropped, never merged.
    pub fn accept_plan(&mut self, ticket: PlanTicket, plan: CalculatedPlan) -> bool {
        if ticket.profile_version != self.state.profile_version {
            warn!(
                fetched_for = ticket.profile_version,
                current = self.state.profile_version,
                "discarding plan fetched for an outdated profile"
            );
            return false;
        }
        self.state.plan = Some(StoredPlan {
            plan,
            profile_version: ticket.profile_version,
        });
        true
    }

    // --- goals ----------------------------------------------------------

    pub fn goals(&self) -> &[Goal] {
        &self.state.goals
    }

    /// Append a goal. The caller supplies a unique `goal_id`.
    pub fn add_goal(&mut self, goal: Goal) {
        debug!(goal_id = %goal.goal_id, "goal added");
        self.state.goals.push(goal);
    }

    /// Merge into the goal with `goal_id`. Unknown ids are a no-op; the return
    /// value says whether a goal was found.
    pub fn update_goal(&mut self, goal_id: &str, update: GoalUpdate) -> bool {
        match self.state.goals.iter_mut().find(|g| g.goal_id == goal_id) {
            Some(goal) => {
                goal.apply(update);
                true
            }
            None => {
                debug!(goal_id, "update for unknown goal ignored");
                false
            }
        }
    }

    /// Remove the goal with `goal_id`. Unknown ids are a no-op.
    pub fn delete_goal(&mut self, goal_id: &str) -> bool {
        let before = self.state.goals.len();
        self.state.goals.retain(|g| g.goal_id != goal_id);
        let removed = self.state.goals.len() != before;
        if !removed {
            debug!(goal_id, "delete for unknown goal ignored");
        }
        removed
    }

    // --- priorities -----------------------------------------------------

    pub fn priorities(&self) -> &PrioritySelection {
        &self.state.priorities
    }

    pub fn set_priority(&mut self, component: PriorityComponent, enabled: bool) {
        self.state.priorities.set(component, enabled);
        debug!(%component, enabled, "priority toggled");
    }

    /// String-keyed variant for config files and CLI flags. Unknown keys are
    /// rejected and leave every flag as it was.
    pub fn set_priority_key(&mut self, key: &str, enabled: bool) -> Result<(), SessionError> {
        let component: PriorityComponent = key
            .parse()
            .map_err(|_| SessionError::UnknownPriority(key.to_string()))?;
        self.set_priority(component, enabled);
        Ok(())
    }

    // --- derived --------------------------------------------------------

    /// Affordability of the current plan under the current priorities.
    /// `None` until a plan has been fetched.
    pub fn affordability(&self) -> Option<AffordabilityReport> {
        self.calculated_plan()
            .map(|plan| affordability::assess(plan, &self.state.priorities))
    }

    /// Back to a blank wizard in a single step. The user id is kept.
    pub fn reset_plan(&mut self) {
        self.state = SessionState::default();
        debug!("session reset");
    }
}
