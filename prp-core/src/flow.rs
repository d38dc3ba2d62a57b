//! Wizard actions that talk to the service.
//!
//! Each action validates first, makes exactly one call, and only then touches
//! the session. A failed call leaves the session as it was.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{info, warn};

use crate::goal::{Goal, GoalDraft, GoalIdGenerator, Probability};
use crate::service::{GoalQuoteRequest, PlanService, SaveAck, SavePlanRequest, ServiceError};
use crate::session::WizardSession;
use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("invalid input: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("no plan has been calculated yet")]
    MissingPlan,
    #[error("a save is already in progress")]
    SaveInFlight,
}

/// Outcome of [`fetch_plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFetch {
    Installed,
    /// The profile changed while the request was out; the response was dropped.
    Discarded,
}

/// Validate the profile, request a plan for it and install the response.
pub async fn fetch_plan<S>(session: &mut WizardSession, service: &S) -> Result<PlanFetch, FlowError>
where
    S: PlanService + ?Sized,
{
    let profile = session.profile().validate()?;
    let ticket = session.begin_plan_fetch();
    info!(version = ticket.profile_version(), "requesting plan");

    let plan = service.calculate_plan(&profile).await.inspect_err(|e| {
        warn!(error = %e, "plan request failed; keeping previous plan");
    })?;

    if session.accept_plan(ticket, plan) {
        Ok(PlanFetch::Installed)
    } else {
        Ok(PlanFetch::Discarded)
    }
}

/// Price a goal with the service and append it to the session.
pub async fn quote_and_add_goal<S>(
    session: &mut WizardSession,
    service: &S,
    ids: &GoalIdGenerator,
    draft: GoalDraft,
) -> Result<Goal, FlowError>
where
    S: PlanService + ?Sized,
{
    draft.validate()?;
    let quote = service
        .calculate_goal(GoalQuoteRequest {
            amount_today: draft.amount_today,
            years: draft.years,
        })
        .await
        .inspect_err(|e| warn!(error = %e, "goal quote failed"))?;

    let goal = Goal {
        goal_id: ids.next_id(),
        name: draft.name.trim().to_string(),
        amount_today: draft.amount_today,
        time_horizon: draft.years,
        future_cost: quote.future_cost,
        monthly_saving: quote.monthly_saving,
        probability: Probability::Medium,
    };
    session.add_goal(goal.clone());
    Ok(goal)
}

/// In-flight flag for the save action. A second save while one is outstanding
/// is refused rather than queued.
#[derive(Debug, Default)]
pub struct SaveGuard {
    in_flight: AtomicBool,
}

impl SaveGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<SaveToken<'_>, FlowError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| SaveToken { guard: self })
            .map_err(|_| FlowError::SaveInFlight)
    }
}

struct SaveToken<'a> {
    guard: &'a SaveGuard,
}

impl Drop for SaveToken<'_> {
    fn drop(&mut self) {
        self.guard.in_flight.store(false, Ordering::Release);
    }
}

/// Build the save payload from the session as it stands.
pub fn save_request(session: &WizardSession) -> Result<SavePlanRequest, FlowError> {
    let plan = session.calculated_plan().ok_or(FlowError::MissingPlan)?;
    let profile = session.profile().validate()?;
    Ok(SavePlanRequest::new(
        session.user_id(),
        profile,
        plan,
        session.goals(),
    ))
}

/// Persist the finished plan. The session is only read, never changed.
pub async fn save_plan<S>(
    session: &WizardSession,
    service: &S,
    guard: &SaveGuard,
) -> Result<SaveAck, FlowError>
where
    S: PlanService + ?Sized,
{
    let _token = guard.acquire()?;
    let request = save_request(session)?;
    let ack = service
        .save_plan(&request)
        .await
        .inspect_err(|e| warn!(error = %e, "save failed"))?;
    info!(plan_id = %ack.id, "plan saved");
    Ok(ack)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_refuses_reentry_and_releases() {
        let guard = SaveGuard::new();
        {
            let _t = guard.acquire().unwrap();
            assert!(guard.is_in_flight());
            assert!(matches!(guard.acquire(), Err(FlowError::SaveInFlight)));
        }
        assert!(!guard.is_in_flight());
        assert!(guard.acquire().is_ok());
    }

    #[test]
    fn test_save_request_needs_plan() {
        let session = WizardSession::new();
        assert!(matches!(save_request(&session), Err(FlowError::MissingPlan)));
    }
}
