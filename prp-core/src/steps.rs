//! Fixed wizard step sequence.
//!
//! Two steps branch on the profile: children details are only asked for when
//! the user has dependents, and the child-plans screen only appears when there
//! is a daughter or son.

use serde::{Deserialize, Serialize};

use crate::profile::ProfileDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    Profile,
    Children,
    ProtectionOverview,
    EmergencyFund,
    Retirement,
    ChildPlans,
    MutualFunds,
    Gold,
    Goals,
    PlanBuilder,
    Summary,
}

impl WizardStep {
    pub const ALL: [WizardStep; 11] = [
        WizardStep::Profile,
        WizardStep::Children,
        WizardStep::ProtectionOverview,
        WizardStep::EmergencyFund,
        WizardStep::Retirement,
        WizardStep::ChildPlans,
        WizardStep::MutualFunds,
        WizardStep::Gold,
        WizardStep::Goals,
        WizardStep::PlanBuilder,
        WizardStep::Summary,
    ];

    /// Position in the full sequence, starting at 0.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Profile => "Your profile",
            WizardStep::Children => "Children",
            WizardStep::ProtectionOverview => "Protection",
            WizardStep::EmergencyFund => "Emergency fund",
            WizardStep::Retirement => "Retirement (NPS)",
            WizardStep::ChildPlans => "Child education plans",
            WizardStep::MutualFunds => "Mutual funds",
            WizardStep::Gold => "Gold",
            WizardStep::Goals => "Life goals",
            WizardStep::PlanBuilder => "Build your plan",
            WizardStep::Summary => "Summary",
        }
    }

    /// Whether this step needs a calculated plan to render.
    pub fn needs_plan(&self) -> bool {
        !matches!(
            self,
            WizardStep::Profile | WizardStep::Children | WizardStep::Goals
        )
    }

    /// The step after this one for the given profile. `None` after Summary.
    pub fn next(&self, profile: &ProfileDraft) -> Option<WizardStep> {
        match self {
            WizardStep::Profile if profile.has_dependents => Some(WizardStep::Children),
            WizardStep::Profile => Some(WizardStep::ProtectionOverview),
            WizardStep::Children => Some(WizardStep::ProtectionOverview),
            WizardStep::ProtectionOverview => Some(WizardStep::EmergencyFund),
            WizardStep::EmergencyFund => Some(WizardStep::Retirement),
            WizardStep::Retirement if profile.has_children() => Some(WizardStep::ChildPlans),
            WizardStep::Retirement => Some(WizardStep::MutualFunds),
            WizardStep::ChildPlans => Some(WizardStep::MutualFunds),
            WizardStep::MutualFunds => Some(WizardStep::Gold),
            WizardStep::Gold => Some(WizardStep::Goals),
            WizardStep::Goals => Some(WizardStep::PlanBuilder),
            WizardStep::PlanBuilder => Some(WizardStep::Summary),
            WizardStep::Summary => None,
        }
    }

    /// Steps this profile will actually visit, in order.
    pub fn route(profile: &ProfileDraft) -> Vec<WizardStep> {
        std::iter::successors(Some(WizardStep::Profile), |s| s.next(profile)).collect()
    }
}
