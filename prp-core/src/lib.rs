//! prp-core: plan wizard session, affordability engine and service contract
//! for the PRP financial-planning client.

pub mod affordability;
pub mod calculator;
pub mod flow;
pub mod goal;
pub mod money;
pub mod offline;
pub mod plan;
pub mod priority;
pub mod profile;
pub mod service;
pub mod session;
pub mod steps;
pub mod validation;

pub use affordability::{AffordabilityReport, ComponentLine, assess, customized_total};
pub use flow::{FlowError, PlanFetch, SaveGuard, fetch_plan, quote_and_add_goal, save_plan};
pub use goal::{Goal, GoalDraft, GoalIdGenerator, GoalUpdate, Probability};
pub use money::format_inr;
pub use offline::OfflinePlanService;
pub use plan::{CalculatedPlan, Suggestion, SuggestionPriority};
pub use priority::{PriorityComponent, PrioritySelection};
pub use profile::{Profile, ProfileDraft, ProfileUpdate, RiskComfort};
pub use service::{
    GoalQuote, GoalQuoteRequest, PlanService, SaveAck, SavePlanRequest, SavedPlan, SchemeRate,
    SchemeRates, ServiceError,
};
pub use session::{PlanTicket, SessionError, WizardSession};
pub use steps::WizardStep;
pub use validation::{ValidationError, ValidationErrors};
