//! Contract with the remote calculation/persistence service.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::goal::Goal;
use crate::plan::{CalculatedPlan, Protection, Wealth};
use crate::profile::Profile;

/// A failed service call. Service error bodies are never interpreted; the
/// caller only learns which call failed and roughly why.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{call}: request failed: {reason}")]
    Transport { call: &'static str, reason: String },
    #[error("{call}: service returned HTTP {status}")]
    Status { call: &'static str, status: u16 },
    #[error("{call}: unreadable response: {reason}")]
    Decode { call: &'static str, reason: String },
    #[error("{call}: {reason}")]
    Rejected { call: &'static str, reason: String },
}

impl ServiceError {
    pub fn call(&self) -> &'static str {
        match self {
            ServiceError::Transport { call, .. }
            | ServiceError::Status { call, .. }
            | ServiceError::Decode { call, .. }
            | ServiceError::Rejected { call, .. } => call,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalQuoteRequest {
    pub amount_today: f64,
    pub years: u32,
}

/// Inflation-adjusted cost of a goal and the monthly saving that reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalQuote {
    pub future_cost: f64,
    pub monthly_saving: f64,
}

/// Goals travel wrapped in an object: `{"goals": [...]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GoalsEnvelope {
    #[serde(default)]
    pub goals: Vec<Goal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePlanRequest {
    pub user_id: String,
    pub profile: Profile,
    pub protection: Protection,
    pub wealth: Wealth,
    pub goals: GoalsEnvelope,
    pub total_monthly_savings: f64,
}

impl SavePlanRequest {
    pub fn new(
        user_id: impl Into<String>,
        profile: Profile,
        plan: &CalculatedPlan,
        goals: &[Goal],
    ) -> Self {
        Self {
            user_id: user_id.into(),
            profile,
            protection: plan.protection.clone(),
            wealth: plan.wealth.clone(),
            goals: GoalsEnvelope {
                goals: goals.to_vec(),
            },
            total_monthly_savings: plan.total_monthly_savings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAck {
    pub id: String,
    #[serde(default)]
    pub message: String,
}

/// A plan as stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlan {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub profile: Profile,
    pub protection: Protection,
    pub wealth: Wealth,
    #[serde(default)]
    pub goals: GoalsEnvelope,
    pub total_monthly_savings: f64,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeRate {
    pub name: String,
    /// Percent per year.
    pub rate: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tenure: String,
    #[serde(default)]
    pub tax_benefit: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemeRates {
    pub schemes: Vec<SchemeRate>,
}

/// The calls the wizard makes. Every call is a single request/response with no
/// retry; failures come back as one [`ServiceError`].
#[async_trait]
pub trait PlanService: Send + Sync {
    async fn calculate_plan(&self, profile: &Profile) -> Result<CalculatedPlan, ServiceError>;

    async fn calculate_goal(&self, request: GoalQuoteRequest) -> Result<GoalQuote, ServiceError>;

    async fn save_plan(&self, request: &SavePlanRequest) -> Result<SaveAck, ServiceError>;

    async fn user_plans(&self, user_id: &str) -> Result<Vec<SavedPlan>, ServiceError>;

    async fn plan(&self, plan_id: &str) -> Result<SavedPlan, ServiceError>;

    async fn scheme_rates(&self) -> Result<SchemeRates, ServiceError>;
}
