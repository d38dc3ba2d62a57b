//! `PlanService` backed by the in-process calculator. Saved plans live in
//! memory for the lifetime of the service.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::calculator;
use crate::plan::CalculatedPlan;
use crate::profile::Profile;
use crate::service::{
    GoalQuote, GoalQuoteRequest, PlanService, SaveAck, SavePlanRequest, SavedPlan, SchemeRates,
    ServiceError,
};

#[derive(Debug, Default)]
pub struct OfflinePlanService {
    saved: Mutex<Vec<SavedPlan>>,
    next_id: AtomicU64,
}

impl OfflinePlanService {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> Result<std::sync::MutexGuard<'_, Vec<SavedPlan>>, ServiceError> {
        self.saved.lock().map_err(|_| ServiceError::Transport {
            call: "plans",
            reason: "offline plan store poisoned".into(),
        })
    }
}

#[async_trait]
impl PlanService for OfflinePlanService {
    async fn calculate_plan(&self, profile: &Profile) -> Result<CalculatedPlan, ServiceError> {
        info!(age = profile.age, "calculating plan offline");
        Ok(calculator::calculate_plan(profile))
    }

    async fn calculate_goal(&self, request: GoalQuoteRequest) -> Result<GoalQuote, ServiceError> {
        if !(request.amount_today > 0.0) || request.years == 0 {
            return Err(ServiceError::Rejected {
                call: "calculate-goal",
                reason: "amount_today and years required".into(),
            });
        }
        Ok(calculator::goal_requirement(request.amount_today, request.years))
    }

    async fn save_plan(&self, request: &SavePlanRequest) -> Result<SaveAck, ServiceError> {
        let id = format!("offline-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let now = Utc::now().naive_utc();
        let saved = SavedPlan {
            id: id.clone(),
            user_id: request.user_id.clone(),
            profile: request.profile.clone(),
            protection: request.protection.clone(),
            wealth: request.wealth.clone(),
            goals: request.goals.clone(),
            total_monthly_savings: request.total_monthly_savings,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.store()?.push(saved);
        info!(plan_id = %id, user_id = %request.user_id, "plan saved offline");
        Ok(SaveAck {
            id,
            message: "Plan saved successfully".into(),
        })
    }

    async fn user_plans(&self, user_id: &str) -> Result<Vec<SavedPlan>, ServiceError> {
        Ok(self
            .store()?
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn plan(&self, plan_id: &str) -> Result<SavedPlan, ServiceError> {
        self.store()?
            .iter()
            .find(|p| p.id == plan_id)
            .cloned()
            .ok_or(ServiceError::Status {
                call: "plan",
                status: 404,
            })
    }

    async fn scheme_rates(&self) -> Result<SchemeRates, ServiceError> {
        Ok(calculator::scheme_rates())
    }
}
