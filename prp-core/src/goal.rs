//! User-added savings goals.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Likelihood label carried with a goal. New goals start at Medium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Probability {
    Low,
    #[default]
    Medium,
    High,
}

/// A discretionary savings target with its service-computed cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub goal_id: String,
    pub name: String,
    pub amount_today: f64,
    /// Years, 1-20.
    pub time_horizon: u32,
    /// Inflation-adjusted cost at the horizon.
    pub future_cost: f64,
    pub monthly_saving: f64,
    #[serde(default)]
    pub probability: Probability,
}

impl Goal {
    pub fn apply(&mut self, update: GoalUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(amount) = update.amount_today {
            self.amount_today = amount;
        }
        if let Some(years) = update.time_horizon {
            self.time_horizon = years;
        }
        if let Some(cost) = update.future_cost {
            self.future_cost = cost;
        }
        if let Some(saving) = update.monthly_saving {
            self.monthly_saving = saving;
        }
        if let Some(p) = update.probability {
            self.probability = p;
        }
    }
}

/// Partial goal fields for `update_goal`. The id is never changed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub amount_today: Option<f64>,
    pub time_horizon: Option<u32>,
    pub future_cost: Option<f64>,
    pub monthly_saving: Option<f64>,
    pub probability: Option<Probability>,
}

/// Goal as typed by the user, before the service has priced it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoalDraft {
    pub name: String,
    pub amount_today: f64,
    pub years: u32,
}

impl GoalDraft {
    pub fn new(name: impl Into<String>, amount_today: f64, years: u32) -> Self {
        Self {
            name: name.into(),
            amount_today,
            years,
        }
    }
}

/// Issues `goal_<epoch-millis>` ids.
///
/// Ids are strictly increasing for the lifetime of the generator, so two goals
/// created within the same millisecond still get distinct ids.
#[derive(Debug, Default)]
pub struct GoalIdGenerator {
    last: AtomicI64,
}

impl GoalIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange(prev, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return format!("goal_{candidate}"),
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Session identifier in the same time-based style as goal ids.
pub fn new_user_id() -> String {
    format!("user_{}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal() -> Goal {
        Goal {
            goal_id: "goal_1".into(),
            name: "Car".into(),
            amount_today: 800_000.0,
            time_horizon: 5,
            future_cost: 1_070_580.0,
            monthly_saving: 13_690.0,
            probability: Probability::Medium,
        }
    }

    #[test]
    fn test_ids_strictly_increase() {
        let ids = GoalIdGenerator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a.starts_with("goal_"));
        assert_ne!(a, b);
        assert_ne!(b, c);

        let n = |s: &str| s.trim_start_matches("goal_").parse::<i64>().unwrap();
        assert!(n(&a) < n(&b) && n(&b) < n(&c));
    }

    #[test]
    fn test_user_id_shape() {
        let id = new_user_id();
        assert!(id.starts_with("user_"));
        assert!(id.trim_start_matches("user_").parse::<i64>().is_ok());
    }

    #[test]
    fn test_apply_partial_update() {
        let mut g = goal();
        g.apply(GoalUpdate {
            name: Some("Family car".into()),
            ..Default::default()
        });
        assert_eq!(g.name, "Family car");
        assert_eq!(g.goal_id, "goal_1");
        assert_eq!(g.amount_today, 800_000.0);
    }

    #[test]
    fn test_probability_defaults_on_the_wire() {
        let g: Goal = serde_json::from_str(
            r#"{"goal_id":"goal_9","name":"Trip","amount_today":100000,"time_horizon":2,"future_cost":112360,"monthly_saving":4200}"#,
        )
        .unwrap();
        assert_eq!(g.probability, Probability::Medium);
    }
}
