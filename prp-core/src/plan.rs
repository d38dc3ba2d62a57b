//! Plan snapshot returned by the calculation service.
//!
//! The client never edits a plan; it only reads amounts out of it. Sections the
//! service legitimately omits (`stocks`, `child_plans`, `affordability`) are
//! modelled as `Option`/empty so callers get a zero contribution rather than a
//! fault.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermInsurance {
    pub cover_amount: f64,
    /// Years of cover.
    pub tenure: i32,
    pub yearly_cost: f64,
    #[serde(default)]
    pub riders: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthInsurance {
    pub cover_amount: f64,
    pub family_size: u32,
    pub yearly_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protection {
    pub term_insurance: TermInsurance,
    pub health_insurance: HealthInsurance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyFund {
    pub required_amount: f64,
    pub monthly_contribution: f64,
    /// Months to build the fund.
    #[serde(default)]
    pub build_period: Option<u32>,
    #[serde(default)]
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpsPlan {
    pub target_corpus: f64,
    pub monthly_contribution: f64,
    pub expected_value: f64,
    pub years_to_retirement: i32,
}

/// Government savings scheme held for a child (Sukanya Samriddhi, PPF).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildPlan {
    pub scheme_name: String,
    pub yearly_deposit: f64,
    pub maturity_value: f64,
    pub years_to_maturity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutualFundPlan {
    pub monthly_sip: f64,
    pub index_allocation: f64,
    pub active_allocation: f64,
    /// Percent per year.
    pub expected_return: f64,
    pub projected_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldAllocation {
    pub monthly_amount: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAllocation {
    pub monthly_amount: f64,
    pub percentage: f64,
    #[serde(default)]
    pub risk_disclaimer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wealth {
    pub emergency_fund: EmergencyFund,
    pub nps_plan: NpsPlan,
    #[serde(default)]
    pub child_plans: Vec<ChildPlan>,
    pub mutual_funds: MutualFundPlan,
    pub gold: GoldAllocation,
    #[serde(default)]
    pub stocks: Option<StockAllocation>,
}

impl Wealth {
    /// Sum of yearly deposits across all child plans.
    pub fn child_plans_yearly(&self) -> f64 {
        self.child_plans.iter().map(|p| p.yearly_deposit).sum()
    }

    /// Monthly stock allocation, zero when the plan carries none.
    pub fn stocks_monthly(&self) -> f64 {
        self.stocks.as_ref().map_or(0.0, |s| s.monthly_amount)
    }
}

/// Display priority the service attaches to a budget suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    Critical,
    High,
    Medium,
    Low,
    #[serde(other)]
    Unknown,
}

impl SuggestionPriority {
    /// Sort key for display: critical first, unrecognised labels last.
    pub fn rank(&self) -> u8 {
        match self {
            SuggestionPriority::Critical => 0,
            SuggestionPriority::High => 1,
            SuggestionPriority::Medium => 2,
            SuggestionPriority::Low => 3,
            SuggestionPriority::Unknown => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SuggestionPriority::Critical => "CRITICAL",
            SuggestionPriority::High => "HIGH",
            SuggestionPriority::Medium => "MEDIUM",
            SuggestionPriority::Low => "LOW",
            SuggestionPriority::Unknown => "NOTE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub priority: SuggestionPriority,
    pub message: String,
}

/// The service's own view of whether its recommended total fits the budget.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AffordabilityAdvice {
    #[serde(default)]
    pub is_affordable: bool,
    #[serde(default)]
    pub deficit: f64,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedPlan {
    pub protection: Protection,
    pub wealth: Wealth,
    /// The service's unmodified recommended monthly total.
    pub total_monthly_savings: f64,
    #[serde(default)]
    pub surplus: Option<f64>,
    /// Budget ceiling for the affordability check; fixed for the session.
    pub available_monthly_savings: f64,
    #[serde(default)]
    pub affordability: Option<AffordabilityAdvice>,
}

impl CalculatedPlan {
    /// Service suggestions, or an empty slice when none were sent.
    pub fn suggestions(&self) -> &[Suggestion] {
        self.affordability
            .as_ref()
            .map_or(&[], |a| a.suggestions.as_slice())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Plan whose numbers match the worked example: 12 500/month against a
    /// 12 000 ceiling with default priorities.
    pub fn example_plan() -> CalculatedPlan {
        CalculatedPlan {
            protection: Protection {
                term_insurance: TermInsurance {
                    cover_amount: 15_000_000.0,
                    tenure: 50,
                    yearly_cost: 12_000.0,
                    riders: vec!["Critical Illness".into()],
                },
                health_insurance: HealthInsurance {
                    cover_amount: 2_000_000.0,
                    family_size: 3,
                    yearly_cost: 24_000.0,
                },
            },
            wealth: Wealth {
                emergency_fund: EmergencyFund {
                    required_amount: 24_000.0,
                    monthly_contribution: 1_000.0,
                    build_period: Some(24),
                    tools: vec![],
                },
                nps_plan: NpsPlan {
                    target_corpus: 1_440_000.0,
                    monthly_contribution: 3_000.0,
                    expected_value: 1_440_000.0,
                    years_to_retirement: 40,
                },
                child_plans: vec![],
                mutual_funds: MutualFundPlan {
                    monthly_sip: 5_000.0,
                    index_allocation: 3_000.0,
                    active_allocation: 2_000.0,
                    expected_return: 13.0,
                    projected_value: 5_000_000.0,
                },
                gold: GoldAllocation {
                    monthly_amount: 500.0,
                    percentage: 7.5,
                },
                stocks: None,
            },
            total_monthly_savings: 12_500.0,
            surplus: None,
            available_monthly_savings: 12_000.0,
            affordability: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_service_payload_with_optional_sections_missing() {
        let json = r#"{
            "protection": {
                "term_insurance": {"cover_amount": 19200000, "tenure": 50, "yearly_cost": 153600, "riders": ["Critical Illness"]},
                "health_insurance": {"cover_amount": 1500000, "family_size": 2, "yearly_cost": 18000}
            },
            "wealth": {
                "emergency_fund": {"required_amount": 360000, "monthly_contribution": 15000, "build_period": 24, "tools": ["Liquid fund"]},
                "nps_plan": {"target_corpus": 21600000, "monthly_contribution": 60000, "expected_value": 21600000, "years_to_retirement": 30},
                "mutual_funds": {"monthly_sip": 0, "index_allocation": 0, "active_allocation": 0, "expected_return": 13.0, "projected_value": 0},
                "gold": {"monthly_amount": 0, "percentage": 7.5},
                "stocks": null
            },
            "total_monthly_savings": 89300,
            "surplus": -49300,
            "available_monthly_savings": 20000,
            "some_future_field": true
        }"#;
        let plan: CalculatedPlan = serde_json::from_str(json).unwrap();
        assert!(plan.wealth.child_plans.is_empty());
        assert!(plan.wealth.stocks.is_none());
        assert_eq!(plan.wealth.stocks_monthly(), 0.0);
        assert!(plan.suggestions().is_empty());
        assert_eq!(plan.surplus, Some(-49300.0));
    }

    #[test]
    fn test_suggestion_priority_parsing() {
        let advice: AffordabilityAdvice = serde_json::from_str(
            r#"{"is_affordable": false, "deficit": 500, "suggestions": [
                {"priority": "critical", "message": "a"},
                {"priority": "whatever", "message": "b"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(advice.suggestions[0].priority, SuggestionPriority::Critical);
        assert_eq!(advice.suggestions[1].priority, SuggestionPriority::Unknown);
        assert!(SuggestionPriority::Critical.rank() < SuggestionPriority::Low.rank());
    }

    #[test]
    fn test_child_plans_yearly() {
        let mut plan = fixtures::example_plan();
        assert_eq!(plan.wealth.child_plans_yearly(), 0.0);
        plan.wealth.child_plans.push(ChildPlan {
            scheme_name: "PPF".into(),
            yearly_deposit: 50_000.0,
            maturity_value: 1_400_000.0,
            years_to_maturity: 15,
        });
        plan.wealth.child_plans.push(ChildPlan {
            scheme_name: "Sukanya Samriddhi Yojana".into(),
            yearly_deposit: 10_000.0,
            maturity_value: 400_000.0,
            years_to_maturity: 18,
        });
        assert_eq!(plan.wealth.child_plans_yearly(), 60_000.0);
    }
}
