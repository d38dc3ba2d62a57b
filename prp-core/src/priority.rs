//! Per-component inclusion toggles used to customise a plan.

use serde::{Deserialize, Serialize};

use crate::plan::CalculatedPlan;

/// One toggleable piece of a plan. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityComponent {
    EmergencyFund,
    TermInsurance,
    HealthInsurance,
    Nps,
    ChildPlans,
    MutualFunds,
    Gold,
    Stocks,
}

impl PriorityComponent {
    pub const ALL: [PriorityComponent; 8] = [
        PriorityComponent::TermInsurance,
        PriorityComponent::HealthInsurance,
        PriorityComponent::EmergencyFund,
        PriorityComponent::Nps,
        PriorityComponent::ChildPlans,
        PriorityComponent::MutualFunds,
        PriorityComponent::Gold,
        PriorityComponent::Stocks,
    ];

    /// Wire/config key, e.g. `mutual_funds`.
    pub fn key(&self) -> &'static str {
        match self {
            PriorityComponent::EmergencyFund => "emergency_fund",
            PriorityComponent::TermInsurance => "term_insurance",
            PriorityComponent::HealthInsurance => "health_insurance",
            PriorityComponent::Nps => "nps",
            PriorityComponent::ChildPlans => "child_plans",
            PriorityComponent::MutualFunds => "mutual_funds",
            PriorityComponent::Gold => "gold",
            PriorityComponent::Stocks => "stocks",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PriorityComponent::EmergencyFund => "Emergency Fund",
            PriorityComponent::TermInsurance => "Term Insurance",
            PriorityComponent::HealthInsurance => "Health Insurance",
            PriorityComponent::Nps => "NPS Retirement",
            PriorityComponent::ChildPlans => "Child Education Plans",
            PriorityComponent::MutualFunds => "Mutual Funds SIP",
            PriorityComponent::Gold => "Gold",
            PriorityComponent::Stocks => "Direct Stocks",
        }
    }

    /// Protection and emergency cover are flagged as essentials in the plan builder.
    pub fn is_essential(&self) -> bool {
        matches!(
            self,
            PriorityComponent::TermInsurance
                | PriorityComponent::HealthInsurance
                | PriorityComponent::EmergencyFund
        )
    }

    /// Whether the plan carries this section at all. Child plans and stocks are
    /// optional; everything else is always present.
    pub fn is_offered(&self, plan: &CalculatedPlan) -> bool {
        match self {
            PriorityComponent::ChildPlans => !plan.wealth.child_plans.is_empty(),
            PriorityComponent::Stocks => plan.wealth.stocks.is_some(),
            _ => true,
        }
    }

    /// Monthly cost of this component in `plan`, zero for absent sections.
    pub fn monthly_cost(&self, plan: &CalculatedPlan) -> f64 {
        let protection = &plan.protection;
        let wealth = &plan.wealth;
        match self {
            PriorityComponent::TermInsurance => protection.term_insurance.yearly_cost / 12.0,
            PriorityComponent::HealthInsurance => protection.health_insurance.yearly_cost / 12.0,
            PriorityComponent::EmergencyFund => wealth.emergency_fund.monthly_contribution,
            PriorityComponent::Nps => wealth.nps_plan.monthly_contribution,
            PriorityComponent::ChildPlans => {
                if wealth.child_plans.is_empty() {
                    0.0
                } else {
                    wealth.child_plans_yearly() / 12.0
                }
            }
            PriorityComponent::MutualFunds => wealth.mutual_funds.monthly_sip,
            PriorityComponent::Gold => wealth.gold.monthly_amount,
            PriorityComponent::Stocks => wealth.stocks_monthly(),
        }
    }
}

impl std::fmt::Display for PriorityComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for PriorityComponent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        PriorityComponent::ALL
            .into_iter()
            .find(|c| c.key() == key)
            .ok_or_else(|| format!("unknown plan component '{}'", s.trim()))
    }
}

/// The eight toggles. Stocks start off; everything else starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritySelection {
    pub emergency_fund: bool,
    pub term_insurance: bool,
    pub health_insurance: bool,
    pub nps: bool,
    pub child_plans: bool,
    pub mutual_funds: bool,
    pub gold: bool,
    pub stocks: bool,
}

impl Default for PrioritySelection {
    fn default() -> Self {
        Self {
            emergency_fund: true,
            term_insurance: true,
            health_insurance: true,
            nps: true,
            child_plans: true,
            mutual_funds: true,
            gold: true,
            stocks: false,
        }
    }
}

impl PrioritySelection {
    pub fn all(enabled: bool) -> Self {
        Self {
            emergency_fund: enabled,
            term_insurance: enabled,
            health_insurance: enabled,
            nps: enabled,
            child_plans: enabled,
            mutual_funds: enabled,
            gold: enabled,
            stocks: enabled,
        }
    }

    pub fn is_enabled(&self, component: PriorityComponent) -> bool {
        match component {
            PriorityComponent::EmergencyFund => self.emergency_fund,
            PriorityComponent::TermInsurance => self.term_insurance,
            PriorityComponent::HealthInsurance => self.health_insurance,
            PriorityComponent::Nps => self.nps,
            PriorityComponent::ChildPlans => self.child_plans,
            PriorityComponent::MutualFunds => self.mutual_funds,
            PriorityComponent::Gold => self.gold,
            PriorityComponent::Stocks => self.stocks,
        }
    }

    /// Set exactly one flag.
    pub fn set(&mut self, component: PriorityComponent, enabled: bool) {
        let flag = match component {
            PriorityComponent::EmergencyFund => &mut self.emergency_fund,
            PriorityComponent::TermInsurance => &mut self.term_insurance,
            PriorityComponent::HealthInsurance => &mut self.health_insurance,
            PriorityComponent::Nps => &mut self.nps,
            PriorityComponent::ChildPlans => &mut self.child_plans,
            PriorityComponent::MutualFunds => &mut self.mutual_funds,
            PriorityComponent::Gold => &mut self.gold,
            PriorityComponent::Stocks => &mut self.stocks,
        };
        *flag = enabled;
    }

    pub fn enabled(&self) -> impl Iterator<Item = PriorityComponent> + '_ {
        PriorityComponent::ALL
            .into_iter()
            .filter(move |c| self.is_enabled(*c))
    }
}
