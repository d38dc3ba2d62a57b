//! User profile: the draft the wizard fills in, and the complete record sent
//! to the calculation service.

use serde::{Deserialize, Serialize};

/// How comfortable the user is with market risk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskComfort {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskComfort {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskComfort::Low => "Low",
            RiskComfort::Medium => "Medium",
            RiskComfort::High => "High",
        }
    }
}

impl std::str::FromStr for RiskComfort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskComfort::Low),
            "medium" => Ok(RiskComfort::Medium),
            "high" => Ok(RiskComfort::High),
            other => Err(format!("unknown risk comfort '{other}' (expected low, medium or high)")),
        }
    }
}

/// A complete, validated profile. This is the payload of `calculate-plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub age: u32,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub family_size: u32,
    pub has_dependents: bool,
    pub risk_comfort: RiskComfort,
    #[serde(default)]
    pub has_daughter: bool,
    #[serde(default)]
    pub daughter_age: Option<u32>,
    #[serde(default)]
    pub has_son: bool,
    #[serde(default)]
    pub son_age: Option<u32>,
}

impl Profile {
    pub fn has_children(&self) -> bool {
        self.has_daughter || self.has_son
    }
}

/// Profile as it exists mid-wizard: numeric facts stay `None` until entered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub age: Option<u32>,
    pub monthly_income: Option<f64>,
    pub monthly_expenses: Option<f64>,
    pub family_size: Option<u32>,
    pub has_dependents: bool,
    pub risk_comfort: RiskComfort,
    pub has_daughter: bool,
    pub daughter_age: Option<u32>,
    pub has_son: bool,
    pub son_age: Option<u32>,
}

impl ProfileDraft {
    pub fn has_children(&self) -> bool {
        self.has_daughter || self.has_son
    }

    /// Merge a partial update. Fields the update leaves as `None` keep their
    /// current value.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(age) = update.age {
            self.age = Some(age);
        }
        if let Some(income) = update.monthly_income {
            self.monthly_income = Some(income);
        }
        if let Some(expenses) = update.monthly_expenses {
            self.monthly_expenses = Some(expenses);
        }
        if let Some(size) = update.family_size {
            self.family_size = Some(size);
        }
        if let Some(deps) = update.has_dependents {
            self.has_dependents = deps;
        }
        if let Some(risk) = update.risk_comfort {
            self.risk_comfort = risk;
        }
        if let Some(flag) = update.has_daughter {
            self.has_daughter = flag;
        }
        if let Some(age) = update.daughter_age {
            self.daughter_age = age;
        }
        if let Some(flag) = update.has_son {
            self.has_son = flag;
        }
        if let Some(age) = update.son_age {
            self.son_age = age;
        }
    }
}

impl From<&Profile> for ProfileDraft {
    fn from(p: &Profile) -> Self {
        Self {
            age: Some(p.age),
            monthly_income: Some(p.monthly_income),
            monthly_expenses: Some(p.monthly_expenses),
            family_size: Some(p.family_size),
            has_dependents: p.has_dependents,
            risk_comfort: p.risk_comfort,
            has_daughter: p.has_daughter,
            daughter_age: p.daughter_age,
            has_son: p.has_son,
            son_age: p.son_age,
        }
    }
}

/// Partial profile fields for [`ProfileDraft::apply`].
///
/// Child ages are doubly optional: `Some(None)` clears a previously entered age.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileUpdate {
    pub age: Option<u32>,
    pub monthly_income: Option<f64>,
    pub monthly_expenses: Option<f64>,
    pub family_size: Option<u32>,
    pub has_dependents: Option<bool>,
    pub risk_comfort: Option<RiskComfort>,
    pub has_daughter: Option<bool>,
    pub daughter_age: Option<Option<u32>>,
    pub has_son: Option<bool>,
    pub son_age: Option<Option<u32>>,
}

impl ProfileUpdate {
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_income(mut self, monthly_income: f64) -> Self {
        self.monthly_income = Some(monthly_income);
        self
    }

    pub fn with_expenses(mut self, monthly_expenses: f64) -> Self {
        self.monthly_expenses = Some(monthly_expenses);
        self
    }

    pub fn with_family_size(mut self, family_size: u32) -> Self {
        self.family_size = Some(family_size);
        self
    }

    pub fn with_dependents(mut self, has_dependents: bool) -> Self {
        self.has_dependents = Some(has_dependents);
        self
    }

    pub fn with_risk(mut self, risk: RiskComfort) -> Self {
        self.risk_comfort = Some(risk);
        self
    }

    /// Set (or clear, with `None`) the daughter details in one go.
    pub fn with_daughter(mut self, age: Option<u32>) -> Self {
        self.has_daughter = Some(age.is_some());
        self.daughter_age = Some(age);
        self
    }

    /// Set (or clear, with `None`) the son details in one go.
    pub fn with_son(mut self, age: Option<u32>) -> Self {
        self.has_son = Some(age.is_some());
        self.son_age = Some(age);
        self
    }
}
