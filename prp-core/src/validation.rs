//! Input checks for the profile and goal forms.
//!
//! Failures are reported per field so a form can show every problem at once.
//! Nothing here touches the session or the network.

use thiserror::Error;

use crate::goal::GoalDraft;
use crate::profile::{Profile, ProfileDraft};

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 70;
pub const MAX_CHILD_AGE: u32 = 18;
pub const MIN_GOAL_YEARS: u32 = 1;
pub const MAX_GOAL_YEARS: u32 = 20;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("please enter age between 18 and 70")]
    Age,
    #[error("please enter valid monthly income")]
    Income,
    #[error("please enter valid monthly expenses")]
    Expenses,
    #[error("expenses should be less than income")]
    ExpensesExceedIncome,
    #[error("please enter valid family size")]
    FamilySize,
    #[error("please enter daughter's age between 0 and 18")]
    DaughterAge,
    #[error("please enter son's age between 0 and 18")]
    SonAge,
    #[error("goal name required")]
    GoalName,
    #[error("valid goal amount required")]
    GoalAmount,
    #[error("years must be between 1 and 20")]
    GoalYears,
}

impl ValidationError {
    /// Form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Age => "age",
            ValidationError::Income => "monthly_income",
            ValidationError::Expenses | ValidationError::ExpensesExceedIncome => "monthly_expenses",
            ValidationError::FamilySize => "family_size",
            ValidationError::DaughterAge => "daughter_age",
            ValidationError::SonAge => "son_age",
            ValidationError::GoalName => "name",
            ValidationError::GoalAmount => "amount_today",
            ValidationError::GoalYears => "years",
        }
    }
}

/// Every field error found in one pass.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn contains(&self, err: &ValidationError) -> bool {
        self.0.contains(err)
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

impl ProfileDraft {
    /// Check the draft and produce the complete profile for `calculate-plan`.
    pub fn validate(&self) -> Result<Profile, ValidationErrors> {
        let mut errors = Vec::new();

        let age = self.age.filter(|a| (MIN_AGE..=MAX_AGE).contains(a));
        if age.is_none() {
            errors.push(ValidationError::Age);
        }

        let income = self.monthly_income.filter(|v| v.is_finite() && *v > 0.0);
        if income.is_none() {
            errors.push(ValidationError::Income);
        }

        let expenses = self.monthly_expenses.filter(|v| v.is_finite() && *v > 0.0);
        match (expenses, income) {
            (None, _) => errors.push(ValidationError::Expenses),
            (Some(e), Some(i)) if e >= i => errors.push(ValidationError::ExpensesExceedIncome),
            _ => {}
        }

        let family_size = self.family_size.filter(|n| *n >= 1);
        if family_size.is_none() {
            errors.push(ValidationError::FamilySize);
        }

        let child_age_ok = |age: Option<u32>| age.is_some_and(|a| a <= MAX_CHILD_AGE);
        if self.has_daughter && !child_age_ok(self.daughter_age) {
            errors.push(ValidationError::DaughterAge);
        }
        if self.has_son && !child_age_ok(self.son_age) {
            errors.push(ValidationError::SonAge);
        }

        match (age, income, expenses, family_size) {
            (Some(age), Some(monthly_income), Some(monthly_expenses), Some(family_size))
                if errors.is_empty() =>
            {
                Ok(Profile {
                    age,
                    monthly_income,
                    monthly_expenses,
                    family_size,
                    has_dependents: self.has_dependents,
                    risk_comfort: self.risk_comfort,
                    has_daughter: self.has_daughter,
                    daughter_age: self.daughter_age.filter(|_| self.has_daughter),
                    has_son: self.has_son,
                    son_age: self.son_age.filter(|_| self.has_son),
                })
            }
            _ => Err(ValidationErrors(errors)),
        }
    }
}

impl GoalDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ValidationError::GoalName);
        }
        if !(self.amount_today.is_finite() && self.amount_today > 0.0) {
            errors.push(ValidationError::GoalAmount);
        }
        if !(MIN_GOAL_YEARS..=MAX_GOAL_YEARS).contains(&self.years) {
            errors.push(ValidationError::GoalYears);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}
