//! Affordability engine: customised monthly total vs. the plan's budget ceiling.
//!
//! Pure functions of `(CalculatedPlan, PrioritySelection)`. Nothing here is
//! auto-disabled; an overage is reported and left for the user to resolve.

use serde::Serialize;

use crate::plan::{CalculatedPlan, Suggestion};
use crate::priority::{PriorityComponent, PrioritySelection};

/// One row of the plan builder: a component, what it costs per month, and
/// whether it is currently counted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentLine {
    pub component: PriorityComponent,
    pub monthly_cost: f64,
    pub enabled: bool,
    /// False when the plan has no such section (no child plans, no stocks).
    pub offered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffordabilityReport {
    pub customized_total: f64,
    pub available_monthly_savings: f64,
    pub affordable: bool,
    /// `total - available` when over budget.
    pub overage: Option<f64>,
    /// Share of the budget used, in percent. `None` when there is no budget.
    pub utilization_pct: Option<f64>,
    pub lines: Vec<ComponentLine>,
    /// Service suggestions, critical first.
    pub suggestions: Vec<Suggestion>,
}

/// Sum of the monthly cost of every enabled component.
pub fn customized_total(plan: &CalculatedPlan, priorities: &PrioritySelection) -> f64 {
    priorities
        .enabled()
        .map(|c| c.monthly_cost(plan))
        .fold(0.0, |acc, cost| acc + cost)
}

/// Non-strict: a total equal to the ceiling is affordable.
pub fn is_affordable(total: f64, available: f64) -> bool {
    total <= available
}

pub fn breakdown(plan: &CalculatedPlan, priorities: &PrioritySelection) -> Vec<ComponentLine> {
    PriorityComponent::ALL
        .into_iter()
        .map(|component| ComponentLine {
            component,
            monthly_cost: component.monthly_cost(plan),
            enabled: priorities.is_enabled(component),
            offered: component.is_offered(plan),
        })
        .collect()
}

/// Service suggestions ordered for display, stable within a priority.
pub fn ordered_suggestions(plan: &CalculatedPlan) -> Vec<Suggestion> {
    let mut out = plan.suggestions().to_vec();
    out.sort_by_key(|s| s.priority.rank());
    out
}

pub fn assess(plan: &CalculatedPlan, priorities: &PrioritySelection) -> AffordabilityReport {
    let total = customized_total(plan, priorities);
    let available = plan.available_monthly_savings;
    let affordable = is_affordable(total, available);

    AffordabilityReport {
        customized_total: total,
        available_monthly_savings: available,
        affordable,
        overage: (!affordable).then(|| total - available),
        utilization_pct: (available > 0.0).then(|| total / available * 100.0),
        lines: breakdown(plan, priorities),
        suggestions: ordered_suggestions(plan),
    }
}
