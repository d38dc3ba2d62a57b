//! In-process plan calculation using the service's published planning rules.
//!
//! Used by [`crate::offline::OfflinePlanService`] so the wizard can run with no
//! backend. All amounts are rupees; every figure is rounded to paise.

use crate::money::round2;
use crate::plan::{
    AffordabilityAdvice, CalculatedPlan, ChildPlan, EmergencyFund, GoldAllocation,
    HealthInsurance, MutualFundPlan, NpsPlan, Protection, StockAllocation, Suggestion,
    SuggestionPriority, TermInsurance, Wealth,
};
use crate::profile::{Profile, RiskComfort};
use crate::service::{GoalQuote, SchemeRate, SchemeRates};

pub const INFLATION_RATE: f64 = 0.06;
pub const SUKANYA_RATE: f64 = 0.08;
pub const PPF_RATE: f64 = 0.071;
pub const GOAL_RETURN: f64 = 0.10;
pub const MF_BLENDED_RETURN: f64 = 0.13;

const TERM_COVER_MULTIPLE: f64 = 20.0;
const TERM_PREMIUM_RATE: f64 = 0.008;
const TERM_COVER_TO_AGE: i32 = 80;
const EMERGENCY_MONTHS: f64 = 6.0;
const EMERGENCY_BUILD_MONTHS: u32 = 24;
const RETIREMENT_AGE: i32 = 60;
const CORPUS_YEARS_OF_EXPENSES: f64 = 30.0;
const CHILD_YEARLY_DEPOSIT: f64 = 50_000.0;
const SUKANYA_MAX_OPEN_AGE: u32 = 10;
const SUKANYA_DEPOSIT_UNTIL: u32 = 15;
const SUKANYA_MATURES_AT: u32 = 21;
const PPF_YEARS: u32 = 15;
const MF_SHARE: f64 = 0.6;
const GOLD_SHARE: f64 = 0.075;
const STOCK_SHARE: f64 = 0.15;
const PLAN_YEARS: u32 = 20;

/// Future value of a level deposit paid at the start of each period.
pub fn annuity_due_fv(deposit: f64, rate: f64, periods: u32) -> f64 {
    if periods == 0 {
        return 0.0;
    }
    if rate == 0.0 {
        return deposit * periods as f64;
    }
    deposit * (((1.0 + rate).powi(periods as i32) - 1.0) / rate) * (1.0 + rate)
}

fn term_insurance(profile: &Profile) -> TermInsurance {
    let cover = profile.monthly_income * 12.0 * TERM_COVER_MULTIPLE;
    TermInsurance {
        cover_amount: round2(cover),
        tenure: TERM_COVER_TO_AGE - profile.age as i32,
        yearly_cost: round2(cover * TERM_PREMIUM_RATE),
        riders: vec!["Critical Illness".into(), "Accidental Death".into()],
    }
}

fn health_insurance(family_size: u32) -> HealthInsurance {
    let (cover_amount, yearly_cost) = if family_size <= 2 {
        (1_500_000.0, 18_000.0)
    } else {
        (2_000_000.0, 24_000.0)
    };
    HealthInsurance {
        cover_amount,
        family_size,
        yearly_cost,
    }
}

fn emergency_fund(monthly_expenses: f64) -> EmergencyFund {
    let required = monthly_expenses * EMERGENCY_MONTHS;
    EmergencyFund {
        required_amount: round2(required),
        monthly_contribution: round2(required / EMERGENCY_BUILD_MONTHS as f64),
        build_period: Some(EMERGENCY_BUILD_MONTHS),
        tools: vec!["Auto-sweep account".into(), "Liquid fund".into()],
    }
}

/// Linear (no growth) NPS contribution towards 30 years of expenses by 60.
fn nps_plan(profile: &Profile) -> NpsPlan {
    let years = RETIREMENT_AGE - profile.age as i32;
    let target = profile.monthly_expenses * 12.0 * CORPUS_YEARS_OF_EXPENSES;
    let months = years * 12;
    let monthly = if months > 0 { target / months as f64 } else { 0.0 };
    NpsPlan {
        target_corpus: round2(target),
        monthly_contribution: round2(monthly),
        expected_value: round2(target),
        years_to_retirement: years,
    }
}

fn sukanya(daughter_age: u32) -> ChildPlan {
    let years_of_investment = SUKANYA_DEPOSIT_UNTIL.saturating_sub(daughter_age);
    let years_to_maturity = SUKANYA_MATURES_AT.saturating_sub(daughter_age);
    let deposited = annuity_due_fv(CHILD_YEARLY_DEPOSIT, SUKANYA_RATE, years_of_investment);
    let maturity = if years_of_investment == 0 {
        0.0
    } else {
        deposited * (1.0 + SUKANYA_RATE).powi((years_to_maturity - years_of_investment) as i32)
    };
    ChildPlan {
        scheme_name: "Sukanya Samriddhi Yojana".into(),
        yearly_deposit: CHILD_YEARLY_DEPOSIT,
        maturity_value: round2(maturity),
        years_to_maturity: years_to_maturity as i32,
    }
}

fn ppf() -> ChildPlan {
    ChildPlan {
        scheme_name: "PPF".into(),
        yearly_deposit: CHILD_YEARLY_DEPOSIT,
        maturity_value: round2(annuity_due_fv(CHILD_YEARLY_DEPOSIT, PPF_RATE, PPF_YEARS)),
        years_to_maturity: PPF_YEARS as i32,
    }
}

fn child_plans(profile: &Profile) -> Vec<ChildPlan> {
    let mut plans = Vec::new();
    if !profile.has_children() {
        return plans;
    }
    if profile.has_daughter {
        if let Some(age) = profile.daughter_age.filter(|a| *a < SUKANYA_MAX_OPEN_AGE) {
            plans.push(sukanya(age));
        }
    }
    if profile.has_son {
        plans.push(ppf());
    }
    plans
}

/// Monthly SIP future value with monthly compounding.
pub fn sip_future_value(monthly_sip: f64, years: u32, annual_return: f64) -> f64 {
    round2(annuity_due_fv(monthly_sip, annual_return / 12.0, years * 12))
}

/// Build the full 20-year plan for `profile`.
pub fn calculate_plan(profile: &Profile) -> CalculatedPlan {
    let available = profile.monthly_income - profile.monthly_expenses;

    let term = term_insurance(profile);
    let health = health_insurance(profile.family_size);
    let emergency = emergency_fund(profile.monthly_expenses);
    let nps = nps_plan(profile);
    let children = child_plans(profile);

    let commitments = term.yearly_cost / 12.0
        + health.yearly_cost / 12.0
        + emergency.monthly_contribution
        + nps.monthly_contribution
        + children.iter().map(|c| c.yearly_deposit).sum::<f64>() / 12.0;

    let surplus = available - commitments;
    let mf = (surplus * MF_SHARE).max(0.0);
    let gold = (surplus * GOLD_SHARE).max(0.0);
    let stocks = if profile.risk_comfort == RiskComfort::High && surplus > mf + gold {
        (surplus * STOCK_SHARE).min(surplus - mf - gold)
    } else {
        0.0
    };

    let mut plan = CalculatedPlan {
        protection: Protection {
            term_insurance: term,
            health_insurance: health,
        },
        wealth: Wealth {
            emergency_fund: emergency,
            nps_plan: nps,
            child_plans: children,
            mutual_funds: MutualFundPlan {
                monthly_sip: round2(mf),
                index_allocation: round2(mf * 0.6),
                active_allocation: round2(mf * 0.4),
                expected_return: 13.0,
                projected_value: sip_future_value(mf, PLAN_YEARS, MF_BLENDED_RETURN),
            },
            gold: GoldAllocation {
                monthly_amount: round2(gold),
                percentage: 7.5,
            },
            stocks: (stocks > 0.0).then(|| StockAllocation {
                monthly_amount: round2(stocks),
                percentage: 15.0,
                risk_disclaimer: true,
            }),
        },
        total_monthly_savings: round2(commitments + mf + gold + stocks),
        surplus: Some(round2(surplus)),
        available_monthly_savings: round2(available),
        affordability: None,
    };
    plan.affordability = Some(budget_advice(&plan, available));
    plan
}

/// Tiered suggestions for fitting the recommended total into `available`.
///
/// Essentials are protection plus the emergency fund, important is NPS plus
/// child plans, and everything else is optional wealth building.
pub fn budget_advice(plan: &CalculatedPlan, available: f64) -> AffordabilityAdvice {
    let required = plan.total_monthly_savings;
    if required <= available {
        return AffordabilityAdvice {
            is_affordable: true,
            deficit: 0.0,
            suggestions: Vec::new(),
        };
    }

    let w = &plan.wealth;
    let p = &plan.protection;
    let essential = w.emergency_fund.monthly_contribution
        + p.term_insurance.yearly_cost / 12.0
        + p.health_insurance.yearly_cost / 12.0;
    let child = w.child_plans_yearly() / 12.0;
    let important = w.nps_plan.monthly_contribution + child;

    let mut suggestions = Vec::new();
    let mut say = |priority, message: String| suggestions.push(Suggestion { priority, message });

    if available < essential {
        say(
            SuggestionPriority::Critical,
            format!(
                "Your available savings (₹{available:.0}) are less than essential protection (₹{essential:.0}). Consider increasing income or reducing expenses."
            ),
        );
    } else if available < essential + important {
        say(
            SuggestionPriority::High,
            "Focus on essentials first. Consider reducing or delaying child education plans until income increases.".into(),
        );
        if child > 0.0 {
            let reduced = (available - essential).max(0.0);
            say(
                SuggestionPriority::Medium,
                format!("Reduce child plan contributions to ₹{reduced:.0}/month temporarily."),
            );
        }
    } else {
        let for_optional = available - essential - important;
        say(
            SuggestionPriority::Medium,
            format!("Allocate ₹{for_optional:.0}/month to wealth building (mutual funds, gold)."),
        );
        if for_optional > 0.0 {
            say(
                SuggestionPriority::Low,
                format!(
                    "Suggested allocation: ₹{:.0} mutual funds, ₹{:.0} gold.",
                    for_optional * 0.7,
                    for_optional * 0.3
                ),
            );
        }
    }

    AffordabilityAdvice {
        is_affordable: false,
        deficit: required - available,
        suggestions,
    }
}

/// Inflation-adjusted cost of a goal and the monthly saving needed to reach it.
pub fn goal_requirement(amount_today: f64, years: u32) -> GoalQuote {
    let future_cost = amount_today * (1.0 + INFLATION_RATE).powi(years as i32);
    let months = years * 12;
    let monthly_saving = if months > 0 {
        future_cost / annuity_due_fv(1.0, GOAL_RETURN / 12.0, months)
    } else {
        future_cost
    };
    GoalQuote {
        future_cost: round2(future_cost),
        monthly_saving: round2(monthly_saving),
    }
}

pub fn scheme_rates() -> SchemeRates {
    let scheme = |name: &str, rate, description: &str, tenure: &str, tax_benefit: &str| SchemeRate {
        name: name.into(),
        rate,
        description: description.into(),
        tenure: tenure.into(),
        tax_benefit: tax_benefit.into(),
    };
    SchemeRates {
        schemes: vec![
            scheme(
                "Sukanya Samriddhi Yojana",
                8.0,
                "For girl child under 10 years",
                "21 years",
                "Section 80C up to ₹1.5 lakh",
            ),
            scheme(
                "Public Provident Fund (PPF)",
                7.1,
                "Long-term savings with tax benefits",
                "15 years (extendable)",
                "Section 80C up to ₹1.5 lakh",
            ),
            scheme(
                "National Pension System (NPS)",
                10.0,
                "Market-linked retirement savings",
                "Till age 60",
                "Section 80C + 80CCD(1B) up to ₹2 lakh",
            ),
        ],
    }
}
