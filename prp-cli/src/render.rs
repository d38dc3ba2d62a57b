//! Plain-text views of plans, reports and goals.

use std::fmt::Write;

use prp_core::{
    AffordabilityReport, CalculatedPlan, Goal, SavedPlan, SchemeRates, WizardStep, format_inr,
};

pub fn protection(plan: &CalculatedPlan) -> String {
    let t = &plan.protection.term_insurance;
    let h = &plan.protection.health_insurance;
    let mut s = String::new();
    let _ = writeln!(
        s,
        "Term insurance: cover {} for {} years, {}/yr",
        format_inr(t.cover_amount),
        t.tenure,
        format_inr(t.yearly_cost)
    );
    if !t.riders.is_empty() {
        let _ = writeln!(s, "  riders: {}", t.riders.join(", "));
    }
    let _ = writeln!(
        s,
        "Health insurance: cover {} for a family of {}, {}/yr",
        format_inr(h.cover_amount),
        h.family_size,
        format_inr(h.yearly_cost)
    );
    s
}

pub fn emergency_fund(plan: &CalculatedPlan) -> String {
    let ef = &plan.wealth.emergency_fund;
    let mut s = format!(
        "Emergency fund: {} target, {}/month",
        format_inr(ef.required_amount),
        format_inr(ef.monthly_contribution)
    );
    if let Some(months) = ef.build_period {
        let _ = write!(s, " over {months} months");
    }
    s.push('\n');
    if !ef.tools.is_empty() {
        let _ = writeln!(s, "  keep it in: {}", ef.tools.join(", "));
    }
    s
}

pub fn retirement(plan: &CalculatedPlan) -> String {
    let n = &plan.wealth.nps_plan;
    format!(
        "NPS: {}/month for {} years, target {}, expected {}\n",
        format_inr(n.monthly_contribution),
        n.years_to_retirement,
        format_inr(n.target_corpus),
        format_inr(n.expected_value)
    )
}

pub fn child_plans(plan: &CalculatedPlan) -> String {
    let mut s = String::new();
    for c in &plan.wealth.child_plans {
        let _ = writeln!(
            s,
            "{}: {}/yr for {} years, matures at {}",
            c.scheme_name,
            format_inr(c.yearly_deposit),
            c.years_to_maturity,
            format_inr(c.maturity_value)
        );
    }
    if s.is_empty() {
        s.push_str("No child plans in this plan.\n");
    }
    s
}

pub fn mutual_funds(plan: &CalculatedPlan) -> String {
    let mf = &plan.wealth.mutual_funds;
    format!(
        "Mutual funds: SIP {}/month ({} index, {} active) at {:.1}%, projected {}\n",
        format_inr(mf.monthly_sip),
        format_inr(mf.index_allocation),
        format_inr(mf.active_allocation),
        mf.expected_return,
        format_inr(mf.projected_value)
    )
}

pub fn gold_and_stocks(plan: &CalculatedPlan) -> String {
    let g = &plan.wealth.gold;
    let mut s = format!(
        "Gold: {}/month ({:.1}% of surplus)\n",
        format_inr(g.monthly_amount),
        g.percentage
    );
    if let Some(st) = &plan.wealth.stocks {
        let _ = writeln!(
            s,
            "Direct stocks: {}/month ({:.1}% of surplus)",
            format_inr(st.monthly_amount),
            st.percentage
        );
        if st.risk_disclaimer {
            s.push_str("  equity can lose value; only invest what you can leave for 5+ years\n");
        }
    }
    s
}

/// The slice of the plan a given wizard step shows.
pub fn step_view(step: WizardStep, plan: &CalculatedPlan) -> String {
    match step {
        WizardStep::ProtectionOverview => protection(plan),
        WizardStep::EmergencyFund => emergency_fund(plan),
        WizardStep::Retirement => retirement(plan),
        WizardStep::ChildPlans => child_plans(plan),
        WizardStep::MutualFunds => mutual_funds(plan),
        WizardStep::Gold => gold_and_stocks(plan),
        _ => String::new(),
    }
}

pub fn plan_overview(plan: &CalculatedPlan) -> String {
    let mut s = String::new();
    for step in [
        WizardStep::ProtectionOverview,
        WizardStep::EmergencyFund,
        WizardStep::Retirement,
        WizardStep::ChildPlans,
        WizardStep::MutualFunds,
        WizardStep::Gold,
    ] {
        s.push_str(&step_view(step, plan));
    }
    let _ = writeln!(
        s,
        "\nRecommended total: {}/month of {} available",
        format_inr(plan.total_monthly_savings),
        format_inr(plan.available_monthly_savings)
    );
    s
}

pub fn report(report: &AffordabilityReport) -> String {
    let mut s = String::new();
    for (i, line) in report.lines.iter().enumerate() {
        if !line.offered {
            continue;
        }
        let mark = if line.enabled { "x" } else { " " };
        let _ = writeln!(
            s,
            "{:>2}. [{mark}] {:<24} {:>10}/month{}",
            i + 1,
            line.component.title(),
            format_inr(line.monthly_cost),
            if line.component.is_essential() { "  (essential)" } else { "" }
        );
    }

    let _ = write!(
        s,
        "\nYour plan: {}/month of {} available",
        format_inr(report.customized_total),
        format_inr(report.available_monthly_savings)
    );
    if let Some(pct) = report.utilization_pct {
        let _ = write!(s, " ({pct:.0}% used)");
    }
    s.push('\n');

    match report.overage {
        Some(over) => {
            let _ = writeln!(
                s,
                "Over budget by {}/month. Turn off a component or adjust your profile.",
                format_inr(over)
            );
        }
        None => s.push_str("This plan fits your budget.\n"),
    }

    for sug in &report.suggestions {
        let _ = writeln!(s, "  [{}] {}", sug.priority.label(), sug.message);
    }
    s
}

pub fn goals(goals: &[Goal]) -> String {
    if goals.is_empty() {
        return "No goals yet.\n".to_string();
    }
    let mut s = String::new();
    for g in goals {
        let _ = writeln!(
            s,
            "- {} ({}): {} today, {} in {} years, save {}/month",
            g.name,
            g.goal_id,
            format_inr(g.amount_today),
            format_inr(g.future_cost),
            g.time_horizon,
            format_inr(g.monthly_saving)
        );
    }
    s
}

pub fn rates(rates: &SchemeRates) -> String {
    let mut s = String::new();
    for r in &rates.schemes {
        let _ = writeln!(s, "{}: {:.1}%", r.name, r.rate);
        for (label, value) in [
            ("about", &r.description),
            ("tenure", &r.tenure),
            ("tax", &r.tax_benefit),
        ] {
            if !value.is_empty() {
                let _ = writeln!(s, "  {label}: {value}");
            }
        }
    }
    s
}

pub fn saved_plan_line(plan: &SavedPlan) -> String {
    let when = plan
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  {}  {}/month  {} goal(s)",
        plan.id,
        when,
        format_inr(plan.total_monthly_savings),
        plan.goals.goals.len()
    )
}

pub fn saved_plan(plan: &SavedPlan) -> String {
    let p = &plan.profile;
    let mut s = String::new();
    let _ = writeln!(s, "Plan {} for {}", plan.id, plan.user_id);
    let _ = writeln!(
        s,
        "Profile: age {}, income {}, expenses {}, family of {}, risk {}",
        p.age,
        format_inr(p.monthly_income),
        format_inr(p.monthly_expenses),
        p.family_size,
        p.risk_comfort.as_str()
    );
    let view = CalculatedPlan {
        protection: plan.protection.clone(),
        wealth: plan.wealth.clone(),
        total_monthly_savings: plan.total_monthly_savings,
        surplus: None,
        available_monthly_savings: p.monthly_income - p.monthly_expenses,
        affordability: None,
    };
    s.push_str(&plan_overview(&view));
    s.push_str("\nGoals:\n");
    s.push_str(&goals(&plan.goals.goals));
    s
}
