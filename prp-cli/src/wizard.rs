//! Interactive walk through the plan wizard.
//!
//! Each step reads what it needs from the console, writes it into the session
//! and asks the step table where to go next.

use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};

use prp_core::{
    FlowError, GoalDraft, GoalIdGenerator, PlanFetch, PlanService, PriorityComponent,
    ProfileUpdate, RiskComfort, SaveAck, SaveGuard, ValidationError, WizardSession, WizardStep,
    fetch_plan, format_inr, quote_and_add_goal, save_plan,
};

use crate::console::Console;
use crate::render;

pub struct Wizard<'a, S: ?Sized, R, W> {
    service: &'a S,
    console: Console<R, W>,
    ids: GoalIdGenerator,
    guard: SaveGuard,
}

impl<'a, S, R, W> Wizard<'a, S, R, W>
where
    S: PlanService + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(service: &'a S, console: Console<R, W>) -> Self {
        Self {
            service,
            console,
            ids: GoalIdGenerator::new(),
            guard: SaveGuard::new(),
        }
    }

    /// Run every step on the session's route. Returns the save receipt when
    /// the user chose to save.
    pub async fn run(&mut self, session: &mut WizardSession) -> Result<Option<SaveAck>> {
        let mut step = WizardStep::Profile;
        loop {
            self.console.say(format!(
                "\n== Step {} of {}: {} ==",
                step.index() + 1,
                WizardStep::ALL.len(),
                step.title()
            ))?;

            if step.needs_plan() {
                self.ensure_plan(session).await?;
            }

            match step {
                WizardStep::Profile => self.profile_step(session)?,
                WizardStep::Children => self.children_step(session)?,
                WizardStep::Goals => self.goals_step(session).await?,
                WizardStep::PlanBuilder => self.builder_step(session)?,
                WizardStep::Summary => {
                    session.complete_step(step);
                    return self.summary_step(session).await;
                }
                _ => {
                    let plan = session.calculated_plan().context("plan missing")?;
                    let view = render::step_view(step, plan);
                    self.console.say(view.trim_end())?;
                }
            }

            match session.complete_step(step) {
                Some(next) => step = next,
                None => return Ok(None),
            }
        }
    }

    fn profile_step(&mut self, session: &mut WizardSession) -> Result<()> {
        for field in ["age", "monthly_income", "monthly_expenses", "family_size"] {
            self.ask_field(session, field)?;
        }
        let deps = self.console.confirm("Anyone depends on your income?", false)?;
        let risk = self.console.prompt_or(
            "Risk comfort (low/medium/high, blank for medium)",
            RiskComfort::Medium,
        )?;
        session.update_profile(
            ProfileUpdate::default()
                .with_dependents(deps)
                .with_risk(risk),
        );
        self.revalidate(session)
    }

    fn children_step(&mut self, session: &mut WizardSession) -> Result<()> {
        let daughter = if self.console.confirm("Do you have a daughter?", false)? {
            Some(self.console.prompt_parse("Daughter's age")?)
        } else {
            None
        };
        let son = if self.console.confirm("Do you have a son?", false)? {
            Some(self.console.prompt_parse("Son's age")?)
        } else {
            None
        };
        session.update_profile(
            ProfileUpdate::default()
                .with_daughter(daughter)
                .with_son(son),
        );
        self.revalidate(session)
    }

    /// Show every field error and ask again for just those fields. Expenses
    /// over income may be wrong on either side, so both are asked.
    fn revalidate(&mut self, session: &mut WizardSession) -> Result<()> {
        while let Err(errs) = session.profile().validate() {
            let mut fields: Vec<&'static str> = Vec::new();
            for e in errs.errors() {
                self.console.say(format!("  {e}"))?;
                let related = match e {
                    ValidationError::ExpensesExceedIncome => vec!["monthly_income", e.field()],
                    _ => vec![e.field()],
                };
                for field in related {
                    if !fields.contains(&field) {
                        fields.push(field);
                    }
                }
            }
            for field in fields {
                self.ask_field(session, field)?;
            }
        }
        Ok(())
    }

    fn ask_field(&mut self, session: &mut WizardSession, field: &str) -> Result<()> {
        let c = &mut self.console;
        let update = match field {
            "age" => ProfileUpdate::default().with_age(c.prompt_parse("Age")?),
            "monthly_income" => {
                ProfileUpdate::default().with_income(c.prompt_parse("Monthly income (₹)")?)
            }
            "monthly_expenses" => {
                ProfileUpdate::default().with_expenses(c.prompt_parse("Monthly expenses (₹)")?)
            }
            "family_size" => {
                ProfileUpdate::default().with_family_size(c.prompt_parse("Family size")?)
            }
            "daughter_age" => {
                ProfileUpdate::default().with_daughter(Some(c.prompt_parse("Daughter's age")?))
            }
            "son_age" => ProfileUpdate::default().with_son(Some(c.prompt_parse("Son's age")?)),
            other => bail!("no prompt for field '{other}'"),
        };
        session.update_profile(update);
        Ok(())
    }

    /// Fetch a plan if there is none or the profile moved on since the last one.
    async fn ensure_plan(&mut self, session: &mut WizardSession) -> Result<()> {
        while session.calculated_plan().is_none() || session.plan_is_stale() {
            self.console.say("Calculating your plan...")?;
            match fetch_plan(session, self.service).await {
                Ok(PlanFetch::Installed) | Ok(PlanFetch::Discarded) => {}
                Err(FlowError::Invalid(errs)) => bail!("profile is incomplete: {errs}"),
                Err(e) => {
                    self.console.say(format!("Could not calculate your plan: {e}"))?;
                    if !self.console.confirm("Try again?", true)? {
                        bail!("no plan available");
                    }
                }
            }
        }
        Ok(())
    }

    async fn goals_step(&mut self, session: &mut WizardSession) -> Result<()> {
        loop {
            let list = render::goals(session.goals());
            self.console.say(list.trim_end())?;
            let line = self
                .console
                .prompt("Goals: 'add', 'remove <n>', or blank to continue")?;
            let words: Vec<&str> = line.split_whitespace().collect();
            match words.as_slice() {
                [] => return Ok(()),
                ["add" | "a"] => self.add_goal(session).await?,
                ["remove" | "rm", n] => {
                    let id = n
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| i.checked_sub(1))
                        .and_then(|i| session.goals().get(i))
                        .map(|g| g.goal_id.clone());
                    match id {
                        Some(id) => {
                            session.delete_goal(&id);
                        }
                        None => self.console.say(format!("  no goal number {n}"))?,
                    }
                }
                _ => self.console.say(format!("  unknown command '{line}'"))?,
            }
        }
    }

    async fn add_goal(&mut self, session: &mut WizardSession) -> Result<()> {
        let name = self.console.prompt("Goal name")?;
        let amount: f64 = self.console.prompt_parse("Amount needed in today's rupees")?;
        let years: u32 = self.console.prompt_parse("Years from now (1-20)")?;

        match quote_and_add_goal(session, self.service, &self.ids, GoalDraft::new(name, amount, years))
            .await
        {
            Ok(goal) => self.console.say(format!(
                "Added '{}': {} in {} years, save {}/month",
                goal.name,
                format_inr(goal.future_cost),
                goal.time_horizon,
                format_inr(goal.monthly_saving)
            ))?,
            Err(FlowError::Invalid(errs)) => {
                for e in errs.errors() {
                    self.console.say(format!("  {e}"))?;
                }
            }
            Err(e) => self.console.say(format!("Could not price this goal: {e}"))?,
        }
        Ok(())
    }

    fn builder_step(&mut self, session: &mut WizardSession) -> Result<()> {
        loop {
            let report = session.affordability().context("plan missing")?;
            self.console.say(render::report(&report).trim_end())?;

            let pick = self
                .console
                .prompt("Toggle a component by number or name (blank to continue)")?;
            if pick.is_empty() {
                if report.affordable {
                    return Ok(());
                }
                let over = format_inr(report.overage.unwrap_or_default());
                if self
                    .console
                    .confirm(&format!("Over budget by {over}/month. Continue anyway?"), false)?
                {
                    return Ok(());
                }
                continue;
            }
            match parse_component(&pick) {
                Some(c) => {
                    let on = !session.priorities().is_enabled(c);
                    session.set_priority(c, on);
                }
                None => self.console.say(format!("  unknown component '{pick}'"))?,
            }
        }
    }

    async fn summary_step(&mut self, session: &mut WizardSession) -> Result<Option<SaveAck>> {
        let plan = session.calculated_plan().context("plan missing")?;
        let report = session.affordability().context("plan missing")?;
        let overview = render::plan_overview(plan);
        self.console.say(overview.trim_end())?;
        self.console.say(format!(
            "Customised total: {}/month{}",
            format_inr(report.customized_total),
            if report.affordable { "" } else { " (over budget)" }
        ))?;
        self.console.say("Goals:")?;
        let goals = render::goals(session.goals());
        self.console.say(goals.trim_end())?;

        loop {
            if !self.console.confirm("Save this plan?", true)? {
                return Ok(None);
            }
            match save_plan(session, self.service, &self.guard).await {
                Ok(ack) => {
                    self.console
                        .say(format!("Saved plan {} for {}", ack.id, session.user_id()))?;
                    return Ok(Some(ack));
                }
                Err(e) => self.console.say(format!("Could not save: {e}"))?,
            }
        }
    }
}

/// `3` (1-based position in the builder list) or a key like `mutual_funds`.
fn parse_component(s: &str) -> Option<PriorityComponent> {
    match s.parse::<usize>() {
        Ok(n) => n
            .checked_sub(1)
            .and_then(|i| PriorityComponent::ALL.get(i))
            .copied(),
        Err(_) => s.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prp_core::OfflinePlanService;
    use std::io::Cursor;

    fn wizard<'a>(
        service: &'a OfflinePlanService,
        script: &[&str],
    ) -> Wizard<'a, OfflinePlanService, Cursor<Vec<u8>>, Vec<u8>> {
        let input = script.iter().map(|l| format!("{l}\n")).collect::<String>();
        Wizard::new(service, Console::new(Cursor::new(input.into_bytes()), Vec::new()))
    }

    fn transcript<S: ?Sized>(w: &mut Wizard<'_, S, Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(w.console.out()).to_string()
    }

    #[test]
    fn test_parse_component() {
        assert_eq!(parse_component("1"), Some(PriorityComponent::TermInsurance));
        assert_eq!(parse_component("8"), Some(PriorityComponent::Stocks));
        assert_eq!(parse_component("mutual-funds"), Some(PriorityComponent::MutualFunds));
        assert_eq!(parse_component("0"), None);
        assert_eq!(parse_component("9"), None);
        assert_eq!(parse_component("bonds"), None);
    }

    #[tokio::test]
    async fn test_full_run_without_dependents() {
        let service = OfflinePlanService::new();
        let mut session = WizardSession::with_user_id("user_cli");
        let mut w = wizard(
            &service,
            &[
                "25", "400000", "40000", "2", "", "", // profile
                "add", "Car", "800000", "5", "",      // goals
                "gold", "",                           // builder
                "",                                   // save
            ],
        );

        let ack = w.run(&mut session).await.unwrap().unwrap();
        assert_eq!(ack.id, "offline-1");
        assert_eq!(session.goals().len(), 1);
        assert!(!session.priorities().is_enabled(PriorityComponent::Gold));
        assert_eq!(session.current_step(), WizardStep::ALL.len());

        let out = transcript(&mut w);
        assert!(out.contains("Step 3 of 11: Protection"));
        assert!(!out.contains("Children"));
        assert!(out.contains("Saved plan offline-1 for user_cli"));

        let saved = service.user_plans("user_cli").await.unwrap();
        assert_eq!(saved.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_answers_are_asked_again() {
        let service = OfflinePlanService::new();
        let mut session = WizardSession::new();
        let mut w = wizard(
            &service,
            &[
                "15", "50000", "70000", "3", "y", "high", // profile, two errors
                "40", "80000", "45000",                   // re-asked age, income, expenses
                "y", "25", "n",                           // children: bad daughter age
                "6",                                      // re-asked daughter age
                "add", "", "0", "0", "",                  // rejected goal
                "", "y",                                  // builder, over budget
                "n",                                      // don't save
            ],
        );

        let ack = w.run(&mut session).await.unwrap();
        assert!(ack.is_none());
        assert!(session.goals().is_empty());

        let profile = session.profile().validate().unwrap();
        assert_eq!(profile.age, 40);
        assert_eq!(profile.monthly_income, 80_000.0);
        assert_eq!(profile.monthly_expenses, 45_000.0);
        assert_eq!(profile.daughter_age, Some(6));
        assert_eq!(session.calculated_plan().unwrap().wealth.child_plans.len(), 1);

        let out = transcript(&mut w);
        assert!(out.contains("please enter age between 18 and 70"));
        assert!(out.contains("expenses should be less than income"));
        assert!(out.contains("Step 6 of 11: Child education plans"));
        assert!(out.contains("goal name required"));
    }

    #[tokio::test]
    async fn test_over_budget_declined_returns_to_builder() {
        let service = OfflinePlanService::new();
        let mut session = WizardSession::new();
        let mut w = wizard(
            &service,
            &[
                "30", "100000", "60000", "2", "", "", // profile
                "",                                   // goals
                "", "n",                              // builder: stay
                "nps", "",                            // drop NPS, now fits
                "n",                                  // don't save
            ],
        );

        assert!(w.run(&mut session).await.unwrap().is_none());
        assert!(!session.priorities().is_enabled(PriorityComponent::Nps));
        assert!(session.affordability().unwrap().affordable);

        let out = transcript(&mut w);
        assert_eq!(out.matches("Continue anyway?").count(), 1);
        assert!(out.contains("Over budget by ₹52.5K/month. Continue anyway?"));
        assert!(!out.contains("(over budget)"));
    }

    #[tokio::test]
    async fn test_over_budget_accepted_moves_on() {
        let service = OfflinePlanService::new();
        let mut session = WizardSession::new();
        let mut w = wizard(
            &service,
            &[
                "30", "100000", "60000", "2", "", "", // profile
                "",                                   // goals
                "", "y",                              // builder: continue anyway
                "n",                                  // don't save
            ],
        );

        assert!(w.run(&mut session).await.unwrap().is_none());
        assert!(PriorityComponent::ALL.iter().all(|c| session.priorities().is_enabled(*c)));
        assert!(!session.affordability().unwrap().affordable);

        let out = transcript(&mut w);
        assert!(out.contains("Continue anyway?"));
        assert!(out.contains("(over budget)"));
    }

    #[tokio::test]
    async fn test_closed_input_stops_the_run() {
        let service = OfflinePlanService::new();
        let mut session = WizardSession::new();
        let mut w = wizard(&service, &["30"]);
        assert!(w.run(&mut session).await.is_err());
    }
}
