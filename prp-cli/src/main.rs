use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io;

use prp_client::HttpPlanService;
use prp_core::{
    GoalDraft, GoalQuoteRequest, OfflinePlanService, PlanService, ProfileUpdate, RiskComfort,
    WizardSession, fetch_plan, format_inr,
};

mod config;
mod console;
mod logging;
mod render;
mod state;
mod wizard;

#[derive(Parser, Debug)]
#[command(
    name = "prp",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PRP_GIT_REV"), ")"),
    about = "Personal financial plan wizard"
)]
struct Cli {
    /// Use the built-in calculator instead of the planning service
    #[arg(long, global = true)]
    offline: bool,

    /// Planning service base URL (overrides PRP_BACKEND_URL and config)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk through the full plan wizard interactively
    Wizard,

    /// Calculate a plan for a profile and check it against the budget
    Plan {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Leave a component out (e.g. mutual_funds); repeatable
        #[arg(long = "disable", value_name = "COMPONENT")]
        disable: Vec<String>,

        /// Include a component (e.g. stocks); repeatable
        #[arg(long = "enable", value_name = "COMPONENT")]
        enable: Vec<String>,

        /// Print plan and affordability report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Price a goal: future cost and the monthly saving to reach it
    Goal {
        /// Amount needed, in today's rupees
        #[arg(long)]
        amount: f64,

        /// Years until the goal (1-20)
        #[arg(long)]
        years: u32,

        #[arg(long, default_value = "Goal")]
        name: String,
    },

    /// Current rates of government savings schemes
    Rates,

    /// Saved plans
    Plans {
        #[command(subcommand)]
        command: PlansCommand,
    },

    /// Manage ~/.prp/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PlansCommand {
    /// List plans saved for a user id
    List { user_id: String },
    /// Show one saved plan
    Show { plan_id: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Args, Debug, Clone)]
struct ProfileArgs {
    #[arg(long)]
    age: u32,

    /// Monthly income (₹)
    #[arg(long)]
    income: f64,

    /// Monthly expenses (₹)
    #[arg(long)]
    expenses: f64,

    #[arg(long, default_value_t = 1)]
    family_size: u32,

    /// Someone depends on your income (implied by a child age)
    #[arg(long)]
    dependents: bool,

    /// low, medium or high
    #[arg(long, default_value = "medium")]
    risk: RiskComfort,

    #[arg(long)]
    daughter_age: Option<u32>,

    #[arg(long)]
    son_age: Option<u32>,
}

impl ProfileArgs {
    fn to_update(&self) -> ProfileUpdate {
        let has_children = self.daughter_age.is_some() || self.son_age.is_some();
        ProfileUpdate::default()
            .with_age(self.age)
            .with_income(self.income)
            .with_expenses(self.expenses)
            .with_family_size(self.family_size)
            .with_dependents(self.dependents || has_children)
            .with_risk(self.risk)
            .with_daughter(self.daughter_age)
            .with_son(self.son_age)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    logging::init(&cfg.logging.level);

    if let Command::Config { command } = &cli.command {
        return match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => config::show_config(&cfg),
        };
    }

    let service = build_service(&cli, &cfg)?;
    let service = service.as_ref();

    match cli.command {
        Command::Wizard => {
            let mut session = WizardSession::new();
            println!("PRP plan wizard (session {})", session.user_id());
            let console = console::Console::new(io::stdin().lock(), io::stdout());
            let mut wizard = wizard::Wizard::new(service, console);
            if wizard.run(&mut session).await?.is_some() {
                println!("\nList your plans later with: prp plans list {}", session.user_id());
            }
        }

        Command::Plan {
            profile,
            disable,
            enable,
            json,
        } => {
            let mut session = WizardSession::new();
            session.update_profile(profile.to_update());
            for key in &disable {
                session.set_priority_key(key, false)?;
            }
            for key in &enable {
                session.set_priority_key(key, true)?;
            }

            fetch_plan(&mut session, service).await?;
            let plan = session.calculated_plan().context("no plan returned")?;
            let report = session.affordability().context("no plan returned")?;

            if json {
                let out = serde_json::json!({ "plan": plan, "report": report });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", render::plan_overview(plan));
                print!("{}", render::report(&report));
            }
        }

        Command::Goal {
            amount,
            years,
            name,
        } => {
            GoalDraft::new(name.clone(), amount, years).validate()?;
            let quote = service
                .calculate_goal(GoalQuoteRequest {
                    amount_today: amount,
                    years,
                })
                .await?;
            println!(
                "{}: {} today costs {} in {} years",
                name.trim(),
                format_inr(amount),
                format_inr(quote.future_cost),
                years
            );
            println!("Save {}/month to get there", format_inr(quote.monthly_saving));
        }

        Command::Rates => {
            let rates = service.scheme_rates().await?;
            print!("{}", render::rates(&rates));
        }

        Command::Plans { command } => match command {
            PlansCommand::List { user_id } => {
                let plans = service.user_plans(&user_id).await?;
                if plans.is_empty() {
                    println!("No saved plans for {user_id}");
                }
                for p in &plans {
                    println!("{}", render::saved_plan_line(p));
                }
            }
            PlansCommand::Show { plan_id } => {
                let plan = service
                    .plan(&plan_id)
                    .await
                    .with_context(|| format!("loading plan {plan_id}"))?;
                print!("{}", render::saved_plan(&plan));
            }
        },

        Command::Config { .. } => {}
    }

    Ok(())
}

fn build_service(cli: &Cli, cfg: &config::Config) -> Result<Box<dyn PlanService>> {
    if cli.offline {
        tracing::info!("using offline calculator");
        return Ok(Box::new(OfflinePlanService::new()));
    }
    let base_url = cfg.service.resolve_base_url(
        std::env::var(config::BACKEND_URL_ENV).ok(),
        cli.backend_url.as_deref(),
    );
    let svc = HttpPlanService::new(&base_url, cfg.service.timeout())
        .with_context(|| format!("configuring client for {base_url}"))?;
    tracing::info!(base_url = %svc.base_url(), "using planning service");
    Ok(Box::new(svc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use prp_core::ProfileDraft;

    #[test]
    fn test_cli_parses_plan_command() {
        let cli = Cli::try_parse_from([
            "prp", "--offline", "plan", "--age", "32", "--income", "120000", "--expenses",
            "70000", "--risk", "High", "--disable", "gold", "--enable", "stocks",
        ])
        .unwrap();
        assert!(cli.offline);
        match cli.command {
            Command::Plan {
                profile,
                disable,
                enable,
                json,
            } => {
                assert_eq!(profile.risk, RiskComfort::High);
                assert_eq!(profile.family_size, 1);
                assert_eq!(disable, vec!["gold".to_string()]);
                assert_eq!(enable, vec!["stocks".to_string()]);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_child_age_implies_dependents() {
        let args = ProfileArgs {
            age: 35,
            income: 100_000.0,
            expenses: 50_000.0,
            family_size: 3,
            dependents: false,
            risk: RiskComfort::Medium,
            daughter_age: Some(4),
            son_age: None,
        };
        let mut draft = ProfileDraft::default();
        draft.apply(args.to_update());
        let profile = draft.validate().unwrap();
        assert!(profile.has_dependents);
        assert!(profile.has_daughter);
        assert_eq!(profile.daughter_age, Some(4));
        assert!(!profile.has_son);
    }

    #[test]
    fn test_bad_risk_is_rejected_by_parser() {
        let res = Cli::try_parse_from([
            "prp", "plan", "--age", "32", "--income", "1", "--expenses", "1", "--risk", "yolo",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_backend_url_is_global() {
        let cli = Cli::try_parse_from(["prp", "rates", "--backend-url", "http://x:1"]).unwrap();
        assert_eq!(cli.backend_url.as_deref(), Some("http://x:1"));
    }

    #[test]
    fn test_version_carries_git_revision() {
        let cmd = Cli::command();
        let version = cmd.get_version().unwrap();
        assert!(version.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(version.ends_with(&format!("({})", env!("PRP_GIT_REV"))));
    }
}
