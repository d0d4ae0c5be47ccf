use crate::infra::{parse_date, parse_frequency, parse_money, InMemoryGoalStore};
use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal_macros::dec;
use savings_planner::config::AppConfig;
use savings_planner::error::AppError;
use savings_planner::planning::{
    read_goals_from_path, CommitReport, Goal, GoalId, GoalPlanner, GoalPlanningService, GoalStore,
    LumpSumPlan, Money, OwnerId, Projection, RequiredContribution, SavingsFrequency, SavingsInput,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ProjectArgs {
    /// Goal export (id,name,target_amount,current_amount,deadline,priority)
    #[arg(long)]
    pub(crate) goals_csv: PathBuf,
    /// Amount saved every period
    #[arg(long, value_parser = parse_money)]
    pub(crate) amount: Money,
    /// Savings cadence (monthly or annually). Defaults to PLANNER_DEFAULT_FREQUENCY.
    #[arg(long, value_parser = parse_frequency)]
    pub(crate) frequency: Option<SavingsFrequency>,
    /// Reference date for the projection (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    /// Goal export (id,name,target_amount,current_amount,deadline,priority)
    #[arg(long)]
    pub(crate) goals_csv: PathBuf,
    /// One-time amount to split across goals
    #[arg(long, value_parser = parse_money)]
    pub(crate) amount: Money,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for the demo (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) fn run_project(args: ProjectArgs) -> Result<(), AppError> {
    let ProjectArgs {
        goals_csv,
        amount,
        frequency,
        as_of,
    } = args;

    let frequency = match frequency {
        Some(frequency) => frequency,
        None => AppConfig::load()?.planner.default_frequency,
    };
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let goals = read_goals_from_path(&goals_csv)?;

    let input = SavingsInput {
        amount_per_period: amount,
        frequency,
    };
    let projection = GoalPlanner::new().project(&goals, input, as_of)?;
    render_projection(&projection);
    Ok(())
}

pub(crate) fn run_allocate(args: AllocateArgs) -> Result<(), AppError> {
    let AllocateArgs { goals_csv, amount } = args;

    let goals = read_goals_from_path(&goals_csv)?;
    let plan = GoalPlanner::new().plan_lump_sum(&goals, amount)?;
    render_plan(&plan, &goals);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let owner = OwnerId("demo".to_string());

    let store = Arc::new(InMemoryGoalStore::default());
    store.seed(owner.clone(), demo_goals(as_of))?;
    let service = GoalPlanningService::new(store.clone());

    println!("Savings planner demo (as of {as_of})");

    let input = SavingsInput {
        amount_per_period: dec!(400),
        frequency: SavingsFrequency::Monthly,
    };
    let projection = service.project(&owner, input, as_of)?;
    render_projection(&projection);

    let bonus = dec!(2500);
    let goals = store.goals_for_owner(&owner)?;
    println!("\nPreview: splitting a {} bonus", money(bonus));
    let preview = service.preview_auto_allocation(&owner, bonus)?;
    render_plan(&preview, &goals);

    println!("\nCommitting the bonus");
    let outcome = service.auto_allocate(&owner, bonus, as_of)?;
    render_report(&outcome.report);
    for item in outcome.plan.commit_items() {
        let history = store.contributions(&owner, &item.goal_id)?;
        println!("  {} now has {} contribution(s)", item.goal_id, history.len());
    }

    println!("\nProjection after the bonus");
    let projection = service.project(&owner, input, as_of)?;
    render_projection(&projection);

    Ok(())
}

fn demo_goals(as_of: NaiveDate) -> Vec<Goal> {
    let in_months = |months: u32| SavingsFrequency::Monthly.advance(as_of, months);

    vec![
        Goal {
            id: GoalId("emergency-fund".to_string()),
            name: "Emergency fund".to_string(),
            target_amount: dec!(6000),
            current_amount: dec!(2400),
            deadline: in_months(12),
            priority: Some(1),
        },
        Goal {
            id: GoalId("car-repair".to_string()),
            name: "Car repair".to_string(),
            target_amount: dec!(1200),
            current_amount: dec!(300),
            deadline: in_months(3),
            priority: Some(2),
        },
        Goal {
            id: GoalId("holiday".to_string()),
            name: "Holiday".to_string(),
            target_amount: dec!(3000),
            current_amount: dec!(0),
            deadline: in_months(9),
            priority: Some(3),
        },
        Goal {
            id: GoalId("new-laptop".to_string()),
            name: "New laptop".to_string(),
            target_amount: dec!(1800),
            current_amount: dec!(450),
            deadline: None,
            priority: None,
        },
        Goal {
            id: GoalId("gift".to_string()),
            name: "Birthday gift".to_string(),
            target_amount: dec!(150),
            current_amount: dec!(150),
            deadline: None,
            priority: Some(5),
        },
    ]
}

pub(crate) fn render_projection(projection: &Projection) {
    let frequency = projection.frequency;
    println!(
        "Projection at {} per {} from {}",
        money(projection.amount_per_period),
        frequency.unit(1),
        projection.as_of
    );

    for result in &projection.results {
        let projected = match (result.projected_periods, result.projected_date) {
            (Some(periods), Some(date)) => {
                format!("{periods} {} -> {date}", frequency.unit(u64::from(periods)))
            }
            _ => "never".to_string(),
        };
        let deadline = result
            .deadline
            .map(|date| date.to_string())
            .unwrap_or_else(|| "none".to_string());
        let required = match result.required_per_period {
            Some(RequiredContribution::PerPeriod(amount)) => {
                format!("{} / {}", money(amount), frequency.unit(1))
            }
            Some(RequiredContribution::AlreadyMet) => "met".to_string(),
            Some(RequiredContribution::Infeasible) => "infeasible".to_string(),
            None => "-".to_string(),
        };

        println!(
            "- {} ({}): remaining {} | projected {} | deadline {} | needs {} | {}",
            result.goal_name,
            result.goal_id,
            money(result.remaining),
            projected,
            deadline,
            required,
            result.time_difference.label(frequency)
        );
    }

    if projection.verdict.all_met_on_time {
        println!("Verdict: every deadline is met on time");
    } else {
        let extra = projection
            .verdict
            .additional_savings_needed
            .unwrap_or_default();
        println!(
            "Verdict: deadlines missed; save about {} more per {}",
            money(extra),
            frequency.unit(1)
        );
    }
}

pub(crate) fn render_plan(plan: &LumpSumPlan, goals: &[Goal]) {
    println!("Lump sum of {}", money(plan.amount));
    for item in &plan.items {
        let name = goals
            .iter()
            .find(|goal| goal.id == item.goal_id)
            .map(|goal| goal.name.as_str())
            .unwrap_or("unknown goal");
        println!(
            "- {} ({}): {}",
            name,
            item.goal_id,
            money(item.amount_to_allocate)
        );
    }
    println!(
        "Allocated {} | leftover {}",
        money(plan.total_allocated),
        money(plan.leftover)
    );
}

fn render_report(report: &CommitReport) {
    println!(
        "- {} contribution(s) attempted | {} succeeded | {} failed",
        report.attempted, report.succeeded, report.failed
    );
    for failure in &report.failures {
        println!("  ! {}: {}", failure.goal_id, failure.error);
    }
    for goal in &report.updated_goals {
        println!(
            "  {} balance {} of {}",
            goal.name,
            money(goal.current_amount),
            money(goal.target_amount)
        );
    }
}

fn money(amount: Money) -> String {
    format!("${amount:.2}")
}
