//! shift-planner CLI.
//!
//! Keeps a weekly schedule in a JSON file and edits it one command at a time.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shift_planner::{
    format_date, parse_date, store, AllocationSummary, ClockTime, Edit, Planner, PlannerConfig,
    ScheduleView, VtoScope, Week,
};

#[derive(Parser)]
#[command(name = "shift-planner", version)]
#[command(about = "Plan a week of sleep, routine and job search around work shifts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Schedule file
    #[arg(long, global = true, default_value = "schedule.json")]
    file: PathBuf,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treat this date (MM/DD/YYYY) as today
    #[arg(long, global = true, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schedule file, or fit an existing one onto this week.
    Init,

    /// Print the week.
    Show,

    /// Add voluntary extra time (VET) to a day's work.
    Vet {
        /// Day to extend (MM/DD/YYYY)
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        /// Start, e.g. "09:00 AM"
        #[arg(long)]
        start: ClockTime,
        /// End, e.g. "01:00 PM"
        #[arg(long)]
        end: ClockTime,
    },

    /// Take voluntary time off (VTO) from a day's work.
    Vto {
        /// Day to cut (MM/DD/YYYY)
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        /// Clear the whole day
        #[arg(long, conflicts_with_all = ["start", "end"])]
        full: bool,
        /// Start of the time off
        #[arg(long, requires = "end", required_unless_present = "full")]
        start: Option<ClockTime>,
        /// End of the time off
        #[arg(long, requires = "start", required_unless_present = "full")]
        end: Option<ClockTime>,
    },

    /// Rebuild routine and job-search time without editing work.
    Optimize,

    /// Report job-search hours for the week.
    Hours {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let planner = Planner::new(load_config(cli.config.as_deref())?)?;
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    let mut week = store::load_or_create(&cli.file, today, planner.config())
        .with_context(|| format!("failed to open schedule {}", cli.file.display()))?;
    info!(
        path = %cli.file.display(),
        today = %format_date(today),
        days = week.len(),
        "schedule loaded"
    );

    match cli.command {
        Commands::Init => {
            println!(
                "Schedule {} ready for the week of {}",
                cli.file.display(),
                week.first_date().map(format_date).unwrap_or_default()
            );
        }

        Commands::Show => {
            print!("{}", ScheduleView(&week));
        }

        Commands::Vet { date, start, end } => {
            let edit = Edit::Vet { date, start, end };
            let summary = planner
                .apply_edit(&mut week, &edit, today)
                .inspect_err(|e| warn!(error = %e, "VET rejected"))?;
            save(&cli.file, &week)?;
            println!("VET added on {}: {} - {}", format_date(date), start, end);
            print_shortfall(&summary);
        }

        Commands::Vto {
            date,
            full,
            start,
            end,
        } => {
            let scope = match (full, start, end) {
                (false, Some(start), Some(end)) => VtoScope::Partial { start, end },
                _ => VtoScope::Full,
            };
            let edit = Edit::Vto { date, scope };
            let summary = planner
                .apply_edit(&mut week, &edit, today)
                .inspect_err(|e| warn!(error = %e, "VTO rejected"))?;
            save(&cli.file, &week)?;
            match scope {
                VtoScope::Full => println!("VTO taken for all of {}", format_date(date)),
                VtoScope::Partial { start, end } => {
                    println!("VTO taken on {}: {} - {}", format_date(date), start, end)
                }
            }
            print_shortfall(&summary);
        }

        Commands::Optimize => {
            let summary = planner.reoptimize(&mut week, today);
            save(&cli.file, &week)?;
            print!("{}", ScheduleView(&week));
            print_shortfall(&summary);
        }

        Commands::Hours { json } => {
            let report = planner.job_search_report(&week, today);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(PlannerConfig::default()),
    }
}

fn save(path: &Path, week: &Week) -> Result<()> {
    store::save(path, week).with_context(|| format!("failed to save schedule {}", path.display()))
}

fn print_shortfall(summary: &AllocationSummary) {
    if summary.unmet_minutes > 0 {
        warn!(unmet_minutes = summary.unmet_minutes, "job-search goal not met");
        println!(
            "Job-search goal not met this week: {:.2} hr short",
            f64::from(summary.unmet_minutes) / 60.0
        );
    }
}
