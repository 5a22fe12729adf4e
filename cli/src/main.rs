mod commands;
mod config;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::process;

use crate::commands::{
    LogArgs, Service, cmd_delete, cmd_goal_clear, cmd_goal_set, cmd_goal_show, cmd_history,
    cmd_import, cmd_log, cmd_month, cmd_unit_set, cmd_unit_show, cmd_week, cmd_year,
};
use crate::config::Config;
use weighin_core::db::Database;

#[derive(Parser)]
#[command(
    name = "weighin",
    version,
    about = "Track body weight and see weekly, monthly and yearly trends"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a weigh-in
    Log {
        /// Weight value (number)
        value: f64,
        /// Unit: kg or lbs (default: your display unit)
        #[arg(short, long)]
        unit: Option<String>,
        /// Date (YYYY-MM-DD or today/yesterday, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Time of day (HH:MM, default: now)
        #[arg(long)]
        time: Option<String>,
        /// Body fat percentage
        #[arg(long)]
        body_fat: Option<f64>,
        /// Tag the weigh-in (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Optional notes
        #[arg(long)]
        notes: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recorded weigh-ins, newest first
    History {
        /// Show at most this many weigh-ins (default: all)
        #[arg(short, long)]
        limit: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a weigh-in by ID
    Delete {
        /// Weigh-in ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Weekly average for the week containing a date, against the week before
    Week {
        /// Any date in the week (YYYY-MM-DD, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Week-by-week averages for a month
    Month {
        /// Month to show (YYYY-MM, default: this month)
        month: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Week-by-week averages and changes for a year
    Year {
        /// Year to show (default: this year)
        year: Option<i32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage your weight goal
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Manage the display unit
    Unit {
        #[command(subcommand)]
        command: UnitCommands,
    },
    /// Import weigh-ins from a CSV file (columns: Date, Weight, [Unit, Body Fat, Notes, Tags])
    Import {
        /// Path to the CSV file
        file: std::path::PathBuf,
        /// Preview import without making changes
        #[arg(long)]
        dry_run: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Set the goal direction and an optional target weight
    Set {
        /// gain, loss, or maintain
        direction: String,
        /// Target weight
        #[arg(long)]
        target: Option<f64>,
        /// Unit of the target weight (default: your display unit)
        #[arg(short, long)]
        unit: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current goal
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove the goal
    Clear {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum UnitCommands {
    /// Set the display unit (kg or lbs)
    Set {
        unit: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the display unit
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let log_env = std::env::var("WEIGHIN_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    tracing::debug!(db = %config.db_path.display(), user = %config.user_id, "loaded config");
    let db = Database::open(&config.db_path)?;
    let svc = Service::with_time_zone(db, Local);
    let user = config.user_id.as_str();

    match cli.command {
        Commands::Log {
            value,
            unit,
            date,
            time,
            body_fat,
            tags,
            notes,
            json,
        } => cmd_log(
            &svc,
            user,
            LogArgs {
                value,
                unit,
                date,
                time,
                body_fat,
                tags,
                notes,
            },
            json,
        ),
        Commands::History { limit, json } => cmd_history(&svc, user, limit, json),
        Commands::Delete { id, json } => cmd_delete(&svc, id, json),
        Commands::Week { date, json } => cmd_week(&svc, user, date, json),
        Commands::Month { month, json } => cmd_month(&svc, user, month.as_deref(), json),
        Commands::Year { year, json } => cmd_year(&svc, user, year, json),
        Commands::Goal { command } => match command {
            GoalCommands::Set {
                direction,
                target,
                unit,
                json,
            } => cmd_goal_set(&svc, user, &direction, target, unit.as_deref(), json),
            GoalCommands::Show { json } => cmd_goal_show(&svc, user, json),
            GoalCommands::Clear { json } => cmd_goal_clear(&svc, user, json),
        },
        Commands::Unit { command } => match command {
            UnitCommands::Set { unit, json } => cmd_unit_set(&svc, user, &unit, json),
            UnitCommands::Show { json } => cmd_unit_show(&svc, user, json),
        },
        Commands::Import {
            file,
            dry_run,
            json,
        } => cmd_import(&svc, user, &file, dry_run, json),
    }
}
