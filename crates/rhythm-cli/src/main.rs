use std::path::PathBuf;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use rhythm_core::domain::{ConfigId, GroupId, InstanceId, WeekDay};

mod commands;
mod settings;

use settings::Settings;

#[derive(Parser)]
#[command(name = "rhythm")]
#[command(about = "Habits, goals and trackers with recurrence-aware progress", long_about = None)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plan snapshot file, overriding the settings
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        #[command(subcommand)]
        kind: AddKind,
    },

    /// Change the title, weekdays or start of an open task
    Edit {
        config_id: ConfigId,

        #[arg(long)]
        title: Option<String>,

        /// Comma separated weekdays, e.g. mon,wed,fri
        #[arg(long, value_delimiter = ',')]
        days: Option<Vec<WeekDay>>,

        /// First day of the new rule (defaults to today)
        #[arg(long)]
        start: Option<NaiveDate>,
    },

    /// Log a completion for today
    Log {
        config_id: ConfigId,

        #[arg(long, default_value = "")]
        comment: String,

        #[arg(long = "image")]
        images: Vec<String>,
    },

    /// Remove a logged completion
    Unlog {
        config_id: ConfigId,
        instance_id: InstanceId,
    },

    /// Set the counter of a tracker's logged instance
    ProgressSet {
        config_id: ConfigId,
        instance_id: InstanceId,
        value: u32,
    },

    /// Close the open cycle of a task
    Close {
        config_id: ConfigId,

        /// End the cycle yesterday and drop today's completion
        #[arg(long)]
        drop_today: bool,
    },

    /// Reopen a closed cycle
    Reopen { config_id: ConfigId },

    /// Delete a task with all its generations and completions
    Delete { group_id: GroupId },

    /// Show due tasks and completions per day
    Calendar {
        /// Number of days (defaults to the settings)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Show target and completed counts per task and overall
    Progress {
        /// Print per-group counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tasks
    List {
        /// Only closed cycles
        #[arg(long)]
        finished: bool,
    },
}

#[derive(Subcommand)]
enum AddKind {
    /// A recurring task on chosen weekdays
    Habit {
        title: String,

        /// Comma separated weekdays, e.g. mon,wed,fri (defaults to every day)
        #[arg(long, value_delimiter = ',')]
        days: Vec<WeekDay>,

        #[arg(long)]
        start: Option<NaiveDate>,

        /// Start time, HH:MM
        #[arg(long, value_parser = parse_clock)]
        at: Option<NaiveTime>,

        /// End time, HH:MM
        #[arg(long, value_parser = parse_clock, requires = "at")]
        until: Option<NaiveTime>,

        /// Ask for a photo when completing
        #[arg(long)]
        photo: bool,

        /// Ask for a comment only when completing
        #[arg(long, conflicts_with = "photo")]
        comment_only: bool,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// A one-time target
    Goal {
        title: String,

        /// The day the goal is due
        #[arg(long)]
        on: Option<NaiveDate>,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// A daily counter
    Tracker {
        title: String,

        #[arg(long, default_value_t = 10)]
        max: u32,

        /// Progress at which a day counts as satisfied
        #[arg(long, default_value_t = 8)]
        edge: u32,

        /// Lower is better: count the days that stayed below the edge
        #[arg(long)]
        drain: bool,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long, default_value = "")]
        description: String,
    },
}

fn parse_clock(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s, "%H:%M")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings_path = cli.config.clone().or_else(Settings::default_path);
    let mut settings = match &settings_path {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(data_file) = cli.data_file.clone() {
        settings.data_file = Some(data_file);
    }
    tracing::debug!(?settings_path, ?settings, "settings resolved");

    let ctx = commands::Context::new(settings, cli.today)?;
    commands::run(&ctx, cli.command)
}
