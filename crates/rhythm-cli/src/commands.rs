use anyhow::{Context as _, Result};
use chrono::{Duration, NaiveDate};
use rhythm_core::app::{Plan, Planner};
use rhythm_core::domain::{
    ClockWindow, ConfigDraft, TaskConfig, TaskKind, TrackerRule, Verification, WeekDay,
};
use rhythm_core::impls::JsonFileStore;
use rhythm_core::ports::{Clock, FixedClock, PlanStore, SystemClock, UlidGenerator};
use rhythm_core::schedule::{CalendarView, DayWindow, ProgressCounts};

use crate::settings::Settings;
use crate::{AddKind, Commands};

/// Everything one invocation works with. "Now" is read once, so every
/// operation of a run sees the same instant.
pub struct Context {
    pub settings: Settings,
    pub store: JsonFileStore,
    pub planner: Planner<FixedClock, UlidGenerator<FixedClock>>,
}

impl Context {
    pub fn new(settings: Settings, today: Option<NaiveDate>) -> Result<Self> {
        let clock = match today {
            Some(date) => FixedClock::on(date),
            None => FixedClock::new(SystemClock.now()),
        };
        let store = JsonFileStore::new(settings.data_file()?);
        tracing::debug!(path = %store.path().display(), today = %clock.today(), "context ready");
        Ok(Self {
            settings,
            store,
            planner: Planner::new(clock, UlidGenerator::new(clock)),
        })
    }

    fn today(&self) -> NaiveDate {
        self.planner.today()
    }

    fn load(&self) -> Result<Plan> {
        self.store
            .load()
            .with_context(|| format!("failed to load plan from {}", self.store.path().display()))
    }

    fn save(&self, plan: &Plan) -> Result<()> {
        self.store
            .save(plan)
            .with_context(|| format!("failed to save plan to {}", self.store.path().display()))
    }
}

pub fn run(ctx: &Context, command: Commands) -> Result<()> {
    let mut plan = ctx.load()?;
    let planner = &ctx.planner;
    let today = ctx.today();

    let mutated = match command {
        Commands::Add { kind } => {
            let draft = draft_from(kind, today);
            let id = planner.create_config(&mut plan, draft)?;
            println!("added {id}");
            true
        }
        Commands::Edit {
            config_id,
            title,
            days,
            start,
        } => {
            let current = plan
                .config(config_id)
                .with_context(|| format!("config {config_id} not found"))?;
            let mut draft = ConfigDraft::from_config(current);
            draft.starting_from = start.unwrap_or(today);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(days) = days {
                draft = draft.with_week_days(days);
            }
            let id = planner.edit_config(&mut plan, config_id, draft)?;
            println!("edited, current generation is {id}");
            true
        }
        Commands::Log {
            config_id,
            comment,
            images,
        } => {
            let id = planner.log_completion(&mut plan, config_id, comment, images)?;
            println!("logged {id}");
            true
        }
        Commands::Unlog {
            config_id,
            instance_id,
        } => {
            planner.remove_completion(&mut plan, config_id, instance_id)?;
            println!("removed {instance_id}");
            true
        }
        Commands::ProgressSet {
            config_id,
            instance_id,
            value,
        } => {
            planner.set_tracker_progress(&mut plan, config_id, instance_id, value)?;
            println!("progress set to {value}");
            true
        }
        Commands::Close {
            config_id,
            drop_today,
        } => {
            let completed = planner.close_cycle(&mut plan, config_id, drop_today)?;
            println!("closed on {completed}");
            true
        }
        Commands::Reopen { config_id } => {
            let id = planner.reopen_cycle(&mut plan, config_id)?;
            println!("reopened as {id}");
            true
        }
        Commands::Delete { group_id } => {
            let removed = planner.delete_group(&mut plan, group_id)?;
            println!("deleted {removed} generation(s)");
            true
        }
        Commands::Calendar { days } => {
            let days = days.unwrap_or(ctx.settings.window_days);
            let anchor = today - Duration::days(i64::from(ctx.settings.lookback_days));
            let view = plan.calendar(DayWindow::of_len(anchor, days), ctx.settings.show_hidden);
            print!("{}", render_calendar(&view, today));
            false
        }
        Commands::Progress { json } => {
            if json {
                let by_group = plan.progress_by_group(today);
                println!("{}", serde_json::to_string_pretty(&by_group)?);
            } else {
                print!("{}", render_progress(&plan, today));
            }
            false
        }
        Commands::List { finished } => {
            let configs = if finished {
                plan.finished_configs()
            } else if ctx.settings.show_hidden {
                let mut all: Vec<&TaskConfig> = plan.configs.iter().collect();
                all.sort_by(|a, b| a.schedule_cmp(b));
                all
            } else {
                plan.visible_configs()
            };
            for config in configs {
                let counts = plan.progress_of(config.id, today).unwrap_or_default();
                println!("{}", render_config_line(config, counts));
            }
            false
        }
    };

    if mutated {
        ctx.save(&plan)?;
    }
    Ok(())
}

fn draft_from(kind: AddKind, today: NaiveDate) -> ConfigDraft {
    match kind {
        AddKind::Habit {
            title,
            days,
            start,
            at,
            until,
            photo,
            comment_only,
            description,
        } => {
            let mut draft = ConfigDraft::new(title, TaskKind::Habit, start.unwrap_or(today))
                .with_description(description);
            if !days.is_empty() {
                draft = draft.with_week_days(days);
            }
            let clock = match (at, until) {
                (Some(start), Some(end)) => ClockWindow::between(start, end),
                (Some(start), None) => ClockWindow::at(start),
                (None, _) => ClockWindow::Untimed,
            };
            let verification = Verification {
                image_validation: photo || comment_only,
                only_comment: comment_only,
                ..Verification::default()
            };
            draft.with_clock(clock).with_verification(verification)
        }
        AddKind::Goal {
            title,
            on,
            description,
        } => ConfigDraft::new(title, TaskKind::Goal, on.unwrap_or(today))
            .with_description(description),
        AddKind::Tracker {
            title,
            max,
            edge,
            drain,
            start,
            description,
        } => {
            let rule = TrackerRule::new(max, edge, !drain);
            ConfigDraft::new(title, TaskKind::Tracker(rule), start.unwrap_or(today))
                .with_description(description)
        }
    }
}

fn week_days_label(config: &TaskConfig) -> String {
    if config.week_days.len() == WeekDay::ALL.len() {
        return "every day".to_string();
    }
    config
        .week_days
        .iter()
        .map(|d| d.short_name())
        .collect::<Vec<_>>()
        .join(",")
}

fn render_config_line(config: &TaskConfig, counts: ProgressCounts) -> String {
    let status = match config.completed_date {
        None => format!("since {}", config.starting_from),
        Some(end) => format!("{} .. {}", config.starting_from, end),
    };
    let mut line = format!(
        "{}  {:<7}  {}  [{}]  {}  {}/{} ({}%)",
        config.id,
        config.kind.label(),
        config.title,
        week_days_label(config),
        status,
        counts.completed,
        counts.target,
        counts.percent(),
    );
    if config.clock.is_timed() {
        line.push_str(&format!("  @ {}", config.clock.label()));
    }
    if config.is_hidden {
        line.push_str("  (hidden)");
    }
    line
}

fn render_calendar(view: &CalendarView<'_>, today: NaiveDate) -> String {
    let mut out = String::new();
    for day in &view.days {
        let marker = if day.date == today { ">" } else { " " };
        out.push_str(&format!(
            "{marker} {} {}  {}/{}\n",
            WeekDay::of(day.date).short_name(),
            day.date.format("%m-%d"),
            day.done_count(),
            day.entries.len(),
        ));
        for entry in &day.entries {
            let check = if entry.is_done() { "x" } else { " " };
            let mut line = format!("    [{check}] {}", entry.config.title);
            if entry.config.clock.is_timed() {
                line.push_str(&format!(" {}", entry.config.clock.label()));
            }
            if let (Some(instance), Some(rule)) = (entry.instance, entry.config.tracker_rule()) {
                line.push_str(&format!(" {}/{}", instance.progress, rule.max_progress));
            }
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

fn render_progress(plan: &Plan, today: NaiveDate) -> String {
    let mut out = String::new();
    for (group_id, counts) in plan.progress_by_group(today) {
        let title = plan
            .group(group_id)
            .and_then(|g| g.latest().map(|c| c.title.clone()))
            .unwrap_or_default();
        out.push_str(&format!(
            "{group_id}  {title}  {}/{} ({}%)\n",
            counts.completed,
            counts.target,
            counts.percent()
        ));
    }
    let total = plan.progress(today);
    out.push_str(&format!(
        "total  {}/{} ({}%)\n",
        total.completed,
        total.target,
        total.percent()
    ));
    out
}
