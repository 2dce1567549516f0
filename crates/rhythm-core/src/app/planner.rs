//! Planner - lifecycle operations on a plan snapshot
//!
//! Every operation takes the snapshot by `&mut`, validates against it, and
//! either applies the whole change or returns an error leaving it untouched.
//! "Now" comes from the injected `Clock`, new ids from the `IdGenerator`.
//!
//! # Generations
//! Editing a habit or tracker, or reopening a cycle closed on a later day
//! than it started, closes and hides the current generation and appends a
//! new one under the same group. Superseded generations stay in the plan
//! so their history keeps counting toward group progress.

use chrono::{Duration, NaiveDate, NaiveTime};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::plan::Plan;
use crate::domain::{
    ConfigDraft, ConfigId, DomainError, GroupId, Instance, InstanceId, TaskConfig,
};
use crate::ports::{Clock, IdGenerator};
use crate::schedule::{DayWindow, is_due_at};

/// PlanError is returned by planner operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("config {0} not found")]
    ConfigNotFound(ConfigId),

    #[error("instance {instance_id} of config {config_id} not found")]
    InstanceNotFound {
        config_id: ConfigId,
        instance_id: InstanceId,
    },

    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    #[error("config {config_id} already has an instance on {day}")]
    AlreadyLogged { config_id: ConfigId, day: NaiveDate },

    #[error("config {config_id} is not due on {day}")]
    NotDue { config_id: ConfigId, day: NaiveDate },

    #[error("config {config_id} does not accept completions at {at}")]
    OutsideClockWindow { config_id: ConfigId, at: NaiveTime },

    #[error("config {0} is not a tracker")]
    NotATracker(ConfigId),

    #[error("progress {value} is above the tracker maximum {max}")]
    ProgressOutOfRange { value: u32, max: u32 },

    #[error("group {0} already has an open cycle")]
    CycleAlreadyOpen(GroupId),

    #[error("the cycle of config {0} is already closed")]
    CycleClosed(ConfigId),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Planner applies lifecycle operations to a `Plan`.
///
/// # Example
/// ```ignore
/// let planner = Planner::new(SystemClock, UlidGenerator::new(SystemClock));
/// let id = planner.create_config(&mut plan, draft)?;
/// planner.log_completion(&mut plan, id, "done", vec![])?;
/// ```
pub struct Planner<C, G> {
    clock: C,
    ids: G,
}

impl<C: Clock, G: IdGenerator> Planner<C, G> {
    pub fn new(clock: C, ids: G) -> Self {
        Self { clock, ids }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Adds a new task in a new group.
    ///
    /// The draft is prepared (see `TaskConfig::prepared`) and validated
    /// before it is stored.
    pub fn create_config(&self, plan: &mut Plan, draft: ConfigDraft) -> Result<ConfigId, PlanError> {
        let group_id = self.ids.generate_group_id();
        let config = self.new_generation(draft, group_id)?;
        let id = config.id;
        debug!(config_id = %id, group_id = %group_id, kind = config.kind.label(), "config created");
        plan.configs.push(config);
        Ok(id)
    }

    /// Applies an edit to the open generation `id`.
    ///
    /// Habits and trackers keep their history: the current generation is
    /// closed the day before the draft's starting day (on the starting day
    /// itself when it already has an instance there, the new generation then
    /// starting one day later) and a new generation is appended to the
    /// group. A goal is replaced outright by a fresh goal in a new group.
    ///
    /// Returns the id of the generation that is now current.
    pub fn edit_config(
        &self,
        plan: &mut Plan,
        id: ConfigId,
        mut draft: ConfigDraft,
    ) -> Result<ConfigId, PlanError> {
        let current = plan.config(id).ok_or(PlanError::ConfigNotFound(id))?.clone();

        if current.kind.is_goal() {
            let group_id = self.ids.generate_group_id();
            let replacement = self.new_generation(draft, group_id)?;
            let new_id = replacement.id;
            self.remove_group(plan, current.group_id);
            plan.configs.push(replacement);
            debug!(old = %id, new = %new_id, "goal replaced");
            return Ok(new_id);
        }

        if !current.is_open() {
            return Err(PlanError::CycleClosed(id));
        }

        let requested_start = draft.starting_from;
        let logged_on_start = current.is_scheduled_on(requested_start)
            && plan.instance_on(id, requested_start).is_some();
        let (close_on, next_start) = if logged_on_start {
            (requested_start, requested_start + Duration::days(1))
        } else {
            (requested_start - Duration::days(1), requested_start)
        };
        draft.starting_from = next_start;
        let next = self.new_generation(draft, current.group_id)?;
        let new_id = next.id;

        if close_on < current.starting_from {
            warn!(
                config_id = %id,
                starting_from = %current.starting_from,
                close_on = %close_on,
                "edit closes the previous generation before it started"
            );
        }
        self.supersede(plan, id, close_on);
        plan.configs.push(next);
        debug!(old = %id, new = %new_id, starting_from = %next_start, "config edited");
        Ok(new_id)
    }

    /// Closes the open cycle of `id` today.
    ///
    /// With `today_deletion` the cycle ends yesterday instead and today's
    /// instance, if any, is removed.
    pub fn close_cycle(
        &self,
        plan: &mut Plan,
        id: ConfigId,
        today_deletion: bool,
    ) -> Result<NaiveDate, PlanError> {
        let today = self.clock.today();
        let config = plan.config(id).ok_or(PlanError::ConfigNotFound(id))?;
        if !config.is_open() {
            return Err(PlanError::CycleClosed(id));
        }

        let completed = if today_deletion {
            today - Duration::days(1)
        } else {
            today
        };
        if completed < config.starting_from {
            warn!(
                config_id = %id,
                starting_from = %config.starting_from,
                completed = %completed,
                "cycle closed before it started"
            );
        }

        if let Some(config) = plan.config_mut(id) {
            config.completed_date = Some(completed);
        }
        if today_deletion {
            if let Some(instances) = plan.instances.get_mut(&id) {
                instances.retain(|i| i.day() != today);
            }
        }
        info!(config_id = %id, completed = %completed, "cycle closed");
        Ok(completed)
    }

    /// Reopens the closed cycle of `id`.
    ///
    /// A cycle closed on its own starting day is reopened in place.
    /// Otherwise the closed generation is hidden and a new open generation
    /// is appended, starting the day after the close (today, if that is
    /// later) so the two never overlap.
    ///
    /// Returns the id of the open generation.
    pub fn reopen_cycle(&self, plan: &mut Plan, id: ConfigId) -> Result<ConfigId, PlanError> {
        let config = plan.config(id).ok_or(PlanError::ConfigNotFound(id))?.clone();
        let Some(completed) = config.completed_date else {
            return Err(PlanError::CycleAlreadyOpen(config.group_id));
        };
        let group_has_open = plan
            .configs
            .iter()
            .any(|c| c.group_id == config.group_id && c.is_open());
        if group_has_open {
            return Err(PlanError::CycleAlreadyOpen(config.group_id));
        }

        if completed == config.starting_from {
            if let Some(config) = plan.config_mut(id) {
                config.completed_date = None;
            }
            info!(config_id = %id, "cycle reopened in place");
            return Ok(id);
        }

        let starting_from = (completed + Duration::days(1)).max(self.clock.today());
        let mut draft = ConfigDraft::from_config(&config);
        draft.starting_from = starting_from;
        let next = self.new_generation(draft, config.group_id)?;
        let new_id = next.id;

        self.supersede(plan, id, completed);
        plan.configs.push(next);
        info!(old = %id, new = %new_id, starting_from = %starting_from, "cycle reopened");
        Ok(new_id)
    }

    /// Removes every generation of a group together with its instances.
    pub fn delete_group(&self, plan: &mut Plan, group_id: GroupId) -> Result<usize, PlanError> {
        let removed = self.remove_group(plan, group_id);
        if removed == 0 {
            return Err(PlanError::GroupNotFound(group_id));
        }
        info!(group_id = %group_id, generations = removed, "group deleted");
        Ok(removed)
    }

    /// Logs a completion of `config_id` now.
    ///
    /// Only a config due today accepts a completion, and a timed one only
    /// inside its clock window. At most one instance per config and day.
    /// Tracker instances start at progress 0 and are raised with
    /// `set_tracker_progress`.
    pub fn log_completion(
        &self,
        plan: &mut Plan,
        config_id: ConfigId,
        comment: impl Into<String>,
        image_urls: Vec<String>,
    ) -> Result<InstanceId, PlanError> {
        let now = self.clock.now();
        let today = now.date();
        let config = plan
            .config(config_id)
            .ok_or(PlanError::ConfigNotFound(config_id))?;
        if !is_due_at(config, &DayWindow::of_len(today, 1), 0) {
            return Err(PlanError::NotDue {
                config_id,
                day: today,
            });
        }
        if plan.instance_on(config_id, today).is_some() {
            return Err(PlanError::AlreadyLogged {
                config_id,
                day: today,
            });
        }
        if !config.clock.is_open_at(now.time()) {
            return Err(PlanError::OutsideClockWindow {
                config_id,
                at: now.time(),
            });
        }

        let progress = if config.tracker_rule().is_some() { 0 } else { 1 };
        let instance = Instance::new(self.ids.generate_instance_id(), now)
            .with_comment(comment)
            .with_image_urls(image_urls)
            .with_progress(progress);
        let instance_id = instance.id;

        plan.instances.entry(config_id).or_default().push(instance);
        debug!(config_id = %config_id, instance_id = %instance_id, "completion logged");
        Ok(instance_id)
    }

    /// Deletes one logged instance.
    pub fn remove_completion(
        &self,
        plan: &mut Plan,
        config_id: ConfigId,
        instance_id: InstanceId,
    ) -> Result<Instance, PlanError> {
        let not_found = PlanError::InstanceNotFound {
            config_id,
            instance_id,
        };
        let instances = plan.instances.get_mut(&config_id).ok_or(not_found.clone())?;
        let index = instances
            .iter()
            .position(|i| i.id == instance_id)
            .ok_or(not_found)?;
        let removed = instances.remove(index);
        debug!(config_id = %config_id, instance_id = %instance_id, "completion removed");
        Ok(removed)
    }

    /// Sets the counter of a tracker instance, bounded by the tracker's
    /// maximum.
    pub fn set_tracker_progress(
        &self,
        plan: &mut Plan,
        config_id: ConfigId,
        instance_id: InstanceId,
        value: u32,
    ) -> Result<(), PlanError> {
        let config = plan
            .config(config_id)
            .ok_or(PlanError::ConfigNotFound(config_id))?;
        let rule = *config
            .tracker_rule()
            .ok_or(PlanError::NotATracker(config_id))?;
        if value > rule.max_progress {
            return Err(PlanError::ProgressOutOfRange {
                value,
                max: rule.max_progress,
            });
        }

        let instance = plan
            .instances
            .get_mut(&config_id)
            .and_then(|list| list.iter_mut().find(|i| i.id == instance_id))
            .ok_or(PlanError::InstanceNotFound {
                config_id,
                instance_id,
            })?;
        instance.progress = value;
        debug!(
            config_id = %config_id,
            instance_id = %instance_id,
            progress = value,
            satisfied = rule.is_satisfied(value),
            "tracker progress set"
        );
        Ok(())
    }

    fn new_generation(&self, draft: ConfigDraft, group_id: GroupId) -> Result<TaskConfig, PlanError> {
        let config = draft
            .into_config(self.ids.generate_config_id(), group_id, self.clock.now())
            .prepared();
        config.validate()?;
        Ok(config)
    }

    /// Closes `id` on `close_on` and hides it.
    fn supersede(&self, plan: &mut Plan, id: ConfigId, close_on: NaiveDate) {
        if let Some(config) = plan.config_mut(id) {
            config.completed_date = Some(close_on);
            config.is_hidden = true;
        }
    }

    fn remove_group(&self, plan: &mut Plan, group_id: GroupId) -> usize {
        let doomed: Vec<ConfigId> = plan
            .configs
            .iter()
            .filter(|c| c.group_id == group_id)
            .map(|c| c.id)
            .collect();
        plan.configs.retain(|c| c.group_id != group_id);
        for id in &doomed {
            plan.instances.remove(id);
        }
        doomed.len()
    }
}
