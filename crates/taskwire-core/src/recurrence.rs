use chrono::{DateTime, Duration, Months, Utc};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{
    EditScope, Frequency, Horizon, RecurrenceRule, Task, TaskChanges, TaskStatus,
};

/// One concrete scheduled instance of a recurring series, before it has been
/// materialized into a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// 1-based position within the series. Index 1 is the root's deadline.
    pub index: u32,
    pub scheduled_at: DateTime<Utc>,
}

/// Computes the schedule for occurrence `steps` positions after the anchor.
///
/// Monthly and yearly steps are always taken from the anchor rather than the
/// previous occurrence, so a day-of-month that does not exist in the target
/// month clamps to that month's last valid day without losing the anchor day
/// for later months (Jan 31 -> Feb 28 -> Mar 31).
fn schedule_for(
    anchor: DateTime<Utc>,
    frequency: Frequency,
    steps: u32,
) -> Option<DateTime<Utc>> {
    match frequency {
        Frequency::Daily => anchor.checked_add_signed(Duration::days(i64::from(steps))),
        Frequency::Weekly => anchor.checked_add_signed(Duration::weeks(i64::from(steps))),
        Frequency::Monthly => anchor.checked_add_months(Months::new(steps)),
        Frequency::Yearly => anchor.checked_add_months(Months::new(steps.checked_mul(12)?)),
    }
}

/// Lazy, finite iterator over the occurrences of a recurrence rule.
///
/// Expansion starts at the anchor (occurrence index 1) and stops at the
/// rule's `UNTIL` timestamp when present, and always at the horizon. An
/// open-ended rule therefore never expands unboundedly; callers with no
/// opinion use `Horizon::default()`.
#[derive(Debug, Clone)]
pub struct Occurrences {
    anchor: DateTime<Utc>,
    rule: RecurrenceRule,
    horizon: Horizon,
    next_index: u32,
    emitted: usize,
}

impl Iterator for Occurrences {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        if let Horizon::Count(max) = self.horizon {
            if self.emitted >= max {
                return None;
            }
        }

        let steps = self.next_index.checked_sub(1)?;
        let scheduled_at = schedule_for(self.anchor, self.rule.frequency, steps)?;

        if let Some(until) = self.rule.until {
            if scheduled_at > until {
                return None;
            }
        }
        if let Horizon::Until(bound) = self.horizon {
            if scheduled_at > bound {
                return None;
            }
        }

        let occurrence = Occurrence {
            index: self.next_index,
            scheduled_at,
        };
        self.next_index += 1;
        self.emitted += 1;
        Some(occurrence)
    }
}

/// Expands a series root's recurrence rule into its occurrence sequence.
///
/// The root must carry a deadline; it anchors the sequence. The result is
/// lazy and guaranteed finite.
pub fn expand(
    root: &Task,
    rule: &RecurrenceRule,
    horizon: Horizon,
) -> Result<Occurrences, CoreError> {
    let anchor = root.deadline.ok_or_else(|| {
        CoreError::InvalidInput(format!(
            "Task '{}' has no deadline to anchor its recurrence",
            root.title
        ))
    })?;

    tracing::debug!(
        task = %root.id,
        rule = %rule,
        "expanding recurrence"
    );

    Ok(Occurrences {
        anchor,
        rule: *rule,
        horizon,
        next_index: 1,
        emitted: 0,
    })
}

/// Materializes occurrence tasks from a series root template.
///
/// Each instance clones the template's fields, starts `Pending`, and carries
/// the root's id as `parent_task_id` plus its own `occurrence_index`.
pub fn materialize(
    root: &Task,
    rule: &RecurrenceRule,
    horizon: Horizon,
) -> Result<Vec<Task>, CoreError> {
    let instances = expand(root, rule, horizon)?
        .map(|occurrence| instance_from_template(root, occurrence))
        .collect();
    Ok(instances)
}

fn instance_from_template(root: &Task, occurrence: Occurrence) -> Task {
    Task {
        id: Uuid::now_v7(),
        title: root.title.clone(),
        description: root.description.clone(),
        status: TaskStatus::Pending,
        priority: root.priority,
        deadline: Some(occurrence.scheduled_at),
        category: root.category.clone(),
        archived: false,
        time_required_minutes: root.time_required_minutes,
        comments: Vec::new(),
        recurring: false,
        parent_task_id: Some(root.id),
        occurrence_index: Some(occurrence.index),
        rrule_string: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Everything removed or updated by a scoped edit. The storage collaborator
/// persists the listed tasks; the expander itself never performs I/O.
#[derive(Debug, Default)]
pub struct EditOutcome {
    pub updated: Vec<Uuid>,
    pub removed: Vec<Uuid>,
}

#[derive(Debug)]
pub struct DeleteOutcome {
    pub removed: Vec<Task>,
    /// Set when the series root itself was removed (scope `all`); the series
    /// no longer exists afterwards.
    pub series_dissolved: bool,
}

/// Validated in-memory view of a recurring series: the root template plus its
/// materialized occurrences, ordered by occurrence index.
#[derive(Debug, Clone)]
pub struct Series {
    root: Task,
    occurrences: Vec<Task>,
}

impl Series {
    pub fn new(root: Task, mut occurrences: Vec<Task>) -> Result<Self, CoreError> {
        if !root.is_series_root() {
            return Err(CoreError::InvalidInput(format!(
                "Task '{}' is not a series root",
                root.title
            )));
        }

        for occurrence in &occurrences {
            if occurrence.parent_task_id != Some(root.id) {
                return Err(CoreError::InvalidInput(format!(
                    "Task {} does not belong to series root {}",
                    occurrence.id, root.id
                )));
            }
            if occurrence.occurrence_index.is_none() {
                return Err(CoreError::InvalidInput(format!(
                    "Occurrence {} is missing its occurrence index",
                    occurrence.id
                )));
            }
        }

        occurrences.sort_by_key(|t| t.occurrence_index);
        if occurrences
            .windows(2)
            .any(|pair| pair[0].occurrence_index == pair[1].occurrence_index)
        {
            return Err(CoreError::InvalidInput(format!(
                "Series {} contains duplicate occurrence indices",
                root.id
            )));
        }

        Ok(Self { root, occurrences })
    }

    pub fn root(&self) -> &Task {
        &self.root
    }

    pub fn occurrences(&self) -> &[Task] {
        &self.occurrences
    }

    pub fn into_parts(self) -> (Task, Vec<Task>) {
        (self.root, self.occurrences)
    }

    /// The parsed recurrence rule from the root's `rrule_string`.
    pub fn rule(&self) -> Result<RecurrenceRule, CoreError> {
        let raw = self.root.rrule_string.as_deref().ok_or_else(|| {
            CoreError::InvalidInput(format!("Series root {} has no recurrence rule", self.root.id))
        })?;
        raw.parse()
            .map_err(|e: crate::models::ParseRecurrenceRuleError| {
                CoreError::InvalidInput(e.to_string())
            })
    }

    fn position_of(&self, target_index: u32) -> Result<usize, CoreError> {
        self.occurrences
            .iter()
            .position(|t| t.occurrence_index == Some(target_index))
            .ok_or_else(|| {
                CoreError::NotFound(format!(
                    "Occurrence {} of series {}",
                    target_index, self.root.id
                ))
            })
    }

    /// Applies `changes` at the given scope.
    ///
    /// Scope rules:
    /// - `this` mutates only the target occurrence.
    /// - `following` mutates every occurrence with index >= target; deadline
    ///   changes are rejected here, a schedule is rebased with scope `all`.
    /// - `all` mutates the root template and re-applies it to every
    ///   occurrence, preserving each occurrence's own completion status. A
    ///   changed rule or re-anchored root deadline regenerates the schedule;
    ///   occurrences past a new `UNTIL` are dropped.
    ///
    /// `rrule` changes outside scope `all` and unknown occurrence indices are
    /// errors.
    pub fn apply_edit(
        &mut self,
        target_index: u32,
        changes: &TaskChanges,
        scope: EditScope,
    ) -> Result<EditOutcome, CoreError> {
        if changes.is_empty() {
            return Err(CoreError::InvalidInput("No changes supplied".to_string()));
        }
        if changes.touches_rrule() && scope != EditScope::EntireSeries {
            return Err(CoreError::InvalidInput(format!(
                "Recurrence rule changes require scope 'all', got '{}'",
                scope
            )));
        }

        let position = self.position_of(target_index)?;
        let mut outcome = EditOutcome::default();

        match scope {
            EditScope::ThisOccurrence => {
                let occurrence = &mut self.occurrences[position];
                apply_field_changes(occurrence, changes, false, true);
                outcome.updated.push(occurrence.id);
            }
            EditScope::ThisAndFollowing => {
                if changes.deadline.is_some() {
                    return Err(CoreError::InvalidInput(
                        "Deadline changes apply to a single occurrence ('this') or the whole series ('all')"
                            .to_string(),
                    ));
                }
                for occurrence in &mut self.occurrences[position..] {
                    apply_field_changes(occurrence, changes, false, false);
                    outcome.updated.push(occurrence.id);
                }
            }
            EditScope::EntireSeries => {
                self.apply_series_edit(changes, &mut outcome)?;
            }
        }

        Ok(outcome)
    }

    fn apply_series_edit(
        &mut self,
        changes: &TaskChanges,
        outcome: &mut EditOutcome,
    ) -> Result<(), CoreError> {
        if changes.deadline == Some(None) {
            return Err(CoreError::InvalidInput(
                "A series root's deadline anchors its schedule and cannot be cleared".to_string(),
            ));
        }

        // Converting back to a one-time task dissolves the occurrence set.
        if changes.rrule == Some(None) {
            apply_field_changes(&mut self.root, changes, false, true);
            self.root.recurring = false;
            self.root.rrule_string = None;
            outcome.updated.push(self.root.id);
            outcome
                .removed
                .extend(self.occurrences.drain(..).map(|t| t.id));
            return Ok(());
        }

        let mut reschedule = changes.deadline.is_some();
        if let Some(Some(raw)) = &changes.rrule {
            let rule: RecurrenceRule = raw
                .parse()
                .map_err(|e: crate::models::ParseRecurrenceRuleError| {
                    CoreError::InvalidInput(e.to_string())
                })?;
            self.root.rrule_string = Some(rule.to_string());
            reschedule = true;
        }

        apply_field_changes(&mut self.root, changes, false, true);
        outcome.updated.push(self.root.id);

        for occurrence in &mut self.occurrences {
            apply_field_changes(occurrence, changes, true, false);
            outcome.updated.push(occurrence.id);
        }

        if reschedule {
            let rule = self.rule()?;
            let anchor = self.root.deadline.ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "Series root {} has no deadline to anchor its schedule",
                    self.root.id
                ))
            })?;

            let mut dropped = Vec::new();
            for occurrence in &mut self.occurrences {
                let index = occurrence.occurrence_index.unwrap_or(1);
                let scheduled = schedule_for(anchor, rule.frequency, index - 1);
                match scheduled {
                    Some(at) if rule.until.map_or(true, |until| at <= until) => {
                        occurrence.deadline = Some(at);
                        occurrence.updated_at = Utc::now();
                    }
                    _ => dropped.push(occurrence.id),
                }
            }
            if !dropped.is_empty() {
                self.occurrences.retain(|t| !dropped.contains(&t.id));
                outcome.updated.retain(|id| !dropped.contains(id));
                outcome.removed.extend(dropped);
            }
        }

        Ok(())
    }

    /// Removes occurrences at the given scope. Scope `all` also removes the
    /// root; the returned outcome then has `series_dissolved` set and the
    /// series value is consumed either way.
    pub fn apply_delete(
        mut self,
        target_index: u32,
        scope: EditScope,
    ) -> Result<(Option<Series>, DeleteOutcome), CoreError> {
        let position = self.position_of(target_index)?;

        match scope {
            EditScope::ThisOccurrence => {
                let removed = vec![self.occurrences.remove(position)];
                Ok((
                    Some(self),
                    DeleteOutcome {
                        removed,
                        series_dissolved: false,
                    },
                ))
            }
            EditScope::ThisAndFollowing => {
                let removed = self.occurrences.split_off(position);
                Ok((
                    Some(self),
                    DeleteOutcome {
                        removed,
                        series_dissolved: false,
                    },
                ))
            }
            EditScope::EntireSeries => {
                let (root, mut removed) = (self.root, self.occurrences);
                removed.push(root);
                Ok((
                    None,
                    DeleteOutcome {
                        removed,
                        series_dissolved: true,
                    },
                ))
            }
        }
    }
}

fn apply_field_changes(
    task: &mut Task,
    changes: &TaskChanges,
    preserve_status: bool,
    apply_deadline: bool,
) {
    if let Some(title) = &changes.title {
        task.title = title.clone();
    }
    if let Some(description) = &changes.description {
        task.description = description.clone();
    }
    if !preserve_status {
        if let Some(status) = changes.status {
            task.status = status;
        }
    }
    if let Some(priority) = changes.priority {
        task.priority = priority;
    }
    if apply_deadline {
        if let Some(deadline) = changes.deadline {
            task.deadline = deadline;
        }
    }
    if let Some(category) = &changes.category {
        task.category = category.clone();
    }
    if let Some(archived) = changes.archived {
        task.archived = archived;
    }
    if let Some(minutes) = changes.time_required_minutes {
        task.time_required_minutes = minutes;
    }
    if let Some(comment) = &changes.add_comment {
        task.comments.push(comment.clone());
    }
    task.updated_at = Utc::now();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_HORIZON_COUNT;
    use chrono::TimeZone;
    use rstest::rstest;

    fn root_with_deadline(deadline: DateTime<Utc>, rule: &RecurrenceRule) -> Task {
        Task {
            title: "Water the plants".to_string(),
            deadline: Some(deadline),
            recurring: true,
            rrule_string: Some(rule.to_string()),
            ..Default::default()
        }
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    #[test]
    fn daily_rule_without_end_stops_at_default_horizon() {
        let rule = RecurrenceRule::new(Frequency::Daily);
        let root = root_with_deadline(utc(2026, 3, 1), &rule);

        let occurrences: Vec<_> = expand(&root, &rule, Horizon::default()).unwrap().collect();
        assert_eq!(occurrences.len(), DEFAULT_HORIZON_COUNT);
        assert_eq!(occurrences[0].index, 1);
        assert_eq!(occurrences[0].scheduled_at, utc(2026, 3, 1));
        assert_eq!(occurrences[1].scheduled_at, utc(2026, 3, 2));
    }

    #[rstest]
    #[case(2026, 28)] // ordinary year
    #[case(2028, 29)] // leap year
    fn monthly_from_jan_31_clamps_to_end_of_february(#[case] year: i32, #[case] feb_day: u32) {
        let rule = RecurrenceRule::new(Frequency::Monthly);
        let root = root_with_deadline(utc(year, 1, 31), &rule);

        let occurrences: Vec<_> = expand(&root, &rule, Horizon::Count(3)).unwrap().collect();
        assert_eq!(occurrences[0].scheduled_at, utc(year, 1, 31));
        assert_eq!(occurrences[1].scheduled_at, utc(year, 2, feb_day));
        // The anchor day is not lost to the clamp.
        assert_eq!(occurrences[2].scheduled_at, utc(year, 3, 31));
    }

    #[test]
    fn yearly_from_leap_day_clamps_in_ordinary_years() {
        let rule = RecurrenceRule::new(Frequency::Yearly);
        let root = root_with_deadline(utc(2028, 2, 29), &rule);

        let occurrences: Vec<_> = expand(&root, &rule, Horizon::Count(2)).unwrap().collect();
        assert_eq!(occurrences[1].scheduled_at, utc(2029, 2, 28));
    }

    #[test]
    fn weekly_rule_steps_by_seven_days() {
        let rule = RecurrenceRule::new(Frequency::Weekly);
        let root = root_with_deadline(utc(2026, 3, 2), &rule);

        let occurrences: Vec<_> = expand(&root, &rule, Horizon::Count(3)).unwrap().collect();
        assert_eq!(occurrences[1].scheduled_at, utc(2026, 3, 9));
        assert_eq!(occurrences[2].scheduled_at, utc(2026, 3, 16));
    }

    #[test]
    fn until_timestamp_caps_expansion_before_horizon() {
        let rule = RecurrenceRule::with_until(Frequency::Daily, utc(2026, 3, 4));
        let root = root_with_deadline(utc(2026, 3, 1), &rule);

        let occurrences: Vec<_> = expand(&root, &rule, Horizon::Count(100)).unwrap().collect();
        assert_eq!(occurrences.len(), 4);
        assert_eq!(occurrences.last().unwrap().scheduled_at, utc(2026, 3, 4));
    }

    #[test]
    fn date_horizon_caps_open_ended_rule() {
        let rule = RecurrenceRule::new(Frequency::Weekly);
        let root = root_with_deadline(utc(2026, 3, 2), &rule);

        let occurrences: Vec<_> = expand(&root, &rule, Horizon::Until(utc(2026, 3, 20)))
            .unwrap()
            .collect();
        assert_eq!(occurrences.len(), 3);
    }

    #[test]
    fn zero_count_horizon_yields_nothing() {
        let rule = RecurrenceRule::new(Frequency::Daily);
        let root = root_with_deadline(utc(2026, 3, 1), &rule);

        assert_eq!(expand(&root, &rule, Horizon::Count(0)).unwrap().count(), 0);
    }

    #[test]
    fn expansion_requires_an_anchor_deadline() {
        let rule = RecurrenceRule::new(Frequency::Daily);
        let mut root = root_with_deadline(utc(2026, 3, 1), &rule);
        root.deadline = None;

        assert!(matches!(
            expand(&root, &rule, Horizon::default()),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn materialized_instances_inherit_the_template() {
        let rule = RecurrenceRule::new(Frequency::Daily);
        let mut root = root_with_deadline(utc(2026, 3, 1), &rule);
        root.priority = crate::models::TaskPriority::High;
        root.category = "home".to_string();

        let instances = materialize(&root, &rule, Horizon::Count(3)).unwrap();
        assert_eq!(instances.len(), 3);
        for (i, instance) in instances.iter().enumerate() {
            assert_eq!(instance.parent_task_id, Some(root.id));
            assert_eq!(instance.occurrence_index, Some(i as u32 + 1));
            assert_eq!(instance.status, TaskStatus::Pending);
            assert_eq!(instance.priority, root.priority);
            assert_eq!(instance.category, root.category);
            assert!(!instance.recurring);
        }
    }
}
