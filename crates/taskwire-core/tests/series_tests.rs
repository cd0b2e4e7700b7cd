use chrono::{DateTime, TimeZone, Utc};
use taskwire_core::error::CoreError;
use taskwire_core::models::{
    EditScope, Frequency, Horizon, RecurrenceRule, Task, TaskChanges, TaskStatus,
};
use taskwire_core::recurrence::{materialize, Series};

fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
}

/// A weekly series with five materialized occurrences.
fn five_occurrence_series() -> Series {
    let rule = RecurrenceRule::new(Frequency::Weekly);
    let root = Task {
        title: "Weekly review".to_string(),
        deadline: Some(utc(2026, 3, 2)),
        recurring: true,
        rrule_string: Some(rule.to_string()),
        ..Default::default()
    };
    let occurrences = materialize(&root, &rule, Horizon::Count(5)).unwrap();
    Series::new(root, occurrences).unwrap()
}

fn titles(series: &Series) -> Vec<(u32, String)> {
    series
        .occurrences()
        .iter()
        .map(|t| (t.occurrence_index.unwrap(), t.title.clone()))
        .collect()
}

#[test]
fn edit_scope_this_touches_only_the_target() {
    let mut series = five_occurrence_series();
    let changes = TaskChanges {
        title: Some("Quarterly review".to_string()),
        ..Default::default()
    };

    let outcome = series
        .apply_edit(2, &changes, EditScope::ThisOccurrence)
        .unwrap();

    assert_eq!(outcome.updated.len(), 1);
    assert_eq!(
        titles(&series),
        vec![
            (1, "Weekly review".to_string()),
            (2, "Quarterly review".to_string()),
            (3, "Weekly review".to_string()),
            (4, "Weekly review".to_string()),
            (5, "Weekly review".to_string()),
        ]
    );
}

#[test]
fn edit_scope_following_leaves_earlier_occurrences_alone() {
    let mut series = five_occurrence_series();
    let changes = TaskChanges {
        category: Some("work".to_string()),
        ..Default::default()
    };

    let outcome = series
        .apply_edit(3, &changes, EditScope::ThisAndFollowing)
        .unwrap();

    assert_eq!(outcome.updated.len(), 3);
    let categories: Vec<_> = series
        .occurrences()
        .iter()
        .map(|t| t.category.as_str())
        .collect();
    assert_eq!(categories, vec!["", "", "work", "work", "work"]);
}

#[test]
fn edit_scope_all_updates_template_but_preserves_completion() {
    let mut series = five_occurrence_series();
    // Occurrence 1 was already done before the series edit.
    let first_changes = TaskChanges {
        status: Some(TaskStatus::Completed),
        ..Default::default()
    };
    series
        .apply_edit(1, &first_changes, EditScope::ThisOccurrence)
        .unwrap();

    let changes = TaskChanges {
        title: Some("Weekly retro".to_string()),
        status: Some(TaskStatus::Pending),
        ..Default::default()
    };
    series.apply_edit(1, &changes, EditScope::EntireSeries).unwrap();

    assert_eq!(series.root().title, "Weekly retro");
    for occurrence in series.occurrences() {
        assert_eq!(occurrence.title, "Weekly retro");
    }
    // The completed occurrence keeps its own status.
    assert_eq!(series.occurrences()[0].status, TaskStatus::Completed);
    assert_eq!(series.occurrences()[1].status, TaskStatus::Pending);
}

#[test]
fn rrule_change_requires_entire_series_scope() {
    let mut series = five_occurrence_series();
    let changes = TaskChanges {
        rrule: Some(Some("FREQ=DAILY".to_string())),
        ..Default::default()
    };

    for scope in [EditScope::ThisOccurrence, EditScope::ThisAndFollowing] {
        let result = series.apply_edit(2, &changes.clone(), scope);
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }
}

#[test]
fn rrule_change_with_all_scope_reschedules_occurrences() {
    let mut series = five_occurrence_series();
    let changes = TaskChanges {
        rrule: Some(Some("FREQ=DAILY".to_string())),
        ..Default::default()
    };

    series.apply_edit(1, &changes, EditScope::EntireSeries).unwrap();

    assert_eq!(series.root().rrule_string.as_deref(), Some("FREQ=DAILY"));
    let deadlines: Vec<_> = series
        .occurrences()
        .iter()
        .map(|t| t.deadline.unwrap())
        .collect();
    assert_eq!(
        deadlines,
        vec![
            utc(2026, 3, 2),
            utc(2026, 3, 3),
            utc(2026, 3, 4),
            utc(2026, 3, 5),
            utc(2026, 3, 6),
        ]
    );
}

#[test]
fn shrinking_rrule_drops_occurrences_past_the_new_until() {
    let mut series = five_occurrence_series();
    // New rule ends after the third weekly occurrence.
    let changes = TaskChanges {
        rrule: Some(Some("FREQ=WEEKLY;UNTIL=20260316T120000Z".to_string())),
        ..Default::default()
    };

    let outcome = series.apply_edit(1, &changes, EditScope::EntireSeries).unwrap();

    assert_eq!(series.occurrences().len(), 3);
    assert_eq!(outcome.removed.len(), 2);
}

#[test]
fn clearing_the_rule_converts_to_a_one_time_task() {
    let mut series = five_occurrence_series();
    let changes = TaskChanges {
        rrule: Some(None),
        ..Default::default()
    };

    let outcome = series.apply_edit(1, &changes, EditScope::EntireSeries).unwrap();

    assert!(!series.root().recurring);
    assert_eq!(series.root().rrule_string, None);
    assert!(series.occurrences().is_empty());
    assert_eq!(outcome.removed.len(), 5);
}

#[test]
fn editing_an_unknown_occurrence_is_not_found() {
    let mut series = five_occurrence_series();
    let changes = TaskChanges {
        title: Some("nope".to_string()),
        ..Default::default()
    };

    assert!(matches!(
        series.apply_edit(42, &changes, EditScope::ThisOccurrence),
        Err(CoreError::NotFound(_))
    ));
}

#[test]
fn empty_changes_are_rejected() {
    let mut series = five_occurrence_series();
    assert!(matches!(
        series.apply_edit(1, &TaskChanges::default(), EditScope::ThisOccurrence),
        Err(CoreError::InvalidInput(_))
    ));
}

#[test]
fn delete_scope_this_removes_exactly_one_occurrence() {
    let series = five_occurrence_series();
    let (remaining, outcome) = series.apply_delete(2, EditScope::ThisOccurrence).unwrap();

    let remaining = remaining.unwrap();
    assert!(!outcome.series_dissolved);
    assert_eq!(outcome.removed.len(), 1);
    assert_eq!(outcome.removed[0].occurrence_index, Some(2));
    let indices: Vec<_> = remaining
        .occurrences()
        .iter()
        .map(|t| t.occurrence_index.unwrap())
        .collect();
    assert_eq!(indices, vec![1, 3, 4, 5]);
}

#[test]
fn delete_scope_following_removes_target_and_later() {
    let series = five_occurrence_series();
    let (remaining, outcome) = series.apply_delete(3, EditScope::ThisAndFollowing).unwrap();

    let remaining = remaining.unwrap();
    let removed: Vec<_> = outcome
        .removed
        .iter()
        .map(|t| t.occurrence_index.unwrap())
        .collect();
    assert_eq!(removed, vec![3, 4, 5]);
    let kept: Vec<_> = remaining
        .occurrences()
        .iter()
        .map(|t| t.occurrence_index.unwrap())
        .collect();
    assert_eq!(kept, vec![1, 2]);
}

#[test]
fn delete_scope_all_dissolves_the_series() {
    let series = five_occurrence_series();
    let root_id = series.root().id;
    let (remaining, outcome) = series.apply_delete(1, EditScope::EntireSeries).unwrap();

    assert!(remaining.is_none());
    assert!(outcome.series_dissolved);
    // All five occurrences plus the root itself.
    assert_eq!(outcome.removed.len(), 6);
    assert!(outcome.removed.iter().any(|t| t.id == root_id));
}

#[test]
fn deleting_an_unknown_occurrence_is_not_found() {
    let series = five_occurrence_series();
    assert!(matches!(
        series.apply_delete(9, EditScope::ThisOccurrence),
        Err(CoreError::NotFound(_))
    ));
}

#[test]
fn series_rejects_foreign_occurrences() {
    let rule = RecurrenceRule::new(Frequency::Daily);
    let root = Task {
        title: "Series".to_string(),
        deadline: Some(utc(2026, 1, 1)),
        recurring: true,
        rrule_string: Some(rule.to_string()),
        ..Default::default()
    };
    let stray = Task {
        parent_task_id: Some(uuid::Uuid::now_v7()),
        occurrence_index: Some(1),
        ..Default::default()
    };

    assert!(matches!(
        Series::new(root, vec![stray]),
        Err(CoreError::InvalidInput(_))
    ));
}

#[test]
fn series_rejects_a_non_recurring_root() {
    let root = Task {
        title: "Plain task".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        Series::new(root, vec![]),
        Err(CoreError::InvalidInput(_))
    ));
}
