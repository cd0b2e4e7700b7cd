use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use taskwire_core::models::{Frequency, Horizon, RecurrenceRule, Task};
use taskwire_core::recurrence::expand;

fn root_at(deadline: DateTime<Utc>, rule: &RecurrenceRule) -> Task {
    Task {
        title: "Recurring".to_string(),
        deadline: Some(deadline),
        recurring: true,
        rrule_string: Some(rule.to_string()),
        ..Default::default()
    }
}

fn frequency_strategy() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Daily),
        Just(Frequency::Weekly),
        Just(Frequency::Monthly),
        Just(Frequency::Yearly),
    ]
}

proptest! {
    /// Expansion is always finite and bounded by the count horizon.
    #[test]
    fn expansion_never_exceeds_the_horizon(
        frequency in frequency_strategy(),
        horizon in 0usize..40,
        // Anchors spread over roughly 2001-2033.
        anchor_secs in 1_000_000_000i64..2_000_000_000,
    ) {
        let anchor = Utc.timestamp_opt(anchor_secs, 0).unwrap();
        let rule = RecurrenceRule::new(frequency);
        let root = root_at(anchor, &rule);

        let occurrences: Vec<_> = expand(&root, &rule, Horizon::Count(horizon))
            .unwrap()
            .collect();
        prop_assert_eq!(occurrences.len(), horizon);
    }

    /// Occurrence schedules are strictly increasing and indices contiguous
    /// from 1, regardless of clamping.
    #[test]
    fn occurrences_are_ordered_and_contiguous(
        frequency in frequency_strategy(),
        anchor_secs in 1_000_000_000i64..2_000_000_000,
    ) {
        let anchor = Utc.timestamp_opt(anchor_secs, 0).unwrap();
        let rule = RecurrenceRule::new(frequency);
        let root = root_at(anchor, &rule);

        let occurrences: Vec<_> = expand(&root, &rule, Horizon::Count(24))
            .unwrap()
            .collect();

        prop_assert_eq!(occurrences[0].scheduled_at, anchor);
        for (i, occurrence) in occurrences.iter().enumerate() {
            prop_assert_eq!(occurrence.index, i as u32 + 1);
        }
        for pair in occurrences.windows(2) {
            prop_assert!(pair[0].scheduled_at < pair[1].scheduled_at);
        }
    }

    /// An `UNTIL` bound means no occurrence is ever scheduled past it.
    #[test]
    fn until_is_a_hard_upper_bound(
        frequency in frequency_strategy(),
        anchor_secs in 1_000_000_000i64..1_500_000_000,
        span_secs in 0i64..200_000_000,
    ) {
        let anchor = Utc.timestamp_opt(anchor_secs, 0).unwrap();
        let until = Utc.timestamp_opt(anchor_secs + span_secs, 0).unwrap();
        let rule = RecurrenceRule { frequency, until: Some(until) };
        let root = root_at(anchor, &rule);

        for occurrence in expand(&root, &rule, Horizon::Count(500)).unwrap() {
            prop_assert!(occurrence.scheduled_at <= until);
        }
    }
}

#[test]
fn expansion_of_a_parsed_wire_rule_matches_the_typed_rule() {
    let rule: RecurrenceRule = "FREQ=MONTHLY;UNTIL=20260731T090000Z".parse().unwrap();
    let anchor = Utc.with_ymd_and_hms(2026, 1, 31, 9, 0, 0).unwrap();
    let root = root_at(anchor, &rule);

    let scheduled: Vec<_> = expand(&root, &rule, Horizon::Count(100))
        .unwrap()
        .map(|o| o.scheduled_at)
        .collect();

    assert_eq!(
        scheduled,
        vec![
            Utc.with_ymd_and_hms(2026, 1, 31, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 2, 28, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 31, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 4, 30, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 5, 31, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 6, 30, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 7, 31, 9, 0, 0).unwrap(),
        ]
    );
}
