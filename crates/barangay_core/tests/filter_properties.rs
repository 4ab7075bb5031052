use barangay_core::filter::{is_visible, matches, select};
use barangay_core::schema::{
    Complaint, ComplaintCategory, ComplaintStatus, Engagement, Person, Priority,
};
use barangay_core::{ComplaintFilter, DateRange, Viewer};
use proptest::prelude::*;
use proptest::sample::select as pick;
use time::macros::date;
use time::{Date, Duration, OffsetDateTime};

const OWNERS: &[&str] = &["u1", "u2", "u3"];

fn day() -> impl Strategy<Value = Date> {
    (0i64..120).prop_map(|offset| date!(2025-11-01) + Duration::days(offset))
}

fn complaint() -> impl Strategy<Value = Complaint> {
    (
        pick(ComplaintStatus::ALL),
        pick(ComplaintCategory::ALL),
        proptest::option::of(pick(Priority::ALL)),
        pick(OWNERS),
        (0i64..120 * 86_400),
    )
        .prop_map(|(status, category, priority, owner, secs)| {
            let created_at =
                OffsetDateTime::from_unix_timestamp(1_761_955_200 + secs).expect("in range");
            Complaint {
                id: format!("complaint-{secs}"),
                title: "Generated complaint".to_string(),
                description: "Generated for property checks.".to_string(),
                category,
                status,
                priority,
                submitter: Person {
                    id: owner.to_string(),
                    name: owner.to_uppercase(),
                },
                location: None,
                images: Vec::new(),
                engagement: Engagement::default(),
                created_at,
                updated_at: created_at,
            }
        })
}

fn filter() -> impl Strategy<Value = ComplaintFilter> {
    (
        prop::collection::btree_set(pick(ComplaintStatus::ALL), 0..3),
        prop::collection::btree_set(pick(ComplaintCategory::ALL), 0..3),
        prop::collection::btree_set(pick(Priority::ALL), 0..2),
        proptest::option::of((proptest::option::of(day()), proptest::option::of(day()))),
        any::<bool>(),
    )
        .prop_map(|(status, category, priority, range, mine_only)| ComplaintFilter {
            status,
            category,
            priority,
            date_range: range.map(|(start, end)| DateRange { start, end }),
            mine_only,
        })
}

fn viewer() -> impl Strategy<Value = Viewer> {
    proptest::option::of(pick(OWNERS)).prop_map(|id| match id {
        Some(id) => Viewer::user(id),
        None => Viewer::anonymous(),
    })
}

proptest! {
    #[test]
    fn default_filter_passes_every_visible_record(
        records in prop::collection::vec(complaint(), 0..20),
        viewer in viewer(),
    ) {
        let selected = select(&records, &ComplaintFilter::default(), &viewer);
        let visible = records.iter().filter(|record| is_visible(*record, &viewer)).count();
        prop_assert_eq!(selected.len(), visible);
    }

    #[test]
    fn included_records_satisfy_every_active_dimension(
        record in complaint(),
        filter in filter(),
        viewer in viewer(),
    ) {
        if matches(&record, &filter, &viewer) {
            prop_assert!(is_visible(&record, &viewer));
            if !filter.status.is_empty() {
                prop_assert!(filter.status.contains(&record.status));
            }
            if !filter.category.is_empty() {
                prop_assert!(filter.category.contains(&record.category));
            }
            if let (false, Some(priority)) = (filter.priority.is_empty(), record.priority) {
                prop_assert!(filter.priority.contains(&priority));
            }
            if let Some((lower, upper)) = filter.date_range.and_then(|range| range.bounds(viewer.utc_offset)) {
                prop_assert!(lower <= record.created_at && record.created_at <= upper);
            }
            if filter.mine_only {
                prop_assert_eq!(viewer.user_id.as_deref(), Some(record.submitter.id.as_str()));
            }
        }
    }

    #[test]
    fn badge_is_zero_exactly_when_nothing_constrains(filter in filter()) {
        let constrains = !filter.status.is_empty()
            || !filter.category.is_empty()
            || !filter.priority.is_empty()
            || filter.date_range.is_some_and(|range| range.is_complete())
            || filter.mine_only;
        prop_assert_eq!(filter.active_count() == 0, !constrains);
        prop_assert_eq!(filter.is_default(), !constrains);
    }

    #[test]
    fn selection_is_sorted_newest_first(
        records in prop::collection::vec(complaint(), 0..20),
        filter in filter(),
        viewer in viewer(),
    ) {
        let selected = select(&records, &filter, &viewer);
        for pair in selected.windows(2) {
            prop_assert!(pair[0].created_at >= pair[1].created_at);
        }
    }
}
