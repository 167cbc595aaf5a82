use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use proptest::prelude::*;
use wedding_core::{
    classify, elapsed_breakdown, filter_and_sort, next_anniversary, Criteria, DateStatusFilter,
    MonthFilter, Record, Roster, SortMode,
};

fn record_strategy() -> impl Strategy<Value = (String, String, Option<(u32, u32, i32)>, bool)> {
    (
        "[A-Za-z]{1,8}",
        "[A-Za-z]{1,8}",
        proptest::option::of((1u32..=31, 1u32..=12, 1950i32..=2030)),
        any::<bool>(),
    )
}

fn roster_strategy() -> impl Strategy<Value = Roster> {
    proptest::collection::vec(record_strategy(), 0..25).prop_map(|rows| {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, (a, b, date, flag))| {
                let wedding_date = date
                    .map(|(d, m, y)| format!("{d:02}/{m:02}/{y}"))
                    .unwrap_or_default();
                // Mostly consistent records, with some flag/date disagreement.
                let has_wedding_date = if flag { !wedding_date.is_empty() } else { false };
                Record {
                    id: i as u32 + 1,
                    partner_a: a,
                    partner_b: b,
                    wedding_date,
                    has_wedding_date,
                    photo: None,
                }
            })
            .collect();
        Roster::from_records(records).unwrap()
    })
}

fn criteria_strategy() -> impl Strategy<Value = Criteria> {
    (
        "[a-eA-E]{0,2}",
        prop_oneof![
            Just(SortMode::Newest),
            Just(SortMode::Oldest),
            Just(SortMode::Name)
        ],
        0u32..=12,
        prop_oneof![
            Just(DateStatusFilter::All),
            Just(DateStatusFilter::WithDate),
            Just(DateStatusFilter::WithoutDate)
        ],
    )
        .prop_map(|(search, sort, month, status)| {
            let month = if month == 0 {
                MonthFilter::All
            } else {
                MonthFilter::Month(month)
            };
            Criteria::default()
                .with_search(search)
                .with_sort(sort)
                .with_month(month)
                .with_date_status(status)
        })
}

fn now_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (2000i32..=2040, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
        |(y, m, d, h, min, s)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, s)
                .unwrap()
        },
    )
}

proptest! {
    #[test]
    fn filter_never_fabricates_records(roster in roster_strategy(), criteria in criteria_strategy()) {
        let out = filter_and_sort(&roster, &criteria);
        prop_assert!(out.len() <= roster.len());
        let mut ids: Vec<u32> = out.iter().map(|r| r.id).collect();
        for record in &out {
            prop_assert_eq!(roster.get(record.id).unwrap(), *record);
        }
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), out.len());
    }

    #[test]
    fn filter_is_idempotent(roster in roster_strategy(), criteria in criteria_strategy()) {
        let first: Vec<u32> = filter_and_sort(&roster, &criteria).iter().map(|r| r.id).collect();
        let second: Vec<u32> = filter_and_sort(&roster, &criteria).iter().map(|r| r.id).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn with_date_excludes_undated(roster in roster_strategy(), criteria in criteria_strategy()) {
        let criteria = criteria.with_date_status(DateStatusFilter::WithDate);
        prop_assert!(filter_and_sort(&roster, &criteria).iter().all(|r| r.is_dated()));
    }

    #[test]
    fn dated_records_precede_undated(roster in roster_strategy(), criteria in criteria_strategy()) {
        let out = filter_and_sort(&roster, &criteria);
        let first_undated = out.iter().position(|r| !r.is_dated()).unwrap_or(out.len());
        prop_assert!(out[first_undated..].iter().all(|r| !r.is_dated()));
    }

    #[test]
    fn every_record_lands_in_one_bucket(roster in roster_strategy(), now in now_strategy()) {
        let buckets = classify(&roster, now);
        prop_assert_eq!(buckets.len(), roster.len());
        for record in &roster {
            prop_assert!(buckets.bucket_of(record.id).is_some());
        }
    }

    #[test]
    fn days_until_is_within_a_year(
        (d, m, y) in (1u32..=28, 1u32..=12, 1950i32..=2030),
        now in now_strategy(),
    ) {
        let text = format!("{d:02}/{m:02}/{y}");
        let p = next_anniversary(&text, now).unwrap();
        prop_assert!(p.days_until >= 0);
        prop_assert!(p.days_until <= 365);
        prop_assert!(p.next_date >= now.date());
    }

    #[test]
    fn one_second_only_moves_the_clock_fields(
        (d, m, y) in (1u32..=28, 1u32..=12, 1950i32..=1999),
        now in now_strategy(),
    ) {
        let text = format!("{d:02}/{m:02}/{y}");
        let before = elapsed_breakdown(&text, now);
        let after = elapsed_breakdown(&text, now + TimeDelta::seconds(1));
        prop_assert!(before.is_known() && after.is_known());

        let before_secs = before.hours * 3600 + before.minutes * 60 + before.seconds;
        let after_secs = after.hours * 3600 + after.minutes * 60 + after.seconds;
        if before_secs < 86_399 {
            prop_assert_eq!(after_secs, before_secs + 1);
            prop_assert_eq!(
                (after.years, after.months, after.days),
                (before.years, before.months, before.days)
            );
        } else {
            prop_assert_eq!(after_secs, 0);
        }
    }
}
