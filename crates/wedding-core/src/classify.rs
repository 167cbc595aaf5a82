//! Temporal bucketing of the roster for the upcoming-anniversaries view.
//!
//! Boundaries, in days until the next anniversary:
//!
//! | bucket       | days      |
//! |--------------|-----------|
//! | `today`      | 0         |
//! | `this_week`  | 1–7       |
//! | `this_month` | 8–30      |
//! | `upcoming`   | 31 and up |
//!
//! "This month" means "within the next 30 days", not "same calendar month";
//! the list badge and the dashboard counter use the same window. The
//! upcoming bucket keeps every remaining dated record so each record lands
//! in exactly one bucket; views cap it with [`Buckets::upcoming_within`].

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::date::{project, Projection};
use crate::query::by_name;
use crate::record::Record;
use crate::roster::Roster;

pub const WEEK_WINDOW_DAYS: i64 = 7;
pub const MONTH_WINDOW_DAYS: i64 = 30;
/// Display cap for the upcoming bucket.
pub const UPCOMING_HORIZON_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Today,
    ThisWeek,
    ThisMonth,
    Upcoming,
    Undated,
}

impl Bucket {
    /// The bucket for an anniversary `days_until` days away.
    pub fn for_days(days_until: i64) -> Bucket {
        match days_until {
            i64::MIN..=0 => Bucket::Today,
            1..=WEEK_WINDOW_DAYS => Bucket::ThisWeek,
            8..=MONTH_WINDOW_DAYS => Bucket::ThisMonth,
            _ => Bucket::Upcoming,
        }
    }
}

/// A dated record together with its next anniversary.
#[derive(Debug, Clone, Serialize)]
pub struct Upcoming<'a> {
    pub record: &'a Record,
    pub projection: Projection,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Buckets<'a> {
    pub today: Vec<Upcoming<'a>>,
    pub this_week: Vec<Upcoming<'a>>,
    pub this_month: Vec<Upcoming<'a>>,
    pub upcoming: Vec<Upcoming<'a>>,
    pub undated: Vec<&'a Record>,
}

impl<'a> Buckets<'a> {
    /// The upcoming bucket cut off at `horizon_days`.
    pub fn upcoming_within(&self, horizon_days: i64) -> &[Upcoming<'a>] {
        let end = self
            .upcoming
            .partition_point(|u| u.projection.days_until <= horizon_days);
        &self.upcoming[..end]
    }

    /// Which bucket holds the record with `id`, if any.
    pub fn bucket_of(&self, id: u32) -> Option<Bucket> {
        let dated = [
            (Bucket::Today, &self.today),
            (Bucket::ThisWeek, &self.this_week),
            (Bucket::ThisMonth, &self.this_month),
            (Bucket::Upcoming, &self.upcoming),
        ];
        dated
            .into_iter()
            .find(|(_, entries)| entries.iter().any(|u| u.record.id == id))
            .map(|(bucket, _)| bucket)
            .or_else(|| {
                self.undated
                    .iter()
                    .any(|r| r.id == id)
                    .then_some(Bucket::Undated)
            })
    }

    /// Dated records with an anniversary within [`MONTH_WINDOW_DAYS`].
    pub fn within_month_count(&self) -> usize {
        self.today.len() + self.this_week.len() + self.this_month.len()
    }

    pub fn len(&self) -> usize {
        self.within_month_count() + self.upcoming.len() + self.undated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bucket every record of `roster` by its next anniversary relative to `now`.
///
/// Dated buckets are ordered by ascending `days_until`, ties by name;
/// undated records are ordered by name.
pub fn classify(roster: &Roster, now: NaiveDateTime) -> Buckets<'_> {
    let today = now.date();
    let mut buckets = Buckets::default();

    for record in roster {
        let Some(projection) = record.wedding_date().and_then(|d| project(d, today)) else {
            buckets.undated.push(record);
            continue;
        };
        let entry = Upcoming { record, projection };
        match Bucket::for_days(projection.days_until) {
            Bucket::Today => buckets.today.push(entry),
            Bucket::ThisWeek => buckets.this_week.push(entry),
            Bucket::ThisMonth => buckets.this_month.push(entry),
            Bucket::Upcoming | Bucket::Undated => buckets.upcoming.push(entry),
        }
    }

    for bucket in [
        &mut buckets.today,
        &mut buckets.this_week,
        &mut buckets.this_month,
        &mut buckets.upcoming,
    ] {
        bucket.sort_by(|a, b| {
            a.projection
                .days_until
                .cmp(&b.projection.days_until)
                .then_with(|| by_name(a.record, b.record))
        });
    }
    buckets.undated.sort_by(|a, b| by_name(a, b));

    buckets
}
