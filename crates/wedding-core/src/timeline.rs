//! Year-by-year timeline of weddings.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::date::elapsed_since;
use crate::query::by_name;
use crate::record::Record;
use crate::roster::Roster;

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry<'a> {
    pub record: &'a Record,
    pub wedding_date: NaiveDate,
    /// Completed years of marriage at `now`.
    pub years_married: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearGroup<'a> {
    pub year: i32,
    pub entries: Vec<TimelineEntry<'a>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Timeline<'a> {
    /// Ascending by year; entries ascending by date within a year.
    pub years: Vec<YearGroup<'a>>,
    /// Records without a usable date, by name.
    pub undated: Vec<&'a Record>,
}

pub fn timeline(roster: &Roster, now: NaiveDateTime) -> Timeline<'_> {
    let mut dated: Vec<TimelineEntry<'_>> = Vec::new();
    let mut undated: Vec<&Record> = Vec::new();

    for record in roster {
        match record.wedding_date() {
            Some(wedding_date) => dated.push(TimelineEntry {
                record,
                wedding_date,
                years_married: elapsed_since(wedding_date, now).years,
            }),
            None => undated.push(record),
        }
    }

    dated.sort_by(|a, b| {
        a.wedding_date
            .cmp(&b.wedding_date)
            .then_with(|| by_name(a.record, b.record))
    });
    undated.sort_by(|a, b| by_name(a, b));

    let mut years: Vec<YearGroup<'_>> = Vec::new();
    for entry in dated {
        let year = entry.wedding_date.year();
        match years.last_mut() {
            Some(group) if group.year == year => group.entries.push(entry),
            _ => years.push(YearGroup {
                year,
                entries: vec![entry],
            }),
        }
    }

    Timeline { years, undated }
}
