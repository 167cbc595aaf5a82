//! Dashboard header counters.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::classify::MONTH_WINDOW_DAYS;
use crate::date::{elapsed_since, project};
use crate::roster::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub total: usize,
    pub dated: usize,
    pub undated: usize,
    /// Mean completed years over dated records, rounded; 0 with no dated records.
    pub average_years: i64,
    /// Dated records whose next anniversary is within 30 days (today included).
    pub upcoming_within_month: usize,
}

pub fn summarize(roster: &Roster, now: NaiveDateTime) -> Summary {
    let today = now.date();
    let mut summary = Summary {
        total: roster.len(),
        ..Summary::default()
    };
    let mut total_years = 0i64;

    for record in roster {
        let Some(wedding) = record.wedding_date() else {
            summary.undated += 1;
            continue;
        };
        summary.dated += 1;
        total_years += elapsed_since(wedding, now).years;
        if project(wedding, today).is_some_and(|p| p.days_until <= MONTH_WINDOW_DAYS) {
            summary.upcoming_within_month += 1;
        }
    }

    if summary.dated > 0 {
        summary.average_years = (total_years as f64 / summary.dated as f64).round() as i64;
    }
    summary
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            concat!(
                "Couples:            {}\n",
                "  with date         {}\n",
                "  without date      {}\n",
                "Average years:      {}\n",
                "Next 30 days:       {}"
            ),
            self.total, self.dated, self.undated, self.average_years, self.upcoming_within_month,
        )
    }
}
