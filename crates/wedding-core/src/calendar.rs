//! Month grid for the calendar view.
//!
//! A [`MonthCursor`] names the month on screen; [`month_view`] lays it out
//! as week rows with the anniversaries falling on each day.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::date::anniversary_in;
use crate::error::{CalendarError, Result};
use crate::query::by_name;
use crate::record::Record;

/// Which day begins a week row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WeekStartDay {
    /// Brazilian wall-calendar convention.
    #[default]
    Sunday,
    /// ISO 8601.
    Monday,
}

impl WeekStartDay {
    /// How many days `weekday` is from the week-start day.
    pub fn offset(self, weekday: Weekday) -> u32 {
        match self {
            WeekStartDay::Sunday => weekday.num_days_from_sunday(),
            WeekStartDay::Monday => weekday.num_days_from_monday(),
        }
    }

    /// The seven weekdays in column order.
    pub fn columns(self) -> [Weekday; 7] {
        let first = match self {
            WeekStartDay::Sunday => Weekday::Sun,
            WeekStartDay::Monday => Weekday::Mon,
        };
        let mut days = [first; 7];
        for i in 1..7 {
            days[i] = days[i - 1].succ();
        }
        days
    }
}

impl std::str::FromStr for WeekStartDay {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStartDay::Sunday),
            "monday" | "mon" => Ok(WeekStartDay::Monday),
            other => Err(CalendarError::InvalidCriteria(format!(
                "unknown week start '{other}' (expected sunday or monday)"
            ))),
        }
    }
}

// ── MonthCursor ─────────────────────────────────────────────────────────────

/// The month currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MonthCursor {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidCriteria(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| CalendarError::InvalidCriteria(format!("year out of range: {year}")))?;
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                month: self.month + 1,
                ..self
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                month: self.month - 1,
                ..self
            }
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn days_in_month(self) -> u32 {
        match (self.first_day(), self.next().first_day()) {
            (Some(first), Some(next)) => (next - first).num_days() as u32,
            _ => 0,
        }
    }
}

// ── month_view ──────────────────────────────────────────────────────────────

/// An anniversary shown inside a day cell.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEntry<'a> {
    pub record: &'a Record,
    /// "Ana & Bruno"
    pub short_name: String,
    /// Anniversary number reached in the shown year (`year − wedding year`).
    pub ordinal: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    pub is_today: bool,
    pub entries: Vec<CalendarEntry<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView<'a> {
    pub cursor: MonthCursor,
    pub week_start: WeekStartDay,
    /// Empty cells before day 1 in the first week row.
    pub leading_blanks: u32,
    pub days: Vec<DayCell<'a>>,
}

impl<'a> MonthView<'a> {
    /// Days as week rows; `None` pads the first and last rows.
    pub fn weeks(&self) -> Vec<[Option<&DayCell<'a>>; 7]> {
        let mut cells: Vec<Option<&DayCell<'a>>> = Vec::new();
        cells.extend((0..self.leading_blanks).map(|_| None));
        cells.extend(self.days.iter().map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells
            .chunks(7)
            .map(|row| {
                let mut week = [None; 7];
                week.copy_from_slice(row);
                week
            })
            .collect()
    }

    pub fn anniversary_count(&self) -> usize {
        self.days.iter().map(|d| d.entries.len()).sum()
    }
}

/// Lay out `cursor`'s month, placing each dated record on the day its
/// anniversary falls in that year.
///
/// Takes the already filtered record sequence so the calendar honours the
/// same criteria as the list view.
pub fn month_view<'a>(
    records: &[&'a Record],
    cursor: MonthCursor,
    week_start: WeekStartDay,
    today: NaiveDate,
) -> MonthView<'a> {
    let leading_blanks = cursor
        .first_day()
        .map(|first| week_start.offset(first.weekday()))
        .unwrap_or(0);

    let mut days: Vec<DayCell<'a>> = (1..=cursor.days_in_month())
        .filter_map(|day| NaiveDate::from_ymd_opt(cursor.year, cursor.month, day))
        .map(|date| DayCell {
            date,
            is_today: date == today,
            entries: Vec::new(),
        })
        .collect();

    for &record in records {
        let Some(wedding) = record.wedding_date() else {
            continue;
        };
        let Some(date) = anniversary_in(wedding, cursor.year) else {
            continue;
        };
        if date.month() != cursor.month {
            continue;
        }
        let ordinal = cursor.year - wedding.year();
        // No anniversary before the first one.
        if ordinal < 1 {
            continue;
        }
        if let Some(cell) = days.get_mut(date.day0() as usize) {
            cell.entries.push(CalendarEntry {
                record,
                short_name: record.short_name(),
                ordinal,
            });
        }
    }

    for cell in &mut days {
        cell.entries.sort_by(|a, b| by_name(a.record, b.record));
    }

    MonthView {
        cursor,
        week_start,
        leading_blanks,
        days,
    }
}
