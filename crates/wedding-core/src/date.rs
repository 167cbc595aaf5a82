//! Deterministic date arithmetic for wedding anniversaries.
//!
//! Pure functions only: the caller provides the "now" anchor as a local
//! wall-clock `NaiveDateTime`, so every result is reproducible for a fixed
//! anchor. Nothing here returns an error. A missing or malformed date is
//! reported through `None` or [`Breakdown::UNKNOWN`], and every caller is
//! expected to check for it before display.
//!
//! # Functions
//!
//! - [`parse_date`] — `DD/MM/YYYY` text → calendar date
//! - [`elapsed_breakdown`] — years/months/days/hours/minutes/seconds since a wedding date
//! - [`next_anniversary`] — next occurrence of the wedding month/day and the countdown to it

use std::fmt;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;

const SECONDS_PER_DAY: i64 = 86_400;

// ── parse_date ──────────────────────────────────────────────────────────────

/// How out-of-range day or month components are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ParseMode {
    /// Reject dates that do not exist on the calendar (`31/02/2020`).
    #[default]
    Strict,
    /// Roll excess days and months over into the following period,
    /// so `31/02/2020` becomes 2 March 2020 and `00/03/2020` becomes 29 February.
    Lenient,
}

/// Parse a `DD/MM/YYYY` string using [`ParseMode::Strict`].
///
/// Returns `None` for empty input, anything other than three `/`-separated
/// parts, non-numeric parts, or a date that does not exist.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use wedding_core::date::parse_date;
///
/// assert_eq!(parse_date("16/01/2020"), NaiveDate::from_ymd_opt(2020, 1, 16));
/// assert_eq!(parse_date(""), None);
/// assert_eq!(parse_date("31/02/2020"), None);
/// ```
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    parse_date_with(text, ParseMode::Strict)
}

/// Parse a `DD/MM/YYYY` string with an explicit [`ParseMode`].
pub fn parse_date_with(text: &str, mode: ParseMode) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parts: Vec<&str> = text.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let day = parse_component(parts[0])?;
    let month = parse_component(parts[1])?;
    let year = i32::try_from(parse_component(parts[2])?).ok()?;

    match mode {
        ParseMode::Strict => NaiveDate::from_ymd_opt(
            year,
            u32::try_from(month).ok()?,
            u32::try_from(day).ok()?,
        ),
        ParseMode::Lenient => roll_over(year, month, day),
    }
}

/// A date component: ASCII digits only, surrounding whitespace allowed.
fn parse_component(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Calendar roll-over: month 13 is January of the next year, day 0 is the
/// last day of the previous month.
fn roll_over(year: i32, month: i64, day: i64) -> Option<NaiveDate> {
    let month_index = i64::from(year) * 12 + (month - 1);
    let y = i32::try_from(month_index.div_euclid(12)).ok()?;
    let m = u32::try_from(month_index.rem_euclid(12) + 1).ok()?;
    let first = NaiveDate::from_ymd_opt(y, m, 1)?;
    first.checked_add_signed(TimeDelta::try_days(day - 1)?)
}

// ── elapsed_breakdown ───────────────────────────────────────────────────────

/// Time elapsed since a wedding date, split into calendar and clock units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Breakdown {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    /// Hours into the current day (0-23).
    pub hours: i64,
    /// Minutes component (0-59).
    pub minutes: i64,
    /// Seconds component (0-59).
    pub seconds: i64,
    /// `false` when the record has no usable date; every field is then zero
    /// and must not be presented as a real duration.
    pub known: bool,
}

impl Breakdown {
    /// The breakdown of a record without a usable wedding date.
    pub const UNKNOWN: Breakdown = Breakdown {
        years: 0,
        months: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        known: false,
    };

    pub fn is_known(&self) -> bool {
        self.known
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.known {
            return f.write_str("unknown");
        }
        write!(
            f,
            "{} year{}, {} month{}, {} day{}, {:02}:{:02}:{:02}",
            self.years,
            plural(self.years),
            self.months,
            plural(self.months),
            self.days,
            plural(self.days),
            self.hours,
            self.minutes,
            self.seconds
        )
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Compute the time elapsed between `date_text` (taken at midnight) and `now`.
///
/// Returns [`Breakdown::UNKNOWN`] if `date_text` does not parse.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use wedding_core::date::elapsed_breakdown;
///
/// let now = NaiveDate::from_ymd_opt(2021, 1, 16).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let b = elapsed_breakdown("16/01/2020", now);
/// assert_eq!((b.years, b.months, b.days), (1, 0, 0));
/// ```
pub fn elapsed_breakdown(date_text: &str, now: NaiveDateTime) -> Breakdown {
    match parse_date(date_text) {
        Some(wedding) => elapsed_since(wedding, now),
        None => Breakdown::UNKNOWN,
    }
}

/// Compute the time elapsed since an already-parsed wedding date.
///
/// Years, months and days are calendar-aware: whole months are counted by
/// stepping the wedding date forward one month at a time (a short month
/// clamps to its last day), and the days are what remains after the last
/// whole month. Hours, minutes and seconds come from the raw difference
/// modulo one day. A wedding date after `now` yields a known zero duration.
pub fn elapsed_since(wedding: NaiveDate, now: NaiveDateTime) -> Breakdown {
    let start = wedding.and_time(NaiveTime::MIN);
    if now < start {
        return Breakdown {
            known: true,
            ..Breakdown::default()
        };
    }

    let today = now.date();
    let mut whole_months = i64::from(today.year() - wedding.year()) * 12
        + i64::from(today.month())
        - i64::from(wedding.month());

    let Some(mut anchor) = add_months(wedding, whole_months) else {
        return Breakdown::UNKNOWN;
    };
    if anchor > today {
        whole_months -= 1;
        let Some(previous) = add_months(wedding, whole_months) else {
            return Breakdown::UNKNOWN;
        };
        anchor = previous;
    }

    let sub_day = (now - start).num_seconds().rem_euclid(SECONDS_PER_DAY);

    Breakdown {
        years: whole_months / 12,
        months: whole_months % 12,
        days: (today - anchor).num_days(),
        hours: sub_day / 3600,
        minutes: (sub_day % 3600) / 60,
        seconds: sub_day % 60,
        known: true,
    }
}

fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(u32::try_from(months).ok()?))
}

// ── next_anniversary ────────────────────────────────────────────────────────

/// The next occurrence of a wedding anniversary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Projection {
    /// The anniversary date (this year or next).
    pub next_date: NaiveDate,
    /// Whole days until `next_date`; 0 means today.
    pub days_until: i64,
    /// Which anniversary `next_date` is (1 for the first).
    pub years_completing: i32,
}

/// Project the next anniversary of `date_text` relative to `now`.
///
/// The candidate is the wedding month/day in `now`'s year; if that day is
/// already past (compared by calendar day, so today counts as upcoming) it
/// moves to the following year. Returns `None` if `date_text` does not parse.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use wedding_core::date::next_anniversary;
///
/// let now = NaiveDate::from_ymd_opt(2021, 1, 17).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let p = next_anniversary("16/01/2020", now).unwrap();
/// assert_eq!(p.days_until, 364);
/// assert_eq!(p.years_completing, 2);
/// ```
pub fn next_anniversary(date_text: &str, now: NaiveDateTime) -> Option<Projection> {
    let wedding = parse_date(date_text)?;
    project(wedding, now.date())
}

/// Project the next anniversary of an already-parsed wedding date.
pub fn project(wedding: NaiveDate, today: NaiveDate) -> Option<Projection> {
    let mut candidate = anniversary_in(wedding, today.year())?;
    if candidate < today {
        candidate = anniversary_in(wedding, today.year() + 1)?;
    }

    Some(Projection {
        next_date: candidate,
        days_until: (candidate - today).num_days(),
        years_completing: candidate.year() - wedding.year(),
    })
}

/// The wedding month/day in `year`. A 29 February wedding is observed on
/// 1 March in common years.
pub fn anniversary_in(wedding: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, wedding.month(), wedding.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

// ── Tests ───────────────────────────────────────────────────────────────────
