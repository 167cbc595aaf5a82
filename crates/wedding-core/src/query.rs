//! Filtering and ordering of the roster for the list and calendar views.
//!
//! The presentation layer owns a single immutable [`Criteria`] value and
//! re-derives its view by calling [`filter_and_sort`] whenever that value
//! changes. Nothing here mutates the roster.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::CalendarError;
use crate::record::Record;
use crate::roster::Roster;

// ── Criteria ────────────────────────────────────────────────────────────────

/// Ordering applied to dated records. Undated records always come last,
/// ordered by name, whatever the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Most recent wedding first.
    #[default]
    Newest,
    /// Oldest wedding first.
    Oldest,
    /// Alphabetical by the first partner's name.
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthFilter {
    #[default]
    All,
    /// Only records married in this month (1-12). Drops undated records.
    Month(u32),
}

impl MonthFilter {
    pub fn month(month: u32) -> Result<Self, CalendarError> {
        if (1..=12).contains(&month) {
            Ok(MonthFilter::Month(month))
        } else {
            Err(CalendarError::InvalidCriteria(format!(
                "month must be between 1 and 12, got {month}"
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateStatusFilter {
    #[default]
    All,
    WithDate,
    WithoutDate,
}

/// Everything the user can select in the filter bar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Criteria {
    /// Case-insensitive substring matched against either partner's name.
    pub search_text: String,
    pub sort_mode: SortMode,
    pub month_filter: MonthFilter,
    pub date_status: DateStatusFilter,
}

impl Criteria {
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_sort(mut self, mode: SortMode) -> Self {
        self.sort_mode = mode;
        self
    }

    pub fn with_month(mut self, filter: MonthFilter) -> Self {
        self.month_filter = filter;
        self
    }

    pub fn with_date_status(mut self, filter: DateStatusFilter) -> Self {
        self.date_status = filter;
        self
    }
}

// ── filter_and_sort ─────────────────────────────────────────────────────────

/// Apply text, month and date-status filters in that order, then sort.
///
/// Dated records always precede undated ones. Dated records are ordered by
/// `sort_mode`; undated records by name. Remaining ties fall back to the
/// second partner's name and then the id, so the output order is fully
/// determined by the roster and the criteria.
///
/// # Examples
///
/// ```
/// use wedding_core::query::{filter_and_sort, Criteria, SortMode};
/// use wedding_core::roster::Roster;
///
/// let roster = Roster::from_json(r#"[
///     {"id": 1, "partner_a": "A", "partner_b": "x", "wedding_date": "01/01/2020", "has_wedding_date": true},
///     {"id": 2, "partner_a": "B", "partner_b": "y", "wedding_date": "01/01/2021", "has_wedding_date": true},
///     {"id": 3, "partner_a": "C", "partner_b": "z"}
/// ]"#).unwrap();
///
/// let ids: Vec<u32> = filter_and_sort(&roster, &Criteria::default().with_sort(SortMode::Newest))
///     .iter()
///     .map(|r| r.id)
///     .collect();
/// assert_eq!(ids, vec![2, 1, 3]);
/// ```
pub fn filter_and_sort<'a>(roster: &'a Roster, criteria: &Criteria) -> Vec<&'a Record> {
    let needle = criteria.search_text.trim().to_lowercase();

    let mut selected: Vec<(&Record, Option<NaiveDate>)> = roster
        .iter()
        .filter(|r| needle.is_empty() || r.matches_lowercase(&needle))
        .map(|r| (r, r.wedding_date()))
        .filter(|(_, date)| match criteria.month_filter {
            MonthFilter::All => true,
            MonthFilter::Month(m) => date.is_some_and(|d| d.month() == m),
        })
        .filter(|(_, date)| match criteria.date_status {
            DateStatusFilter::All => true,
            DateStatusFilter::WithDate => date.is_some(),
            DateStatusFilter::WithoutDate => date.is_none(),
        })
        .collect();

    selected.sort_by(|(a, da), (b, db)| compare(a, *da, b, *db, criteria.sort_mode));
    selected.into_iter().map(|(r, _)| r).collect()
}

fn compare(
    a: &Record,
    da: Option<NaiveDate>,
    b: &Record,
    db: Option<NaiveDate>,
    mode: SortMode,
) -> Ordering {
    match (da, db) {
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => by_name(a, b),
        (Some(da), Some(db)) => {
            let primary = match mode {
                SortMode::Newest => db.cmp(&da),
                SortMode::Oldest => da.cmp(&db),
                SortMode::Name => Ordering::Equal,
            };
            primary.then_with(|| by_name(a, b))
        }
    }
}

/// Name order used everywhere a list is alphabetical.
pub(crate) fn by_name(a: &Record, b: &Record) -> Ordering {
    compare_text(&a.partner_a, &b.partner_a)
        .then_with(|| compare_text(&a.partner_b, &b.partner_b))
        .then_with(|| a.id.cmp(&b.id))
}

/// Case-insensitive first, then exact, so the order is total.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// ── Parsing & display ───────────────────────────────────────────────────────

impl FromStr for SortMode {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            "name" => Ok(SortMode::Name),
            other => Err(CalendarError::InvalidCriteria(format!(
                "unknown sort mode '{other}' (expected newest, oldest or name)"
            ))),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::Name => "name",
        })
    }
}

impl FromStr for MonthFilter {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }
        let month: u32 = s.parse().map_err(|_| {
            CalendarError::InvalidCriteria(format!("month must be 'all' or 1-12, got '{s}'"))
        })?;
        MonthFilter::month(month)
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Month(m) => write!(f, "{m}"),
        }
    }
}

impl FromStr for DateStatusFilter {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DateStatusFilter::All),
            "with-date" | "with_date" | "withdate" => Ok(DateStatusFilter::WithDate),
            "without-date" | "without_date" | "withoutdate" => Ok(DateStatusFilter::WithoutDate),
            other => Err(CalendarError::InvalidCriteria(format!(
                "unknown date status '{other}' (expected all, with-date or without-date)"
            ))),
        }
    }
}

impl fmt::Display for DateStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateStatusFilter::All => "all",
            DateStatusFilter::WithDate => "with-date",
            DateStatusFilter::WithoutDate => "without-date",
        })
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::from_json(
            r#"[
            {"id": 1, "partner_a": "Ana Souza", "partner_b": "Bruno Souza", "wedding_date": "16/01/2020", "has_wedding_date": true},
            {"id": 2, "partner_a": "carla Dias", "partner_b": "Diego Dias", "wedding_date": "05/03/2021", "has_wedding_date": true},
            {"id": 3, "partner_a": "Zilda Reis", "partner_b": "Mauro Reis"},
            {"id": 4, "partner_a": "Beatriz Lima", "partner_b": "Caio Lima", "wedding_date": "20/01/2015", "has_wedding_date": true},
            {"id": 5, "partner_a": "Elisa Prado", "partner_b": "Fábio Prado"},
            {"id": 6, "partner_a": "Gil Matos", "partner_b": "Hana Matos", "wedding_date": "30/02/2020", "has_wedding_date": true}
        ]"#,
        )
        .unwrap()
    }

    fn ids(records: &[&Record]) -> Vec<u32> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_scenario_newest_dated_first() {
        let roster = Roster::from_json(
            r#"[
            {"id": 1, "partner_a": "A", "partner_b": "a", "wedding_date": "10/05/2020", "has_wedding_date": true},
            {"id": 2, "partner_a": "B", "partner_b": "b", "wedding_date": "10/05/2021", "has_wedding_date": true},
            {"id": 3, "partner_a": "C", "partner_b": "c"}
        ]"#,
        )
        .unwrap();
        let out = filter_and_sort(&roster, &Criteria::default().with_sort(SortMode::Newest));
        assert_eq!(ids(&out), vec![2, 1, 3]);
    }

    #[test]
    fn test_default_criteria_keeps_everything() {
        let roster = roster();
        let out = filter_and_sort(&roster, &Criteria::default());
        assert_eq!(out.len(), roster.len());
        // newest first, then undated by name (invalid date on 6 counts as undated)
        assert_eq!(ids(&out), vec![2, 1, 4, 5, 6, 3]);
    }

    #[test]
    fn test_oldest_sort() {
        let roster = roster();
        let out = filter_and_sort(&roster, &Criteria::default().with_sort(SortMode::Oldest));
        assert_eq!(ids(&out), vec![4, 1, 2, 5, 6, 3]);
    }

    #[test]
    fn test_name_sort_is_case_insensitive() {
        let roster = roster();
        let out = filter_and_sort(&roster, &Criteria::default().with_sort(SortMode::Name));
        // "Ana", "Beatriz", "carla" among dated; undated still last
        assert_eq!(ids(&out), vec![1, 4, 2, 5, 6, 3]);
    }

    #[test]
    fn test_search_matches_either_partner() {
        let roster = roster();
        let out = filter_and_sort(&roster, &Criteria::default().with_search("DIEGO"));
        assert_eq!(ids(&out), vec![2]);

        let out = filter_and_sort(&roster, &Criteria::default().with_search("souza"));
        assert_eq!(ids(&out), vec![1]);
    }

    #[test]
    fn test_search_is_substring() {
        let roster = roster();
        let out = filter_and_sort(&roster, &Criteria::default().with_search("uz"));
        assert_eq!(ids(&out), vec![1]);

        let out = filter_and_sort(&roster, &Criteria::default().with_search("  matos "));
        assert_eq!(ids(&out), vec![6]);
    }

    #[test]
    fn test_empty_result_is_valid() {
        let roster = roster();
        let out = filter_and_sort(&roster, &Criteria::default().with_search("nobody"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_month_filter_drops_undated() {
        let roster = roster();
        let out = filter_and_sort(
            &roster,
            &Criteria::default().with_month(MonthFilter::Month(1)),
        );
        assert_eq!(ids(&out), vec![1, 4]);
    }

    #[test]
    fn test_date_status_filters() {
        let roster = roster();
        let with = filter_and_sort(
            &roster,
            &Criteria::default().with_date_status(DateStatusFilter::WithDate),
        );
        assert_eq!(ids(&with), vec![2, 1, 4]);

        let without = filter_and_sort(
            &roster,
            &Criteria::default().with_date_status(DateStatusFilter::WithoutDate),
        );
        assert_eq!(ids(&without), vec![5, 6, 3]);
    }

    #[test]
    fn test_filters_compose() {
        let roster = roster();
        let criteria = Criteria::default()
            .with_search("a")
            .with_month(MonthFilter::Month(3))
            .with_date_status(DateStatusFilter::WithDate);
        assert_eq!(ids(&filter_and_sort(&roster, &criteria)), vec![2]);
    }

    #[test]
    fn test_idempotent() {
        let roster = roster();
        let criteria = Criteria::default().with_sort(SortMode::Name);
        assert_eq!(
            ids(&filter_and_sort(&roster, &criteria)),
            ids(&filter_and_sort(&roster, &criteria))
        );
    }

    #[test]
    fn test_parse_sort_mode() {
        assert_eq!("Newest".parse::<SortMode>().unwrap(), SortMode::Newest);
        assert_eq!("name".parse::<SortMode>().unwrap(), SortMode::Name);
        assert!("random".parse::<SortMode>().is_err());
    }

    #[test]
    fn test_parse_month_filter() {
        assert_eq!("all".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!("12".parse::<MonthFilter>().unwrap(), MonthFilter::Month(12));
        assert!("0".parse::<MonthFilter>().is_err());
        assert!("13".parse::<MonthFilter>().is_err());
        assert!("june".parse::<MonthFilter>().is_err());
    }

    #[test]
    fn test_parse_date_status() {
        assert_eq!(
            "with-date".parse::<DateStatusFilter>().unwrap(),
            DateStatusFilter::WithDate
        );
        assert_eq!(
            "without_date".parse::<DateStatusFilter>().unwrap(),
            DateStatusFilter::WithoutDate
        );
        let err = "maybe".parse::<DateStatusFilter>().unwrap_err();
        assert!(err.to_string().contains("Invalid criteria"), "got: {err}");
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for mode in [SortMode::Newest, SortMode::Oldest, SortMode::Name] {
            assert_eq!(mode.to_string().parse::<SortMode>().unwrap(), mode);
        }
        assert_eq!(MonthFilter::Month(7).to_string(), "7");
        assert_eq!(DateStatusFilter::WithoutDate.to_string(), "without-date");
    }
}
