//! The static, read-only roster of couples.
//!
//! Records are loaded once and never mutated. Ids must be unique; they are
//! the only join key the views use.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{CalendarError, Result};
use crate::record::Record;

const BUILTIN_ROSTER: &str = include_str!("../data/roster.json");

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Roster {
    records: Vec<Record>,
}

impl Roster {
    /// Build a roster, rejecting duplicate ids.
    ///
    /// Records whose `has_wedding_date` flag disagrees with their date text
    /// are kept (and treated as undated everywhere) but logged.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(CalendarError::DuplicateId(record.id));
            }
            if record.is_inconsistent() {
                warn!(
                    id = record.id,
                    wedding_date = %record.wedding_date,
                    has_wedding_date = record.has_wedding_date,
                    "record date flag disagrees with date text; treating as undated"
                );
            }
        }

        let roster = Self { records };
        info!(
            records = roster.len(),
            dated = roster.dated_count(),
            "roster loaded"
        );
        Ok(roster)
    }

    /// Parse a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<Record> = serde_json::from_str(json)
            .map_err(|e| CalendarError::InvalidRoster(e.to_string()))?;
        Self::from_records(records)
    }

    /// Read a JSON roster file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CalendarError::InvalidRoster(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// The roster compiled into the library.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_ROSTER)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dated_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_dated()).count()
    }

    pub fn get(&self, id: u32) -> Result<&Record> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or(CalendarError::RecordNotFound(id))
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_roster_loads() {
        let roster = Roster::builtin().unwrap();
        assert!(!roster.is_empty());
        assert!(roster.dated_count() > 0);
        assert!(roster.dated_count() < roster.len());
        assert!(roster.iter().all(|r| !r.is_inconsistent()));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let json = r#"[
            {"id": 1, "partner_a": "A", "partner_b": "B"},
            {"id": 1, "partner_a": "C", "partner_b": "D"}
        ]"#;
        let err = Roster::from_json(json).unwrap_err();
        assert!(matches!(err, CalendarError::DuplicateId(1)), "got: {err}");
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = Roster::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("Invalid roster"), "got: {err}");
    }

    #[test]
    fn test_inconsistent_record_kept_as_undated() {
        let json = r#"[
            {"id": 1, "partner_a": "A", "partner_b": "B", "wedding_date": "99/99/2020", "has_wedding_date": true}
        ]"#;
        let roster = Roster::from_json(json).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.dated_count(), 0);
    }

    #[test]
    fn test_get_by_id() {
        let roster = Roster::builtin().unwrap();
        let first = &roster.records()[0];
        assert_eq!(roster.get(first.id).unwrap(), first);
        assert!(matches!(
            roster.get(9999),
            Err(CalendarError::RecordNotFound(9999))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Roster::load(Path::new("/nonexistent/roster.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/roster.json"), "got: {err}");
    }
}
