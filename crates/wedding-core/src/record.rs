//! One couple entry in the roster.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date::parse_date;

/// Image shown when a record carries no photo reference.
pub const DEFAULT_PHOTO: &str = "padrao.jpg";

const PHOTO_DIR: &str = "/photos";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u32,
    pub partner_a: String,
    pub partner_b: String,
    /// `DD/MM/YYYY`, or empty when the date is unknown.
    #[serde(default)]
    pub wedding_date: String,
    #[serde(default)]
    pub has_wedding_date: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Record {
    /// The wedding date, if the record is consistently dated.
    ///
    /// A record counts as dated only when `has_wedding_date` is set AND the
    /// text parses. Any disagreement between the two is read as "no date".
    pub fn wedding_date(&self) -> Option<NaiveDate> {
        if !self.has_wedding_date {
            return None;
        }
        parse_date(&self.wedding_date)
    }

    pub fn is_dated(&self) -> bool {
        self.wedding_date().is_some()
    }

    /// Whether the flag and the date text disagree.
    pub fn is_inconsistent(&self) -> bool {
        self.has_wedding_date != parse_date(&self.wedding_date).is_some()
    }

    pub fn wedding_month(&self) -> Option<u32> {
        self.wedding_date().map(|d| d.month())
    }

    /// "Ana Souza & Bruno Lima"
    pub fn display_name(&self) -> String {
        format!("{} & {}", self.partner_a, self.partner_b)
    }

    /// First names only, as shown in calendar cells: "Ana & Bruno".
    pub fn short_name(&self) -> String {
        format!(
            "{} & {}",
            first_word(&self.partner_a),
            first_word(&self.partner_b)
        )
    }

    /// Avatar fallback: first letter of each partner's name.
    pub fn initials(&self) -> String {
        self.partner_a
            .chars()
            .next()
            .into_iter()
            .chain(self.partner_b.chars().next())
            .collect()
    }

    /// Path of the avatar image, falling back to [`DEFAULT_PHOTO`].
    pub fn photo_path(&self) -> String {
        let photo = self
            .photo
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PHOTO);
        format!("{PHOTO_DIR}/{photo}")
    }

    /// Whether either partner's name contains `needle`, ignoring case.
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.partner_a.to_lowercase().contains(needle)
            || self.partner_b.to_lowercase().contains(needle)
    }
}

fn first_word(s: &str) -> &str {
    s.split_whitespace().next().unwrap_or("")
}
