//! # wedding-core
//!
//! Deterministic anniversary computation for a small roster of couples.
//!
//! Every view of the dashboard (list, calendar, timeline, upcoming, detail)
//! is a thin formatter over the pure functions here. Nothing reads the
//! system clock except [`ticker::SystemClock`]; callers pass `now`.
//!
//! ## Modules
//!
//! - [`date`] — `DD/MM/YYYY` parsing, elapsed-time breakdowns, next-anniversary projections
//! - [`record`] — One couple entry and its date-consistency rule
//! - [`roster`] — Loading and validating the static roster
//! - [`query`] — Search/month/date-status filtering and sorting
//! - [`classify`] — Today / this week / this month / upcoming / undated buckets
//! - [`calendar`] — Month grid with anniversaries per day
//! - [`timeline`] — Weddings grouped by year
//! - [`stats`] — Dashboard counters
//! - [`ticker`] — Clocks, live counter and the scoped refresh timer
//! - [`locale`] — pt-BR date and countdown formatting
//! - [`error`] — Error types

pub mod calendar;
pub mod classify;
pub mod date;
pub mod error;
pub mod locale;
pub mod query;
pub mod record;
pub mod roster;
pub mod stats;
pub mod ticker;
pub mod timeline;

pub use calendar::{month_view, MonthCursor, MonthView, WeekStartDay};
pub use classify::{classify, Bucket, Buckets, Upcoming};
pub use date::{
    elapsed_breakdown, next_anniversary, parse_date, parse_date_with, Breakdown, ParseMode,
    Projection,
};
pub use error::CalendarError;
pub use query::{filter_and_sort, Criteria, DateStatusFilter, MonthFilter, SortMode};
pub use record::Record;
pub use roster::Roster;
pub use stats::{summarize, Summary};
pub use ticker::{
    parse_anchor, parse_timezone, AnchoredClock, Clock, DetailView, LiveCounter, ManualClock,
    SystemClock, Ticker,
};
pub use timeline::{timeline, Timeline};
