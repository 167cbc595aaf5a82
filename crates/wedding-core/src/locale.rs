//! Brazilian Portuguese (pt-BR) date and countdown formatting.
//!
//! This is the only locale the dashboard speaks; the views pass plain
//! `NaiveDate` values here and never build date strings themselves.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::date::Breakdown;

/// Shown wherever a record has no usable wedding date.
pub const PENDING_DATE: &str = "Data pendente";

const MONTH_NAMES: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Month name, lowercase as used inside dates ("janeiro"). `month` is 1-based.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// Month name capitalised for headings ("Janeiro").
pub fn month_title(month: u32) -> String {
    let name = month_name(month);
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// Three-letter column header for calendar grids ("Dom", "Seg", ...).
pub fn weekday_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Seg",
        Weekday::Tue => "Ter",
        Weekday::Wed => "Qua",
        Weekday::Thu => "Qui",
        Weekday::Fri => "Sex",
        Weekday::Sat => "Sáb",
        Weekday::Sun => "Dom",
    }
}

/// "16 de janeiro de 2020"
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{:02} de {} de {}",
        date.day(),
        month_name(date.month()),
        date.year()
    )
}

/// "quinta-feira, 16 de janeiro de 2020"
pub fn format_full_date(date: NaiveDate) -> String {
    format!(
        "{}, {}",
        weekday_name(date.weekday()),
        format_long_date(date)
    )
}

/// "16 de janeiro"
pub fn format_day_month(date: NaiveDate) -> String {
    format!("{:02} de {}", date.day(), month_name(date.month()))
}

/// Countdown badge text for an anniversary `days_until` days away.
pub fn countdown_label(days_until: i64) -> String {
    match days_until {
        0 => "Aniversário hoje!".to_string(),
        1 => "Aniversário amanhã!".to_string(),
        n => format!("Faltam {n} dias"),
    }
}

/// Marriage duration: "1 ano, 2 meses, 3 dias, 04:05:06".
///
/// An unknown breakdown renders as [`PENDING_DATE`], never as a zero duration.
pub fn format_breakdown(b: &Breakdown) -> String {
    if !b.is_known() {
        return PENDING_DATE.to_string();
    }
    format!(
        "{}, {}, {}, {:02}:{:02}:{:02}",
        counted(b.years, "ano", "anos"),
        counted(b.months, "mês", "meses"),
        counted(b.days, "dia", "dias"),
        b.hours,
        b.minutes,
        b.seconds
    )
}

/// "1 ano", "15 anos"
pub fn format_years(n: i64) -> String {
    counted(n, "ano", "anos")
}

fn counted(n: i64, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}
