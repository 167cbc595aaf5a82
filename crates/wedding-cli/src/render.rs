//! Text and JSON output for each dashboard view.

use std::io::Write;

use anyhow::Result;
use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use wedding_core::classify::{Upcoming, MONTH_WINDOW_DAYS};
use wedding_core::date::{elapsed_since, project};
use wedding_core::locale::{
    countdown_label, format_breakdown, format_day_month, format_full_date, format_long_date,
    format_years, month_title, weekday_abbrev, PENDING_DATE,
};
use wedding_core::timeline::TimelineEntry;
use wedding_core::{Breakdown, Buckets, MonthView, Projection, Record, Timeline};

pub const NO_MATCHES: &str = "Nenhum casal encontrado com os filtros aplicados.";

/// One record as emitted by `list --json` and `show --json`.
#[derive(Debug, Serialize)]
pub struct Item<'a> {
    #[serde(flatten)]
    pub record: &'a Record,
    pub photo_path: String,
    pub initials: String,
    pub breakdown: Breakdown,
    pub next_anniversary: Option<Projection>,
}

pub fn detail_item(record: &Record, now: NaiveDateTime) -> Item<'_> {
    let wedding = record.wedding_date();
    Item {
        record,
        photo_path: record.photo_path(),
        initials: record.initials(),
        breakdown: wedding.map_or(Breakdown::UNKNOWN, |w| elapsed_since(w, now)),
        next_anniversary: wedding.and_then(|w| project(w, now.date())),
    }
}

pub fn list_items<'a>(records: &[&'a Record], now: NaiveDateTime) -> Vec<Item<'a>> {
    records.iter().map(|&r| detail_item(r, now)).collect()
}

pub fn json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn couples(n: usize) -> String {
    if n == 1 {
        "1 casal".to_string()
    } else {
        format!("{n} casais")
    }
}

// ── list ────────────────────────────────────────────────────────────────────

pub fn list<W: Write>(out: &mut W, records: &[&Record], now: NaiveDateTime) -> Result<()> {
    if records.is_empty() {
        writeln!(out, "{NO_MATCHES}")?;
        return Ok(());
    }

    for record in records {
        writeln!(out, "#{:<3} {}", record.id, record.display_name())?;
        let item = detail_item(record, now);
        match (record.wedding_date(), item.next_anniversary) {
            (Some(wedding), Some(next)) => {
                writeln!(
                    out,
                    "     Casados em {} · {}",
                    format_long_date(wedding),
                    format_breakdown(&item.breakdown)
                )?;
                let completing = format!(
                    "completa {} em {}",
                    format_years(next.years_completing.into()),
                    format_day_month(next.next_date)
                );
                if next.days_until <= MONTH_WINDOW_DAYS {
                    writeln!(
                        out,
                        "     {} · {completing}",
                        countdown_label(next.days_until)
                    )?;
                } else {
                    writeln!(out, "     {completing}")?;
                }
            }
            _ => writeln!(out, "     {PENDING_DATE}")?,
        }
    }
    writeln!(out, "\n{}", couples(records.len()))?;
    Ok(())
}

// ── upcoming ────────────────────────────────────────────────────────────────

fn upcoming_section<W: Write>(out: &mut W, title: &str, rows: &[Upcoming<'_>]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    writeln!(out, "{title}")?;
    for row in rows {
        let p = &row.projection;
        writeln!(
            out,
            "  {:02}/{:02}  {}  completa {} · {}",
            p.next_date.day(),
            p.next_date.month(),
            row.record.display_name(),
            format_years(p.years_completing.into()),
            countdown_label(p.days_until)
        )?;
    }
    Ok(())
}

pub fn upcoming<W: Write>(out: &mut W, buckets: &Buckets<'_>, horizon: i64) -> Result<()> {
    if buckets.is_empty() {
        writeln!(out, "{NO_MATCHES}")?;
        return Ok(());
    }

    upcoming_section(out, "Hoje", &buckets.today)?;
    upcoming_section(out, "Esta semana", &buckets.this_week)?;
    upcoming_section(out, "Próximos 30 dias", &buckets.this_month)?;
    upcoming_section(
        out,
        &format!("Próximos {horizon} dias"),
        buckets.upcoming_within(horizon),
    )?;

    if !buckets.undated.is_empty() {
        writeln!(out, "{PENDING_DATE}")?;
        for record in &buckets.undated {
            writeln!(out, "  {}", record.display_name())?;
        }
    }
    Ok(())
}

// ── calendar ────────────────────────────────────────────────────────────────

pub fn calendar<W: Write>(out: &mut W, view: &MonthView<'_>) -> Result<()> {
    writeln!(
        out,
        "{} {}",
        month_title(view.cursor.month),
        view.cursor.year
    )?;

    let header: Vec<String> = view
        .week_start
        .columns()
        .iter()
        .map(|&w| format!("{:>4}", weekday_abbrev(w)))
        .collect();
    writeln!(out, "{}", header.join(" "))?;

    for week in view.weeks() {
        let row: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                None => "    ".to_string(),
                Some(cell) => {
                    let mark = match (cell.is_today, cell.entries.is_empty()) {
                        (true, _) => '<',
                        (false, false) => '*',
                        (false, true) => ' ',
                    };
                    format!("{:>3}{mark}", cell.date.day())
                }
            })
            .collect();
        writeln!(out, "{}", row.join(" ").trim_end())?;
    }

    if view.anniversary_count() == 0 {
        writeln!(out, "\nNenhum aniversário neste mês.")?;
        return Ok(());
    }

    writeln!(out)?;
    for cell in view.days.iter().filter(|c| !c.entries.is_empty()) {
        for entry in &cell.entries {
            writeln!(
                out,
                "  {:02}  {} ({}º)",
                cell.date.day(),
                entry.short_name,
                entry.ordinal
            )?;
        }
    }
    Ok(())
}

// ── timeline ────────────────────────────────────────────────────────────────

fn timeline_row<W: Write>(out: &mut W, entry: &TimelineEntry<'_>) -> Result<()> {
    writeln!(
        out,
        "  {:02}/{:02}  {}  ({})",
        entry.wedding_date.day(),
        entry.wedding_date.month(),
        entry.record.display_name(),
        format_years(entry.years_married)
    )?;
    Ok(())
}

pub fn timeline<W: Write>(out: &mut W, timeline: &Timeline<'_>) -> Result<()> {
    if timeline.years.is_empty() && timeline.undated.is_empty() {
        writeln!(out, "{NO_MATCHES}")?;
        return Ok(());
    }

    for group in &timeline.years {
        writeln!(out, "{}", group.year)?;
        for entry in &group.entries {
            timeline_row(out, entry)?;
        }
    }
    if !timeline.undated.is_empty() {
        writeln!(out, "{PENDING_DATE}")?;
        for record in &timeline.undated {
            writeln!(out, "  {}", record.display_name())?;
        }
    }
    Ok(())
}

// ── show ────────────────────────────────────────────────────────────────────

pub fn detail<W: Write>(out: &mut W, record: &Record, now: NaiveDateTime) -> Result<()> {
    let item = detail_item(record, now);
    writeln!(out, "{} [{}]", record.display_name(), item.initials)?;
    writeln!(out, "Foto: {}", item.photo_path)?;

    match (record.wedding_date(), item.next_anniversary) {
        (Some(wedding), Some(next)) => {
            writeln!(out, "Casados em: {}", format_full_date(wedding))?;
            writeln!(
                out,
                "Tempo de casados: {}",
                format_breakdown(&item.breakdown)
            )?;
            writeln!(
                out,
                "Próximo aniversário: {} ({}), completa {}",
                format_long_date(next.next_date),
                countdown_label(next.days_until),
                format_years(next.years_completing.into())
            )?;
        }
        _ => {
            writeln!(out, "Casados em: {PENDING_DATE}")?;
            writeln!(
                out,
                "Tempo de casados: {}",
                format_breakdown(&item.breakdown)
            )?;
        }
    }
    Ok(())
}

/// One live counter update.
pub fn counter_line(reading: &Breakdown) -> String {
    format!("  {}", format_breakdown(reading))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wedding_core::Roster;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn render_with<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_list_empty_prints_no_matches() {
        let text = render_with(|out| list(out, &[], now()));
        assert_eq!(text.trim(), NO_MATCHES);
    }

    #[test]
    fn test_detail_of_dated_record() {
        let roster = Roster::builtin().unwrap();
        let record = roster.get(1).unwrap();
        let text = render_with(|out| detail(out, record, now()));
        assert!(text.contains("Casados em: quinta-feira, 16 de janeiro de 2020"));
        assert!(text.contains("Faltam 6 dias"));
        assert!(text.contains("completa 1 ano"));
        assert!(text.contains("Foto: /photos/ana-bruno.jpg"));
    }

    #[test]
    fn test_detail_of_undated_record() {
        let roster = Roster::builtin().unwrap();
        let record = roster.get(2).unwrap();
        let text = render_with(|out| detail(out, record, now()));
        assert!(text.contains(PENDING_DATE));
        assert!(text.contains("Tempo de casados: Data pendente"));
        assert!(text.contains("/photos/padrao.jpg"));
    }

    #[test]
    fn test_item_json_flattens_record() {
        let roster = Roster::builtin().unwrap();
        let item = detail_item(roster.get(1).unwrap(), now());
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["next_anniversary"]["days_until"], 6);
        assert_eq!(value["breakdown"]["known"], true);
    }

    #[test]
    fn test_detail_duration_is_portuguese() {
        let roster = Roster::builtin().unwrap();
        let record = roster.get(1).unwrap();
        let text = render_with(|out| detail(out, record, now()));
        assert!(text.contains("Tempo de casados: 0 anos, 11 meses, 25 dias, 08:00:00"));
        assert!(!text.contains("years"));
    }

    #[test]
    fn test_counter_line_is_portuguese() {
        let roster = Roster::builtin().unwrap();
        let item = detail_item(roster.get(1).unwrap(), now());
        assert_eq!(
            counter_line(&item.breakdown),
            "  0 anos, 11 meses, 25 dias, 08:00:00"
        );
        assert_eq!(counter_line(&Breakdown::UNKNOWN), "  Data pendente");
    }

    #[test]
    fn test_list_badge_only_within_month_window() {
        let roster = Roster::builtin().unwrap();
        // 6 days away and 148 days away
        let records = vec![roster.get(1).unwrap(), roster.get(5).unwrap()];
        let text = render_with(|out| list(out, &records, now()));
        assert!(text.contains("Faltam 6 dias · completa 1 ano em 16 de janeiro"));
        assert!(text.contains("     completa 6 anos em 07 de junho"));
        assert!(!text.contains("Faltam 148 dias"));
        assert!(text.contains("2 casais"));
    }

    #[test]
    fn test_couples_label() {
        assert_eq!(couples(1), "1 casal");
        assert_eq!(couples(12), "12 casais");
    }
}
