//! `wedding` — terminal dashboard for the wedding anniversary roster.
//!
//! Subcommands:
//!
//! - `list` — filtered and sorted roster with durations and countdowns
//! - `upcoming` — anniversaries bucketed by how soon they fall
//! - `calendar` — month grid of anniversaries
//! - `timeline` — weddings grouped by year
//! - `show <ID>` — detail view, optionally with a live counter
//! - `stats` — dashboard counters

mod render;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wedding_core::classify::UPCOMING_HORIZON_DAYS;
use wedding_core::ticker::DEFAULT_TICK_INTERVAL;
use wedding_core::{
    classify, filter_and_sort, month_view, parse_anchor, parse_timezone, summarize, timeline,
    AnchoredClock, Clock, Criteria, DateStatusFilter, DetailView, MonthCursor, MonthFilter,
    Record, Roster, SortMode, SystemClock, WeekStartDay,
};

#[derive(Parser)]
#[command(
    name = "wedding",
    version,
    about = "Wedding anniversary dashboard: list, calendar, timeline and countdowns"
)]
struct Cli {
    /// JSON roster file (defaults to the built-in roster)
    #[arg(long, env = "WEDDING_ROSTER", global = true)]
    roster: Option<PathBuf>,

    /// IANA timezone used to read the system clock
    #[arg(
        long,
        env = "WEDDING_TZ",
        default_value = "America/Sao_Paulo",
        global = true
    )]
    timezone: String,

    /// Fixed "now" (RFC 3339, YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD) instead of the system clock
    #[arg(long, global = true)]
    now: Option<String>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone)]
struct FilterArgs {
    /// Case-insensitive substring of either partner's name
    #[arg(short, long, default_value = "")]
    search: String,

    /// Sort order for dated couples: newest, oldest or name
    #[arg(long, default_value_t = SortMode::Newest)]
    sort: SortMode,

    /// Wedding month (1-12) or "all"
    #[arg(long, default_value_t = MonthFilter::All)]
    month: MonthFilter,

    /// all, with-date or without-date
    #[arg(long, default_value_t = DateStatusFilter::All)]
    status: DateStatusFilter,
}

impl FilterArgs {
    fn criteria(&self) -> Criteria {
        Criteria::default()
            .with_search(self.search.clone())
            .with_sort(self.sort)
            .with_month(self.month)
            .with_date_status(self.status)
    }
}

#[derive(Subcommand)]
enum Command {
    /// List couples matching the filters
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Anniversaries today, this week, within 30 days and later
    Upcoming {
        /// Days ahead shown in the "upcoming" section
        #[arg(long, default_value_t = UPCOMING_HORIZON_DAYS)]
        horizon: i64,
    },
    /// Month grid of anniversaries
    Calendar {
        /// Year to show (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month to show, 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,

        /// First column of the grid: sunday or monday
        #[arg(long, default_value = "sunday")]
        week_start: WeekStartDay,

        /// Case-insensitive substring of either partner's name
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Weddings grouped by year
    Timeline,
    /// Details of one couple
    Show {
        /// Record id
        id: u32,

        /// Keep the marriage counter running
        #[arg(long)]
        live: bool,

        /// Number of live updates before closing
        #[arg(long, default_value_t = 5)]
        ticks: u64,

        /// Milliseconds between live updates
        #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL.as_millis() as u64)]
        interval_ms: u64,
    },
    /// Dashboard counters
    Stats,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let tz = parse_timezone(&cli.timezone)?;
    let roster = load_roster(cli.roster.as_ref())?;
    let now = resolve_now(cli.now.as_deref(), tz)?;
    debug!(%now, timezone = %tz, "resolved anchor");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::List { filters } => {
            let criteria = filters.criteria();
            info!(?criteria, "listing roster");
            let records = filter_and_sort(&roster, &criteria);
            if cli.json {
                render::json(&mut out, &render::list_items(&records, now))?;
            } else {
                render::list(&mut out, &records, now)?;
            }
        }
        Command::Upcoming { horizon } => {
            let buckets = classify(&roster, now);
            if cli.json {
                render::json(&mut out, &buckets)?;
            } else {
                render::upcoming(&mut out, &buckets, horizon)?;
            }
        }
        Command::Calendar {
            year,
            month,
            week_start,
            search,
        } => {
            let current = MonthCursor::containing(now.date());
            let cursor = MonthCursor::new(
                year.unwrap_or(current.year),
                month.unwrap_or(current.month),
            )?;
            let criteria = Criteria::default()
                .with_search(search)
                .with_date_status(DateStatusFilter::WithDate);
            let records = filter_and_sort(&roster, &criteria);
            let view = month_view(&records, cursor, week_start, now.date());
            if cli.json {
                render::json(&mut out, &view)?;
            } else {
                render::calendar(&mut out, &view)?;
            }
        }
        Command::Timeline => {
            let timeline = timeline(&roster, now);
            if cli.json {
                render::json(&mut out, &timeline)?;
            } else {
                render::timeline(&mut out, &timeline)?;
            }
        }
        Command::Show {
            id,
            live,
            ticks,
            interval_ms,
        } => {
            let record = roster.get(id)?;
            if cli.json {
                render::json(&mut out, &render::detail_item(record, now))?;
            } else {
                render::detail(&mut out, record, now)?;
            }
            if live && record.is_dated() {
                let clock: Arc<dyn Clock> = if cli.now.is_some() {
                    Arc::new(AnchoredClock::new(now))
                } else {
                    Arc::new(SystemClock::new(tz))
                };
                run_live(&mut out, record, clock, ticks, interval_ms)?;
            }
        }
        Command::Stats => {
            let summary = summarize(&roster, now);
            if cli.json {
                render::json(&mut out, &summary)?;
            } else {
                writeln!(out, "{summary}")?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn load_roster(path: Option<&PathBuf>) -> Result<Roster> {
    match path {
        Some(path) => Roster::load(path)
            .with_context(|| format!("failed to load roster from {}", path.display())),
        None => Roster::builtin().context("built-in roster is invalid"),
    }
}

fn resolve_now(anchor: Option<&str>, tz: Tz) -> Result<NaiveDateTime> {
    match anchor {
        Some(text) => Ok(parse_anchor(text, tz)?),
        None => Ok(SystemClock::new(tz).now()),
    }
}

/// Print `ticks` live counter readings, then close the detail view.
fn run_live<W: Write>(
    out: &mut W,
    record: &Record,
    clock: Arc<dyn Clock>,
    ticks: u64,
    interval_ms: u64,
) -> Result<()> {
    let interval = Duration::from_millis(interval_ms.max(1));
    let wait = live_wait(interval);
    let (tx, rx) = mpsc::channel();
    let view = DetailView::open(record, clock, interval, move |reading| {
        // The receiver is gone once the view is being closed.
        let _ = tx.send(reading);
    });

    for _ in 0..ticks {
        match rx.recv_timeout(wait) {
            Ok(reading) => {
                writeln!(out, "{}", render::counter_line(&reading))?;
                out.flush()?;
            }
            Err(_) => break,
        }
    }

    view.close();
    Ok(())
}

/// How long to wait for one reading before giving up on the live view.
fn live_wait(interval: Duration) -> Duration {
    interval
        .max(Duration::from_millis(200))
        .checked_mul(5)
        .unwrap_or(Duration::MAX)
}
