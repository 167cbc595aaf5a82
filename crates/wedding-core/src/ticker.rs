//! Live marriage-duration counter for the detail view.
//!
//! The counter itself is a pure read of a [`Clock`]; the only background
//! work is a [`Ticker`] thread that re-reads it on a fixed interval. A
//! ticker is owned by the [`DetailView`] that started it and is stopped and
//! joined when the view is closed or dropped, so no tick outlives the view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::date::{elapsed_since, Breakdown};
use crate::error::{CalendarError, Result};
use crate::record::Record;

/// Nominal refresh rate of the on-screen counter.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

// ── Clocks ──────────────────────────────────────────────────────────────────

/// Source of the local wall-clock "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// The system clock seen from an IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        parse_timezone(name).map(Self::new)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}

/// Starts at a fixed anchor and advances with real elapsed time.
#[derive(Debug, Clone, Copy)]
pub struct AnchoredClock {
    anchor: NaiveDateTime,
    started: Instant,
}

impl AnchoredClock {
    pub fn new(anchor: NaiveDateTime) -> Self {
        Self {
            anchor,
            started: Instant::now(),
        }
    }
}

impl Clock for AnchoredClock {
    fn now(&self) -> NaiveDateTime {
        let elapsed = TimeDelta::from_std(self.started.elapsed()).unwrap_or(TimeDelta::zero());
        self.anchor + elapsed
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| CalendarError::InvalidTimezone(format!("'{}'", s)))
}

/// Parse a fixed "now" anchor as local wall-clock time in `tz`.
///
/// Accepts RFC 3339 (converted into `tz`), a naive `YYYY-MM-DDTHH:MM:SS`
/// taken as already local, or a bare `YYYY-MM-DD` meaning local midnight.
pub fn parse_anchor(s: &str, tz: Tz) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&tz).naive_local());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|e| CalendarError::InvalidDatetime(format!("'{}': {}", s, e)))
}

// ── LiveCounter ─────────────────────────────────────────────────────────────

/// A record's wedding date bound to a clock.
#[derive(Debug)]
pub struct LiveCounter<C> {
    wedding: Option<NaiveDate>,
    clock: C,
}

impl<C: Clock> LiveCounter<C> {
    pub fn new(record: &Record, clock: C) -> Self {
        Self {
            wedding: record.wedding_date(),
            clock,
        }
    }

    /// Whether there is anything to count; undated records show "unknown".
    pub fn is_live(&self) -> bool {
        self.wedding.is_some()
    }

    pub fn reading(&self) -> Breakdown {
        match self.wedding {
            Some(wedding) => elapsed_since(wedding, self.clock.now()),
            None => Breakdown::UNKNOWN,
        }
    }
}

// ── Ticker ──────────────────────────────────────────────────────────────────

/// A scoped fixed-interval timer running a callback on its own thread.
///
/// Stopped by [`Ticker::cancel`] or by dropping it; either way the thread
/// is joined before control returns, so the callback never runs afterwards.
#[derive(Debug)]
pub struct Ticker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
}

impl Ticker {
    pub fn start<F>(interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);

        debug!(?interval, "ticker started");
        let handle = thread::spawn(move || loop {
            match stopped.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    on_tick();
                    counter.fetch_add(1, Ordering::Relaxed);
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        Self {
            stop: Some(stop),
            handle: Some(handle),
            ticks,
        }
    }

    /// Number of callbacks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            // The thread may already be gone; a failed send is fine.
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("ticker callback panicked");
            }
            debug!(ticks = self.ticks(), "ticker stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ── DetailView ──────────────────────────────────────────────────────────────

/// The open detail view of one record: a live counter plus the ticker
/// keeping it fresh. Closing or dropping the view cancels the ticker.
#[derive(Debug)]
pub struct DetailView<C> {
    record_id: u32,
    counter: Arc<LiveCounter<C>>,
    ticker: Option<Ticker>,
}

impl<C: Clock + 'static> DetailView<C> {
    /// Open the view. A ticker calling `render` every `interval` is started
    /// only for dated records.
    pub fn open<F>(record: &Record, clock: C, interval: Duration, mut render: F) -> Self
    where
        F: FnMut(Breakdown) + Send + 'static,
    {
        let counter = Arc::new(LiveCounter::new(record, clock));
        let ticker = counter.is_live().then(|| {
            let counter = Arc::clone(&counter);
            Ticker::start(interval, move || render(counter.reading()))
        });
        debug!(id = record.id, live = ticker.is_some(), "detail view opened");

        Self {
            record_id: record.id,
            counter,
            ticker,
        }
    }

    pub fn record_id(&self) -> u32 {
        self.record_id
    }

    pub fn reading(&self) -> Breakdown {
        self.counter.reading()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(Ticker::is_running)
    }

    pub fn ticks(&self) -> u64 {
        self.ticker.as_ref().map_or(0, Ticker::ticks)
    }

    pub fn close(mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
        debug!(id = self.record_id, "detail view closed");
    }
}
