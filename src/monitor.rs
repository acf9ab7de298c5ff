// src/monitor.rs
//! One watch run: hotels × check-in dates → fetch → filter → ledger → notify.
//!
//! Nothing in here is fatal. Fetch, notify and ledger errors are logged,
//! counted in [`RunSummary`] and the loop moves on.

use metrics::{counter, describe_counter, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::availability::{AvailabilityRecord, AvailabilitySource};
use crate::config::WatchConfig;
use crate::ledger::{AlertKey, AlertLedger};
use crate::notify::{startup_message, Notifier, NotifyError, RoomAlert};

/// One-time metrics registration (so series show up once a recorder is installed).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "watch_pairs_checked_total",
            "(hotel, date) pairs queried upstream."
        );
        describe_counter!(
            "watch_fetch_errors_total",
            "Upstream fetch/parse failures."
        );
        describe_counter!(
            "watch_rooms_seen_total",
            "Room records returned by the upstream API."
        );
        describe_counter!(
            "watch_duplicates_skipped_total",
            "Bookable watched rooms already present in the ledger."
        );
        describe_counter!("watch_alerts_sent_total", "Alerts delivered.");
        describe_counter!(
            "watch_notify_errors_total",
            "Alert delivery attempts that failed."
        );
        describe_counter!(
            "watch_ledger_errors_total",
            "Failed appends to the alert ledger."
        );
        describe_histogram!("watch_fetch_ms", "Upstream fetch time in milliseconds.");
    });
}

/// Counters for one run, logged at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub pairs_checked: usize,
    pub fetch_failures: usize,
    pub rooms_seen: usize,
    /// Bookable rooms on a watched date.
    pub candidates: usize,
    pub missing_room_id: usize,
    pub duplicates_skipped: usize,
    pub alerts_sent: usize,
    pub notify_failures: usize,
    /// Alerts not attempted because the notifier has no credentials. Their keys
    /// are still recorded.
    pub notify_skipped: usize,
    pub ledger_failures: usize,
}

impl RunSummary {
    pub fn alerts_attempted(&self) -> usize {
        self.alerts_sent + self.notify_failures
    }
}

pub struct Monitor<S, N> {
    watch: WatchConfig,
    source: S,
    notifier: N,
    ledger: AlertLedger,
    announce_startup: bool,
}

impl<S: AvailabilitySource, N: Notifier> Monitor<S, N> {
    pub fn new(watch: WatchConfig, source: S, notifier: N, ledger: AlertLedger) -> Self {
        Self {
            watch,
            source,
            notifier,
            ledger,
            announce_startup: false,
        }
    }

    pub fn with_startup_announcement(mut self, on: bool) -> Self {
        self.announce_startup = on;
        self
    }

    pub fn ledger(&self) -> &AlertLedger {
        &self.ledger
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Walk every configured (hotel, date) pair once.
    pub async fn run_once(&mut self) -> RunSummary {
        ensure_metrics_described();
        let mut summary = RunSummary::default();

        for d in self.watch.unreachable_watch_dates() {
            tracing::warn!(date = %d, "watched date lies outside the check-in range");
        }

        if self.announce_startup {
            self.announce().await;
        }

        tracing::info!(
            source = self.source.name(),
            hotels = self.watch.hotels.len(),
            dates = self.watch.checkin.len(),
            ledger_keys = self.ledger.len(),
            "==== ECO RETREAT WATCH RUNNING ===="
        );

        let hotels = self.watch.hotels.clone();
        for hotel in &hotels {
            let location = hotel.location_or_unknown();
            tracing::info!(hotel = %hotel.id, location, "--- checking hotel ---");

            for date in self.watch.checkin.iter() {
                summary.pairs_checked += 1;
                counter!("watch_pairs_checked_total").increment(1);

                let rooms = match self.source.fetch(&hotel.id, date).await {
                    Ok(rooms) => rooms,
                    Err(e) => {
                        summary.fetch_failures += 1;
                        counter!("watch_fetch_errors_total", "kind" => e.kind()).increment(1);
                        tracing::warn!(
                            hotel = %hotel.id,
                            date = %date,
                            kind = e.kind(),
                            error = %e,
                            "availability fetch failed; treating as no rooms"
                        );
                        continue;
                    }
                };
                summary.rooms_seen += rooms.len();

                for rec in &rooms {
                    self.consider(location, rec, &mut summary).await;
                }
            }
        }

        gauge!("watch_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
        tracing::info!(
            pairs = summary.pairs_checked,
            fetch_failures = summary.fetch_failures,
            rooms = summary.rooms_seen,
            candidates = summary.candidates,
            duplicates = summary.duplicates_skipped,
            sent = summary.alerts_sent,
            notify_failures = summary.notify_failures,
            notify_skipped = summary.notify_skipped,
            ledger_failures = summary.ledger_failures,
            "==== RUN COMPLETE ===="
        );
        summary
    }

    async fn announce(&self) {
        let mut locations: Vec<&str> = self
            .watch
            .hotels
            .iter()
            .map(|h| h.location_or_unknown())
            .collect();
        locations.sort_unstable();
        locations.dedup();
        match self.notifier.send(&startup_message(&locations)).await {
            Ok(()) => tracing::info!(notifier = self.notifier.name(), "startup message sent"),
            Err(e) => log_notify_error(&e, "startup message not delivered"),
        }
    }

    /// Filter one record and, if it is new, alert and record it.
    async fn consider(&mut self, location: &str, rec: &AvailabilityRecord, summary: &mut RunSummary) {
        if !rec.is_bookable() || !self.watch.is_watched(rec.date) {
            return;
        }
        summary.candidates += 1;

        let Some(room_id) = rec.room_id.as_deref() else {
            summary.missing_room_id += 1;
            tracing::warn!(
                hotel = %rec.hotel_id,
                date = %rec.date,
                room = rec.room_title.as_deref().unwrap_or_default(),
                "bookable room without id; cannot build alert key"
            );
            return;
        };

        let key = AlertKey::new(rec.hotel_id.clone(), rec.date, room_id).to_string();
        if self.ledger.has_alerted(&key) {
            summary.duplicates_skipped += 1;
            counter!("watch_duplicates_skipped_total").increment(1);
            tracing::debug!(%key, "already alerted");
            return;
        }

        let text = RoomAlert::from_record(location, rec).to_html();
        match self.notifier.send(&text).await {
            Ok(()) => {
                summary.alerts_sent += 1;
                counter!("watch_alerts_sent_total").increment(1);
                tracing::info!(%key, notifier = self.notifier.name(), "alert sent");
            }
            Err(e) => {
                log_notify_error(&e, "alert not delivered");
                if e.was_attempted() {
                    summary.notify_failures += 1;
                    counter!("watch_notify_errors_total").increment(1);
                } else {
                    summary.notify_skipped += 1;
                }
            }
        }

        // Recorded whatever the outcome: each key gets one try, ever.
        if let Err(e) = self.ledger.record(&key) {
            summary.ledger_failures += 1;
            counter!("watch_ledger_errors_total").increment(1);
            tracing::error!(%key, error = %e, "could not record alert key");
        }
    }
}

fn log_notify_error(e: &NotifyError, msg: &str) {
    match e {
        NotifyError::NotConfigured(n) => tracing::warn!(notifier = n, "{msg}: {e}"),
        _ => tracing::error!(error = %e, "{msg}"),
    }
}
