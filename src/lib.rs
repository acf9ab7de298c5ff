// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod availability;
pub mod config;
pub mod dates;
pub mod ledger;
pub mod logging;
pub mod monitor;
pub mod notify;

// ---- Re-exports for stable public API ----
pub use crate::availability::{
    AvailabilityRecord, AvailabilitySource, BookOdishaClient, FetchError,
};
pub use crate::config::{Settings, WatchConfig};
pub use crate::ledger::{AlertKey, AlertLedger, LedgerError};
pub use crate::monitor::{Monitor, RunSummary};
pub use crate::notify::{Notifier, NotifyError, RoomAlert, TelegramNotifier};

use anyhow::Context;
use tracing::info;

/// Wire the production client, Telegram notifier and file ledger from `settings`
/// and perform one full pass. Only setup problems are returned as errors;
/// everything that happens during the pass ends up in the [`RunSummary`].
pub async fn run(settings: Settings) -> anyhow::Result<RunSummary> {
    let source = BookOdishaClient::new(settings.api.clone(), settings.watch.occupancy)
        .context("building availability HTTP client")?;
    if !settings.telegram.is_configured() {
        tracing::warn!("TG_TOKEN / TG_CHAT_ID not set; alerts will be marked in the ledger but not delivered");
    }
    let notifier = TelegramNotifier::new(settings.telegram.clone());
    let ledger = AlertLedger::open(&settings.ledger_path);
    info!(
        endpoint = source.endpoint(),
        ledger = %ledger.path().display(),
        "watch configured"
    );

    let mut monitor = Monitor::new(settings.watch, source, notifier, ledger)
        .with_startup_announcement(settings.announce_startup);
    Ok(monitor.run_once().await)
}
