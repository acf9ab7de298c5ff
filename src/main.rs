//! Eco Retreat Watch: one-shot entrypoint.
//! Run it from cron; every invocation walks the configured hotels and dates once
//! and exits 0 unless the settings themselves are broken.

use anyhow::Context;
use eco_retreat_watch::{config::load_settings_default, logging::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env when present so TG_TOKEN / TG_CHAT_ID can live there.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = load_settings_default().context("loading watch settings")?;
    let summary = eco_retreat_watch::run(settings).await?;
    tracing::debug!(?summary, "watch finished");
    Ok(())
}
