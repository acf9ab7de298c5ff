// src/config/mod.rs
//! Run settings: built-in watch defaults, an optional TOML override file, and
//! Telegram secrets from the environment.

pub mod watch;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dates::{parse_iso, DateRange};
pub use watch::{Hotel, Occupancy, WatchConfig, UNKNOWN_LOCATION};

pub const ENV_WATCH_CONFIG_PATH: &str = "WATCH_CONFIG_PATH";
pub const DEFAULT_WATCH_CONFIG_PATH: &str = "config/watch.toml";
pub const DEFAULT_LEDGER_PATH: &str = "alert_log.txt";

pub const ENV_TG_TOKEN: &str = "TG_TOKEN";
pub const ENV_TG_CHAT_ID: &str = "TG_CHAT_ID";

/// Upstream availability endpoint and the browser-like headers it expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub url: String,
    pub user_agent: String,
    pub origin: String,
    pub referer: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "https://admin.bookodisha.com/api/auth/hotel_details".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            origin: "https://www.bookodisha.com".to_string(),
            referer: "https://www.bookodisha.com/".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Telegram Bot API credentials. Missing values disable delivery, they never fail startup.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn from_env() -> Self {
        Self {
            token: non_empty_env(ENV_TG_TOKEN),
            chat_id: non_empty_env(ENV_TG_CHAT_ID),
            ..Self::default()
        }
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            chat_id: None,
            api_base: "https://api.telegram.org".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

// Never print the bot token.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token_set", &self.token.is_some())
            .field("chat_id_set", &self.chat_id.is_some())
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub watch: WatchConfig,
    pub ledger_path: PathBuf,
    pub announce_startup: bool,
    pub api: ApiConfig,
    pub telegram: TelegramConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            watch: WatchConfig::default(),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            announce_startup: true,
            api: ApiConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }
}

/// Shape of `config/watch.toml`. Every key is optional; absent keys keep the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct WatchFile {
    hotels: Option<Vec<Hotel>>,
    checkin_start: Option<String>,
    checkin_end: Option<String>,
    watch_dates: Option<Vec<String>>,
    ledger_path: Option<PathBuf>,
    announce_startup: Option<bool>,
}

/// Load settings from an explicit TOML path, then add secrets from the environment.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading watch config from {}", path.display()))?;
    let mut settings = parse_settings(&content)
        .with_context(|| format!("parsing watch config {}", path.display()))?;
    settings.telegram = TelegramConfig::from_env();
    Ok(settings)
}

/// Load settings using env var + fallbacks:
/// 1) $WATCH_CONFIG_PATH
/// 2) config/watch.toml
/// 3) built-in defaults
pub fn load_settings_default() -> Result<Settings> {
    if let Ok(p) = std::env::var(ENV_WATCH_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_settings_from(&pb);
        } else {
            return Err(anyhow!("WATCH_CONFIG_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from(DEFAULT_WATCH_CONFIG_PATH);
    if toml_p.exists() {
        return load_settings_from(&toml_p);
    }
    Ok(Settings {
        telegram: TelegramConfig::from_env(),
        ..Settings::default()
    })
}

fn parse_settings(s: &str) -> Result<Settings> {
    let file: WatchFile = toml::from_str(s)?;
    let mut out = Settings::default();
    let defaults = &out.watch;

    let start = match file.checkin_start.as_deref() {
        Some(v) => parse_date_field("checkin_start", v)?,
        None => defaults.checkin.start,
    };
    let end = match file.checkin_end.as_deref() {
        Some(v) => parse_date_field("checkin_end", v)?,
        None => defaults.checkin.end,
    };
    if start > end {
        bail!("checkin_start {start} is after checkin_end {end}");
    }

    let watch_dates = match file.watch_dates {
        Some(list) => list
            .iter()
            .map(|v| parse_date_field("watch_dates", v))
            .collect::<Result<Vec<_>>>()?,
        None => defaults.watch_dates.iter().copied().collect(),
    };

    let hotels = match file.hotels {
        Some(list) => clean_hotels(list)?,
        None => defaults.hotels.clone(),
    };

    out.watch = WatchConfig::new(hotels, DateRange::new(start, end), watch_dates);
    if let Some(p) = file.ledger_path {
        out.ledger_path = p;
    }
    if let Some(a) = file.announce_startup {
        out.announce_startup = a;
    }
    Ok(out)
}

fn parse_date_field(field: &str, v: &str) -> Result<chrono::NaiveDate> {
    parse_iso(v).ok_or_else(|| anyhow!("{field}: expected YYYY-MM-DD, got {v:?}"))
}

/// Trim ids and locations, drop duplicate ids (first one wins), keep order.
fn clean_hotels(items: Vec<Hotel>) -> Result<Vec<Hotel>> {
    let mut out: Vec<Hotel> = Vec::with_capacity(items.len());
    for h in items {
        let id = h.id.trim();
        if id.is_empty() {
            bail!("hotel entry with empty id");
        }
        if out.iter().any(|x| x.id == id) {
            continue;
        }
        out.push(Hotel::new(id, h.location.trim()));
    }
    Ok(out)
}
