// src/notify/mod.rs
pub mod telegram;

use thiserror::Error;

use crate::availability::AvailabilityRecord;
use crate::dates::format_iso;

pub use telegram::TelegramNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    /// Credentials absent: nothing was sent and nothing was attempted.
    #[error("notifier {0} is not configured")]
    NotConfigured(&'static str),

    #[error("notification request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notification endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl NotifyError {
    /// Whether a delivery attempt actually went out on the wire.
    pub fn was_attempted(&self) -> bool {
        !matches!(self, NotifyError::NotConfigured(_))
    }
}

/// Delivery channel for preformatted HTML messages.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
    fn name(&self) -> &'static str;
}

/// Everything an availability alert shows to the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomAlert {
    pub location: String,
    pub hotel_id: String,
    pub date: String,
    pub weekday: String,
    pub room_title: String,
    pub price: String,
    pub quantity: String,
}

const MISSING: &str = "n/a";

impl RoomAlert {
    pub fn from_record(location: &str, rec: &AvailabilityRecord) -> Self {
        let or_missing = |v: &Option<String>| v.clone().unwrap_or_else(|| MISSING.to_string());
        Self {
            location: location.to_string(),
            hotel_id: rec.hotel_id.clone(),
            date: format_iso(rec.date),
            weekday: rec.weekday.clone(),
            room_title: or_missing(&rec.room_title),
            price: or_missing(&rec.price),
            quantity: or_missing(&rec.quantity),
        }
    }

    /// Telegram HTML body. Free text from config or upstream is escaped.
    pub fn to_html(&self) -> String {
        let esc = |s: &str| html_escape::encode_text(s).to_string();
        format!(
            "🏨 <b>ROOM AVAILABLE</b>\n\
             📍 <b>Location:</b> {}\n\
             🏷 Hotel ID: {}\n\
             📅 {} ({})\n\
             🛏 {}\n\
             💰 ₹{}\n\
             📦 Qty: {}",
            esc(&self.location),
            esc(&self.hotel_id),
            self.date,
            self.weekday,
            esc(&self.room_title),
            esc(&self.price),
            esc(&self.quantity),
        )
    }
}

/// One-off "monitor is running" message listing the watched locations.
pub fn startup_message(locations: &[&str]) -> String {
    let list = if locations.is_empty() {
        "no hotels".to_string()
    } else {
        join_human(locations)
    };
    format!(
        "✅ <b>Eco Retreat Monitor is ACTIVE</b>\nMonitoring {}.",
        html_escape::encode_text(&list)
    )
}

/// "A", "A and B", "A, B and C"
fn join_human(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
