// src/availability/types.rs
use chrono::NaiveDate;
use thiserror::Error;

/// One room line from the upstream API for a (hotel, check-in date) pair.
///
/// Upstream fields are trusted loosely: anything missing ends up as `None`
/// instead of failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AvailabilityRecord {
    pub hotel_id: String,
    pub date: NaiveDate,
    pub weekday: String,
    pub room_title: Option<String>,
    pub room_id: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<String>,
    /// Raw `booking_status`, kept as-is for logging.
    pub booking_status: Option<serde_json::Value>,
}

impl AvailabilityRecord {
    /// Only the integer 1 means bookable.
    pub fn is_bookable(&self) -> bool {
        is_bookable_flag(self.booking_status.as_ref())
    }
}

/// Numeric one (`1` or `1.0`) or `true`. Strings never count.
pub fn is_bookable_flag(v: Option<&serde_json::Value>) -> bool {
    match v {
        Some(serde_json::Value::Number(n)) => n.as_f64() == Some(1.0),
        Some(serde_json::Value::Bool(b)) => *b,
        _ => false,
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// Connect/timeout/body read failures. Transient; the pair is skipped this run.
    #[error("transport error for hotel {hotel_id} on {date}: {source}")]
    Transport {
        hotel_id: String,
        date: NaiveDate,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream returned HTTP {status} for hotel {hotel_id} on {date}")]
    Status {
        hotel_id: String,
        date: NaiveDate,
        status: u16,
    },

    #[error("malformed response for hotel {hotel_id} on {date}: {reason}")]
    Malformed {
        hotel_id: String,
        date: NaiveDate,
        reason: String,
    },
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        !matches!(self, FetchError::Malformed { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "transport",
            FetchError::Status { .. } => "status",
            FetchError::Malformed { .. } => "malformed",
        }
    }
}

/// Anything that can answer "which rooms exist for this hotel on this night".
#[async_trait::async_trait]
pub trait AvailabilitySource: Send + Sync {
    async fn fetch(
        &self,
        hotel_id: &str,
        checkin: NaiveDate,
    ) -> Result<Vec<AvailabilityRecord>, FetchError>;

    fn name(&self) -> &'static str;
}
