// src/availability/client.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use metrics::{counter, histogram};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::availability::types::{AvailabilityRecord, AvailabilitySource, FetchError};
use crate::config::{ApiConfig, Occupancy};
use crate::dates::{checkout_for, format_iso, weekday_name};

const REQUEST_TYPE: &str = "check_room_availability";
const REQUESTED_ROOM: &str = "all";

#[derive(Debug, Default, Deserialize)]
struct RoomEntry {
    title: Option<String>,
    id: Option<serde_json::Value>,
    quantity: Option<serde_json::Value>,
    price: Option<serde_json::Value>,
    booking_status: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct RoomRequest {
    adult: u8,
    child: u8,
}

/// `roomRequest` form field: a JSON array literal, e.g. `[{"adult":2,"child":0}]`.
pub fn room_request_json(occ: Occupancy) -> String {
    let rooms = [RoomRequest {
        adult: occ.adult,
        child: occ.child,
    }];
    serde_json::to_string(&rooms).unwrap_or_else(|_| "[]".to_string())
}

/// Form body for one availability query.
pub fn build_form(
    hotel_id: &str,
    checkin: NaiveDate,
    occ: Occupancy,
) -> Vec<(&'static str, String)> {
    let checkout = checkout_for(checkin).unwrap_or(checkin);
    vec![
        ("request_type", REQUEST_TYPE.to_string()),
        ("requested_room", REQUESTED_ROOM.to_string()),
        ("hotelId", hotel_id.to_string()),
        ("roomRequest", room_request_json(occ)),
        ("checkinDate", format_iso(checkin)),
        ("checkoutDate", format_iso(checkout)),
    ]
}

/// Render scalar JSON as display text: `5` → "5", `"Deluxe"` → "Deluxe".
/// Null and nested values yield `None`.
fn scalar_to_string(v: Option<&serde_json::Value>) -> Option<String> {
    match v? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse an upstream response body into records.
///
/// - non-JSON body or non-object top level → `Malformed`
/// - missing `data` (or `null`) → empty list
/// - `data` present but not an array → `Malformed`
/// - individual room fields missing → `None` on the record
pub fn parse_rooms(
    hotel_id: &str,
    checkin: NaiveDate,
    body: &str,
) -> Result<Vec<AvailabilityRecord>, FetchError> {
    let malformed = |reason: String| FetchError::Malformed {
        hotel_id: hotel_id.to_string(),
        date: checkin,
        reason,
    };

    let v: serde_json::Value =
        serde_json::from_str(body.trim()).map_err(|e| malformed(format!("not JSON: {e}")))?;
    let obj = v
        .as_object()
        .ok_or_else(|| malformed("top level is not an object".to_string()))?;

    let rooms: Vec<serde_json::Value> = match obj.get("data") {
        None | Some(serde_json::Value::Null) => return Ok(Vec::new()),
        Some(serde_json::Value::Array(a)) => a.clone(),
        Some(other) => return Err(malformed(format!("`data` is not an array: {other}"))),
    };

    let weekday = weekday_name(checkin);
    let mut out = Vec::with_capacity(rooms.len());
    for raw in rooms {
        // A non-object room degrades to an all-None record
        let room: RoomEntry = serde_json::from_value(raw).unwrap_or_default();
        out.push(AvailabilityRecord {
            hotel_id: hotel_id.to_string(),
            date: checkin,
            weekday: weekday.clone(),
            room_title: room.title,
            room_id: scalar_to_string(room.id.as_ref()),
            quantity: scalar_to_string(room.quantity.as_ref()),
            price: scalar_to_string(room.price.as_ref()),
            booking_status: room.booking_status,
        });
    }
    Ok(out)
}

/// HTTP client for the Book Odisha `hotel_details` endpoint.
#[derive(Clone)]
pub struct BookOdishaClient {
    client: Client,
    cfg: ApiConfig,
    occupancy: Occupancy,
}

impl BookOdishaClient {
    pub fn new(cfg: ApiConfig, occupancy: Occupancy) -> reqwest::Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Ok(v) = header::HeaderValue::from_str(&cfg.origin) {
            headers.insert(header::ORIGIN, v);
        }
        if let Ok(v) = header::HeaderValue::from_str(&cfg.referer) {
            headers.insert(header::REFERER, v);
        }
        let client = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .default_headers(headers)
            .timeout(cfg.timeout)
            .build()?;
        Ok(Self {
            client,
            cfg,
            occupancy,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.cfg.url
    }
}

#[async_trait]
impl AvailabilitySource for BookOdishaClient {
    async fn fetch(
        &self,
        hotel_id: &str,
        checkin: NaiveDate,
    ) -> Result<Vec<AvailabilityRecord>, FetchError> {
        let t0 = std::time::Instant::now();
        let transport = |source: reqwest::Error| FetchError::Transport {
            hotel_id: hotel_id.to_string(),
            date: checkin,
            source,
        };

        let form = build_form(hotel_id, checkin, self.occupancy);
        let resp = self
            .client
            .post(&self.cfg.url)
            .form(&form)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                hotel_id: hotel_id.to_string(),
                date: checkin,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(transport)?;
        let records = parse_rooms(hotel_id, checkin, &body)?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("watch_fetch_ms").record(ms);
        counter!("watch_rooms_seen_total").increment(records.len() as u64);
        tracing::debug!(
            hotel = hotel_id,
            date = %checkin,
            rooms = records.len(),
            elapsed_ms = ms,
            "availability fetched"
        );
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "bookodisha"
    }
}
