// tests/common/mod.rs
// Local stand-ins for the upstream availability API and the Telegram Bot API.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form, Router,
};
use serde_json::json;

pub const BOT_TOKEN: &str = "T0K";
pub const CHAT_ID: &str = "42";

#[derive(Clone, Default)]
pub struct Captured {
    pub upstream: Arc<Mutex<Vec<(HeaderMap, HashMap<String, String>)>>>,
    pub telegram: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl Captured {
    pub fn messages(&self) -> Vec<String> {
        self.telegram
            .lock()
            .unwrap()
            .iter()
            .filter_map(|f| f.get("text").cloned())
            .collect()
    }
}

/// Hotel 41 has one bookable "Deluxe Tent" on 2025-12-21; every other pair is empty.
async fn hotel_details(
    State(st): State<Captured>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let hotel = form.get("hotelId").cloned().unwrap_or_default();
    let checkin = form.get("checkinDate").cloned().unwrap_or_default();
    st.upstream.lock().unwrap().push((headers, form));

    match (hotel.as_str(), checkin.as_str()) {
        ("41", "2025-12-21") => axum::Json(json!({
            "data": [
                {"title": "Deluxe Tent", "id": 5, "quantity": 2, "price": 3000, "booking_status": 1},
                {"title": "Cottage", "id": 15, "quantity": 0, "price": 4500, "booking_status": 0}
            ]
        }))
        .into_response(),
        ("41", "2025-12-22") => axum::Json(json!({
            "data": [
                {"title": "Deluxe Tent", "id": 5, "quantity": 1, "price": 3000, "booking_status": 1}
            ]
        }))
        .into_response(),
        ("50", _) => (StatusCode::BAD_GATEWAY, "upstream down").into_response(),
        ("51", _) => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        _ => axum::Json(json!({ "data": [] })).into_response(),
    }
}

async fn send_message(
    State(st): State<Captured>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    st.telegram.lock().unwrap().push(form);
    axum::Json(json!({ "ok": true }))
}

pub async fn spawn_fake_services() -> (SocketAddr, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/api/auth/hotel_details", post(hotel_details))
        .route(&format!("/bot{BOT_TOKEN}/sendMessage"), post(send_message))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake services");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake services");
    });
    (addr, captured)
}

pub fn upstream_url(addr: SocketAddr) -> String {
    format!("http://{addr}/api/auth/hotel_details")
}
