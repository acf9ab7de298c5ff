//! Sends one sample room alert through Telegram to check TG_TOKEN / TG_CHAT_ID.

use eco_retreat_watch::{
    dates::weekday_name, logging::init_tracing, AvailabilityRecord, Notifier, RoomAlert,
    TelegramNotifier,
};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    let notifier = TelegramNotifier::from_env();
    let date = chrono::Local::now().date_naive();
    let sample = AvailabilityRecord {
        hotel_id: "0".into(),
        date,
        weekday: weekday_name(date),
        room_title: Some("Probe room (test message)".into()),
        room_id: Some("0".into()),
        quantity: Some("1".into()),
        price: Some("0".into()),
        booking_status: Some(serde_json::json!(1)),
    };
    let text = RoomAlert::from_record("Probe", &sample).to_html();

    match notifier.send(&text).await {
        Ok(()) => println!("notify-probe: delivered"),
        Err(e) => println!("notify-probe: {e}"),
    }
}
