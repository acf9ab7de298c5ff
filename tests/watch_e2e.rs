// tests/watch_e2e.rs
mod common;

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use eco_retreat_watch::config::{ApiConfig, Hotel, Settings, TelegramConfig, WatchConfig};
use eco_retreat_watch::dates::DateRange;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, day).unwrap()
}

fn settings(
    addr: std::net::SocketAddr,
    ledger: &Path,
    hotels: Vec<Hotel>,
    watch: &[NaiveDate],
) -> Settings {
    Settings {
        watch: WatchConfig::new(hotels, DateRange::new(d(20), d(22)), watch.iter().copied()),
        ledger_path: ledger.to_path_buf(),
        announce_startup: false,
        api: ApiConfig {
            url: common::upstream_url(addr),
            timeout: Duration::from_secs(5),
            ..ApiConfig::default()
        },
        telegram: TelegramConfig {
            token: Some(common::BOT_TOKEN.into()),
            chat_id: Some(common::CHAT_ID.into()),
            api_base: format!("http://{addr}"),
            timeout: Duration::from_secs(5),
        },
    }
}

#[tokio::test]
async fn first_availability_alerts_once_and_rerun_is_silent() {
    let (addr, captured) = common::spawn_fake_services().await;
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("alert_log.txt");
    let hotels = vec![Hotel::new("41", "Satkosia")];

    let summary = eco_retreat_watch::run(settings(addr, &ledger, hotels.clone(), &[d(21)]))
        .await
        .expect("run completes");
    assert_eq!(summary.pairs_checked, 3);
    assert_eq!(summary.alerts_sent, 1);
    assert_eq!(summary.fetch_failures, 0);

    let msgs = captured.messages();
    assert_eq!(msgs.len(), 1);
    let msg = &msgs[0];
    assert!(msg.contains("Deluxe Tent"), "{msg}");
    assert!(msg.contains("3000"), "{msg}");
    assert!(msg.contains("2025-12-21 (Sunday)"), "{msg}");
    assert!(msg.contains("Satkosia"), "{msg}");
    {
        let tg = captured.telegram.lock().unwrap();
        assert_eq!(tg[0]["chat_id"], common::CHAT_ID);
        assert_eq!(tg[0]["parse_mode"], "HTML");
    }
    assert_eq!(fs::read_to_string(&ledger).unwrap(), "41-2025-12-21-5\n");

    // Second run over the same ledger: nothing new to say
    let again = eco_retreat_watch::run(settings(addr, &ledger, hotels, &[d(21)]))
        .await
        .expect("second run completes");
    assert_eq!(again.alerts_sent, 0);
    assert_eq!(again.duplicates_skipped, 1);
    assert_eq!(captured.messages().len(), 1);
    assert_eq!(fs::read_to_string(&ledger).unwrap(), "41-2025-12-21-5\n");
}

#[tokio::test]
async fn unwatched_dates_and_unbookable_rooms_never_alert() {
    let (addr, captured) = common::spawn_fake_services().await;
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("alert_log.txt");

    // 2025-12-21 and 12-22 both have a bookable room, but only 12-20 is watched
    let summary = eco_retreat_watch::run(settings(
        addr,
        &ledger,
        vec![Hotel::new("41", "Satkosia")],
        &[d(20)],
    ))
    .await
    .unwrap();
    assert_eq!(summary.rooms_seen, 3);
    assert_eq!(summary.candidates, 0);
    assert!(captured.messages().is_empty());
    assert!(!ledger.exists());
}

#[tokio::test]
async fn failing_hotels_do_not_stop_the_run() {
    let (addr, captured) = common::spawn_fake_services().await;
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("alert_log.txt");

    let hotels = vec![
        Hotel::new("50", "Broken"),
        Hotel::new("51", "Maintenance"),
        Hotel::new("41", "Satkosia"),
    ];
    let summary = eco_retreat_watch::run(settings(addr, &ledger, hotels, &[d(21), d(22)]))
        .await
        .unwrap();

    assert_eq!(summary.pairs_checked, 9);
    assert_eq!(summary.fetch_failures, 6);
    assert_eq!(summary.alerts_sent, 2);
    assert_eq!(captured.messages().len(), 2);
    assert_eq!(
        fs::read_to_string(&ledger).unwrap(),
        "41-2025-12-21-5\n41-2025-12-22-5\n"
    );
}

#[tokio::test]
async fn missing_credentials_still_mark_alerted() {
    let (addr, captured) = common::spawn_fake_services().await;
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("alert_log.txt");

    let mut s = settings(addr, &ledger, vec![Hotel::new("41", "Satkosia")], &[d(21)]);
    s.telegram.token = None;
    s.announce_startup = true;
    let summary = eco_retreat_watch::run(s).await.unwrap();

    assert_eq!(summary.notify_skipped, 1);
    assert_eq!(summary.alerts_attempted(), 0);
    assert!(captured.messages().is_empty());
    assert_eq!(fs::read_to_string(&ledger).unwrap(), "41-2025-12-21-5\n");
}

#[tokio::test]
async fn startup_announcement_lists_locations() {
    let (addr, captured) = common::spawn_fake_services().await;
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("alert_log.txt");

    let mut s = settings(
        addr,
        &ledger,
        vec![Hotel::new("37", "Konark"), Hotel::new("43", "")],
        &[d(21)],
    );
    s.announce_startup = true;
    eco_retreat_watch::run(s).await.unwrap();

    let msgs = captured.messages();
    assert_eq!(msgs.len(), 1);
    assert!(msgs[0].contains("Eco Retreat Monitor is ACTIVE"));
    assert!(msgs[0].contains("Monitoring Konark and Unknown."));
}
