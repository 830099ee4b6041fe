//! Chat command polling and the `/status` report.

use gardengate::app::commands::{ChatMessage, CommandPoller};
use gardengate::app::ports::ClimateReading;
use gardengate::error::CommsError;

use crate::mock_hw::{node, scheduler, snapshot};

fn msg(update_id: i64, text: &str) -> ChatMessage {
    ChatMessage {
        update_id,
        text: Some(text.into()),
    }
}

#[test]
fn cursor_advances_past_every_update() {
    let mut io = node();
    io.chat
        .inbox
        .push_back(Ok(vec![msg(5, "/status"), msg(7, "hello")]));
    let mut poller = CommandPoller::new(100.0);
    let mut cursor = 0;

    let replies = poller.poll(&mut cursor, None, &mut io);
    assert_eq!(replies, 1);
    assert_eq!(cursor, 7);

    poller.poll(&mut cursor, None, &mut io);
    assert_eq!(io.chat.offsets, vec![1, 8]);
}

#[test]
fn unrecognized_text_gets_no_reply() {
    let mut io = node();
    io.chat.inbox.push_back(Ok(vec![
        msg(3, "hello"),
        ChatMessage {
            update_id: 4,
            text: None,
        },
    ]));
    let mut cursor = 0;

    let replies = CommandPoller::new(100.0).poll(&mut cursor, None, &mut io);

    assert_eq!(replies, 0);
    assert_eq!(cursor, 4);
    assert!(io.chat.sent.is_empty());
}

#[test]
fn stale_updates_are_skipped() {
    let mut io = node();
    io.chat
        .inbox
        .push_back(Ok(vec![msg(6, "/status"), msg(8, "/status")]));
    let mut cursor = 7;

    let replies = CommandPoller::new(100.0).poll(&mut cursor, None, &mut io);

    assert_eq!(replies, 1);
    assert_eq!(cursor, 8);
}

#[test]
fn poll_failure_leaves_cursor_alone() {
    let mut io = node();
    io.chat.inbox.push_back(Err(CommsError::Timeout));
    let mut cursor = 12;

    assert_eq!(CommandPoller::new(100.0).poll(&mut cursor, None, &mut io), 0);
    assert_eq!(cursor, 12);
}

#[test]
fn status_report_combines_all_sources() {
    let mut io = node();
    io.sensors.distance_cm = Some(25.0);
    io.sensors.climate = Some(ClimateReading {
        temperature_c: 22.4,
        humidity_pct: 40.0,
    });
    io.chat.inbox.push_back(Ok(vec![msg(1, "/status@garden_bot")]));
    let weather = snapshot(27.0, 55.0);
    let mut cursor = 0;

    CommandPoller::new(100.0).poll(&mut cursor, Some(&weather), &mut io);

    let report = &io.chat.sent[0];
    assert!(report.starts_with("GARDEN STATUS"));
    assert!(report.contains("Location: Rabat"));
    assert!(report.contains("Conditions: Sunny"));
    assert!(report.contains("Temperature: 22.4\u{00b0}C"));
    assert!(report.contains("Water level: 75%"));
    assert!(!report.contains("N/A"));
}

#[test]
fn ranger_timeout_reports_water_na() {
    let mut io = node();
    io.sensors.distance_cm = None;
    io.chat.inbox.push_back(Ok(vec![msg(1, "/status")]));
    let mut cursor = 0;

    CommandPoller::new(100.0).poll(&mut cursor, None, &mut io);

    assert!(io.chat.sent[0].contains("Water level: N/A"));
}

#[test]
fn idle_screen_shows_water_na_on_ranger_timeout() {
    let io = node();
    let mut sched = scheduler(io);

    sched.tick();

    assert!(sched.io().display.shown("Sensors...", "Water: N/A"));
}

#[test]
fn full_tank_is_a_reading_not_absence() {
    let mut io = node();
    io.sensors.distance_cm = Some(0.0);
    let mut sched = scheduler(io);

    sched.tick();

    assert!(sched.io().display.shown("Sensors...", "Water: 100%"));
}
