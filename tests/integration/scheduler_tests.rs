//! Startup sequence, gate timing and priority order of the main loop.

use gardengate::app::events::AppEvent;
use gardengate::app::ports::ServoChannel;

use crate::mock_hw::{ActuatorCall, node, scheduler, snapshot, verdict};

#[test]
fn startup_parks_outputs_and_announces() {
    let mut io = node();
    io.network.connected = false;
    let mut sched = scheduler(io);

    sched.start();

    let io = sched.io();
    assert_eq!(io.network.connect_attempts, 1);
    assert_eq!(io.display.screens[0], ("Connecting WiFi".to_owned(), String::new()));
    assert!(io.display.shown("WiFi OK!", "10.0.0.7"));
    assert_eq!(
        io.actuators.calls,
        vec![
            ActuatorCall::Servo { channel: ServoChannel::Door, angle: 0 },
            ActuatorCall::Servo { channel: ServoChannel::Valve, angle: 0 },
            ActuatorCall::AllOff,
        ]
    );
    assert_eq!(io.chat.sent, vec!["Garden system started successfully!".to_owned()]);
    assert_eq!(io.display.last(), Some(&("System Ready".to_owned(), "Running".to_owned())));
    assert_eq!(io.events.events.last(), Some(&AppEvent::Started));
}

#[test]
fn startup_without_link_still_reaches_the_loop() {
    let mut io = node();
    io.network.connected = false;
    io.network.connect_ok = false;
    let mut sched = scheduler(io);

    sched.start();

    let io = sched.io();
    assert!(io.display.shown("WiFi Error!", ""));
    assert!(io.chat.sent.is_empty());
    assert_eq!(io.events.events.last(), Some(&AppEvent::Started));
}

#[test]
fn gates_open_on_first_tick_then_wait_for_their_interval() {
    let mut sched = scheduler(node());

    sched.tick();
    assert_eq!(sched.io().chat.offsets.len(), 1);
    assert_eq!(sched.io().weather.fetches, 1);
    let refreshes = sched.io().display.screens.len();
    assert_eq!(refreshes, 1);

    sched.tick();
    assert_eq!(sched.io().chat.offsets.len(), 1);
    assert_eq!(sched.io().weather.fetches, 1);
    assert_eq!(sched.io().display.screens.len(), refreshes);

    sched.io().clock.advance_ms(5_001);
    sched.tick();
    assert_eq!(sched.io().chat.offsets.len(), 2);
    assert_eq!(sched.io().weather.fetches, 1);

    sched.io().clock.advance_ms(10_001);
    sched.tick();
    assert_eq!(sched.io().display.screens.len(), refreshes + 1);
}

#[test]
fn link_down_skips_remote_work_but_resets_timers() {
    let mut io = node();
    io.network.connected = false;
    io.network.connect_ok = false;
    io.weather.replies.push_back(Ok(snapshot(30.0, 50.0)));
    let mut sched = scheduler(io);

    sched.tick();

    assert!(sched.io().chat.offsets.is_empty());
    assert_eq!(sched.io().weather.fetches, 0);
    assert!(sched.context().last_command_poll_ms.is_some());
    assert!(sched.context().last_weather_fetch_ms.is_some());
    assert!(sched.context().weather_snapshot.is_none());
    assert_eq!(sched.io().actuators.pump_starts(), 0);
}

#[test]
fn doorbell_runs_a_full_access_cycle_first() {
    let mut io = node();
    io.sensors.doorbell.push_back(true);
    io.biometric.replies.push_back(Ok(verdict(true, "Alice")));
    let mut sched = scheduler(io);

    sched.tick();

    let io = sched.io();
    assert_eq!(io.biometric.requests, 1);
    assert_eq!(sched.access().cycles(), 1);
    assert_eq!(io.events.events.first(), Some(&AppEvent::DoorbellPressed));
    // The command poll in the same tick happens after the door closed.
    assert_eq!(io.chat.sent[0], "Door opened for: Alice");
    assert_eq!(io.chat.offsets.len(), 1);
}

#[test]
fn motion_alerts_and_cools_down() {
    let mut io = node();
    io.sensors.motion.push_back(true);
    let mut sched = scheduler(io);

    sched.tick();

    let io = sched.io();
    assert_eq!(io.chat.sent_containing("motion"), 1);
    assert!(io.events.events.contains(&AppEvent::MotionDetected));
    assert!(io.delay.total_slept_ms >= 10_000);
}

#[test]
fn command_cursor_persists_across_ticks() {
    use gardengate::app::commands::ChatMessage;

    let mut io = node();
    io.chat.inbox.push_back(Ok(vec![ChatMessage {
        update_id: 41,
        text: Some("/status".into()),
    }]));
    let mut sched = scheduler(io);

    sched.tick();
    assert_eq!(sched.context().command_cursor, 41);

    sched.io().clock.advance_ms(5_001);
    sched.tick();
    assert_eq!(sched.io().chat.offsets, vec![1, 42]);
    assert_eq!(sched.io().chat.sent_containing("GARDEN STATUS"), 1);
}
