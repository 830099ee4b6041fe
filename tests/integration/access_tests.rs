//! Doorbell → verdict → door / alert pipeline.

use gardengate::app::access::{AccessController, AccessReason, AccessState, AccessTimings};
use gardengate::app::events::AppEvent;
use gardengate::app::ports::{Indicator, ServoChannel};
use gardengate::config::NodeConfig;
use gardengate::error::CommsError;

use crate::mock_hw::{ActuatorCall, node, verdict};

fn controller() -> AccessController {
    AccessController::new(AccessTimings::from_config(&NodeConfig::default()))
}

fn is_door(c: &ActuatorCall) -> bool {
    matches!(c, ActuatorCall::Servo { channel: ServoChannel::Door, .. })
}

#[test]
fn recognized_visitor_opens_and_closes_the_door() {
    let mut io = node();
    io.biometric.replies.push_back(Ok(verdict(true, "Alice")));
    let mut access = controller();

    let event = access.handle_doorbell(&mut io);

    assert!(event.recognized);
    assert_eq!(event.reason, AccessReason::Ok);
    assert_eq!(access.state(), AccessState::Idle);
    assert_eq!(access.cycles(), 1);

    // Strictly up to the open angle, then strictly down to 0.
    let angles = io.actuators.servo_angles(ServoChannel::Door);
    let peak = angles.iter().position(|a| *a == 90).expect("door reached 90");
    assert_eq!(angles[0], 0);
    assert!(angles[..=peak].windows(2).all(|w| w[0] < w[1]));
    assert!(angles[peak..].windows(2).all(|w| w[0] > w[1]));
    assert_eq!(*angles.last().unwrap(), 0);

    // Green LED spans the whole door movement.
    let green_on = io
        .actuators
        .position(|c| *c == ActuatorCall::Indicator { indicator: Indicator::Granted, on: true })
        .unwrap();
    let green_off = io
        .actuators
        .rposition(|c| *c == ActuatorCall::Indicator { indicator: Indicator::Granted, on: false })
        .unwrap();
    let first_move = io.actuators.position(is_door).unwrap();
    let last_move = io.actuators.rposition(is_door).unwrap();
    assert!(green_on < first_move);
    assert!(green_off > last_move);

    assert_eq!(io.chat.sent, vec!["Door opened for: Alice".to_owned()]);
    assert!(io.display.shown("Face Recognized!", "Alice"));
    assert!(io.display.shown("Closing...", "Door"));
    assert_eq!(
        io.display.last(),
        Some(&("System Ready".to_owned(), "Waiting...".to_owned()))
    );
}

#[test]
fn every_transition_is_reported() {
    let mut io = node();
    io.biometric.replies.push_back(Ok(verdict(true, "Alice")));
    controller().handle_doorbell(&mut io);

    let transitions: Vec<_> = io
        .events
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::AccessStateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (AccessState::Idle, AccessState::Verifying),
            (AccessState::Verifying, AccessState::Granted),
            (AccessState::Granted, AccessState::Idle),
        ]
    );
}

fn assert_denied_cycle(io: &crate::mock_hw::MockPlatformIo) {
    assert!(io.actuators.servo_angles(ServoChannel::Door).is_empty(), "door must stay shut");
    // Initial on, then five off/on blinks, then off.
    assert_eq!(io.actuators.indicator_writes(Indicator::Denied, true), 6);
    assert_eq!(io.actuators.indicator_writes(Indicator::Denied, false), 6);
    assert_eq!(
        io.actuators.calls.last(),
        Some(&ActuatorCall::Indicator { indicator: Indicator::Denied, on: false })
    );
    assert_eq!(io.chat.sent_containing("Access denied"), 1);
    assert!(io.display.shown("INTRUDER ALERT!", "Access Denied"));
}

#[test]
fn server_error_status_denies() {
    let mut io = node();
    io.biometric.replies.push_back(Err(CommsError::HttpStatus(500)));

    let event = controller().handle_doorbell(&mut io);

    assert!(!event.recognized);
    assert_eq!(event.reason, AccessReason::ServerError);
    assert!(io.display.shown("Server Error", "Code: 500"));
    assert_denied_cycle(&io);
}

#[test]
fn transport_failure_denies_as_connection_error() {
    let mut io = node();
    io.biometric.replies.push_back(Err(CommsError::RequestFailed));

    let event = controller().handle_doorbell(&mut io);

    assert_eq!(event.reason, AccessReason::ConnectionError);
    assert!(io.display.shown("Server Error", "Connection Err"));
    assert_denied_cycle(&io);
}

#[test]
fn unreadable_verdict_denies_as_server_error() {
    let mut io = node();
    io.biometric.replies.push_back(Err(CommsError::MalformedPayload));

    let event = controller().handle_doorbell(&mut io);

    assert!(!event.recognized);
    assert_eq!(event.reason, AccessReason::ServerError);
    assert!(io.display.shown("Server Error", "Bad Response"));
    assert!(!io.display.shown("Server Error", "Connection Err"));
    assert_eq!(io.chat.sent_containing("server error"), 1);
    assert_denied_cycle(&io);
}

#[test]
fn no_face_verdict_denies_with_its_reason() {
    let mut io = node();
    let mut reply = verdict(false, "Unknown");
    reply.error = Some("No face detected".into());
    io.biometric.replies.push_back(Ok(reply));

    let event = controller().handle_doorbell(&mut io);

    assert!(!event.recognized);
    assert_eq!(event.reason, AccessReason::NoFace);
    assert_eq!(io.chat.sent_containing("no face detected"), 1);
    assert!(io.events.events.contains(&AppEvent::AccessDecided(event.clone())));
    assert_denied_cycle(&io);
}

#[test]
fn unrecognized_face_denies() {
    let mut io = node();
    io.biometric.replies.push_back(Ok(verdict(false, "Unknown")));

    let event = controller().handle_doorbell(&mut io);

    assert!(!event.recognized);
    assert_eq!(event.reason, AccessReason::Ok);
    assert_eq!(io.chat.sent_containing("unknown face"), 1);
    assert_denied_cycle(&io);
}

#[test]
fn link_down_denies_without_asking_the_server() {
    let mut io = node();
    io.network.connected = false;
    io.network.connect_ok = false;

    let event = controller().handle_doorbell(&mut io);

    assert_eq!(event.reason, AccessReason::WifiDown);
    assert_eq!(io.biometric.requests, 0);
    assert_eq!(io.network.connect_attempts, 1);
    assert!(io.display.shown("WiFi Error", "Reconnecting..."));
    assert!(io.actuators.servo_angles(ServoChannel::Door).is_empty());
    // No link, so the alert cannot be delivered.
    assert!(io.chat.sent.is_empty());
    assert!(
        io.events
            .events
            .contains(&AppEvent::NotificationFailed(CommsError::NotConnected))
    );
}

#[test]
fn long_names_are_shortened_on_screen_only() {
    let mut io = node();
    io.biometric
        .replies
        .push_back(Ok(verdict(true, "Bartholomew Fitzgerald")));

    controller().handle_doorbell(&mut io);

    assert!(io.display.shown("Face Recognized!", "Bartholomew F..."));
    assert_eq!(io.chat.sent, vec!["Door opened for: Bartholomew Fitzgerald".to_owned()]);
}

#[test]
fn failed_notification_does_not_abort_the_cycle() {
    let mut io = node();
    io.chat.send_fails = true;
    io.biometric.replies.push_back(Ok(verdict(true, "Alice")));
    let mut access = controller();

    access.handle_doorbell(&mut io);

    assert_eq!(access.state(), AccessState::Idle);
    assert!(
        io.events
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::NotificationFailed(CommsError::RequestFailed)))
    );
}
