//! Application core: pure domain logic, zero direct I/O.
//!
//! This module contains the business rules for the GardenGate node:
//! the doorbell access cycle, weather-driven irrigation, the chat command
//! poller and status composition. All interaction with hardware and remote
//! services happens through **port traits** defined in [`ports`], bundled
//! by [`platform::Platform`], keeping this layer fully testable without
//! real peripherals.

pub mod access;
pub mod commands;
pub mod events;
pub mod irrigation;
pub mod platform;
pub mod ports;
pub mod status;
pub mod weather;
