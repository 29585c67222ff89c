//! ParkBay firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.
//!
//! ```text
//!  presence pin ──▶ PresenceStateMachine ──on_present / on_parked / on_departed──┐
//!  PIR pin      ──▶ MotionDetector ───────on_motion_started / on_motion_stopped──┤
//!                                                                               ▼
//!                         indicator · floodlight · logger · notifier (observers)
//! ```

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod pins;
pub mod scheduler;

pub mod adapters;
pub mod drivers;
pub mod sensors;
