//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the composition root and the notification rules
//! for the ParkBay monitor.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod notifier;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod mock_io;
