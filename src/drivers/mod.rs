//! Output drivers: indicator lamp, floodlight and heartbeat LED.
//!
//! Each driver owns its pin id and writes through
//! [`DigitalIoPort`](crate::app::ports::DigitalIoPort); none of them holds a
//! hardware handle.

pub mod floodlight;
pub mod indicator;
pub mod status_led;
