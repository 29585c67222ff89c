//! Default GPIO assignments for the ParkBay controller board.
//!
//! These seed [`MonitorConfig::default`](crate::config::MonitorConfig); a
//! stored config may move any of them.  Every driver takes its pin from the
//! config rather than from here.

/// GPIO number as used by ESP-IDF (`gpio_num_t`).
pub type PinId = i32;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Proximity / presence sensor.  HIGH = object in the bay.
pub const PRESENCE_INPUT_GPIO: PinId = 4;
/// PIR motion sensor.  HIGH = movement seen.
pub const MOTION_INPUT_GPIO: PinId = 5;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Parking indicator lamp (active HIGH).
pub const INDICATOR_OUTPUT_GPIO: PinId = 6;
/// Floodlight relay (active HIGH).
pub const FLOODLIGHT_OUTPUT_GPIO: PinId = 7;
/// Heartbeat LED, toggled once per tick.
pub const HEARTBEAT_OUTPUT_GPIO: PinId = 8;

/// Highest GPIO number accepted in configuration (ESP32-S3 has GPIO 0–48).
pub const MAX_GPIO: PinId = 48;
