//! System configuration parameters
//!
//! All tunable parameters for the ParkBay monitor.
//! Values can be overridden by a stored JSON document (see
//! [`JsonConfigFile`](crate::adapters::config_file::JsonConfigFile)); the
//! config is fixed once the service is built.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::pins::{self, PinId};

/// Core monitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Pins ---
    /// Presence sensor input
    pub presence_input_pin: PinId,
    /// PIR motion sensor input
    pub motion_input_pin: PinId,
    /// Parking indicator output
    pub indicator_output_pin: PinId,
    /// Floodlight output
    pub floodlight_output_pin: PinId,
    /// Heartbeat LED output, toggled every tick (`None` = no LED)
    pub heartbeat_output_pin: Option<PinId>,

    // --- Presence debounce ---
    /// Time in Detecting before an object counts as present (ms)
    pub detecting_debounce_ms: u32,
    /// Time in Detected before a present object counts as parked (ms)
    pub detected_debounce_ms: u32,
    /// Time in Leaving before a parked object counts as departed (ms)
    pub leaving_debounce_ms: u32,

    // --- Timing ---
    /// Main loop tick period (ms)
    pub tick_period_ms: u32,
    /// How long the floodlight stays on after the last motion (ms)
    pub floodlight_shine_ms: u32,

    // --- Indicator ---
    /// On time and off time of one short flash (ms)
    pub short_flash_ms: u32,
    /// Number of short flashes when an object is first detected
    pub short_flash_count: u8,
    /// Length of the single long flash when parked (ms)
    pub long_flash_ms: u32,

    // --- Notifications ---
    pub notify_on_startup: bool,
    pub notify_on_motion_while_parked: bool,
    pub notify_on_departure: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Pins
            presence_input_pin: pins::PRESENCE_INPUT_GPIO,
            motion_input_pin: pins::MOTION_INPUT_GPIO,
            indicator_output_pin: pins::INDICATOR_OUTPUT_GPIO,
            floodlight_output_pin: pins::FLOODLIGHT_OUTPUT_GPIO,
            heartbeat_output_pin: Some(pins::HEARTBEAT_OUTPUT_GPIO),

            // Presence debounce
            detecting_debounce_ms: 2_000,
            detected_debounce_ms: 5_000,
            leaving_debounce_ms: 5_000,

            // Timing
            tick_period_ms: 200, // 5 Hz
            floodlight_shine_ms: 5_000,

            // Indicator
            short_flash_ms: 100,
            short_flash_count: 10,
            long_flash_ms: 2_000,

            // Notifications
            notify_on_startup: true,
            notify_on_motion_while_parked: true,
            notify_on_departure: true,
        }
    }
}

/// Upper bound on short flashes.  Each flash takes two slots in the
/// indicator's 32-entry timer queue.
pub const MAX_SHORT_FLASHES: u8 = 15;

impl MonitorConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms as u64)
    }

    pub fn floodlight_shine(&self) -> Duration {
        Duration::from_millis(self.floodlight_shine_ms as u64)
    }

    /// Reject out-of-range values and GPIOs assigned to more than one role.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut used: heapless::Vec<PinId, 5> = heapless::Vec::new();
        let all_pins = [
            Some(self.presence_input_pin),
            Some(self.motion_input_pin),
            Some(self.indicator_output_pin),
            Some(self.floodlight_output_pin),
            self.heartbeat_output_pin,
        ];
        for pin in all_pins.into_iter().flatten() {
            if !(0..=pins::MAX_GPIO).contains(&pin) {
                return Err(ConfigError::ValidationFailed("GPIO numbers must be 0–48"));
            }
            if used.contains(&pin) {
                return Err(ConfigError::ValidationFailed(
                    "each GPIO may serve only one role",
                ));
            }
            // Capacity equals the number of roles.
            let _ = used.push(pin);
        }

        if !(10..=10_000).contains(&self.tick_period_ms) {
            return Err(ConfigError::ValidationFailed(
                "tick_period_ms must be 10–10000",
            ));
        }
        for window in [
            self.detecting_debounce_ms,
            self.detected_debounce_ms,
            self.leaving_debounce_ms,
        ] {
            if window > 600_000 {
                return Err(ConfigError::ValidationFailed(
                    "debounce windows must be at most 600000 ms",
                ));
            }
        }
        if !(100..=3_600_000).contains(&self.floodlight_shine_ms) {
            return Err(ConfigError::ValidationFailed(
                "floodlight_shine_ms must be 100–3600000",
            ));
        }
        if !(10..=5_000).contains(&self.short_flash_ms) {
            return Err(ConfigError::ValidationFailed(
                "short_flash_ms must be 10–5000",
            ));
        }
        if !(1..=MAX_SHORT_FLASHES).contains(&self.short_flash_count) {
            return Err(ConfigError::ValidationFailed(
                "short_flash_count must be 1–15",
            ));
        }
        if !(10..=60_000).contains(&self.long_flash_ms) {
            return Err(ConfigError::ValidationFailed(
                "long_flash_ms must be 10–60000",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = MonitorConfig::default();
        assert!(c.validate().is_ok());
        assert!(c.detecting_debounce_ms < c.detected_debounce_ms);
        assert!(c.tick_period_ms < c.detecting_debounce_ms);
        assert!(c.short_flash_ms < c.long_flash_ms);
    }

    #[test]
    fn serde_roundtrip() {
        let c = MonitorConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: MonitorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, c2);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let c: MonitorConfig = serde_json::from_str(r#"{"tick_period_ms": 500}"#).unwrap();
        assert_eq!(c.tick_period_ms, 500);
        assert_eq!(c.leaving_debounce_ms, 5_000);
        assert_eq!(c.tick_period(), Duration::from_millis(500));
    }

    #[test]
    fn rejects_shared_gpio() {
        let c = MonitorConfig {
            floodlight_output_pin: pins::PRESENCE_INPUT_GPIO,
            ..MonitorConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::ValidationFailed("each GPIO may serve only one role"))
        );
    }

    #[test]
    fn heartbeat_pin_is_optional() {
        let c = MonitorConfig {
            heartbeat_output_pin: None,
            ..MonitorConfig::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let too_fast = MonitorConfig {
            tick_period_ms: 1,
            ..MonitorConfig::default()
        };
        assert!(too_fast.validate().is_err());

        let no_flashes = MonitorConfig {
            short_flash_count: 0,
            ..MonitorConfig::default()
        };
        assert!(no_flashes.validate().is_err());

        let too_many = MonitorConfig {
            short_flash_count: MAX_SHORT_FLASHES + 1,
            ..MonitorConfig::default()
        };
        assert!(too_many.validate().is_err());

        let bad_pin = MonitorConfig {
            motion_input_pin: 99,
            ..MonitorConfig::default()
        };
        assert!(bad_pin.validate().is_err());
    }
}
