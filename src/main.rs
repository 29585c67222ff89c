//! ParkBay Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HalPort (GPIO)    LogNotificationSink    JsonConfigFile       │
//! │  MonotonicClock                                                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            MonitorService (pure logic)                 │    │
//! │  │  PresenceStateMachine · MotionDetector · observers     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop ticks the service every `tick_period_ms` with the measured
//! elapsed time, and between ticks wakes only for pending indicator edges.
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, Input, Output, PinDriver};
use log::{info, warn};

use parkbay::adapters::config_file::JsonConfigFile;
use parkbay::adapters::hal::HalPort;
use parkbay::adapters::log_sink::LogNotificationSink;
use parkbay::adapters::time::MonotonicClock;
use parkbay::app::ports::{ConfigError, ConfigPort};
use parkbay::app::service::MonitorService;
use parkbay::config::MonitorConfig;
use parkbay::error::Error;
use parkbay::pins::PinId;

type GpioPort = HalPort<PinDriver<'static, AnyInputPin, Input>, PinDriver<'static, AnyOutputPin, Output>>;

/// Stored configuration on the data partition.
const CONFIG_PATH: &str = "/spiffs/parkbay.json";

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  ParkBay v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config (or defaults) ──────────────────────────
    let config = match JsonConfigFile::new(CONFIG_PATH).load() {
        Ok(cfg) => {
            info!("Config loaded from {}", CONFIG_PATH);
            cfg
        }
        Err(ConfigError::NotFound) => {
            info!("No stored config, using defaults");
            MonitorConfig::default()
        }
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            MonitorConfig::default()
        }
    };

    // ── 3. GPIO ───────────────────────────────────────────────
    let mut gpio = build_gpio(&config)?;

    // ── 4. Service ────────────────────────────────────────────
    let mut notifications = LogNotificationSink::new();
    let mut svc = MonitorService::new(config.clone(), &mut gpio)?;
    svc.start()?;

    // ── 5. Main loop ──────────────────────────────────────────
    let clock = MonotonicClock::new();
    let period = config.tick_period();
    let mut last_tick = clock.uptime();

    info!("Entering main loop ({} ms tick)", config.tick_period_ms);

    loop {
        let since = clock.uptime().saturating_sub(last_tick);

        if since >= period {
            last_tick += since;
            match svc.tick(since, &mut gpio, &mut notifications) {
                Ok(()) => {}
                Err(Error::Io(e)) => warn!("Tick {} I/O fault: {}", svc.tick_count(), e),
                Err(e) => return Err(e.into()),
            }
        } else if let Err(e) = svc.run_outputs(since, &mut gpio) {
            warn!("Indicator update failed: {}", e);
        }

        // Sleep until the next tick or the next indicator edge, whichever
        // comes first.
        let since = clock.uptime().saturating_sub(last_tick);
        let until_tick = period.saturating_sub(since);
        let wait = svc
            .next_output_in(since)
            .map_or(until_tick, |edge| edge.min(until_tick));
        FreeRtos::delay_ms(wait.as_millis().max(1) as u32);
    }
}

/// Register a `PinDriver` for every GPIO the config names.
fn build_gpio(config: &MonitorConfig) -> Result<GpioPort> {
    let mut gpio: GpioPort = HalPort::new();

    for pin in [config.presence_input_pin, config.motion_input_pin] {
        // SAFETY: validated config assigns each GPIO to exactly one role,
        // and nothing else in the firmware claims these pins.
        let driver = PinDriver::input(unsafe { AnyInputPin::new(pin) })?;
        gpio.add_input(pin, driver).map_err(Error::from)?;
    }

    let outputs: [Option<PinId>; 3] = [
        Some(config.indicator_output_pin),
        Some(config.floodlight_output_pin),
        config.heartbeat_output_pin,
    ];
    for pin in outputs.into_iter().flatten() {
        // SAFETY: as above.
        let driver = PinDriver::output(unsafe { AnyOutputPin::new(pin) })?;
        gpio.add_output(pin, driver).map_err(Error::from)?;
    }

    info!(
        "GPIO ready: presence={} motion={} indicator={} floodlight={} heartbeat={:?}",
        config.presence_input_pin,
        config.motion_input_pin,
        config.indicator_output_pin,
        config.floodlight_output_pin,
        config.heartbeat_output_pin
    );
    Ok(gpio)
}
