//! Monotonic clock adapter.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side testing and simulation.
//!
//! The main loop measures the real time between ticks with this clock, so
//! debounce windows hold even when a tick overruns its period.

use core::time::Duration;

pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Time since boot.
    #[cfg(target_os = "espidf")]
    pub fn uptime(&self) -> Duration {
        // SAFETY: esp_timer is started by the IDF before app_main.
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        Duration::from_micros(us as u64)
    }

    /// Time since this clock was created.
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime(&self) -> Duration {
        self.start.elapsed()
    }
}
