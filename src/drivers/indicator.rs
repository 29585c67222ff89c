//! Parking indicator lamp.
//!
//! | Event      | Pattern                                        |
//! |------------|------------------------------------------------|
//! | on_present | `count` × (`short` on, `short` off)            |
//! | on_parked  | one `long` pulse                               |
//!
//! Handlers only queue the edges; [`IndicatorFlasher::run_due`] drives the
//! pin when the main loop gets to them.  A new pattern cancels whatever is
//! still pending from the previous one.

use core::time::Duration;

use log::debug;

use crate::app::ports::{DigitalIoPort, IoError};
use crate::config::MonitorConfig;
use crate::error::ObserverError;
use crate::pins::PinId;
use crate::scheduler::Scheduler;

/// Queue depth: two edges per short flash at the configured maximum, plus
/// headroom.
const QUEUE_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashTimings {
    pub short: Duration,
    pub short_count: u8,
    pub long: Duration,
}

impl FlashTimings {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            short: Duration::from_millis(config.short_flash_ms as u64),
            short_count: config.short_flash_count,
            long: Duration::from_millis(config.long_flash_ms as u64),
        }
    }
}

#[derive(Debug)]
pub struct IndicatorFlasher {
    pin: PinId,
    timings: FlashTimings,
    queue: Scheduler<bool, QUEUE_DEPTH>,
    lit: bool,
}

impl IndicatorFlasher {
    pub fn new(pin: PinId, timings: FlashTimings) -> Self {
        Self {
            pin,
            timings,
            queue: Scheduler::new(),
            lit: false,
        }
    }

    /// Queue the short-flash burst.
    pub fn on_present(&mut self) -> Result<(), ObserverError> {
        self.queue.clear();
        let step = self.timings.short;
        for i in 0..u32::from(self.timings.short_count) {
            self.queue.schedule_in(step * (2 * i), true)?;
            self.queue.schedule_in(step * (2 * i + 1), false)?;
        }
        debug!("Indicator: {} short flashes queued", self.timings.short_count);
        Ok(())
    }

    /// Queue the single long flash.
    pub fn on_parked(&mut self) -> Result<(), ObserverError> {
        self.queue.clear();
        self.queue.schedule_in(Duration::ZERO, true)?;
        self.queue.schedule_in(self.timings.long, false)?;
        debug!("Indicator: long flash queued");
        Ok(())
    }

    /// Apply every edge due at `now`.
    ///
    /// An edge leaves the queue only once its write succeeds; after a
    /// failure it and every later edge are retried on the next call.
    pub fn run_due<IO: DigitalIoPort + ?Sized>(
        &mut self,
        now: Duration,
        io: &mut IO,
    ) -> Result<(), IoError> {
        while let Some(level) = self.queue.peek_due(now) {
            io.set_output(self.pin, level)?;
            self.lit = level;
            self.queue.pop_due();
        }
        Ok(())
    }

    /// Absolute time of the next queued edge.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.next_due()
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_idle()
    }
}
