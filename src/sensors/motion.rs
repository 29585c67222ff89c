//! PIR motion detector: edge detection on a binary input.
//!
//! No debounce: the PIR module already holds its output for a few seconds
//! after each trigger, so every change of level is reported.

use core::time::Duration;

use log::debug;

use crate::app::ports::DigitalIoPort;
use crate::error::Result;
use crate::events::{EventChannel, Source};
use crate::pins::PinId;

pub struct MotionDetector {
    pin: PinId,
    /// Level seen on the previous tick; starts low.
    last_detected: bool,
    on_motion_started: EventChannel<()>,
    on_motion_stopped: EventChannel<()>,
}

impl MotionDetector {
    pub fn new(pin: PinId) -> Self {
        Self {
            pin,
            last_detected: false,
            on_motion_started: EventChannel::new("on_motion_started"),
            on_motion_stopped: EventChannel::new("on_motion_stopped"),
        }
    }

    /// Raw read that does not touch the edge latch.  Used to seed observers
    /// at startup.
    pub fn read<IO: DigitalIoPort + ?Sized>(&self, io: &mut IO) -> Result<bool> {
        Ok(io.read_input(self.pin)?)
    }

    /// Sample once and fire on a change of level.  `elapsed` is unused: the
    /// detector has no timers.
    pub fn tick<IO: DigitalIoPort + ?Sized>(&mut self, _elapsed: Duration, io: &mut IO) -> Result<()> {
        let detected = io.read_input(self.pin)?;
        if detected == self.last_detected {
            return Ok(());
        }
        self.last_detected = detected;
        debug!("Motion on GPIO {}: {}", self.pin, if detected { "started" } else { "stopped" });
        if detected {
            self.on_motion_started.fire(Source::Motion, &())
        } else {
            self.on_motion_stopped.fire(Source::Motion, &())
        }
    }

    pub fn is_detected(&self) -> bool {
        self.last_detected
    }

    pub fn on_motion_started(&mut self) -> &mut EventChannel<()> {
        &mut self.on_motion_started
    }

    pub fn on_motion_stopped(&mut self) -> &mut EventChannel<()> {
        &mut self.on_motion_stopped
    }
}
