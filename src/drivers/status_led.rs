//! Heartbeat LED.
//!
//! Toggled once per main-loop tick so a stalled loop is visible on the
//! board.

use crate::app::ports::{DigitalIoPort, IoError};
use crate::pins::PinId;

pub struct HeartbeatLed {
    pin: PinId,
    on: bool,
}

impl HeartbeatLed {
    pub fn new(pin: PinId) -> Self {
        Self { pin, on: false }
    }

    pub fn toggle<IO: DigitalIoPort + ?Sized>(&mut self, io: &mut IO) -> Result<(), IoError> {
        io.set_output(self.pin, !self.on)?;
        self.on = !self.on;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
