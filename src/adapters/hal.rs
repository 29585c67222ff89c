//! embedded-hal GPIO adapter.
//!
//! Implements [`DigitalIoPort`] over any embedded-hal 1.0 [`InputPin`] /
//! [`OutputPin`] drivers, registered by GPIO number.  On the ESP32 these are
//! `esp_idf_hal::gpio::PinDriver`s; on the host, tests plug in simple mock
//! pins.
//!
//! Pin tables are fixed-size (`heapless::Vec`), sized for the board.

use embedded_hal::digital::{Error as _, InputPin, OutputPin};
use log::debug;

use crate::app::ports::{DigitalIoPort, IoError};
use crate::pins::PinId;

/// Maximum number of registered inputs and outputs (each).
pub const MAX_PINS: usize = 8;

pub struct HalPort<I, O> {
    inputs: heapless::Vec<(PinId, I), MAX_PINS>,
    outputs: heapless::Vec<(PinId, O), MAX_PINS>,
}

impl<I: InputPin, O: OutputPin> Default for HalPort<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: InputPin, O: OutputPin> HalPort<I, O> {
    pub fn new() -> Self {
        Self {
            inputs: heapless::Vec::new(),
            outputs: heapless::Vec::new(),
        }
    }

    /// Register an input driver.  A pin registered twice keeps the first.
    pub fn add_input(&mut self, pin: PinId, driver: I) -> Result<(), IoError> {
        if self.inputs.iter().any(|(p, _)| *p == pin) {
            return Ok(());
        }
        self.inputs
            .push((pin, driver))
            .map_err(|_| IoError::PinTableFull(pin))
    }

    /// Register an output driver and drive it low.
    pub fn add_output(&mut self, pin: PinId, mut driver: O) -> Result<(), IoError> {
        if self.outputs.iter().any(|(p, _)| *p == pin) {
            return Ok(());
        }
        driver.set_low().map_err(|e| {
            debug!("GPIO {} init error: {:?}", pin, e.kind());
            IoError::WriteFailed(pin)
        })?;
        self.outputs
            .push((pin, driver))
            .map_err(|_| IoError::PinTableFull(pin))
    }
}

impl<I: InputPin, O: OutputPin> DigitalIoPort for HalPort<I, O> {
    fn read_input(&mut self, pin: PinId) -> Result<bool, IoError> {
        let (_, driver) = self
            .inputs
            .iter_mut()
            .find(|(p, _)| *p == pin)
            .ok_or(IoError::UnknownPin(pin))?;
        driver.is_high().map_err(|e| {
            debug!("GPIO {} read error: {:?}", pin, e.kind());
            IoError::ReadFailed(pin)
        })
    }

    fn set_output(&mut self, pin: PinId, on: bool) -> Result<(), IoError> {
        let (_, driver) = self
            .outputs
            .iter_mut()
            .find(|(p, _)| *p == pin)
            .ok_or(IoError::UnknownPin(pin))?;
        let res = if on { driver.set_high() } else { driver.set_low() };
        res.map_err(|e| {
            debug!("GPIO {} write error: {:?}", pin, e.kind());
            IoError::WriteFailed(pin)
        })
    }
}
