//! Floodlight controller.
//!
//! The light comes on when motion is seen while a car is parked, and stays
//! on for `shine` after the last tick that saw both.  It goes off early as
//! soon as the bay stops being `Parked`.
//!
//! Event handlers only update the two inputs (`car_parked`, `motion`); the
//! pin is driven from [`FloodlightController::tick`].

use core::time::Duration;

use log::info;

use crate::app::ports::{DigitalIoPort, IoError};
use crate::pins::PinId;

#[derive(Debug)]
pub struct FloodlightController {
    pin: PinId,
    shine: Duration,
    car_parked: bool,
    motion: bool,
    lit: bool,
    time_lit: Duration,
}

impl FloodlightController {
    /// `initially_parked` and `initial_motion` seed the inputs from the
    /// sensors' state at boot, since no event is raised for it.
    pub fn new(pin: PinId, shine: Duration, initially_parked: bool, initial_motion: bool) -> Self {
        Self {
            pin,
            shine,
            car_parked: initially_parked,
            motion: initial_motion,
            lit: false,
            time_lit: Duration::ZERO,
        }
    }

    pub fn on_parked(&mut self) {
        self.car_parked = true;
    }

    pub fn on_departed(&mut self) {
        self.car_parked = false;
    }

    pub fn on_motion_started(&mut self) {
        self.motion = true;
    }

    pub fn on_motion_stopped(&mut self) {
        self.motion = false;
    }

    pub fn tick<IO: DigitalIoPort + ?Sized>(
        &mut self,
        elapsed: Duration,
        io: &mut IO,
    ) -> Result<(), IoError> {
        if self.motion && self.car_parked {
            self.time_lit = Duration::ZERO;
            if !self.lit {
                self.switch(true, io)?;
            }
        }

        if self.lit {
            self.time_lit += elapsed;
            if self.time_lit > self.shine || !self.car_parked {
                self.switch(false, io)?;
            }
        }
        Ok(())
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    fn switch<IO: DigitalIoPort + ?Sized>(&mut self, on: bool, io: &mut IO) -> Result<(), IoError> {
        io.set_output(self.pin, on)?;
        self.lit = on;
        info!("Floodlight {}", if on { "ON" } else { "OFF" });
        Ok(())
    }
}
