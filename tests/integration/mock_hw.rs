//! Mock hardware adapters for integration tests.
//!
//! Records every output write and notification so tests can assert on the
//! full history without touching real GPIO.

use parkbay::app::events::{Notification, NotificationKind};
use parkbay::app::ports::{DeliveryError, DigitalIoPort, IoError, NotificationPort};
use parkbay::pins::PinId;
use std::collections::HashMap;

// ── MockBoard ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockBoard {
    inputs: HashMap<PinId, bool>,
    outputs: HashMap<PinId, bool>,
    pub writes: Vec<(PinId, bool)>,
    pub broken_input: Option<PinId>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, pin: PinId, level: bool) {
        self.inputs.insert(pin, level);
    }

    pub fn output(&self, pin: PinId) -> bool {
        self.outputs.get(&pin).copied().unwrap_or(false)
    }

    /// Number of rising edges written to `pin`.
    pub fn pulses(&self, pin: PinId) -> usize {
        let mut level = false;
        let mut count = 0;
        for (p, v) in &self.writes {
            if *p == pin {
                if *v && !level {
                    count += 1;
                }
                level = *v;
            }
        }
        count
    }
}

impl DigitalIoPort for MockBoard {
    fn read_input(&mut self, pin: PinId) -> Result<bool, IoError> {
        if self.broken_input == Some(pin) {
            return Err(IoError::ReadFailed(pin));
        }
        Ok(self.inputs.get(&pin).copied().unwrap_or(false))
    }

    fn set_output(&mut self, pin: PinId, on: bool) -> Result<(), IoError> {
        self.outputs.insert(pin, on);
        self.writes.push((pin, on));
        Ok(())
    }
}

// ── MockMailer ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockMailer {
    pub sent: Vec<Notification>,
    pub offline: bool,
}

#[allow(dead_code)]
impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.sent.iter().map(|n| n.kind).collect()
    }
}

impl NotificationPort for MockMailer {
    fn deliver(&mut self, notification: &Notification) -> Result<(), DeliveryError> {
        if self.offline {
            return Err(DeliveryError::Unavailable);
        }
        self.sent.push(*notification);
        Ok(())
    }
}
