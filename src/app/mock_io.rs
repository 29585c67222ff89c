//! In-memory [`DigitalIoPort`] for unit tests.

use std::collections::{HashMap, HashSet};

use crate::pins::PinId;

use super::ports::{DigitalIoPort, IoError};

/// Inputs are set by the test; every output write is recorded in order.
#[derive(Debug, Default)]
pub struct MockIo {
    inputs: HashMap<PinId, bool>,
    outputs: HashMap<PinId, bool>,
    pub writes: Vec<(PinId, bool)>,
    pub reads: usize,
    failing_reads: HashSet<PinId>,
    failing_writes: HashSet<PinId>,
}

impl MockIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, pin: PinId, level: bool) {
        self.inputs.insert(pin, level);
    }

    pub fn output(&self, pin: PinId) -> Option<bool> {
        self.outputs.get(&pin).copied()
    }

    pub fn writes_to(&self, pin: PinId) -> Vec<bool> {
        self.writes
            .iter()
            .filter(|(p, _)| *p == pin)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn fail_reads(&mut self, pin: PinId) {
        self.failing_reads.insert(pin);
    }

    pub fn fail_writes(&mut self, pin: PinId) {
        self.failing_writes.insert(pin);
    }

    pub fn restore_writes(&mut self, pin: PinId) {
        self.failing_writes.remove(&pin);
    }
}

impl DigitalIoPort for MockIo {
    fn read_input(&mut self, pin: PinId) -> Result<bool, IoError> {
        self.reads += 1;
        if self.failing_reads.contains(&pin) {
            return Err(IoError::ReadFailed(pin));
        }
        Ok(self.inputs.get(&pin).copied().unwrap_or(false))
    }

    fn set_output(&mut self, pin: PinId, on: bool) -> Result<(), IoError> {
        if self.failing_writes.contains(&pin) {
            return Err(IoError::WriteFailed(pin));
        }
        self.outputs.insert(pin, on);
        self.writes.push((pin, on));
        Ok(())
    }
}
