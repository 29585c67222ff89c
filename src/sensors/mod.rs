//! Sensor front-ends that are not debounced by the presence machine.

pub mod motion;
