//! Unified error types for the ParkBay firmware.
//!
//! Every fallible operation reachable from a tick funnels into [`Error`], so
//! the main loop can tell a flaky GPIO (skip the cycle) apart from a failing
//! observer (stop).  Illegal presence transitions are not represented here:
//! they are programming errors and panic.

use core::fmt;

use crate::app::ports::{ConfigError, IoError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The digital I/O port failed to read an input or drive an output.
    Io(IoError),
    /// A subscriber on the named channel returned an error.
    Observer {
        channel: &'static str,
        error: ObserverError,
    },
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Observer { channel, error } => write!(f, "observer on {channel}: {error}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Self::Io(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Observer errors
// ---------------------------------------------------------------------------

/// Failure reported by an event handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverError {
    /// A bounded queue owned by the observer has no room left.
    QueueFull(&'static str),
    /// The observer could not perform its side effect.
    Failed(&'static str),
}

impl fmt::Display for ObserverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull(what) => write!(f, "{what} queue full"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
