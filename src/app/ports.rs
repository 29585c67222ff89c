//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (GPIO, notification transport, config storage) implement
//! these traits.  The [`MonitorService`](super::service::MonitorService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! All port errors are typed: callers must handle every variant explicitly.

use crate::config::MonitorConfig;
use crate::pins::PinId;

use super::events::Notification;

// ───────────────────────────────────────────────────────────────
// Digital I/O port (driven adapter: hardware ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Binary inputs and outputs addressed by pin id.
///
/// The core reads each sensor pin at most once per component per tick and
/// never retries a failed read.
pub trait DigitalIoPort {
    /// Current level of an input pin (`true` = HIGH).
    fn read_input(&mut self, pin: PinId) -> Result<bool, IoError>;

    /// Drive an output pin.
    fn set_output(&mut self, pin: PinId, on: bool) -> Result<(), IoError>;
}

// ───────────────────────────────────────────────────────────────
// Notification port (driven adapter: domain → user)
// ───────────────────────────────────────────────────────────────

/// Delivers user-facing notifications (mail, push, serial…).
///
/// Delivery is best-effort: the service logs a failure and moves on.
pub trait NotificationPort {
    fn deliver(&mut self, notification: &Notification) -> Result<(), DeliveryError>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists monitor configuration.
///
/// Implementations MUST validate before persisting and after loading.
/// Invalid values are rejected with [`ConfigError::ValidationFailed`], never
/// silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<MonitorConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &MonitorConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`DigitalIoPort`] operations.  Each carries the pin involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoError {
    /// No driver registered for this pin.
    UnknownPin(PinId),
    /// The input driver reported an error.
    ReadFailed(PinId),
    /// The output driver reported an error.
    WriteFailed(PinId),
    /// The adapter's fixed pin table has no room for another driver.
    PinTableFull(PinId),
}

/// Errors from [`NotificationPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// Transport not reachable right now.
    Unavailable,
    /// Transport rejected the message.
    Rejected(&'static str),
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownPin(pin) => write!(f, "GPIO {} not configured", pin),
            Self::ReadFailed(pin) => write!(f, "GPIO {} read failed", pin),
            Self::WriteFailed(pin) => write!(f, "GPIO {} write failed", pin),
            Self::PinTableFull(pin) => write!(f, "no room to register GPIO {}", pin),
        }
    }
}

impl core::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "transport unavailable"),
            Self::Rejected(why) => write!(f, "rejected: {}", why),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
