//! Log-based adapters.
//!
//! - [`EventLogger`] is the logging observer: one line per presence or
//!   motion event.
//! - [`LogNotificationSink`] implements [`NotificationPort`] by writing each
//!   notification to the console.  A mail or push adapter would implement
//!   the same trait.

use log::info;

use crate::app::events::Notification;
use crate::app::ports::{DeliveryError, NotificationPort};
use crate::error::ObserverError;
use crate::events::Source;
use crate::fsm::states::Transition;

/// Observer that logs every event it is subscribed to.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventLogger;

impl EventLogger {
    pub fn new() -> Self {
        Self
    }

    pub fn on_present(&self, sender: Source, t: &Transition) -> Result<(), ObserverError> {
        info!("EVENT | present | {:?} {} -> {}", sender, t.from, t.to);
        Ok(())
    }

    pub fn on_parked(&self, sender: Source, t: &Transition) -> Result<(), ObserverError> {
        info!("EVENT | parked | {:?} {} -> {}", sender, t.from, t.to);
        Ok(())
    }

    pub fn on_departed(&self, sender: Source, t: &Transition) -> Result<(), ObserverError> {
        info!("EVENT | departed | {:?} {} -> {}", sender, t.from, t.to);
        Ok(())
    }

    pub fn on_motion_started(&self, sender: Source) -> Result<(), ObserverError> {
        info!("EVENT | motion started | {:?}", sender);
        Ok(())
    }

    pub fn on_motion_stopped(&self, sender: Source) -> Result<(), ObserverError> {
        info!("EVENT | motion stopped | {:?}", sender);
        Ok(())
    }
}

/// Adapter that writes every [`Notification`] to the serial console.
#[derive(Debug, Default)]
pub struct LogNotificationSink {
    delivered: u32,
}

impl LogNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> u32 {
        self.delivered
    }
}

impl NotificationPort for LogNotificationSink {
    fn deliver(&mut self, notification: &Notification) -> Result<(), DeliveryError> {
        info!("NOTIFY | {} | {}", notification.subject, notification.body);
        self.delivered += 1;
        Ok(())
    }
}
