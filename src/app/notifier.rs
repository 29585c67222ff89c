//! Push notifier observer.
//!
//! Decides *which* notifications to send; delivery is the
//! [`NotificationPort`]'s job.  Handlers only append to a bounded outbox so
//! a slow transport can never stall a tick; the service drains it with
//! [`PushNotifier::flush`] at the end of each tick.

use log::{info, warn};

use crate::config::MonitorConfig;
use crate::error::ObserverError;

use super::events::{Notification, NotificationKind};
use super::ports::NotificationPort;

/// Outbox capacity.
const OUTBOX_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyRules {
    pub on_startup: bool,
    pub on_motion_while_parked: bool,
    pub on_departure: bool,
}

impl NotifyRules {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            on_startup: config.notify_on_startup,
            on_motion_while_parked: config.notify_on_motion_while_parked,
            on_departure: config.notify_on_departure,
        }
    }
}

#[derive(Debug)]
pub struct PushNotifier {
    rules: NotifyRules,
    car_parked: bool,
    outbox: heapless::Deque<Notification, OUTBOX_DEPTH>,
}

impl PushNotifier {
    pub fn new(rules: NotifyRules, initially_parked: bool) -> Self {
        Self {
            rules,
            car_parked: initially_parked,
            outbox: heapless::Deque::new(),
        }
    }

    pub fn on_startup(&mut self) -> Result<(), ObserverError> {
        if self.rules.on_startup {
            self.enqueue(NotificationKind::Startup)?;
        }
        Ok(())
    }

    pub fn on_motion_started(&mut self) -> Result<(), ObserverError> {
        if self.car_parked && self.rules.on_motion_while_parked {
            self.enqueue(NotificationKind::MotionWhileParked)?;
        }
        Ok(())
    }

    pub fn on_parked(&mut self) -> Result<(), ObserverError> {
        self.car_parked = true;
        Ok(())
    }

    pub fn on_departed(&mut self) -> Result<(), ObserverError> {
        self.car_parked = false;
        if self.rules.on_departure {
            self.enqueue(NotificationKind::Departed)?;
        }
        Ok(())
    }

    /// Hand every queued notification to `port`, oldest first.
    ///
    /// A failed delivery is logged and dropped; there is no retry.
    /// Returns how many were delivered.
    pub fn flush<N: NotificationPort + ?Sized>(&mut self, port: &mut N) -> usize {
        let mut delivered = 0;
        while let Some(n) = self.outbox.pop_front() {
            match port.deliver(&n) {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Notification '{}' dropped: {}", n.subject, e),
            }
        }
        delivered
    }

    pub fn pending(&self) -> usize {
        self.outbox.len()
    }

    pub fn car_parked(&self) -> bool {
        self.car_parked
    }

    fn enqueue(&mut self, kind: NotificationKind) -> Result<(), ObserverError> {
        let n = Notification::for_kind(kind);
        info!("Notify: {}", n.subject);
        self.outbox
            .push_back(n)
            .map_err(|_| ObserverError::QueueFull("notification"))
    }
}
