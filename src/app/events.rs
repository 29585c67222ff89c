//! Outbound notifications.
//!
//! The [`PushNotifier`](super::notifier::PushNotifier) produces these and
//! the [`MonitorService`](super::service::MonitorService) hands them to the
//! [`NotificationPort`](super::ports::NotificationPort).  The adapter on the
//! other side decides how they reach a person (mail, push, serial log).

/// Why a notification was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The monitor finished its first tick.
    Startup,
    /// The PIR saw movement while a car was parked.
    MotionWhileParked,
    /// A parked car has left the bay.
    Departed,
}

/// A user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub subject: &'static str,
    pub body: &'static str,
}

impl Notification {
    pub const fn for_kind(kind: NotificationKind) -> Self {
        let (subject, body) = match kind {
            NotificationKind::Startup => ("STARTED UP", "System has started"),
            NotificationKind::MotionWhileParked => {
                ("DETECTED MOVEMENT", "PIR detector has registered movement")
            }
            NotificationKind::Departed => ("CAR LEFT", "The car is gone!!"),
        };
        Self {
            kind,
            subject,
            body,
        }
    }
}
