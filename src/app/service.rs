//! Monitor service: the composition root.
//!
//! [`MonitorService`] owns both state machines and every observer, wires
//! the subscriptions once at construction, and runs one tick in a fixed
//! order.  All I/O flows through port traits passed in at call sites, so
//! the whole service is testable with mock adapters.
//!
//! ```text
//!  DigitalIoPort ──▶ ┌──────────────────────────────┐ ──▶ NotificationPort
//!                    │        MonitorService        │
//!                    │ presence · motion · observers│
//!                    └──────────────────────────────┘
//! ```
//!
//! Subscription order (delivery order within a channel):
//!
//! | Channel           | Handlers                                   |
//! |-------------------|--------------------------------------------|
//! | on_present        | indicator, logger                          |
//! | on_parked         | indicator, floodlight, logger, notifier    |
//! | on_departed       | floodlight, logger, notifier               |
//! | on_motion_started | floodlight, logger, notifier               |
//! | on_motion_stopped | floodlight, logger                         |

use core::cell::RefCell;
use core::time::Duration;
use std::rc::Rc;

use log::{info, warn};

use crate::adapters::log_sink::EventLogger;
use crate::config::MonitorConfig;
use crate::drivers::floodlight::FloodlightController;
use crate::drivers::indicator::{FlashTimings, IndicatorFlasher};
use crate::drivers::status_led::HeartbeatLed;
use crate::error::{Error, Result};
use crate::fsm::states::PresenceState;
use crate::fsm::{DebounceWindows, PresenceStateMachine};
use crate::sensors::motion::MotionDetector;

use super::notifier::{NotifyRules, PushNotifier};
use super::ports::{DigitalIoPort, IoError, NotificationPort};

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

pub struct MonitorService {
    config: MonitorConfig,
    presence: PresenceStateMachine,
    motion: MotionDetector,
    indicator: Rc<RefCell<IndicatorFlasher>>,
    floodlight: Rc<RefCell<FloodlightController>>,
    notifier: Rc<RefCell<PushNotifier>>,
    heartbeat: Option<HeartbeatLed>,
    /// Sum of every `elapsed` passed to [`tick`](Self::tick).
    clock: Duration,
    tick_count: u64,
}

impl MonitorService {
    /// Validate `config`, take the boot readings and wire every observer.
    pub fn new<IO: DigitalIoPort + ?Sized>(config: MonitorConfig, io: &mut IO) -> Result<Self> {
        config.validate()?;

        let mut presence = PresenceStateMachine::new(
            config.presence_input_pin,
            DebounceWindows::from_config(&config),
            io,
        )?;
        let mut motion = MotionDetector::new(config.motion_input_pin);
        let initial_motion = motion.read(io)?;
        let parked = presence.is_parked();

        let indicator = Rc::new(RefCell::new(IndicatorFlasher::new(
            config.indicator_output_pin,
            FlashTimings::from_config(&config),
        )));
        let floodlight = Rc::new(RefCell::new(FloodlightController::new(
            config.floodlight_output_pin,
            config.floodlight_shine(),
            parked,
            initial_motion,
        )));
        let notifier = Rc::new(RefCell::new(PushNotifier::new(
            NotifyRules::from_config(&config),
            parked,
        )));
        let logger = EventLogger::new();

        // ── on_present ────────────────────────────────────────
        {
            let ch = presence.on_present();
            let ind = Rc::clone(&indicator);
            ch.subscribe(move |_, _| ind.borrow_mut().on_present());
            ch.subscribe(move |s, t| logger.on_present(s, t));
        }

        // ── on_parked ─────────────────────────────────────────
        {
            let ch = presence.on_parked();
            let ind = Rc::clone(&indicator);
            ch.subscribe(move |_, _| ind.borrow_mut().on_parked());
            let fl = Rc::clone(&floodlight);
            ch.subscribe(move |_, _| {
                fl.borrow_mut().on_parked();
                Ok(())
            });
            ch.subscribe(move |s, t| logger.on_parked(s, t));
            let nt = Rc::clone(&notifier);
            ch.subscribe(move |_, _| nt.borrow_mut().on_parked());
        }

        // ── on_departed ───────────────────────────────────────
        {
            let ch = presence.on_departed();
            let fl = Rc::clone(&floodlight);
            ch.subscribe(move |_, _| {
                fl.borrow_mut().on_departed();
                Ok(())
            });
            ch.subscribe(move |s, t| logger.on_departed(s, t));
            let nt = Rc::clone(&notifier);
            ch.subscribe(move |_, _| nt.borrow_mut().on_departed());
        }

        // ── on_motion_started ─────────────────────────────────
        {
            let ch = motion.on_motion_started();
            let fl = Rc::clone(&floodlight);
            ch.subscribe(move |_, _| {
                fl.borrow_mut().on_motion_started();
                Ok(())
            });
            ch.subscribe(move |s, _| logger.on_motion_started(s));
            let nt = Rc::clone(&notifier);
            ch.subscribe(move |_, _| nt.borrow_mut().on_motion_started());
        }

        // ── on_motion_stopped ─────────────────────────────────
        {
            let ch = motion.on_motion_stopped();
            let fl = Rc::clone(&floodlight);
            ch.subscribe(move |_, _| {
                fl.borrow_mut().on_motion_stopped();
                Ok(())
            });
            ch.subscribe(move |s, _| logger.on_motion_stopped(s));
        }

        info!(
            "MonitorService ready: presence={} motion={} tick={}ms",
            presence.state(),
            initial_motion,
            config.tick_period_ms
        );

        Ok(Self {
            heartbeat: config.heartbeat_output_pin.map(HeartbeatLed::new),
            config,
            presence,
            motion,
            indicator,
            floodlight,
            notifier,
            clock: Duration::ZERO,
            tick_count: 0,
        })
    }

    /// Queue the startup notification.  It goes out at the end of the
    /// first tick.
    pub fn start(&mut self) -> Result<()> {
        info!("MonitorService starting in {}", self.presence.state());
        self.notifier
            .borrow_mut()
            .on_startup()
            .map_err(|error| Error::Observer {
                channel: "startup",
                error,
            })
    }

    /// Run one tick.
    ///
    /// 1. Apply indicator edges that came due since the last call.
    /// 2. Tick presence, then motion, then floodlight.
    /// 3. Apply indicator edges queued by this tick's events.
    /// 4. Toggle the heartbeat LED.
    /// 5. Flush pending notifications.
    ///
    /// Input read failures and observer errors abort the rest of the tick.
    /// Output write failures do not: every step still runs and the first
    /// write fault is returned at the end.
    pub fn tick<IO, N>(&mut self, elapsed: Duration, io: &mut IO, notifications: &mut N) -> Result<()>
    where
        IO: DigitalIoPort + ?Sized,
        N: NotificationPort + ?Sized,
    {
        self.clock += elapsed;
        self.tick_count += 1;

        let mut fault = None;
        keep_first(&mut fault, self.indicator.borrow_mut().run_due(self.clock, io));

        self.presence.tick(elapsed, io)?;
        self.motion.tick(elapsed, io)?;
        keep_first(&mut fault, self.floodlight.borrow_mut().tick(elapsed, io));

        keep_first(&mut fault, self.indicator.borrow_mut().run_due(self.clock, io));

        if let Some(led) = &mut self.heartbeat {
            keep_first(&mut fault, led.toggle(io));
        }

        self.notifier.borrow_mut().flush(notifications);

        match fault {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Apply deferred output edges due `since_tick` after the last tick.
    /// Called by the main loop between ticks.
    pub fn run_outputs<IO: DigitalIoPort + ?Sized>(
        &mut self,
        since_tick: Duration,
        io: &mut IO,
    ) -> Result<()> {
        self.indicator
            .borrow_mut()
            .run_due(self.clock + since_tick, io)?;
        Ok(())
    }

    /// Time from `since_tick` (after the last tick) until the next deferred
    /// output edge, if any is pending.
    pub fn next_output_in(&self, since_tick: Duration) -> Option<Duration> {
        let now = self.clock + since_tick;
        self.indicator
            .borrow()
            .next_due()
            .map(|due| due.saturating_sub(now))
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn presence_state(&self) -> PresenceState {
        self.presence.state()
    }

    pub fn is_parked(&self) -> bool {
        self.presence.is_parked()
    }

    pub fn motion_detected(&self) -> bool {
        self.motion.is_detected()
    }

    pub fn floodlight_lit(&self) -> bool {
        self.floodlight.borrow().is_lit()
    }

    pub fn indicator_lit(&self) -> bool {
        self.indicator.borrow().is_lit()
    }

    pub fn pending_notifications(&self) -> usize {
        self.notifier.borrow().pending()
    }

    /// Presence machine, for subscribing additional observers.
    pub fn presence(&mut self) -> &mut PresenceStateMachine {
        &mut self.presence
    }

    /// Motion detector, for subscribing additional observers.
    pub fn motion(&mut self) -> &mut MotionDetector {
        &mut self.motion
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }
}

/// Record an output write failure without stopping the tick.
fn keep_first(fault: &mut Option<IoError>, result: core::result::Result<(), IoError>) {
    if let Err(e) = result {
        warn!("Output write failed: {}", e);
        fault.get_or_insert(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::{Notification, NotificationKind};
    use crate::app::mock_io::MockIo;
    use crate::app::ports::{ConfigError, DeliveryError};

    #[derive(Default)]
    struct Outbox(Vec<NotificationKind>);

    impl NotificationPort for Outbox {
        fn deliver(&mut self, n: &Notification) -> core::result::Result<(), DeliveryError> {
            self.0.push(n.kind);
            Ok(())
        }
    }

    const TICK: Duration = Duration::from_millis(200);

    #[test]
    fn rejects_invalid_config() {
        let mut io = MockIo::new();
        let config = MonitorConfig {
            tick_period_ms: 0,
            ..MonitorConfig::default()
        };
        assert!(matches!(
            MonitorService::new(config, &mut io),
            Err(Error::Config(ConfigError::ValidationFailed(_)))
        ));
    }

    #[test]
    fn startup_notification_after_first_tick() {
        let mut io = MockIo::new();
        let mut out = Outbox::default();
        let mut svc = MonitorService::new(MonitorConfig::default(), &mut io).unwrap();
        svc.start().unwrap();
        assert!(out.0.is_empty());
        svc.tick(TICK, &mut io, &mut out).unwrap();
        assert_eq!(out.0, vec![NotificationKind::Startup]);
        assert_eq!(svc.pending_notifications(), 0);
    }

    #[test]
    fn each_component_reads_once_per_tick() {
        let mut io = MockIo::new();
        let mut out = Outbox::default();
        let mut svc = MonitorService::new(MonitorConfig::default(), &mut io).unwrap();
        let before = io.reads;
        svc.tick(TICK, &mut io, &mut out).unwrap();
        assert_eq!(io.reads - before, 2);
    }

    #[test]
    fn heartbeat_toggles_each_tick() {
        let mut io = MockIo::new();
        let mut out = Outbox::default();
        let config = MonitorConfig::default();
        let hb = config.heartbeat_output_pin.unwrap();
        let mut svc = MonitorService::new(config, &mut io).unwrap();
        for _ in 0..4 {
            svc.tick(TICK, &mut io, &mut out).unwrap();
        }
        assert_eq!(io.writes_to(hb), vec![true, false, true, false]);
        assert_eq!(svc.tick_count(), 4);
        assert_eq!(svc.clock(), TICK * 4);
    }

    #[test]
    fn boot_parked_seeds_observers() {
        let mut io = MockIo::new();
        let config = MonitorConfig::default();
        io.set_input(config.presence_input_pin, true);
        let svc = MonitorService::new(config, &mut io).unwrap();
        assert!(svc.is_parked());
        assert!(!svc.floodlight_lit());
    }

    #[test]
    fn next_output_counts_from_since_tick() {
        let mut io = MockIo::new();
        let mut out = Outbox::default();
        let config = MonitorConfig::default();
        let presence = config.presence_input_pin;
        let mut svc = MonitorService::new(config, &mut io).unwrap();
        assert_eq!(svc.next_output_in(Duration::ZERO), None);

        io.set_input(presence, true);
        // Detecting, then exceed the 2 s window.
        svc.tick(TICK, &mut io, &mut out).unwrap();
        svc.tick(Duration::from_millis(2100), &mut io, &mut out).unwrap();
        assert_eq!(svc.presence_state(), PresenceState::Detected);
        assert!(svc.indicator_lit());
        assert_eq!(svc.next_output_in(Duration::ZERO), Some(Duration::from_millis(100)));
        assert_eq!(
            svc.next_output_in(Duration::from_millis(40)),
            Some(Duration::from_millis(60))
        );

        svc.run_outputs(Duration::from_millis(100), &mut io).unwrap();
        assert!(!svc.indicator_lit());
    }

    #[test]
    fn dead_heartbeat_does_not_starve_notifications() {
        let mut io = MockIo::new();
        let mut out = Outbox::default();
        let config = MonitorConfig::default();
        let hb = config.heartbeat_output_pin.unwrap();
        let motion = config.motion_input_pin;
        io.set_input(config.presence_input_pin, true);
        io.fail_writes(hb);
        let mut svc = MonitorService::new(config, &mut io).unwrap();
        svc.start().unwrap();

        for i in 0..40 {
            io.set_input(motion, i % 2 == 0);
            assert_eq!(
                svc.tick(TICK, &mut io, &mut out),
                Err(Error::Io(IoError::WriteFailed(hb)))
            );
        }
        assert_eq!(out.0.len(), 21);
        assert_eq!(out.0[0], NotificationKind::Startup);
        assert_eq!(svc.pending_notifications(), 0);
        assert_eq!(svc.tick_count(), 40);
    }

    #[test]
    fn dead_indicator_does_not_stall_presence() {
        let mut io = MockIo::new();
        let mut out = Outbox::default();
        let config = MonitorConfig::default();
        let lamp = config.indicator_output_pin;
        let presence = config.presence_input_pin;
        let mut svc = MonitorService::new(config, &mut io).unwrap();
        io.fail_writes(lamp);
        io.set_input(presence, true);

        svc.tick(TICK, &mut io, &mut out).unwrap();
        assert_eq!(svc.presence_state(), PresenceState::Detecting);

        let fault = Err(Error::Io(IoError::WriteFailed(lamp)));
        assert_eq!(svc.tick(Duration::from_millis(2100), &mut io, &mut out), fault);
        assert_eq!(svc.presence_state(), PresenceState::Detected);
        assert_eq!(svc.tick(Duration::from_millis(5100), &mut io, &mut out), fault);
        assert_eq!(svc.presence_state(), PresenceState::Parked);
        assert_eq!(svc.clock(), Duration::from_millis(7400));
        assert!(!svc.indicator_lit());

        io.restore_writes(lamp);
        svc.tick(TICK, &mut io, &mut out).unwrap();
        assert!(svc.indicator_lit());
        assert_eq!(io.writes_to(lamp), vec![true]);
    }
}
