//! End-to-end scenarios through the wired `MonitorService`.
//!
//! Default config: 200 ms ticks, 2 s / 5 s / 5 s debounce, 5 s floodlight.
//! Each simulated loop iteration ticks once and then services deferred
//! indicator edges half a tick later, as the firmware loop does.

use core::time::Duration;

use parkbay::app::events::NotificationKind;
use parkbay::app::service::MonitorService;
use parkbay::config::MonitorConfig;
use parkbay::error::{Error, ObserverError};
use parkbay::fsm::states::PresenceState;

use super::mock_hw::{MockBoard, MockMailer};

const TICK: Duration = Duration::from_millis(200);
const HALF: Duration = Duration::from_millis(100);

struct Rig {
    cfg: MonitorConfig,
    board: MockBoard,
    mailer: MockMailer,
    svc: MonitorService,
}

impl Rig {
    fn boot(parked: bool, motion: bool) -> Self {
        let cfg = MonitorConfig::default();
        let mut board = MockBoard::new();
        board.set(cfg.presence_input_pin, parked);
        board.set(cfg.motion_input_pin, motion);
        let mut svc = MonitorService::new(cfg.clone(), &mut board).unwrap();
        svc.start().unwrap();
        Self {
            cfg,
            board,
            mailer: MockMailer::new(),
            svc,
        }
    }

    fn step(&mut self) {
        self.svc
            .tick(TICK, &mut self.board, &mut self.mailer)
            .unwrap();
        self.svc.run_outputs(HALF, &mut self.board).unwrap();
    }

    fn steps(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    fn presence(&mut self, level: bool) {
        let pin = self.cfg.presence_input_pin;
        self.board.set(pin, level);
    }

    fn motion(&mut self, level: bool) {
        let pin = self.cfg.motion_input_pin;
        self.board.set(pin, level);
    }
}

#[test]
fn arrival_runs_full_lifecycle_with_indicator() {
    let mut rig = Rig::boot(false, false);
    rig.presence(true);

    rig.step();
    assert_eq!(rig.svc.presence_state(), PresenceState::Detecting);

    rig.steps(10);
    assert_eq!(rig.svc.presence_state(), PresenceState::Detecting);
    rig.step();
    assert_eq!(rig.svc.presence_state(), PresenceState::Detected);

    rig.steps(25);
    assert_eq!(rig.svc.presence_state(), PresenceState::Detected);
    rig.step();
    assert_eq!(rig.svc.presence_state(), PresenceState::Parked);

    // Ten short flashes on arrival, then the long flash has started.
    let indicator = rig.cfg.indicator_output_pin;
    assert_eq!(rig.board.pulses(indicator), 11);
    assert!(rig.svc.indicator_lit());

    // Long flash ends 2 s later.
    rig.steps(10);
    assert!(!rig.svc.indicator_lit());
    assert_eq!(rig.board.pulses(indicator), 11);

    assert_eq!(rig.mailer.kinds(), vec![NotificationKind::Startup]);
}

#[test]
fn motion_while_parked_lights_floodlight_and_notifies() {
    let mut rig = Rig::boot(true, false);
    rig.step();

    rig.motion(true);
    rig.step();
    assert!(rig.svc.floodlight_lit());
    assert_eq!(
        rig.mailer.kinds(),
        vec![NotificationKind::Startup, NotificationKind::MotionWhileParked]
    );

    rig.motion(false);
    rig.steps(24);
    assert!(rig.svc.floodlight_lit());
    rig.step();
    assert!(!rig.svc.floodlight_lit());
    assert!(!rig.board.output(rig.cfg.floodlight_output_pin));
}

#[test]
fn motion_without_car_is_ignored() {
    let mut rig = Rig::boot(false, false);
    rig.motion(true);
    rig.steps(3);
    assert!(rig.svc.motion_detected());
    assert!(!rig.svc.floodlight_lit());
    assert_eq!(rig.mailer.kinds(), vec![NotificationKind::Startup]);
}

#[test]
fn departure_notifies_and_kills_floodlight() {
    let mut rig = Rig::boot(true, true);
    rig.step();
    assert!(rig.svc.floodlight_lit());

    rig.presence(false);
    rig.step();
    assert_eq!(rig.svc.presence_state(), PresenceState::Leaving);

    rig.steps(25);
    assert_eq!(rig.svc.presence_state(), PresenceState::Leaving);
    assert!(rig.svc.floodlight_lit(), "still parked as far as the light knows");

    rig.step();
    assert_eq!(rig.svc.presence_state(), PresenceState::Absent);
    assert!(!rig.svc.floodlight_lit());
    assert_eq!(
        rig.mailer.kinds().last(),
        Some(&NotificationKind::Departed)
    );
}

#[test]
fn brief_absence_does_not_depart() {
    let mut rig = Rig::boot(true, false);
    rig.presence(false);
    rig.steps(10);
    assert_eq!(rig.svc.presence_state(), PresenceState::Leaving);
    rig.presence(true);
    rig.step();
    assert_eq!(rig.svc.presence_state(), PresenceState::Parked);
    assert!(!rig.mailer.kinds().contains(&NotificationKind::Departed));
}

#[test]
fn bounce_never_flashes_indicator() {
    let mut rig = Rig::boot(false, false);
    rig.presence(true);
    rig.steps(5);
    rig.presence(false);
    rig.steps(20);
    assert_eq!(rig.svc.presence_state(), PresenceState::Absent);
    assert_eq!(rig.board.pulses(rig.cfg.indicator_output_pin), 0);
}

#[test]
fn motion_seen_at_boot_is_reported_on_first_tick() {
    let mut rig = Rig::boot(true, true);
    rig.step();
    assert_eq!(
        rig.mailer.kinds(),
        vec![NotificationKind::Startup, NotificationKind::MotionWhileParked]
    );
}

#[test]
fn sensor_failure_surfaces_and_recovers() {
    let mut rig = Rig::boot(false, false);
    let presence = rig.cfg.presence_input_pin;
    rig.board.broken_input = Some(presence);
    let err = rig
        .svc
        .tick(TICK, &mut rig.board, &mut rig.mailer)
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));

    rig.board.broken_input = None;
    rig.presence(true);
    rig.step();
    assert_eq!(rig.svc.presence_state(), PresenceState::Detecting);
}

#[test]
fn failing_extra_observer_propagates() {
    let mut rig = Rig::boot(false, false);
    rig.svc
        .presence()
        .on_present()
        .subscribe(|_, _| Err(ObserverError::Failed("display offline")));
    rig.presence(true);
    rig.steps(11);
    let err = rig
        .svc
        .tick(TICK, &mut rig.board, &mut rig.mailer)
        .unwrap_err();
    assert_eq!(
        err,
        Error::Observer {
            channel: "on_present",
            error: ObserverError::Failed("display offline"),
        }
    );
    // The state change stands and the indicator, subscribed earlier, has
    // already queued its burst.
    assert_eq!(rig.svc.presence_state(), PresenceState::Detected);
    assert_eq!(rig.svc.next_output_in(Duration::ZERO), Some(Duration::ZERO));
}

#[test]
fn offline_mailer_does_not_stall_ticks() {
    let mut rig = Rig::boot(true, false);
    rig.mailer.offline = true;
    rig.motion(true);
    rig.steps(3);
    assert!(rig.mailer.sent.is_empty());
    assert_eq!(rig.svc.pending_notifications(), 0);
    assert!(rig.svc.floodlight_lit());
}
