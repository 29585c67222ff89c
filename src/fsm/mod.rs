//! Debounced presence state machine.
//!
//! Turns the noisy "something is in the bay" input into the lifecycle
//! described in [`states`]:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  tick(elapsed)                                               │
//! │   1. time_in_state += elapsed                                │
//! │   2. raw = read(pin)                                         │
//! │   3. raw != last_raw  → apply SensorRose / SensorFell edge   │
//! │   4. time_in_state > window(state) → apply WindowElapsed     │
//! │                                                              │
//! │  transition(to)                                              │
//! │   assert edge is in the table · reset timer · announce       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A transition resets `time_in_state` to zero, so at most one transition
//! happens per tick and the raw edge always wins over the timer.  Side
//! effects run synchronously, after the new state is visible, before
//! `tick` returns.

pub mod states;

use core::time::Duration;

use log::{debug, info};

use crate::app::ports::DigitalIoPort;
use crate::config::MonitorConfig;
use crate::error::Result;
use crate::events::{EventChannel, Source};
use crate::pins::PinId;
use states::{Announcement, PresenceState, Transition, Trigger, announcement, next_state};

// ---------------------------------------------------------------------------
// Debounce windows
// ---------------------------------------------------------------------------

/// How long the machine must sit in each timed state before moving on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceWindows {
    pub detecting: Duration,
    pub detected: Duration,
    pub leaving: Duration,
}

impl DebounceWindows {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            detecting: Duration::from_millis(config.detecting_debounce_ms as u64),
            detected: Duration::from_millis(config.detected_debounce_ms as u64),
            leaving: Duration::from_millis(config.leaving_debounce_ms as u64),
        }
    }

    /// Window for a timed state; `None` for `Absent` and `Parked`.
    pub fn for_state(&self, state: PresenceState) -> Option<Duration> {
        match state {
            PresenceState::Detecting => Some(self.detecting),
            PresenceState::Detected => Some(self.detected),
            PresenceState::Leaving => Some(self.leaving),
            PresenceState::Absent | PresenceState::Parked => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Presence state machine
// ---------------------------------------------------------------------------

/// The presence state machine and its three outbound channels.
#[derive(Debug)]
pub struct PresenceStateMachine {
    pin: PinId,
    state: PresenceState,
    time_in_state: Duration,
    last_raw: bool,
    windows: DebounceWindows,
    on_present: EventChannel<Transition>,
    on_parked: EventChannel<Transition>,
    on_departed: EventChannel<Transition>,
}

impl PresenceStateMachine {
    /// Take the first reading and seed the state from it.
    ///
    /// Debounce is skipped on this very first observation: an object
    /// already in the bay at power-up is `Parked`, otherwise `Absent`.  No
    /// channel fires for the seeded state.
    pub fn new<IO: DigitalIoPort + ?Sized>(
        pin: PinId,
        windows: DebounceWindows,
        io: &mut IO,
    ) -> Result<Self> {
        let raw = io.read_input(pin)?;
        let state = if raw {
            PresenceState::Parked
        } else {
            PresenceState::Absent
        };
        info!("Presence on GPIO {} starting in {} (debounce skipped at boot)", pin, state);
        Ok(Self {
            pin,
            state,
            time_in_state: Duration::ZERO,
            last_raw: raw,
            windows,
            on_present: EventChannel::new("on_present"),
            on_parked: EventChannel::new("on_parked"),
            on_departed: EventChannel::new("on_departed"),
        })
    }

    /// Advance by `elapsed` and sample the sensor once.
    pub fn tick<IO: DigitalIoPort + ?Sized>(&mut self, elapsed: Duration, io: &mut IO) -> Result<()> {
        self.time_in_state += elapsed;

        let raw = io.read_input(self.pin)?;
        if raw != self.last_raw {
            self.last_raw = raw;
            let trigger = if raw {
                Trigger::SensorRose
            } else {
                Trigger::SensorFell
            };
            debug!("Presence raw -> {} in {}", raw, self.state);
            if let Some(next) = next_state(self.state, trigger) {
                return self.transition(next);
            }
        }

        if let Some(window) = self.windows.for_state(self.state) {
            if self.time_in_state > window {
                if let Some(next) = next_state(self.state, Trigger::WindowElapsed) {
                    return self.transition(next);
                }
            }
        }
        Ok(())
    }

    /// Jump straight to `next`.  The edge must still be in the table.
    pub fn force_transition(&mut self, next: PresenceState) -> Result<()> {
        self.transition(next)
    }

    pub fn state(&self) -> PresenceState {
        self.state
    }

    pub fn is_parked(&self) -> bool {
        self.state == PresenceState::Parked
    }

    pub fn time_in_state(&self) -> Duration {
        self.time_in_state
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    /// Fires on every entry into `Detected`.
    pub fn on_present(&mut self) -> &mut EventChannel<Transition> {
        &mut self.on_present
    }

    /// Fires on `Detected -> Parked`.
    pub fn on_parked(&mut self) -> &mut EventChannel<Transition> {
        &mut self.on_parked
    }

    /// Fires on `Leaving -> Absent`.
    pub fn on_departed(&mut self) -> &mut EventChannel<Transition> {
        &mut self.on_departed
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: PresenceState) -> Result<()> {
        let from = self.state;
        assert!(
            from.can_transition_to(next),
            "illegal presence transition: {from} -> {next}"
        );

        info!(
            "Presence transition: {} -> {} (after {} ms)",
            from,
            next,
            self.time_in_state.as_millis()
        );
        self.state = next;
        self.time_in_state = Duration::ZERO;

        let t = Transition { from, to: next };
        match announcement(from, next) {
            Some(Announcement::Present) => self.on_present.fire(Source::Presence, &t),
            Some(Announcement::Parked) => self.on_parked.fire(Source::Presence, &t),
            Some(Announcement::Departed) => self.on_departed.fire(Source::Presence, &t),
            None => Ok(()),
        }
    }
}
