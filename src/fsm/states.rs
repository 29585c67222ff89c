//! Presence states and the transition table.
//!
//! The table is plain data; [`next_state`] is a pure lookup over it and
//! knows nothing about timers, I/O or observers.
//!
//! ```text
//!            raw rises            window             window
//!  ABSENT ─────────────▶ DETECTING ─────▶ DETECTED ─────▶ PARKED
//!    ▲  ▲                   │                │              │  ▲
//!    │  └────[raw falls]────┘                │         [raw │  │ raw
//!    │  └──────────────[raw falls]───────────┘        falls]│  │ rises]
//!    │                                                      ▼  │
//!    └────────────────────[window]───────────────────── LEAVING
//! ```

use core::fmt;

/// Lifecycle of an object in the bay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PresenceState {
    Absent = 0,
    Detecting = 1,
    Detected = 2,
    Parked = 3,
    Leaving = 4,
}

impl PresenceState {
    /// Total number of states.
    pub const COUNT: usize = 5;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Absent,
        Self::Detecting,
        Self::Detected,
        Self::Parked,
        Self::Leaving,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Absent => "Absent",
            Self::Detecting => "Detecting",
            Self::Detected => "Detected",
            Self::Parked => "Parked",
            Self::Leaving => "Leaving",
        }
    }

    /// Whether `self -> to` is one of the legal edges.
    pub fn can_transition_to(self, to: Self) -> bool {
        EDGES.iter().any(|e| e.from == self && e.to == to)
    }
}

impl fmt::Display for PresenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What moved the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Raw presence reading went false → true.
    SensorRose,
    /// Raw presence reading went true → false.
    SensorFell,
    /// The current state's debounce window was exceeded.
    WindowElapsed,
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: PresenceState,
    pub trigger: Trigger,
    pub to: PresenceState,
}

const fn edge(from: PresenceState, trigger: Trigger, to: PresenceState) -> Edge {
    Edge { from, trigger, to }
}

/// Every legal transition.  Anything not listed here is a bug.
pub const EDGES: [Edge; 8] = {
    use PresenceState::{Absent, Detected, Detecting, Leaving, Parked};
    use Trigger::{SensorFell, SensorRose, WindowElapsed};
    [
        edge(Absent, SensorRose, Detecting),
        edge(Detecting, SensorFell, Absent),
        edge(Detecting, WindowElapsed, Detected),
        edge(Detected, SensorFell, Absent),
        edge(Detected, WindowElapsed, Parked),
        edge(Parked, SensorFell, Leaving),
        edge(Leaving, SensorRose, Parked),
        edge(Leaving, WindowElapsed, Absent),
    ]
};

/// Look up the successor of `state` under `trigger`.  `None` = stay put.
pub fn next_state(state: PresenceState, trigger: Trigger) -> Option<PresenceState> {
    EDGES
        .iter()
        .find(|e| e.from == state && e.trigger == trigger)
        .map(|e| e.to)
}

/// Payload of presence events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: PresenceState,
    pub to: PresenceState,
}

/// Which presence channel a transition is announced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Announcement {
    Present,
    Parked,
    Departed,
}

/// Side-effect dispatch for a completed transition.
pub fn announcement(from: PresenceState, to: PresenceState) -> Option<Announcement> {
    match (from, to) {
        (_, PresenceState::Detected) => Some(Announcement::Present),
        (PresenceState::Detected, PresenceState::Parked) => Some(Announcement::Parked),
        (PresenceState::Leaving, PresenceState::Absent) => Some(Announcement::Departed),
        _ => None,
    }
}
