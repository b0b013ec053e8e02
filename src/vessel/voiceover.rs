//! Voice-over trigger state machine.
//!
//! Each time the fill level crosses the threshold while the mode is armed,
//! the widget plays the next step of a fixed three-step script. The first
//! two steps force the vessel back to a draining tilt and block further
//! triggers until their script finishes. The third only talks, after which
//! the machine is spent.

use std::time::Duration;

/// Tilt the first two steps force the vessel to.
pub const CORRECTION_TILT_DEG: f64 = -60.0;
/// Number of scripted responses before the machine stops reacting.
pub const MAX_TRIGGERS: u8 = 3;

/// Something a script does after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptAction {
    /// Replace the displayed message
    Say(&'static str),
    /// Clear the message and end the running step
    Finish,
}

/// A delayed action relative to the moment the step started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub delay_ms: u64,
    pub action: ScriptAction,
}

impl Cue {
    const fn new(delay_ms: u64, action: ScriptAction) -> Self {
        Self { delay_ms, action }
    }

    /// Delay as a duration.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// One scripted response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Script {
    /// Tilt applied immediately, if any
    pub forced_tilt: Option<f64>,
    /// Message shown immediately
    pub opening: &'static str,
    /// Follow-ups, all scheduled at once when the step starts
    pub cues: &'static [Cue],
}

pub static FIRST_SCRIPT: Script = Script {
    forced_tilt: Some(CORRECTION_TILT_DEG),
    opening: "hey! dont touch my paper!",
    cues: &[
        Cue::new(1000, ScriptAction::Say("I mean progressbar!")),
        Cue::new(3000, ScriptAction::Say("that's much better")),
        Cue::new(5000, ScriptAction::Finish),
    ],
};

pub static SECOND_SCRIPT: Script = Script {
    forced_tilt: Some(CORRECTION_TILT_DEG),
    opening: "stop already!",
    cues: &[
        Cue::new(1500, ScriptAction::Say("hands up, dont touch anything else")),
        Cue::new(4000, ScriptAction::Finish),
    ],
};

pub static THIRD_SCRIPT: Script = Script {
    forced_tilt: None,
    opening: "you just never give up, do you",
    cues: &[Cue::new(3000, ScriptAction::Finish)],
};

/// Where the voice-over sequence currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerState {
    /// Nothing has happened yet
    #[default]
    Idle,
    /// First response played; `busy` while its script runs
    Step1 { busy: bool },
    /// Second response played; `busy` while its script runs
    Step2 { busy: bool },
    /// Third response is on screen
    Step3,
    /// All responses used up
    Exhausted,
}

impl TriggerState {
    /// How many times the threshold has triggered a response.
    pub fn count(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Step1 { .. } => 1,
            Self::Step2 { .. } => 2,
            Self::Step3 | Self::Exhausted => MAX_TRIGGERS,
        }
    }

    /// Whether a forced-correction script is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Step1 { busy: true } | Self::Step2 { busy: true })
    }

    /// Whether a threshold crossing would start a new step.
    pub fn accepts_trigger(self) -> bool {
        self.count() < MAX_TRIGGERS && !self.is_busy()
    }

    /// Transition for a threshold crossing.
    ///
    /// Returns the next state and the script to play, or `None` if the
    /// crossing is ignored (busy or spent).
    pub fn on_trigger(self) -> (Self, Option<&'static Script>) {
        match self {
            Self::Idle => (Self::Step1 { busy: true }, Some(&FIRST_SCRIPT)),
            Self::Step1 { busy: false } => (Self::Step2 { busy: true }, Some(&SECOND_SCRIPT)),
            Self::Step2 { busy: false } => (Self::Step3, Some(&THIRD_SCRIPT)),
            other => (other, None),
        }
    }

    /// Transition for the end of the running script.
    pub fn on_finish(self) -> Self {
        match self {
            Self::Step1 { busy: true } => Self::Step1 { busy: false },
            Self::Step2 { busy: true } => Self::Step2 { busy: false },
            Self::Step3 => Self::Exhausted,
            other => other,
        }
    }
}
