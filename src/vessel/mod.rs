//! The tilting vessel widget model.
//!
//! [`Vessel`] owns every piece of widget state: fill level, tilt angle,
//! voice-over mode, the scripted message, trigger bookkeeping, drag state
//! and the pending script timers. It has no notion of a terminal or of real
//! time; the caller feeds it frame ticks (elapsed time since mount) and
//! pointer events, and renders from [`Vessel::snapshot`].

pub mod physics;
pub mod timers;
pub mod voiceover;

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

pub use physics::{FillLevel, Physics, TiltAngle, GRAVITY_FACTOR};
pub use timers::{Scheduler, TimerGroup, TimerId};
pub use voiceover::{Script, ScriptAction, TriggerState};

/// Fill level at which the voice-over reacts.
pub const DEFAULT_THRESHOLD: f64 = 80.0;

/// Initial fill/tilt when voice-over mode is switched on.
pub const VOICEOVER_START_FILL: f64 = 20.0;
pub const VOICEOVER_START_TILT: f64 = -20.0;

/// Transient pointer drag state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Vertical pointer position at the last processed event
    pub last_y: f64,
}

/// What happened during a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Script actions that fired before the physics step
    pub fired: usize,
    /// Whether liquid moved this frame
    pub flowed: bool,
    /// Whether this frame started a voice-over step
    pub triggered: bool,
}

/// Render-facing view of the widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VesselSnapshot {
    /// Exact fill level
    pub fill: f64,
    /// Fill level as displayed (floored)
    pub percent: u8,
    /// Tilt in degrees
    pub tilt: f64,
    pub voiceover: bool,
    /// Current message, empty when hidden
    pub message: String,
    pub trigger_count: u8,
    pub trigger_busy: bool,
}

impl VesselSnapshot {
    /// Whether there is a message to show.
    pub fn has_message(&self) -> bool {
        !self.message.is_empty()
    }
}

/// The widget model.
#[derive(Debug)]
pub struct Vessel {
    physics: Physics,
    threshold: f64,
    fill: FillLevel,
    tilt: TiltAngle,
    voiceover: bool,
    message: &'static str,
    trigger: TriggerState,
    drag: Option<DragState>,
    timers: Scheduler<ScriptAction>,
    torn_down: bool,
}

impl Default for Vessel {
    fn default() -> Self {
        Self::new(Physics::default(), DEFAULT_THRESHOLD)
    }
}

impl Vessel {
    /// Create an empty, level vessel with voice-over off.
    pub fn new(physics: Physics, threshold: f64) -> Self {
        Self {
            physics,
            threshold,
            fill: FillLevel::EMPTY,
            tilt: TiltAngle::LEVEL,
            voiceover: false,
            message: "",
            trigger: TriggerState::Idle,
            drag: None,
            timers: Scheduler::new(),
            torn_down: false,
        }
    }

    pub fn fill(&self) -> FillLevel {
        self.fill
    }

    pub fn tilt(&self) -> TiltAngle {
        self.tilt
    }

    pub fn voiceover_enabled(&self) -> bool {
        self.voiceover
    }

    /// Current message; empty when nothing is being said.
    pub fn message(&self) -> &str {
        self.message
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.trigger
    }

    pub fn trigger_count(&self) -> u8 {
        self.trigger.count()
    }

    pub fn is_trigger_busy(&self) -> bool {
        self.trigger.is_busy()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Number of script timers still waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    /// Advance the widget to `now` (time since mount) and run one frame.
    ///
    /// Script timers that came due since the previous frame fire first.
    /// Then the fill level flows according to the tilt and, if the vessel
    /// is not resting, the voice-over threshold is checked.
    pub fn tick(&mut self, now: Duration) -> FrameReport {
        let mut report = FrameReport::default();
        if self.torn_down {
            return report;
        }

        for action in self.timers.advance_to(now) {
            self.apply(action);
            report.fired += 1;
        }

        let Some(fill) = self.physics.step(self.fill, self.tilt) else {
            return report;
        };
        self.fill = fill;
        report.flowed = true;

        if self.voiceover && fill.value() >= self.threshold && self.trigger.accepts_trigger() {
            report.triggered = self.trigger_voiceover();
        }
        report
    }

    /// Start the next scripted response. No-op while a step is running.
    fn trigger_voiceover(&mut self) -> bool {
        let (next, script) = self.trigger.on_trigger();
        let Some(script) = script else {
            return false;
        };
        self.trigger = next;

        if let Some(tilt) = script.forced_tilt {
            self.tilt = TiltAngle::new(tilt);
        }
        self.message = script.opening;

        let group = self.timers.open_group();
        for cue in script.cues {
            self.timers.schedule(group, cue.delay(), cue.action);
        }

        info!(
            step = self.trigger.count(),
            fill = self.fill.value(),
            tilt = self.tilt.degrees(),
            "voice-over triggered"
        );
        true
    }

    fn apply(&mut self, action: ScriptAction) {
        match action {
            ScriptAction::Say(text) => self.message = text,
            ScriptAction::Finish => {
                self.message = "";
                self.trigger = self.trigger.on_finish();
                debug!(state = ?self.trigger, "voice-over step finished");
            }
        }
    }

    /// Pointer pressed: start dragging from `y`.
    pub fn pointer_down(&mut self, y: f64) {
        if self.torn_down {
            return;
        }
        self.drag = Some(DragState { last_y: y });
    }

    /// Pointer moved to `y`. Tilts the vessel while dragging.
    pub fn pointer_move(&mut self, y: f64) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let delta = y - drag.last_y;
        drag.last_y = y;
        self.tilt = self.physics.drag(self.tilt, delta);
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Pointer left the widget; ends the drag like a release.
    pub fn pointer_leave(&mut self) {
        self.drag = None;
    }

    /// Switch voice-over mode and reset to that mode's baseline.
    ///
    /// Pending script timers are canceled before anything is reset.
    pub fn set_voiceover(&mut self, enabled: bool) {
        if self.torn_down {
            return;
        }
        let canceled = self.timers.cancel_all();

        self.voiceover = enabled;
        if enabled {
            self.fill = FillLevel::new(VOICEOVER_START_FILL);
            self.tilt = TiltAngle::new(VOICEOVER_START_TILT);
        } else {
            self.fill = FillLevel::EMPTY;
            self.tilt = TiltAngle::LEVEL;
        }
        self.trigger = TriggerState::Idle;
        self.message = "";

        debug!(enabled, canceled, "voice-over mode toggled");
    }

    /// Flip voice-over mode.
    pub fn toggle_voiceover(&mut self) {
        self.set_voiceover(!self.voiceover);
    }

    /// Unmount: cancel all timers and stop reacting to anything.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let canceled = self.timers.cancel_all();
        self.drag = None;
        self.torn_down = true;
        debug!(canceled, "vessel torn down");
    }

    /// Current state for rendering.
    pub fn snapshot(&self) -> VesselSnapshot {
        VesselSnapshot {
            fill: self.fill.value(),
            percent: self.fill.percent(),
            tilt: self.tilt.degrees(),
            voiceover: self.voiceover,
            message: self.message.to_string(),
            trigger_count: self.trigger.count(),
            trigger_busy: self.trigger.is_busy(),
        }
    }
}
