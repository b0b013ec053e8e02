//! Headless simulation.
//!
//! Drives a [`Vessel`] on a virtual clock without a terminal, which makes
//! the widget scriptable from the command line and easy to inspect: apply
//! drag gestures, run a number of frames, print snapshots.

use std::io::Write;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::config::Settings;
use crate::error::{Result, TiltbarError};
use crate::ui::colors::Theme;
use crate::vessel::{Vessel, VesselSnapshot};

/// Output format for simulation reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// One human-readable line per snapshot
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// What to simulate.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    /// Switch voice-over on before anything else
    pub voiceover: bool,
    /// Drag gestures (vertical pixels) applied in order before the first frame
    pub drags: Vec<f64>,
    /// Number of frames to run
    pub frames: u64,
    /// Emit a snapshot every N frames (0 = final frame only)
    pub every: u64,
}

impl Default for SimulationPlan {
    fn default() -> Self {
        Self {
            voiceover: false,
            drags: Vec::new(),
            frames: 60,
            every: 0,
        }
    }
}

/// A snapshot taken at a given frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSample {
    pub frame: u64,
    pub elapsed_ms: u64,
    #[serde(flatten)]
    pub snapshot: VesselSnapshot,
}

/// Virtual time of `frame` at `fps`.
pub fn frame_time(frame: u64, fps: u32) -> Duration {
    let fps = u64::from(fps.max(1));
    Duration::from_micros(frame * 1_000_000 / fps)
}

/// Run `plan` against a fresh vessel built from `settings`.
///
/// Returns the sampled frames, always ending with the last one.
pub fn simulate(settings: &Settings, plan: &SimulationPlan) -> Vec<FrameSample> {
    let mut vessel = Vessel::new(settings.physics(), settings.voiceover.threshold);
    if plan.voiceover || settings.voiceover.enabled {
        vessel.set_voiceover(true);
    }
    for &distance in &plan.drags {
        drag(&mut vessel, distance);
    }
    debug!(
        frames = plan.frames,
        tilt = vessel.tilt().degrees(),
        "simulation starting"
    );

    let mut samples = Vec::new();
    let fps = settings.display.fps;
    for frame in 1..=plan.frames {
        let elapsed = frame_time(frame, fps);
        vessel.tick(elapsed);
        let due = plan.every > 0 && frame % plan.every == 0;
        if due || frame == plan.frames {
            samples.push(FrameSample {
                frame,
                elapsed_ms: elapsed.as_millis() as u64,
                snapshot: vessel.snapshot(),
            });
        }
    }

    vessel.teardown();
    if samples.is_empty() {
        samples.push(FrameSample {
            frame: 0,
            elapsed_ms: 0,
            snapshot: vessel.snapshot(),
        });
    }
    samples
}

/// A full press-move-release gesture covering `distance` pixels.
fn drag(vessel: &mut Vessel, distance: f64) {
    vessel.pointer_down(0.0);
    vessel.pointer_move(distance);
    vessel.pointer_up();
}

/// Format one sample as a text line.
pub fn format_text(sample: &FrameSample, theme: &Theme) -> String {
    let snapshot = &sample.snapshot;
    let mut line = format!(
        "frame {:>5}  {:>6}ms  fill {}  tilt {}",
        sample.frame,
        sample.elapsed_ms,
        theme.paint(&format!("{:>3}%", snapshot.percent), theme.liquid),
        theme.paint(&format!("{:>+6.1}°", snapshot.tilt), theme.tilt),
    );
    if snapshot.voiceover {
        line.push_str(&theme.paint(
            &format!("  voice-over {}/3", snapshot.trigger_count),
            theme.muted,
        ));
    }
    if snapshot.has_message() {
        line.push_str("  ");
        line.push_str(&theme.paint(&format!("\"{}\"", snapshot.message), theme.message));
    }
    line
}

/// Write samples to `out` in the requested format.
pub fn write_report<W: Write>(
    out: &mut W,
    samples: &[FrameSample],
    format: ReportFormat,
    theme: &Theme,
) -> Result<()> {
    for sample in samples {
        match format {
            ReportFormat::Text => {
                writeln!(out, "{}", format_text(sample, theme)).map_err(TiltbarError::Output)?
            }
            ReportFormat::Json => {
                let line = serde_json::to_string(sample)?;
                writeln!(out, "{}", line).map_err(TiltbarError::Output)?;
            }
        }
    }
    out.flush().map_err(TiltbarError::Output)
}
