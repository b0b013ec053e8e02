//! Repeating frame task bound to the widget's lifetime.
//!
//! The frame loop runs a tokio interval in a background task and delivers
//! [`FrameTick`]s through a channel. It has an explicit start/stop contract:
//! [`FrameLoop::stop`] aborts the task, and dropping the loop stops it as
//! well. A tick already sitting in the channel when the loop stops is stale
//! and should be ignored by the consumer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Ticks buffered before the producer waits for the consumer.
const CHANNEL_CAPACITY: usize = 4;

/// A single animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Frame number since the loop was (re)started, starting at 1
    pub frame: u64,
    /// Time since the loop was (re)started
    pub elapsed: Duration,
}

/// Cancelable repeating frame task.
pub struct FrameLoop {
    /// Time between frames.
    period: Duration,
    /// Channel sender for frame ticks.
    sender: mpsc::Sender<FrameTick>,
    /// Handle to the background task.
    task: Option<JoinHandle<()>>,
}

impl FrameLoop {
    /// Create a frame loop running at `fps` frames per second.
    ///
    /// Returns the loop and the receiver its ticks are delivered to.
    /// A rate of zero is treated as one frame per second.
    pub fn new(fps: u32) -> (Self, mpsc::Receiver<FrameTick>) {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let period = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
        let frame_loop = Self {
            period,
            sender,
            task: None,
        };
        (frame_loop, receiver)
    }

    /// Time between frames.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start producing ticks. Restarts the loop if it is already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        self.stop();

        let period = self.period;
        let sender = self.sender.clone();
        let handle = tokio::spawn(async move {
            let started = Instant::now();
            let mut interval = tokio::time::interval_at(started + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut frame = 0u64;

            loop {
                let at = interval.tick().await;
                frame += 1;
                let tick = FrameTick {
                    frame,
                    elapsed: at.duration_since(started),
                };
                if sender.send(tick).await.is_err() {
                    // Receiver dropped; nobody is rendering any more.
                    break;
                }
            }
        });

        debug!(period_ms = period.as_millis() as u64, "frame loop started");
        self.task = Some(handle);
    }

    /// Stop producing ticks.
    pub fn stop(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
            debug!("frame loop stopped");
        }
    }

    /// Whether the background task is alive.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
