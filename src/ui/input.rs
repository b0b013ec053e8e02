//! Terminal input forwarding.
//!
//! Crossterm's event reading blocks, so a background thread polls for
//! events and hands them to the async event loop over a channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tracing::warn;

/// How long each poll waits before re-checking the running flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Listener that forwards terminal events to a channel.
pub struct InputListener {
    /// Where events are sent
    sender: mpsc::UnboundedSender<Event>,
    /// Whether the listener is running
    running: Arc<AtomicBool>,
}

impl InputListener {
    /// Create a listener and the receiver its events arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let listener = Self {
            sender,
            running: Arc::new(AtomicBool::new(false)),
        };
        (listener, receiver)
    }

    /// Check if the listener is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Start reading events on a background thread.
    ///
    /// Returns a handle that stops the thread when told to or dropped.
    pub fn start(&self) -> ListenerHandle {
        let sender = self.sender.clone();
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::Relaxed);

        let handle = thread::spawn(move || {
            while running.load(Ordering::Relaxed) {
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => match event::read() {
                        Ok(event) => {
                            if sender.send(event).is_err() {
                                break;
                            }
                        }
                        Err(err) => warn!(%err, "failed to read terminal event"),
                    },
                    Ok(false) => {}
                    Err(err) => {
                        warn!(%err, "terminal event polling failed");
                        break;
                    }
                }
            }
            running.store(false, Ordering::Relaxed);
        });

        ListenerHandle {
            running: Arc::clone(&self.running),
            handle: Some(handle),
        }
    }
}

/// Handle to a running input listener.
pub struct ListenerHandle {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ListenerHandle {
    /// Stop the listener and wait for its thread to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
