//! Terminal UI for the tilting vessel.
//!
//! Provides a ratatui front end with:
//! - The vessel, voice-over checkbox and message widgets
//! - Mouse dragging mapped to pointer events
//! - A runner that owns the terminal for the widget's lifetime

pub mod app;
pub mod colors;
pub mod input;
pub mod runner;
pub mod widgets;

pub use app::{App, AppLayout};
pub use colors::Theme;
pub use input::{InputListener, ListenerHandle};
pub use runner::run;
pub use widgets::{MessageWidget, ToggleWidget, VesselWidget};
