//! Tiltbar - a progress bar rendered as a tilting vessel of liquid.
//!
//! Drag the bar to tilt it and gravity moves the liquid. In voice-over
//! mode the widget talks back when the level passes 80% and rights the
//! vessel itself, up to three times.
//!
//! Core modules:
//! - `vessel`: widget model (physics, trigger state machine, script timers)
//! - `frame_loop`: cancelable repeating frame task
//! - `ui`: ratatui front end
//! - `simulate`: headless driver for scripted runs

pub mod config;
pub mod error;
pub mod frame_loop;
pub mod logging;
pub mod simulate;
pub mod ui;
pub mod vessel;

pub use config::Settings;
pub use error::{Result, TiltbarError};
pub use vessel::{Vessel, VesselSnapshot};
