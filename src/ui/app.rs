//! TUI application state.
//!
//! Owns the [`Vessel`], lays out the screen and translates terminal mouse
//! and keyboard events into widget operations.

use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use tracing::{debug, info};

use super::widgets::{MessageWidget, ToggleWidget, VesselWidget};
use crate::config::Settings;
use crate::vessel::{FrameReport, Vessel};

/// Key hint shown below the vessel.
pub const KEY_HINT: &str = "drag the bar to tilt | [v] voice-over | [q] quit";

/// Screen regions, recomputed on every draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub toggle: Rect,
    pub message: Rect,
    pub vessel: Rect,
    pub hint: Rect,
}

impl AppLayout {
    /// Split `area` into the widget's regions.
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // Voice-over toggle
                Constraint::Length(1), // Message
                Constraint::Min(3),    // Vessel
                Constraint::Length(1), // Key hint
            ])
            .split(area);
        Self {
            toggle: chunks[0],
            message: chunks[1],
            vessel: chunks[2],
            hint: chunks[3],
        }
    }
}

/// The interactive application.
pub struct App {
    /// Widget model
    vessel: Vessel,
    /// Virtual pixels per terminal row
    row_height: f64,
    /// Whether to use colors
    colors: bool,
    /// Layout from the last draw, used for hit-testing
    layout: Option<AppLayout>,
    /// Cleared when the user asks to quit
    running: bool,
}

impl App {
    /// Create the application from settings.
    ///
    /// If voice-over is enabled in the settings, the mode is switched on at
    /// mount so the vessel starts from the voice-over baseline.
    pub fn new(settings: &Settings) -> Self {
        let mut vessel = Vessel::new(settings.physics(), settings.voiceover.threshold);
        if settings.voiceover.enabled {
            vessel.set_voiceover(true);
        }
        Self {
            vessel,
            row_height: settings.display.row_height,
            colors: settings.display.colors,
            layout: None,
            running: true,
        }
    }

    /// The widget model.
    pub fn vessel(&self) -> &Vessel {
        &self.vessel
    }

    /// Check if should continue running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ask the application to exit.
    pub fn quit(&mut self) {
        info!("quit requested");
        self.running = false;
    }

    /// Layout from the most recent draw.
    pub fn layout(&self) -> Option<AppLayout> {
        self.layout
    }

    /// Set the layout directly, as a draw would.
    pub fn set_area(&mut self, area: Rect) {
        self.layout = Some(AppLayout::new(area));
    }

    /// Advance one animation frame.
    pub fn on_frame(&mut self, elapsed: Duration) -> FrameReport {
        self.vessel.tick(elapsed)
    }

    /// Dispatch a terminal event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::FocusLost => self.vessel.pointer_leave(),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('v') | KeyCode::Char(' ') => self.vessel.toggle_voiceover(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(layout) = self.layout else {
            return;
        };
        let position = Position::new(mouse.column, mouse.row);
        let y = f64::from(mouse.row) * self.row_height;
        let in_vessel = layout.vessel.contains(position);

        match mouse.kind {
            MouseEventKind::Down(_) if in_vessel => self.vessel.pointer_down(y),
            MouseEventKind::Down(MouseButton::Left) if layout.toggle.contains(position) => {
                self.vessel.toggle_voiceover();
            }
            MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                if in_vessel {
                    self.vessel.pointer_move(y);
                } else if self.vessel.is_dragging() {
                    debug!(column = mouse.column, row = mouse.row, "pointer left the vessel");
                    self.vessel.pointer_leave();
                }
            }
            MouseEventKind::Up(_) => self.vessel.pointer_up(),
            _ => {}
        }
    }

    /// Unmount the widget.
    pub fn teardown(&mut self) {
        self.vessel.teardown();
    }

    /// Render to a ratatui frame.
    pub fn render(&mut self, frame: &mut Frame) {
        let layout = AppLayout::new(frame.area());
        self.layout = Some(layout);
        let snapshot = self.vessel.snapshot();

        frame.render_widget(ToggleWidget::new(snapshot.voiceover), layout.toggle);
        frame.render_widget(MessageWidget::new(&snapshot.message), layout.message);
        frame.render_widget(
            VesselWidget::from_snapshot(&snapshot).colors(self.colors),
            layout.vessel,
        );
        frame.render_widget(
            Paragraph::new(Line::styled(
                KEY_HINT,
                Style::default().fg(Color::Rgb(107, 114, 128)),
            )),
            layout.hint,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn app() -> App {
        let mut app = App::new(&Settings::default());
        app.set_area(Rect::new(0, 0, 40, 10));
        app
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_layout_regions() {
        let layout = AppLayout::new(Rect::new(0, 0, 40, 10));
        assert_eq!(layout.toggle.y, 1);
        assert_eq!(layout.message.y, 2);
        assert_eq!(layout.vessel.y, 3);
        assert_eq!(layout.vessel.height, 5);
        assert_eq!(layout.hint.y, 8);
    }

    #[test]
    fn test_drag_inside_vessel_tilts() {
        let mut app = app();
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 4));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 6));
        // Two rows at 8 virtual pixels each, halved by the gravity factor.
        assert_eq!(app.vessel().tilt().degrees(), 8.0);

        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 10, 6));
        assert!(!app.vessel().is_dragging());
    }

    #[test]
    fn test_drag_outside_vessel_leaves() {
        let mut app = app();
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Right), 10, 4));
        assert!(app.vessel().is_dragging());
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Right), 10, 9));
        assert!(!app.vessel().is_dragging());
        assert_eq!(app.vessel().tilt().degrees(), 0.0);
    }

    #[test]
    fn test_click_toggle_enables_voiceover() {
        let mut app = app();
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 3, 1));
        assert!(app.vessel().voiceover_enabled());
        assert_eq!(app.vessel().fill().value(), 20.0);
        assert_eq!(app.vessel().tilt().degrees(), -20.0);
    }

    #[test]
    fn test_keys() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('v')));
        assert!(app.vessel().voiceover_enabled());
        app.handle_event(key(KeyCode::Char(' ')));
        assert!(!app.vessel().voiceover_enabled());

        assert!(app.is_running());
        app.handle_event(key(KeyCode::Char('q')));
        assert!(!app.is_running());
    }

    #[test]
    fn test_mouse_ignored_before_first_draw() {
        let mut app = App::new(&Settings::default());
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 4));
        assert!(!app.vessel().is_dragging());
    }

    #[test]
    fn test_voiceover_enabled_from_settings() {
        let mut settings = Settings::default();
        settings.voiceover.enabled = true;
        let app = App::new(&settings);
        assert!(app.vessel().voiceover_enabled());
        assert_eq!(app.vessel().fill().percent(), 20);
    }

    #[test]
    fn test_render_into_test_backend() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("with Voice-over behavior"));
        assert!(text.contains("0% Loading"));
        assert_eq!(app.layout(), Some(AppLayout::new(Rect::new(0, 0, 40, 10))));
    }
}
