//! Ratatui widgets for the tilting vessel.
//!
//! Provides:
//! - The vessel itself, with liquid, a slanted surface and a percentage label
//! - The voice-over checkbox
//! - The voice-over message line

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::vessel::VesselSnapshot;

// ============================================================================
// Color Constants
// ============================================================================

mod colors {
    use ratatui::style::Color;

    pub const CYAN: Color = Color::Rgb(34, 211, 238);
    pub const YELLOW: Color = Color::Rgb(234, 179, 8);
    pub const BLUE: Color = Color::Rgb(59, 130, 246);
    pub const GRAY: Color = Color::Rgb(107, 114, 128);
    pub const MUTED: Color = Color::Rgb(75, 85, 99);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

/// Cell drawn for liquid.
pub const LIQUID: &str = "▓";
/// Cell drawn for empty space inside the vessel.
pub const EMPTY: &str = "░";

/// Columns the liquid edge shifts per row for a 45° tilt.
const SLANT_PER_ROW: f64 = 2.0;
/// Steepest tilt used for the surface slant, to keep tan() bounded.
const MAX_SLANT_DEG: f64 = 75.0;

// ============================================================================
// Vessel Widget
// ============================================================================

/// The progress bar drawn as a vessel of liquid.
#[derive(Debug, Clone)]
pub struct VesselWidget {
    /// Displayed fill (0-100)
    percent: u8,
    /// Tilt in degrees
    tilt: f64,
    /// Whether to use colors
    colors: bool,
}

impl VesselWidget {
    /// Create a vessel widget.
    pub fn new(percent: u8, tilt: f64) -> Self {
        Self {
            percent: percent.min(100),
            tilt,
            colors: true,
        }
    }

    /// Build from a vessel snapshot.
    pub fn from_snapshot(snapshot: &VesselSnapshot) -> Self {
        Self::new(snapshot.percent, snapshot.tilt)
    }

    /// Enable/disable colors.
    pub fn colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    /// Label shown across the middle of the vessel.
    pub fn label(&self) -> String {
        format!("{}% Loading", self.percent)
    }

    /// Border title showing the tilt.
    pub fn title(&self) -> String {
        format!(" tilt {:+.0}° ", self.tilt)
    }

    /// Number of liquid cells in `row` of an inner area `width` x `height`.
    ///
    /// The liquid edge sits at the fill percentage on the middle row and
    /// leans with the tilt on the rows above and below it.
    pub fn liquid_columns(&self, row: u16, width: u16, height: u16) -> u16 {
        if self.percent == 0 || width == 0 {
            return 0;
        }
        if self.percent >= 100 {
            return width;
        }

        let base = f64::from(self.percent) / 100.0 * f64::from(width);
        let slope = self
            .tilt
            .clamp(-MAX_SLANT_DEG, MAX_SLANT_DEG)
            .to_radians()
            .tan()
            * SLANT_PER_ROW;
        let middle = f64::from(height.saturating_sub(1)) / 2.0;
        let offset = (f64::from(row) - middle) * slope;

        (base + offset).round().clamp(0.0, f64::from(width)) as u16
    }

    /// Render the inside of the vessel as text rows (without borders).
    pub fn render_lines(&self, width: u16, height: u16) -> Vec<String> {
        let label = self.label();
        let label_row = height / 2;
        let label_start = usize::from(width).saturating_sub(label.chars().count()) / 2;

        (0..height)
            .map(|row| {
                let filled = usize::from(self.liquid_columns(row, width, height));
                let mut line: Vec<char> = LIQUID
                    .repeat(filled)
                    .chars()
                    .chain(EMPTY.repeat(usize::from(width) - filled).chars())
                    .collect();
                if row == label_row && label.chars().count() <= line.len() {
                    for (i, ch) in label.chars().enumerate() {
                        line[label_start + i] = ch;
                    }
                }
                line.into_iter().collect()
            })
            .collect()
    }

    /// Render with borders as a formatted string.
    pub fn render_string(&self, width: usize, height: usize) -> String {
        let inner_width = width.saturating_sub(2);
        let inner_height = height.saturating_sub(2);
        let title = self.title();
        let top_fill = inner_width.saturating_sub(title.chars().count());

        let mut output = format!("┌{}{}┐\n", title, "─".repeat(top_fill));
        for line in self.render_lines(inner_width as u16, inner_height as u16) {
            output.push_str(&format!("│{}│\n", line));
        }
        output.push_str(&format!("└{}┘", "─".repeat(inner_width)));
        output
    }

    fn style(&self, color: Color) -> Style {
        if self.colors {
            Style::default().fg(color)
        } else {
            Style::default()
        }
    }
}

impl Widget for VesselWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.style(colors::GRAY))
            .title(Span::styled(self.title(), self.style(colors::CYAN)));
        let inner = block.inner(area);
        block.render(area, buf);

        for row in 0..inner.height {
            let filled = self.liquid_columns(row, inner.width, inner.height);
            for col in 0..inner.width {
                let (symbol, color) = if col < filled {
                    (LIQUID, colors::BLUE)
                } else {
                    (EMPTY, colors::MUTED)
                };
                if let Some(cell) = buf.cell_mut((inner.x + col, inner.y + row)) {
                    cell.set_symbol(symbol).set_style(self.style(color));
                }
            }
        }

        let label = self.label();
        let label_width = label.chars().count() as u16;
        if label_width <= inner.width {
            let x = inner.x + (inner.width - label_width) / 2;
            let y = inner.y + inner.height / 2;
            let style = self.style(colors::WHITE).add_modifier(Modifier::BOLD);
            buf.set_string(x, y, &label, style);
        }
    }
}

// ============================================================================
// Toggle Widget
// ============================================================================

/// Checkbox controlling voice-over mode.
#[derive(Debug, Clone)]
pub struct ToggleWidget {
    checked: bool,
}

impl ToggleWidget {
    pub fn new(checked: bool) -> Self {
        Self { checked }
    }

    /// Render as a formatted string.
    pub fn render_string(&self) -> String {
        let mark = if self.checked { "x" } else { " " };
        format!("[{}] with Voice-over behavior", mark)
    }
}

impl Widget for ToggleWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = if self.checked {
            Style::default().fg(colors::CYAN)
        } else {
            Style::default().fg(colors::GRAY)
        };
        Paragraph::new(Line::from(Span::styled(self.render_string(), style))).render(area, buf);
    }
}

// ============================================================================
// Message Widget
// ============================================================================

/// The voice-over message line. Renders nothing when the message is empty.
#[derive(Debug, Clone)]
pub struct MessageWidget<'a> {
    message: &'a str,
}

impl<'a> MessageWidget<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }

    pub fn is_visible(&self) -> bool {
        !self.message.is_empty()
    }
}

impl Widget for MessageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.is_visible() {
            return;
        }
        let line = Line::from(vec![
            Span::styled("» ", Style::default().fg(colors::GRAY)),
            Span::styled(
                self.message,
                Style::default()
                    .fg(colors::YELLOW)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}
