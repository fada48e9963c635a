//! Mode radios
//!
//! Shows the Stream/Command radio pair under the device title.

use bgx_core::ModeIndicator;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::ScreenView;

/// Render the mode radios.
pub fn render(frame: &mut Frame, view: &ScreenView, indicator: ModeIndicator, area: Rect) {
    let title = format!(" {} ", view.device_name);
    let block = Block::default().borders(Borders::ALL).title(title);

    let line = Line::from(vec![
        radio("Stream", "F2", indicator.stream_selected()),
        Span::raw("   "),
        radio("Command", "F3", indicator.command_selected()),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn radio(label: &str, key: &str, selected: bool) -> Span<'static> {
    let mark = if selected { "(*)" } else { "( )" };
    let style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Span::styled(format!("{mark} {label} [{key}]"), style)
}
