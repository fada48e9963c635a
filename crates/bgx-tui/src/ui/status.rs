//! Status bar
//!
//! Displays connection state, device identity and the latest notice.

use bgx_core::ConnectionState;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::ScreenView;

/// Render the status bar.
pub fn render(frame: &mut Frame, view: &ScreenView, notice: Option<&str>, area: Rect) {
    let connection = match view.connection {
        ConnectionState::Connected => Span::styled(
            "Connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        ConnectionState::Connecting | ConnectionState::Interrogating => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Disconnecting | ConnectionState::Disconnected => {
            Span::styled("Disconnected", Style::default().fg(Color::Red))
        },
        ConnectionState::Unknown => Span::raw("Unknown"),
    };

    let identity = view.identity.as_ref().map_or_else(String::new, |identity| {
        format!(" | {:?} {}", identity.part_id, identity.device_uuid)
    });

    let mut spans = vec![
        Span::raw(" "),
        connection,
        Span::styled(identity, Style::default().fg(Color::Gray)),
    ];
    if let Some(notice) = notice {
        spans.push(Span::styled(
            format!(" | {notice}"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
