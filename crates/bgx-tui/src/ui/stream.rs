//! Serial log
//!
//! Displays the attributed text log. Local runs are white, remote runs are
//! green, and the log follows its tail.

use bgx_app::LogRun;
use bgx_core::Origin;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const BORDER_SIZE: u16 = 2;

/// Render the log.
pub fn render(frame: &mut Frame, runs: &[LogRun], area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Serial ");

    let lines = log_lines(runs);
    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = lines.len().saturating_sub(visible_height);
    let visible: Vec<_> = lines.into_iter().skip(skip).collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

/// Break the runs into styled display lines.
///
/// Line breaks inside run text (including run markers) start new lines;
/// carriage returns are dropped.
pub fn log_lines(runs: &[LogRun]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for run in runs {
        let style = run_style(run.origin);
        for (i, piece) in run.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::from(std::mem::take(&mut current)));
            }
            let piece = piece.replace('\r', "");
            if !piece.is_empty() {
                current.push(Span::styled(piece, style));
            }
        }
    }

    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

fn run_style(origin: Origin) -> Style {
    match origin {
        Origin::Local => Style::default().fg(Color::White),
        Origin::Remote => Style::default().fg(Color::Green),
    }
}

#[cfg(test)]
mod tests {
    use bgx_app::TextLog;

    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn runs_become_lines() {
        let mut log = TextLog::new();
        log.append("AT", Origin::Local);
        log.append("OK\r\n", Origin::Remote);
        log.append("ready", Origin::Remote);

        let lines = log_lines(log.runs());
        let texts: Vec<_> = lines.iter().map(line_text).collect();

        // Leading empty line comes from the first marker
        assert_eq!(texts, ["", ">AT", "<OK", "ready"]);
    }

    #[test]
    fn spans_carry_origin_colors() {
        let mut log = TextLog::new();
        log.append("x", Origin::Remote);
        log.append("y", Origin::Local);

        let lines = log_lines(log.runs());
        assert_eq!(lines[1].spans[0].style.fg, Some(Color::Green));
        assert_eq!(lines[2].spans[0].style.fg, Some(Color::White));
    }

    #[test]
    fn empty_log_has_no_lines() {
        assert!(log_lines(&[]).is_empty());
    }
}
