// UI module for rendering the TUI.
// Tab bar, profile cards, console, and status bar.

mod card;
mod tabs;

use chrono::Utc;
use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};
use crate::console::ConsoleLevel;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);

    match app.active_tab {
        Tab::Profile(index) => match app.cards.get(index) {
            Some(card) => card::draw_card(frame, card, app.readme_scroll, chunks[1]),
            None => draw_console_tab(frame, app, chunks[1]),
        },
        Tab::Console => draw_console_tab(frame, app, chunks[1]),
    }

    draw_status_bar(frame, app, chunks[2]);
}

/// Draw the console with newest messages first.
fn draw_console_tab(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Console ");
    let messages = app.console.snapshot();

    if messages.is_empty() {
        let text = Paragraph::new("No messages")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = messages
        .iter()
        .rev()
        .map(|msg| {
            let (icon, color) = match msg.level {
                ConsoleLevel::Error => ("❌", Color::Red),
                ConsoleLevel::Warn => ("⚠️", Color::Yellow),
                ConsoleLevel::Info => ("ℹ️", Color::Cyan),
                ConsoleLevel::Debug => ("·", Color::DarkGray),
            };

            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", icon)),
                Span::styled(
                    format_relative_time(&msg.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(msg.message.clone(), Style::default().fg(color)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Format a timestamp as a short "time ago" string.
fn format_relative_time(timestamp: &chrono::DateTime<Utc>) -> String {
    let secs = Utc::now()
        .signed_duration_since(*timestamp)
        .num_seconds()
        .max(0);
    match secs {
        0..=59 => format!("{}s ago", secs),
        60..=3599 => format!("{}m ago", secs / 60),
        _ => format!("{}h ago", secs / 3600),
    }
}

/// Draw the status bar with keybinding hints and cache state.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec![
        Span::raw(" ↑↓ "),
        Span::styled("Scroll", Style::default().fg(Color::DarkGray)),
        Span::raw("  Tab "),
        Span::styled("Switch", Style::default().fg(Color::DarkGray)),
        Span::raw("  r "),
        Span::styled("Reload", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];

    let (cache_label, cache_color) = if app.cache_enabled() {
        ("  cache: on", Color::DarkGray)
    } else {
        ("  cache: off", Color::Yellow)
    };
    hints.push(Span::styled(cache_label, Style::default().fg(cache_color)));

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_relative_time() {
        let now = Utc::now();
        assert_eq!(format_relative_time(&now), "0s ago");
        assert_eq!(
            format_relative_time(&(now - chrono::Duration::minutes(5))),
            "5m ago"
        );
        assert_eq!(
            format_relative_time(&(now - chrono::Duration::hours(2))),
            "2h ago"
        );
        // Clock skew never shows negative ages
        assert_eq!(
            format_relative_time(&(now + chrono::Duration::minutes(1))),
            "0s ago"
        );
    }
}
