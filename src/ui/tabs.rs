// Tab bar rendering with badge support for Console tab.
// One tab per profile card, colored by its load status.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};
use crate::view::CardStatus;

/// Draw the tab bar at the top of the screen.
pub fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = app.tabs();
    let unread = app.console_unread();

    let tab_titles: Vec<Line> = tabs
        .iter()
        .map(|tab| {
            let title = match tab {
                Tab::Profile(index) => app
                    .cards
                    .get(*index)
                    .map(|card| card.username.clone())
                    .unwrap_or_default(),
                Tab::Console if unread > 0 => format!("Console ({})", unread),
                Tab::Console => "Console".to_string(),
            };

            let style = if *tab == app.active_tab {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                match tab {
                    Tab::Console if unread > 0 => Style::default().fg(Color::Red),
                    Tab::Profile(index) => match app.cards.get(*index).map(|c| c.status) {
                        Some(CardStatus::RateLimited) => Style::default().fg(Color::Yellow),
                        Some(CardStatus::Failed) => Style::default().fg(Color::Red),
                        _ => Style::default().fg(Color::White),
                    },
                    Tab::Console => Style::default().fg(Color::White),
                }
            };

            Line::from(Span::styled(title, style))
        })
        .collect();

    let selected_index = tabs.iter().position(|t| *t == app.active_tab).unwrap_or(0);

    let tabs_widget = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" ghcard ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .select(selected_index)
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw(" │ "));

    frame.render_widget(tabs_widget, area);
}
