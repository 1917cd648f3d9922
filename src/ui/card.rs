// Profile card rendering.
// Identity on the left; README and recent repositories on the right.

use ratatui::{prelude::*, widgets::*};

use crate::view::{CardStatus, ProfileView};

/// Draw one profile card.
pub fn draw_card(frame: &mut Frame, card: &ProfileView, readme_scroll: u16, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(1)])
        .split(area);

    draw_identity(frame, card, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(9)])
        .split(columns[1]);

    draw_readme(frame, card, readme_scroll, right[0]);
    draw_repos(frame, card, right[1]);
}

fn status_color(status: CardStatus) -> Color {
    match status {
        CardStatus::Loading => Color::Yellow,
        CardStatus::Loaded => Color::Cyan,
        CardStatus::RateLimited => Color::Yellow,
        CardStatus::Failed => Color::Red,
    }
}

fn draw_identity(frame: &mut Frame, card: &ProfileView, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            card.title.clone(),
            Style::default()
                .fg(status_color(card.status))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("@{}", card.username),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    if !card.follow_line.is_empty() {
        lines.push(Line::from(card.follow_line.clone()));
    }
    if let Some(avatar) = &card.avatar_url {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            avatar.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Profile "));
    frame.render_widget(widget, area);
}

fn draw_readme(frame: &mut Frame, card: &ProfileView, scroll: u16, area: Rect) {
    let style = match card.status {
        CardStatus::Loaded => Style::default(),
        CardStatus::RateLimited => Style::default().fg(Color::Yellow),
        _ => Style::default().fg(Color::DarkGray),
    };

    let widget = Paragraph::new(card.readme.as_str())
        .style(style)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(" README "));
    frame.render_widget(widget, area);
}

fn draw_repos(frame: &mut Frame, card: &ProfileView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Popular repositories ");

    if let Some(placeholder) = &card.repos_placeholder {
        let mut lines = vec![Line::from(Span::styled(
            placeholder.clone(),
            Style::default().fg(Color::DarkGray),
        ))];
        if let Some(url) = &card.profile_url {
            lines.push(Line::from(vec![
                Span::raw(format!("Open profile {}: ", card.username)),
                Span::styled(url.clone(), Style::default().fg(Color::Cyan)),
            ]));
        }
        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(widget, area);
        return;
    }

    let items: Vec<ListItem> = card
        .repos
        .iter()
        .map(|repo| {
            let mut spans = vec![
                Span::styled(repo.name.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!(" ⭐ {}", repo.stars),
                    Style::default().fg(Color::Yellow),
                ),
            ];
            if let Some(url) = &repo.url {
                spans.push(Span::styled(
                    format!("  {}", url),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
