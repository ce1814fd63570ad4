//! Frame rendering.

use pyenv_menu::view::{self, Row};
use pyenv_menu::{CommandRunner, NotificationStyle};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::app::App;

mod colors {
    use ratatui::style::Color;

    pub const BORDER: Color = Color::Rgb(100, 110, 130);
    pub const SELECTED: Color = Color::Rgb(100, 180, 220);
    pub const SURFACE_HIGHLIGHT: Color = Color::Rgb(50, 55, 70);

    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 230);
    pub const TEXT_DIM: Color = Color::Rgb(130, 135, 150);
    pub const TEXT_MUTED: Color = Color::Rgb(90, 95, 110);

    pub const CURRENT: Color = Color::Rgb(120, 180, 120);
    pub const IN_PROGRESS: Color = Color::Rgb(200, 180, 100);
    pub const ERROR: Color = Color::Rgb(200, 100, 100);
}

pub fn render<R: CommandRunner>(frame: &mut Frame<'_>, app: &App<R>) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title
        Constraint::Min(0),    // List
        Constraint::Length(1), // Search
        Constraint::Length(1), // Status
        Constraint::Length(1), // Key hints
    ])
    .split(frame.area());

    render_title(frame, chunks[0], app);
    render_list(frame, chunks[1], app);
    render_search(frame, chunks[2], app);
    render_status(frame, chunks[3], app);
    render_hints(frame, chunks[4], app);
}

fn render_title<R: CommandRunner>(frame: &mut Frame<'_>, area: Rect, app: &App<R>) {
    let state = app.manager.state();
    let mut spans = vec![Span::styled(
        view::navigation_title(state),
        Style::default()
            .fg(colors::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD),
    )];
    if state.loading {
        spans.push(Span::styled(
            "  loading...",
            Style::default().fg(colors::IN_PROGRESS),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn row_item(row: &Row) -> ListItem<'static> {
    let marker = if row.is_current { "* " } else { "  " };
    let mut spans = vec![
        Span::styled(marker, Style::default().fg(colors::CURRENT)),
        Span::styled(row.title.clone(), Style::default().fg(colors::TEXT_PRIMARY)),
    ];
    if let Some(subtitle) = &row.subtitle {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            subtitle.clone(),
            Style::default().fg(colors::TEXT_DIM),
        ));
    }
    ListItem::new(Line::from(spans))
}

fn render_list<R: CommandRunner>(frame: &mut Frame<'_>, area: Rect, app: &App<R>) {
    let rows = app.visible_rows();
    let items: Vec<ListItem<'_>> = rows.iter().map(row_item).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::TOP | Borders::BOTTOM)
                .border_style(Style::default().fg(colors::BORDER)),
        )
        .highlight_style(
            Style::default()
                .bg(colors::SURFACE_HIGHLIGHT)
                .fg(colors::SELECTED)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_search<R: CommandRunner>(frame: &mut Frame<'_>, area: Rect, app: &App<R>) {
    if app.manager.mode().is_none() {
        return;
    }

    let line = if app.filtering || !app.filter.is_empty() {
        let cursor = if app.filtering { "_" } else { "" };
        Line::from(vec![
            Span::styled("/ ", Style::default().fg(colors::TEXT_DIM)),
            Span::styled(
                format!("{}{cursor}", app.filter),
                Style::default().fg(colors::TEXT_PRIMARY),
            ),
        ])
    } else {
        Line::from(Span::styled(
            view::SEARCH_PLACEHOLDER,
            Style::default().fg(colors::TEXT_MUTED),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status<R: CommandRunner>(frame: &mut Frame<'_>, area: Rect, app: &App<R>) {
    let Some(notification) = &app.status else {
        return;
    };

    let color = match notification.style {
        NotificationStyle::Success => colors::CURRENT,
        NotificationStyle::InProgress => colors::IN_PROGRESS,
        NotificationStyle::Failure => colors::ERROR,
    };
    let text = match &notification.message {
        Some(message) => format!("{}: {message}", notification.title),
        None => notification.title.clone(),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color)))),
        area,
    );
}

fn render_hints<R: CommandRunner>(frame: &mut Frame<'_>, area: Rect, app: &App<R>) {
    let label = app.selected_row().map_or("Select", |row| row.label);
    let hints = if app.filtering {
        "type to filter · Enter done · Esc clear".to_string()
    } else if app.manager.mode().is_some() {
        format!("Enter {label} · / search · Esc back · q quit")
    } else {
        format!("Enter {label} · ↑/↓ move · q quit")
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(colors::TEXT_MUTED),
        ))),
        area,
    );
}
