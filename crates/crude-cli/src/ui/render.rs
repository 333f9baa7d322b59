//! TUI rendering functions.

use crude_core::palette::{FieldTarget, Row};
use crude_core::search::SearchBackend;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus};

/// Draw the full UI.
pub fn draw<B: SearchBackend>(frame: &mut Frame<'_>, app: &App<B>) {
    let field_height = if app.tags.is_some() { 5 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Header
            Constraint::Min(3),               // Location view
            Constraint::Length(field_height), // Form field
            Constraint::Length(1),            // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_location(frame, app, chunks[1]);
    draw_field(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    if app.palette.is_visible() {
        draw_palette(frame, app);
    }
}

fn pane_block<'a>(title: &'a str, focused: bool) -> Block<'a> {
    let color = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color))
}

fn draw_header<B: SearchBackend>(frame: &mut Frame<'_>, app: &App<B>, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "crude",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" | {}", app.location)),
    ]));
    frame.render_widget(header, area);
}

fn draw_location<B: SearchBackend>(frame: &mut Frame<'_>, app: &App<B>, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            app.location.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("history: {}", app.history.len()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let bindings: Vec<(char, &str)> = app.quick_keys.bindings().collect();
    if !bindings.is_empty() {
        lines.push(Line::from(""));
        for (key, url) in bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("[{key}]"), Style::default().fg(Color::Yellow)),
                Span::raw(format!(" {url}")),
            ]));
        }
    }

    let view = Paragraph::new(lines)
        .block(pane_block("Location", app.focus == Focus::Location))
        .wrap(Wrap { trim: false });
    frame.render_widget(view, area);
}

fn draw_field<B: SearchBackend>(frame: &mut Frame<'_>, app: &App<B>, area: Rect) {
    let focused = app.focus == Focus::Field;
    let mut spans = Vec::new();
    let mut suggestions = None;
    let title = match &app.tags {
        Some(tags) => {
            for tag in tags.tags() {
                spans.push(Span::styled(
                    format!("[{}]", tag.search_by),
                    Style::default().fg(Color::Black).bg(Color::Green),
                ));
                spans.push(Span::raw(" "));
            }
            suggestions = Some(if tags.is_loading() {
                Line::from(Span::styled("searching...", Style::default().fg(Color::Yellow)))
            } else {
                Line::from(
                    tags.whitelist()
                        .iter()
                        .map(|s| {
                            Span::styled(
                                format!("{}  ", s.search_by),
                                Style::default().fg(Color::DarkGray),
                            )
                        })
                        .collect::<Vec<_>>(),
                )
            });
            format!("Field -> {}", tags.model())
        }
        None => "Field".to_string(),
    };
    spans.push(Span::raw(app.field.as_str()));

    let mut lines = vec![Line::from(spans)];
    lines.extend(suggestions);
    let field = Paragraph::new(lines).block(pane_block(&title, focused));
    frame.render_widget(field, area);

    if focused && !app.palette.is_visible() {
        let tag_width: usize = app
            .tags
            .as_ref()
            .map(|t| t.tags().iter().map(|tag| tag.search_by.width() + 3).sum())
            .unwrap_or(0);
        let x = u16::try_from(tag_width + app.field.width()).unwrap_or(u16::MAX);
        frame.set_cursor_position((
            area.x.saturating_add(1).saturating_add(x).min(area.right().saturating_sub(2)),
            area.y + 1,
        ));
    }
}

fn draw_status_bar<B: SearchBackend>(frame: &mut Frame<'_>, app: &App<B>, area: Rect) {
    let status = Paragraph::new(Line::from(Span::styled(
        app.status.as_str(),
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(status, area);
}

/// Style for a palette row.
pub(crate) fn row_line(row: &Row, selected: bool) -> Line<'_> {
    match row {
        Row::Separator(name) => Line::from(Span::styled(
            format!("-- {name} --"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )),
        Row::Entry(entry) => {
            let style = if selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("  {}", entry.label), style),
                Span::styled(format!("  {}", entry.url), Style::default().fg(Color::DarkGray)),
            ])
        }
    }
}

/// First row to show so that `selected` stays inside a window of `height`.
pub(crate) fn scroll_offset(selected: Option<usize>, height: usize) -> usize {
    match selected {
        Some(i) if height > 0 && i >= height => i + 1 - height,
        _ => 0,
    }
}

fn draw_palette<B: SearchBackend>(frame: &mut Frame<'_>, app: &App<B>) {
    let area = frame.area();
    let rows = app.palette.rows();
    let list_height = if app.palette.is_list_visible() {
        rows.len().max(1)
    } else {
        0
    };
    let width = 70.min(area.width.saturating_sub(4));
    let height = u16::try_from(list_height)
        .unwrap_or(u16::MAX)
        .saturating_add(3)
        .min(area.height.saturating_sub(2));
    let dialog = Rect::new(
        (area.width.saturating_sub(width)) / 2,
        1.min(area.height),
        width,
        height,
    )
    .intersection(area);
    frame.render_widget(Clear, dialog);

    let title = match app.palette.target() {
        FieldTarget::Foreground => "Go to",
        FieldTarget::Background => "Insert reference",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);
    if inner.height == 0 {
        return;
    }

    let prompt = Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(app.palette.field_value()),
    ]);
    frame.render_widget(Paragraph::new(prompt), Rect { height: 1, ..inner });
    let typed = u16::try_from(app.palette.field_value().width()).unwrap_or(u16::MAX);
    frame.set_cursor_position((
        inner.x.saturating_add(2).saturating_add(typed).min(inner.right().saturating_sub(1)),
        inner.y,
    ));

    if !app.palette.is_list_visible() {
        return;
    }
    let list_area = Rect {
        y: inner.y + 1,
        height: inner.height.saturating_sub(1),
        ..inner
    };
    let selected = app.palette.selected_index();
    let offset = scroll_offset(selected, list_area.height as usize);
    let lines: Vec<Line<'_>> = if rows.is_empty() {
        vec![Line::from(Span::styled(
            "no matches",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        rows.iter()
            .enumerate()
            .skip(offset)
            .take(list_area.height as usize)
            .map(|(i, row)| row_line(row, selected == Some(i)))
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), list_area);
}
