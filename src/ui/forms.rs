//! Input modals: "Get user by ID" and "Add new user".
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::AppState;
use crate::app::form::AddUserField;
use crate::ui::components::centered_rect;

pub fn render_user_id_input(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 50u16.min(area.width.saturating_sub(4)).max(30);
    let rect = centered_rect(width, 6, area);
    let lines = vec![
        Line::raw(format!("User ID: {}_", app.user_id_input)),
        Line::raw(""),
        Line::from(Span::styled(
            "Enter: fetch user  Esc: cancel",
            Style::default().fg(app.theme.muted),
        )),
    ];
    let p = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Get user by ID")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_add_user_form(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let rect = centered_rect(width, 13, area);
    let form = &app.add_user_form;
    let focused = form.focused();

    let mut lines: Vec<Line> = AddUserField::ALL
        .iter()
        .map(|&field| {
            let marker = if field == focused { "▶" } else { " " };
            let cursor = if field == focused { "_" } else { "" };
            let style = if field == focused {
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text)
            };
            Line::from(vec![
                Span::raw(format!("{marker} {:<13}", format!("{}:", field.label()))),
                Span::styled(format!("{}{cursor}", form.value(field)), style),
            ])
        })
        .collect();
    lines.push(Line::raw(""));
    if let Some(name) = form.photo_file_name() {
        lines.push(Line::raw(format!("  Photo: {name}")));
    } else {
        lines.push(Line::raw(""));
    }
    lines.push(Line::from(Span::styled(
        "Tab/Up/Down: field  Enter: add user  Esc: close",
        Style::default().fg(app.theme.muted),
    )));

    let p = Paragraph::new(lines).block(
        Block::default()
            .title("Add new user")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
