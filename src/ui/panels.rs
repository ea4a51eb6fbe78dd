use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use serde_json::Value;

use crate::app::AppState;
use crate::ui::components::wrap_text;

fn panel<'a>(title: &'a str, app: &AppState) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Display text of one field of a user record; strings unquoted.
pub fn field_text(user: &Value, key: &str) -> String {
    match user.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

pub fn render_token(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match &app.screen().token {
        Some(token) => token.clone(),
        None => "(none)  t: generate".to_string(),
    };
    let p = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(app.theme.text))
        .block(panel("Token", app));
    f.render_widget(p, area);
}

/// Pretty-printed positions; `[` and `]` scroll when they overflow.
pub fn render_positions(f: &mut Frame, area: Rect, app: &mut AppState) {
    let text = match app.screen().visible_positions() {
        Some(positions) => pretty(positions),
        None => "p: get positions".to_string(),
    };
    let lines = wrap_text(&text, area.width.saturating_sub(2));
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(area.height.saturating_sub(2));
    app.positions_scroll = app.positions_scroll.min(max_scroll);

    let title = if max_scroll > 0 {
        format!("Positions ([ ]: scroll {}/{})", app.positions_scroll, max_scroll)
    } else {
        "Positions".to_string()
    };
    let p = Paragraph::new(lines.into_iter().map(Line::raw).collect::<Vec<_>>())
        .scroll((app.positions_scroll, 0))
        .style(Style::default().fg(app.theme.text))
        .block(panel(&title, app));
    f.render_widget(p, area);
}

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let users = &app.screen().users;
    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(users.len());
    let slice = users.get(start..end).unwrap_or_default();

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let style = if start + i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(field_text(u, "id")),
            Cell::from(field_text(u, "name")),
            Cell::from(field_text(u, "email")),
            Cell::from(field_text(u, "phone")),
            Cell::from(field_text(u, "position")),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(25),
        Constraint::Percentage(35),
        Constraint::Length(14),
        Constraint::Percentage(20),
    ];
    let header = Row::new(vec!["ID", "NAME", "EMAIL", "PHONE", "POSITION"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );
    let title = if users.is_empty() {
        "Users".to_string()
    } else {
        format!("Users ({}, m: show more)", users.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(&title, app))
        .column_spacing(1);
    f.render_widget(table, area);
}

/// The user fetched by id; before any lookup, the highlighted table row.
pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let screen = app.screen();
    let (title, text) = match (&screen.selected_user, screen.users.get(app.selected_index)) {
        (Some(user), _) => ("User Details", pretty(user)),
        (None, Some(row)) => ("Selected row", pretty(row)),
        (None, None) => ("User Details", "g: get user by ID".to_string()),
    };
    let p = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text))
        .block(panel(title, app));
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_text_unquotes_strings() {
        let user = json!({"id": 3, "name": "Ann", "photo": null});
        assert_eq!(field_text(&user, "id"), "3");
        assert_eq!(field_text(&user, "name"), "Ann");
        assert_eq!(field_text(&user, "photo"), "");
        assert_eq!(field_text(&user, "email"), "");
    }
}
