//! Shared UI components: status bar, error banner, notice and help modals.
//!
use std::collections::{BTreeMap, BTreeSet};

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::{Keymap, describe_action};
use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode, counts and pending requests.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let screen = app.screen();
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Modal => "MODAL",
    };
    let token = if screen.token.is_some() { "yes" } else { "no" };
    let pending = if screen.in_flight > 0 {
        format!("  loading:{}", screen.in_flight)
    } else {
        String::new()
    };
    let msg = format!(
        "mode: {mode}  users:{}  page:{}  page size:{}  token:{token}{pending}",
        screen.users.len(),
        screen.page,
        screen.page_size,
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Hard-wrap `text` to `width` columns, keeping indentation and blank lines.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut out = Vec::new();
    for line in text.lines() {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }
    out
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Rows the banner needs for `message` once wrapped inside its borders,
/// capped to a third of the screen. The rest is reachable with `e`.
pub fn banner_height(message: &str, area: Rect) -> u16 {
    let lines = to_u16(wrap_text(message, area.width.saturating_sub(2)).len());
    lines.saturating_add(2).min((area.height / 3).max(4))
}

pub fn render_error_banner(f: &mut Frame, area: Rect, app: &AppState) {
    let style = Style::default()
        .fg(app.theme.error_fg)
        .bg(app.theme.error_bg);
    let message = &app.screen().error.message;
    let wrapped = wrap_text(message, area.width.saturating_sub(2));
    let hidden = wrapped.len().saturating_sub(usize::from(area.height.saturating_sub(2)));
    let mut title = vec![
        Span::raw("Error  "),
        Span::styled("[x] Close", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled("[e] Details", Style::default().add_modifier(Modifier::BOLD)),
    ];
    if hidden > 0 {
        title.push(Span::raw(format!("  (+{hidden} lines)")));
    }
    let p = Paragraph::new(wrapped.into_iter().map(Line::raw).collect::<Vec<_>>())
        .style(style)
        .block(
            Block::default()
                .title(Line::from(title))
                .borders(Borders::ALL)
                .border_style(style),
        );
    f.render_widget(Clear, area);
    f.render_widget(p, area);
}

/// Whole error text in a popup, scrolled to `scroll` (clamped so the last
/// page stays filled). Returns the scroll offset actually used.
pub fn render_error_details(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) -> u16 {
    let width = 100u16.min(area.width.saturating_sub(4)).max(20);
    let height = area.height.saturating_sub(4).max(5);
    let rect = centered_rect(width, height, area);
    let inner_height = rect.height.saturating_sub(2);

    let wrapped = wrap_text(&app.screen().error.message, rect.width.saturating_sub(2));
    let total = to_u16(wrapped.len());
    let scroll = scroll.min(total.saturating_sub(inner_height));
    let last = total.min(scroll.saturating_add(inner_height));
    let title = format!("Error details {}-{last}/{total}  j/k End Esc", scroll.saturating_add(1));

    let style = Style::default()
        .fg(app.theme.error_fg)
        .bg(app.theme.error_bg);
    let p = Paragraph::new(wrapped.into_iter().map(Line::raw).collect::<Vec<_>>())
        .scroll((scroll, 0))
        .style(style)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(style),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
    scroll
}

/// Centered rectangle of at most `width` x `height` inside `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect {
        x,
        y,
        width: w,
        height: h,
    }
}

/// Confirmation that needs acknowledging before anything else happens.
pub fn render_notice(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let width = 60u16.min(area.width.saturating_sub(4)).max(30);
    let rect = centered_rect(width, 7, area);
    let body = format!("{message}\n\nPress Enter to continue");
    let p = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Info")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Keybindings reference, grouped by action.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(2)).max(8);
    let rect = centered_rect(width, height, area);

    let mut by_action: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    for ((mods, code), action) in app.keymap.all_bindings() {
        by_action
            .entry(describe_action(action))
            .or_default()
            .insert(Keymap::format_key(mods, code));
    }
    let label_w = by_action.keys().map(|k| k.len()).max().unwrap_or(0);

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "Screen:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (label, keys) in &by_action {
        let joined = keys.iter().cloned().collect::<Vec<_>>().join(", ");
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:>label_w$} │ ")),
            Span::styled(joined, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Forms:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, keys) in [
        ("Next / previous field", "Tab, Down / Shift+Tab, Up"),
        ("Paste fetched token", "Ctrl+t"),
        ("Submit", "Enter"),
        ("Cancel", "Esc"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label} │ ")),
            Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }

    let p = Paragraph::new(lines).scroll((scroll, 0)).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
