pub mod components;
pub mod forms;
pub mod panels;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, ModalState};

/// Draw the whole screen from the current state.
pub fn render(f: &mut Frame, app: &mut AppState) {
    let banner_height = if app.screen().error.visible {
        components::banner_height(&app.screen().error.message, f.area())
    } else {
        0
    };
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(banner_height),
            Constraint::Length(1),
        ])
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(root[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(body[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(12)])
        .split(body[1]);

    render_header(f, root[0], app);
    panels::render_token(f, left[0], app);
    panels::render_positions(f, left[1], app);
    panels::render_users_table(f, right[0], app);
    panels::render_user_details(f, right[1], app);
    if banner_height > 0 {
        components::render_error_banner(f, root[2], app);
    }
    components::render_status_bar(f, root[3], app);

    let area = f.area();
    render_modal(f, area, app);
    if let Some(message) = app.screen().notice.clone() {
        components::render_notice(f, area, app, &message);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let p = Paragraph::new(format!(
        "{}  t: token  p: positions  m: show more  g: user by id  n: add user  x: close error  e: error details  ?: help  q: quit",
        app.controller.base_url()
    ))
    .block(
        Block::default()
            .title("User Management API")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &mut AppState) {
    match app.modal.clone() {
        Some(ModalState::UserIdInput) => forms::render_user_id_input(f, area, app),
        Some(ModalState::AddUser) => forms::render_add_user_form(f, area, app),
        Some(ModalState::Help { scroll }) => components::render_help_modal(f, area, app, scroll),
        Some(ModalState::ErrorDetails { scroll }) => {
            let scroll = components::render_error_details(f, area, app, scroll);
            app.modal = Some(ModalState::ErrorDetails { scroll });
        }
        None => {}
    }
}
