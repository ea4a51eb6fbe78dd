use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};
use crate::ui;

/// Whether the loop keeps going after a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Kick off the initial loads, then draw / apply completions / read keys
/// until the user quits. Requests run on the runtime behind the controller,
/// so this loop only ever blocks on the 100 ms input poll.
pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState) -> Result<()> {
    app.controller.start();

    loop {
        app.controller.pump();
        app.clamp_selection();
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    // The confirmation after adding a user holds the screen until acknowledged.
    if app.screen().notice.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.controller.acknowledge_notice();
        }
        return Flow::Continue;
    }

    match app.input_mode {
        InputMode::Modal => {
            handle_modal_key(app, key);
            Flow::Continue
        }
        InputMode::Normal => match app.keymap.resolve(&key) {
            Some(action) => handle_action(app, action),
            None => Flow::Continue,
        },
    }
}

fn handle_action(app: &mut AppState, action: KeyAction) -> Flow {
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::GenerateToken => app.controller.request_token(),
        KeyAction::FetchPositions => app.controller.request_positions(),
        KeyAction::ShowMore => {
            // Only offered once a first page is on screen.
            if !app.screen().users.is_empty() {
                app.controller.show_more();
            }
        }
        KeyAction::FetchUserById => app.open_modal(ModalState::UserIdInput),
        KeyAction::AddUser => app.open_modal(ModalState::AddUser),
        KeyAction::DismissError => app.controller.dismiss_error_banner(),
        KeyAction::ShowErrorDetails => {
            if !app.screen().error.message.is_empty() {
                app.open_modal(ModalState::ErrorDetails { scroll: 0 });
            }
        }
        KeyAction::ScrollPositionsUp => {
            app.positions_scroll = app.positions_scroll.saturating_sub(1);
        }
        KeyAction::ScrollPositionsDown => {
            app.positions_scroll = app.positions_scroll.saturating_add(1);
        }
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::MoveUp => app.selected_index = app.selected_index.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.selected_index + 1 < app.screen().users.len() {
                app.selected_index += 1;
            }
        }
        KeyAction::PageUp => {
            app.selected_index = app.selected_index.saturating_sub(app.rows_per_page.max(1));
        }
        KeyAction::PageDown => {
            let last = app.screen().users.len().saturating_sub(1);
            app.selected_index = app
                .selected_index
                .saturating_add(app.rows_per_page.max(1))
                .min(last);
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent) {
    let typed = match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => Some(c),
        _ => None,
    };
    match app.modal.clone() {
        Some(ModalState::UserIdInput) => match key.code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Enter => {
                let id = app.user_id_input.clone();
                app.controller.fetch_user_by_id(&id);
                app.close_modal();
            }
            KeyCode::Backspace => {
                app.user_id_input.pop();
            }
            _ => {
                if let Some(c) = typed {
                    app.user_id_input.push(c);
                }
            }
        },
        Some(ModalState::AddUser) => match key.code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Tab | KeyCode::Down => app.add_user_form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.add_user_form.focus_prev(),
            KeyCode::Enter => {
                let (user, token) = app.add_user_form.to_submission();
                app.controller.submit_new_user(user, token);
                app.close_modal();
            }
            KeyCode::Backspace => app.add_user_form.pop_char(),
            // Paste the token fetched with `t`; it still travels only as a header.
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(token) = app.screen().token.clone() {
                    app.add_user_form.token = token;
                }
            }
            _ => {
                if let Some(c) = typed {
                    app.add_user_form.push_char(c);
                }
            }
        },
        Some(ModalState::Help { scroll }) => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                app.close_modal()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.modal = Some(ModalState::Help {
                    scroll: scroll.saturating_sub(1),
                })
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.modal = Some(ModalState::Help {
                    scroll: scroll.saturating_add(1),
                })
            }
            _ => {}
        },
        Some(ModalState::ErrorDetails { scroll }) => {
            let scroll = match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('e') => {
                    app.close_modal();
                    return;
                }
                KeyCode::Up | KeyCode::Char('k') => scroll.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => scroll.saturating_add(1),
                KeyCode::PageUp => scroll.saturating_sub(10),
                KeyCode::PageDown => scroll.saturating_add(10),
                KeyCode::Home | KeyCode::Char('g') => 0,
                // clamped to the last page on the next draw
                KeyCode::End | KeyCode::Char('G') => u16::MAX,
                _ => scroll,
            };
            app.modal = Some(ModalState::ErrorDetails { scroll });
        }
        None => app.close_modal(),
    }
}
