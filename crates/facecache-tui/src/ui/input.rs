//! Keyboard input handling for the TUI.
//!
//! Overlays take precedence, then the lightbox, then page-specific keys.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Page, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle clear-cache confirmation
    if matches!(app.state, AppState::ConfirmingClear) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Normal;
                app.clear_cache();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        handle_search_input(app, key);
        return Ok(false);
    }

    if app.lightbox_open() {
        handle_lightbox_input(app, key);
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        _ => {}
    }

    if !app.is_configured() {
        return Ok(false);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        _ => match app.page {
            Page::Persons => handle_persons_input(app, key),
            Page::Person => handle_person_input(app, key),
        },
    }

    Ok(false)
}

fn handle_persons_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
        }
        KeyCode::Esc => {
            app.clear_search();
        }
        KeyCode::Char('s') => app.toggle_sort(),
        KeyCode::Char('l') => app.load_persons(false),
        KeyCode::Char('r') => app.load_persons(true),
        KeyCode::Char('c') => {
            app.state = AppState::ConfirmingClear;
        }
        KeyCode::Enter => app.open_selected_person(),
        _ => {}
    }
}

fn handle_person_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.close_person(),
        KeyCode::Char('l') => app.load_person(false),
        KeyCode::Char('r') => app.load_person(true),
        KeyCode::Char('g') => app.clear_global_photo_cache(),
        KeyCode::Enter => app.open_lightbox(),
        _ => {}
    }
}

fn handle_lightbox_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.close_lightbox(),
        KeyCode::Left | KeyCode::Char('h') => app.lightbox_prev(),
        KeyCode::Right | KeyCode::Char('l') => app.lightbox_next(),
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.clear_search();
        }
        KeyCode::Enter => {
            // Keep search query active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
}
