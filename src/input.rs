//! Keyboard and mouse input handling.
//!
//! Maps terminal events to [`App`] actions.  Keys are routed by what has
//! focus: the detail view when it is open, else the focused date field or
//! the gallery.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in the handler for the right focus.
//! 3. Update the help text in [`crate::ui`]'s status bar.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{contains, App, Focus};

pub fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        _ => {}
    }
}

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    if app.modal.is_open() {
        match key.code {
            KeyCode::Esc
            | KeyCode::Char('q')
            | KeyCode::Enter
            | KeyCode::Char(' ')
            | KeyCode::Backspace => app.close_modal(),
            _ => {}
        }
        return;
    }

    match app.focus {
        Focus::StartDate | Focus::EndDate => match key.code {
            KeyCode::Char(c) => app.push_char(c),
            KeyCode::Backspace => app.pop_char(),
            KeyCode::Enter => {
                app.submit();
            }
            KeyCode::Tab | KeyCode::Down => app.focus = app.focus.next(),
            KeyCode::BackTab | KeyCode::Up => app.focus = app.focus.previous(),
            KeyCode::Esc => app.focus = Focus::Gallery,
            _ => {}
        },
        Focus::Gallery => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
            KeyCode::Down | KeyCode::Char('j') => app.gallery.select_next(),
            KeyCode::Up | KeyCode::Char('k') => app.gallery.select_previous(),
            KeyCode::Home | KeyCode::Char('g') => app.gallery.select_first(),
            KeyCode::End | KeyCode::Char('G') => app.gallery.select_last(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                app.open_selected();
            }
            KeyCode::Char('r') => {
                app.submit();
            }
            KeyCode::Char('/') | KeyCode::Char('s') => app.focus = Focus::StartDate,
            KeyCode::Tab => app.focus = app.focus.next(),
            KeyCode::BackTab => app.focus = app.focus.previous(),
            _ => {}
        },
    }
}

/// Left click activates cards and fields; outside the detail view it closes it.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.modal.is_open() {
                let areas = app.hit_areas;
                let on_close = areas.modal_close.is_some_and(|r| contains(r, column, row));
                let inside = areas.modal.is_some_and(|r| contains(r, column, row));
                if on_close || !inside {
                    app.close_modal();
                }
                return;
            }
            if contains(app.hit_areas.start_field, column, row) {
                app.focus = Focus::StartDate;
            } else if contains(app.hit_areas.end_field, column, row) {
                app.focus = Focus::EndDate;
            } else if let Some(index) = app.card_at(column, row) {
                app.focus = Focus::Gallery;
                app.open_card(index);
            }
        }
        MouseEventKind::ScrollDown if !app.modal.is_open() => app.gallery.select_next(),
        MouseEventKind::ScrollUp if !app.modal.is_open() => app.gallery.select_previous(),
        _ => {}
    }
}
