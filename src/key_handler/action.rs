use crate::{
    REFRESH_RATE,
    app_core::Screen,
    key_handler::{Action, C, X},
};
use anyhow::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent};

use KeyCode::*;

pub fn handle_key_event(key_event: KeyEvent, screen: Screen) -> Option<Action> {
    if let Some(action) = global_commands(&key_event) {
        return Some(action);
    }

    match screen {
        Screen::List => handle_list(&key_event),
        Screen::Player => handle_player(&key_event),
    }
}

fn global_commands(key: &KeyEvent) -> Option<Action> {
    match (key.modifiers, key.code) {
        (C, Char('c')) | (X, Char('q')) => Some(Action::Quit),
        _ => None,
    }
}

fn handle_list(key: &KeyEvent) -> Option<Action> {
    match (key.modifiers, key.code) {
        (X, Up) | (X, Char('k')) => Some(Action::SelectUp),
        (X, Down) | (X, Char('j')) => Some(Action::SelectDown),
        (X, Enter) => Some(Action::OpenPlayer),
        _ => None,
    }
}

#[rustfmt::skip]
fn handle_player(key: &KeyEvent) -> Option<Action> {
    match (key.modifiers, key.code) {
        (X, Char(' '))  => Some(Action::TogglePause),
        (X, Char('n'))  => Some(Action::PlayNext),
        (X, Char('p'))  => Some(Action::PlayPrev),
        (X, Char('r'))  => Some(Action::CycleStation),
        (X, Right)      => Some(Action::SeekForward),
        (X, Left)       => Some(Action::SeekBack),
        (_, Char('+'))
        | (X, Char('=')) => Some(Action::VolumeUp),
        (X, Char('-'))  => Some(Action::VolumeDown),
        (X, Esc)        => Some(Action::Back),
        _ => None,
    }
}

pub fn next_event() -> Result<Option<Event>> {
    match event::poll(REFRESH_RATE)? {
        true => Ok(Some(event::read()?)),
        false => Ok(None),
    }
}
