mod action;

pub use action::{handle_key_event, next_event};

use ratatui::crossterm::event::KeyModifiers;

const X: KeyModifiers = KeyModifiers::NONE;
const C: KeyModifiers = KeyModifiers::CONTROL;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Action {
    // List screen
    SelectUp,
    SelectDown,
    OpenPlayer,

    // Player screen
    TogglePause,
    PlayNext,
    PlayPrev,
    CycleStation,
    SeekForward,
    SeekBack,
    VolumeUp,
    VolumeDown,
    Back,

    Quit,
}
