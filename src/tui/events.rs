use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    ClearInput,
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    /// Enter: apply the typed filter, or toggle the highlighted facet
    Confirm,
    Export,
    ClearFilters,
    Reload,
    ToggleFocus,
    UpdateSearch(char),
    DeleteChar,
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
    {
        return Ok(key_to_action(key));
    }
    Ok(Action::None)
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::ClearInput,

        // Navigation
        (KeyCode::Char('p'), KeyModifiers::CONTROL) => Action::MoveUp,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Action::MoveDown,
        (KeyCode::Up, _) => Action::MoveUp,
        (KeyCode::Down, _) => Action::MoveDown,
        (KeyCode::PageDown, _) => Action::NextPage,
        (KeyCode::PageUp, _) => Action::PrevPage,
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => Action::NextPage,
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::PrevPage,

        // Actions
        (KeyCode::Enter, _) => Action::Confirm,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::Export,
        (KeyCode::Char('x'), KeyModifiers::CONTROL) => Action::ClearFilters,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Action::Reload,
        (KeyCode::Tab, _) => Action::ToggleFocus,

        // Query input
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::UpdateSearch(c)
        }
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}
