//! Translation from raw terminal events to game commands.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Flap,
    Quit,
    Resize(u16, u16),
}

/// Map one terminal event to a command. Key releases and repeats are
/// ignored so a held key flaps once.
pub fn translate(event: &Event) -> Option<Command> {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Char(' ') | KeyCode::Up => Some(Command::Flap),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
            _ => None,
        },
        Event::Resize(cols, rows) => Some(Command::Resize(*cols, *rows)),
        _ => None,
    }
}
