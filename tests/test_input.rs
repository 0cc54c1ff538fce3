use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use flappy_term::input::{translate, Command};

fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

#[test]
fn space_and_up_flap() {
    assert_eq!(translate(&press(KeyCode::Char(' '))), Some(Command::Flap));
    assert_eq!(translate(&press(KeyCode::Up)), Some(Command::Flap));
}

#[test]
fn quit_keys() {
    assert_eq!(translate(&press(KeyCode::Char('q'))), Some(Command::Quit));
    assert_eq!(translate(&press(KeyCode::Char('Q'))), Some(Command::Quit));
    assert_eq!(translate(&press(KeyCode::Esc)), Some(Command::Quit));
    let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(translate(&ctrl_c), Some(Command::Quit));
}

#[test]
fn plain_c_is_ignored() {
    assert_eq!(translate(&press(KeyCode::Char('c'))), None);
}

#[test]
fn release_does_not_flap() {
    let release = Event::Key(KeyEvent::new_with_kind(
        KeyCode::Char(' '),
        KeyModifiers::NONE,
        KeyEventKind::Release,
    ));
    assert_eq!(translate(&release), None);
}

#[test]
fn resize_is_forwarded() {
    assert_eq!(translate(&Event::Resize(120, 40)), Some(Command::Resize(120, 40)));
}

#[test]
fn other_events_ignored() {
    assert_eq!(translate(&Event::FocusGained), None);
    assert_eq!(translate(&press(KeyCode::Enter)), None);
}
