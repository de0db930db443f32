use crate::session::{Event, Step};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Translate a key press into a session event.
///
/// `q` quits only where nothing is being typed; Ctrl+C quits everywhere.
pub fn event_from_key(step: Step, key: KeyEvent) -> Option<Event> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Event::Quit);
    }

    let typing = matches!(step, Step::Collect(_) | Step::Select(_));
    match key.code {
        KeyCode::Enter => Some(Event::Activate),
        KeyCode::Up => Some(Event::Up),
        KeyCode::Down => Some(Event::Down),
        KeyCode::Esc => Some(Event::Back),
        KeyCode::Backspace if typing => Some(Event::Backspace),
        KeyCode::Char('q') if !typing => Some(Event::Quit),
        KeyCode::Char('k') if step == Step::Menu => Some(Event::Up),
        KeyCode::Char('j') if step == Step::Menu => Some(Event::Down),
        KeyCode::Char(c) if typing && !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Event::Input(c))
        }
        _ => None,
    }
}
