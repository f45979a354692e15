use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Field {
    X,
    Y,
}

impl Field {
    pub(crate) fn other(self) -> Field {
        match self {
            Field::X => Field::Y,
            Field::Y => Field::X,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Type(char),
    Backspace,
    FocusNext,
    /// Keyboard press; the button lets go on its own.
    PressPlay,
    MouseDown { x: u16, y: u16 },
    MouseUp { x: u16, y: u16 },
    Quit,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<Event>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        out.push(event::read()?);
        if out.len() >= 32 {
            break;
        }
    }
    Ok(out)
}

pub(crate) fn map_event(ev: &Event) -> Option<Action> {
    match ev {
        Event::Key(k) => map_key(k),
        Event::Mouse(m) => map_mouse(m),
        _ => None,
    }
}

fn map_key(k: &KeyEvent) -> Option<Action> {
    if !matches!(k.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    if k.modifiers.contains(KeyModifiers::CONTROL) {
        return match k.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Quit),
            _ => None,
        };
    }
    match k.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => Some(Action::FocusNext),
        KeyCode::Enter => Some(Action::PressPlay),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(ch) if is_number_char(ch) => Some(Action::Type(ch)),
        _ => None,
    }
}

fn map_mouse(m: &MouseEvent) -> Option<Action> {
    match m.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Action::MouseDown {
            x: m.column,
            y: m.row,
        }),
        MouseEventKind::Up(MouseButton::Left) => Some(Action::MouseUp {
            x: m.column,
            y: m.row,
        }),
        _ => None,
    }
}

/// Characters that can appear in a float literal.
fn is_number_char(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn number_keys_type() {
        assert_eq!(map_event(&key(KeyCode::Char('7'))), Some(Action::Type('7')));
        assert_eq!(map_event(&key(KeyCode::Char('.'))), Some(Action::Type('.')));
        assert_eq!(map_event(&key(KeyCode::Char('-'))), Some(Action::Type('-')));
        assert_eq!(map_event(&key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn control_keys() {
        assert_eq!(map_event(&key(KeyCode::Enter)), Some(Action::PressPlay));
        assert_eq!(map_event(&key(KeyCode::Tab)), Some(Action::FocusNext));
        assert_eq!(map_event(&key(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(map_event(&key(KeyCode::Char('q'))), Some(Action::Quit));
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&ctrl_c), Some(Action::Quit));
    }

    #[test]
    fn mouse_left_button_only() {
        let down = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 9,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(map_event(&down), Some(Action::MouseDown { x: 4, y: 9 }));
        let right = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Right),
            column: 4,
            row: 9,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(map_event(&right), None);
    }

    #[test]
    fn focus_toggles() {
        assert_eq!(Field::X.other(), Field::Y);
        assert_eq!(Field::Y.other().other(), Field::Y);
    }
}
