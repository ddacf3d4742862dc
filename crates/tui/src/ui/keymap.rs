use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Cancel,
    NextField,
    PrevField,
    Submit,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    SwitchAuth,
    Input(char),
    None,
}

/// Maps a key press to an action. While a text field has focus, plain
/// characters are input rather than shortcuts.
pub fn map_key(key: KeyEvent, editing: bool) -> AppAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => AppAction::Quit,
            KeyCode::Char('r') => AppAction::SwitchAuth,
            _ => AppAction::None,
        };
    }

    match key.code {
        KeyCode::Char('q') if !editing => AppAction::Quit,
        KeyCode::Char('x') if !editing => AppAction::Delete,
        KeyCode::Delete if !editing => AppAction::Delete,
        KeyCode::Esc => AppAction::Cancel,
        KeyCode::Tab => AppAction::NextField,
        KeyCode::BackTab => AppAction::PrevField,
        KeyCode::Enter => AppAction::Submit,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Up => AppAction::Up,
        KeyCode::Down => AppAction::Down,
        KeyCode::Left => AppAction::Left,
        KeyCode::Right => AppAction::Right,
        KeyCode::Char(ch) => AppAction::Input(ch),
        _ => AppAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_is_text_while_editing() {
        assert_eq!(map_key(press(KeyCode::Char('q')), true), AppAction::Input('q'));
        assert_eq!(map_key(press(KeyCode::Char('q')), false), AppAction::Quit);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key, true), AppAction::Quit);
    }

    #[test]
    fn x_deletes_only_outside_forms() {
        assert_eq!(map_key(press(KeyCode::Char('x')), false), AppAction::Delete);
        assert_eq!(map_key(press(KeyCode::Char('x')), true), AppAction::Input('x'));
    }
}
