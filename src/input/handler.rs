use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction};

/// Key meaning while the snake is moving
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    GameAction(Action),
    Quit,
    Interrupt,
    None,
}

/// Key meaning on a selectable menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKey {
    Up,
    Down,
    Confirm,
    Back,
    Interrupt,
    None,
}

/// Key meaning in a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKey {
    Char(char),
    Backspace,
    Submit,
    Complete,
    Cancel,
    Interrupt,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    fn is_interrupt(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if Self::is_interrupt(&key) {
            return KeyAction::Interrupt;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::GameAction(Action::Move(Direction::Up)),
            KeyCode::Down => KeyAction::GameAction(Action::Move(Direction::Down)),
            KeyCode::Left => KeyAction::GameAction(Action::Move(Direction::Left)),
            KeyCode::Right => KeyAction::GameAction(Action::Move(Direction::Right)),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::GameAction(Action::Move(Direction::Up))
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::GameAction(Action::Move(Direction::Down))
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::GameAction(Action::Move(Direction::Left))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::GameAction(Action::Move(Direction::Right))
            }

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    pub fn handle_menu_key(&self, key: KeyEvent) -> MenuKey {
        if Self::is_interrupt(&key) {
            return MenuKey::Interrupt;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => MenuKey::Up,
            KeyCode::Down | KeyCode::Char('j') => MenuKey::Down,
            KeyCode::Enter => MenuKey::Confirm,
            KeyCode::Esc | KeyCode::Char('q') => MenuKey::Back,
            _ => MenuKey::None,
        }
    }

    pub fn handle_text_key(&self, key: KeyEvent) -> TextKey {
        if Self::is_interrupt(&key) {
            return TextKey::Interrupt;
        }

        match key.code {
            KeyCode::Enter => TextKey::Submit,
            KeyCode::Esc => TextKey::Cancel,
            KeyCode::Tab => TextKey::Complete,
            KeyCode::Backspace => TextKey::Backspace,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => TextKey::Char(c),
            _ => TextKey::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up)),
            KeyAction::GameAction(Action::Move(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down)),
            KeyAction::GameAction(Action::Move(Direction::Down))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left)),
            KeyAction::GameAction(Action::Move(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Right)),
            KeyAction::GameAction(Action::Move(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w'))),
            KeyAction::GameAction(Action::Move(Direction::Up))
        );
        let d_upper = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(d_upper),
            KeyAction::GameAction(Action::Move(Direction::Right))
        );
    }

    #[test]
    fn test_quit_and_interrupt_differ() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('q'))),
            KeyAction::Quit
        );

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Interrupt);
        assert_eq!(handler.handle_menu_key(ctrl_c), MenuKey::Interrupt);
        assert_eq!(handler.handle_text_key(ctrl_c), TextKey::Interrupt);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('x'))),
            KeyAction::None
        );
    }

    #[test]
    fn test_menu_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_menu_key(press(KeyCode::Up)), MenuKey::Up);
        assert_eq!(handler.handle_menu_key(press(KeyCode::Down)), MenuKey::Down);
        assert_eq!(handler.handle_menu_key(press(KeyCode::Enter)), MenuKey::Confirm);
        assert_eq!(handler.handle_menu_key(press(KeyCode::Left)), MenuKey::None);
    }

    #[test]
    fn test_text_keys_keep_letters() {
        let handler = InputHandler::new();

        // WASD and q are plain letters in a text field
        assert_eq!(
            handler.handle_text_key(press(KeyCode::Char('q'))),
            TextKey::Char('q')
        );
        assert_eq!(
            handler.handle_text_key(press(KeyCode::Backspace)),
            TextKey::Backspace
        );
        assert_eq!(handler.handle_text_key(press(KeyCode::Tab)), TextKey::Complete);
        assert_eq!(handler.handle_text_key(press(KeyCode::Esc)), TextKey::Cancel);
        assert_eq!(handler.handle_text_key(press(KeyCode::Enter)), TextKey::Submit);
    }
}
