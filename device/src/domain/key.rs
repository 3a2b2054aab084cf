//! Synthetic key events produced by input drivers.

/// Key code carried by a [`KeyEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyCode(pub u16);

impl KeyCode {
    /// The space bar, used as the designated action key.
    pub const SPACE: KeyCode = KeyCode(62);
    pub const ENTER: KeyCode = KeyCode(66);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub code: KeyCode,
    pub action: KeyAction,
}

impl KeyEvent {
    pub const fn down(code: KeyCode) -> Self {
        Self {
            code,
            action: KeyAction::Down,
        }
    }

    pub const fn up(code: KeyCode) -> Self {
        Self {
            code,
            action: KeyAction::Up,
        }
    }
}

/// Item carried on the dispatcher queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Key(KeyEvent),
    /// Stop dispatching and tear the controller down.
    Shutdown,
}

impl From<KeyEvent> for Event {
    fn from(event: KeyEvent) -> Self {
        Event::Key(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_constructors() {
        let down = KeyEvent::down(KeyCode::SPACE);
        assert_eq!(KeyAction::Down, down.action);
        assert_eq!(KeyCode(62), down.code);

        let up = KeyEvent::up(KeyCode::ENTER);
        assert_eq!(KeyAction::Up, up.action);
        assert_eq!(Event::Key(up), Event::from(up));
    }
}
