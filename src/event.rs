// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Input events delivered by the host.

use std::time::Instant;

use crossterm::event::{
    Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton as CtButton,
    MouseEvent, MouseEventKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self { key, modifiers: Modifiers::default() }
    }

    pub fn char(ch: char) -> Self {
        Self::new(Key::Char(ch))
    }

    pub fn ctrl(ch: char) -> Self {
        Self { key: Key::Char(ch), modifiers: Modifiers { ctrl: true, ..Modifiers::default() } }
    }

    pub fn is_ctrl(&self, ch: char) -> bool {
        self.modifiers.ctrl && self.key == Key::Char(ch)
    }

    /// Printable text input: a character without ctrl/alt.
    pub fn text(&self) -> Option<char> {
        match self.key {
            Key::Char(ch) if !self.modifiers.ctrl && !self.modifiers.alt => Some(ch),
            _ => None,
        }
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Resize { width: u16, height: u16 },
    Key(KeyInput),
    Click { col: u16, row: u16, button: MouseButton, at: Instant },
    Wheel { col: u16, row: u16, direction: WheelDirection },
    Motion { col: u16, row: u16 },
    Release { col: u16, row: u16 },
    Paste(String),
    /// The host switched palettes; broadcast like a resize.
    ThemeChanged,
}

impl Event {
    pub fn key(key: impl Into<KeyInput>) -> Self {
        Self::Key(key.into())
    }

    pub fn click(col: u16, row: u16, at: Instant) -> Self {
        Self::Click { col, row, button: MouseButton::Left, at }
    }

    /// Events every dialog on the stack must see, not just the topmost.
    pub fn is_broadcast(&self) -> bool {
        matches!(self, Self::Resize { .. } | Self::ThemeChanged)
    }

    /// Converts a crossterm event, stamping clicks with `now`. Key releases and focus
    /// changes are dropped.
    pub fn from_crossterm(event: CtEvent, now: Instant) -> Option<Self> {
        match event {
            CtEvent::Resize(width, height) => Some(Self::Resize { width, height }),
            CtEvent::Key(key) => key_input(key).map(Self::Key),
            CtEvent::Mouse(mouse) => mouse_event(mouse, now),
            CtEvent::Paste(text) => Some(Self::Paste(text)),
            CtEvent::FocusGained | CtEvent::FocusLost => None,
        }
    }
}

fn key_input(key: KeyEvent) -> Option<KeyInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let modifiers = Modifiers {
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    };
    let key = match key.code {
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    };
    Some(KeyInput { key, modifiers })
}

fn mouse_event(mouse: MouseEvent, now: Instant) -> Option<Event> {
    let (col, row) = (mouse.column, mouse.row);
    let event = match mouse.kind {
        MouseEventKind::Down(button) => {
            let button = match button {
                CtButton::Left => MouseButton::Left,
                CtButton::Right => MouseButton::Right,
                CtButton::Middle => MouseButton::Middle,
            };
            Event::Click { col, row, button, at: now }
        }
        MouseEventKind::Up(_) => Event::Release { col, row },
        MouseEventKind::Drag(_) | MouseEventKind::Moved => Event::Motion { col, row },
        MouseEventKind::ScrollUp => Event::Wheel { col, row, direction: WheelDirection::Up },
        MouseEventKind::ScrollDown => Event::Wheel { col, row, direction: WheelDirection::Down },
        MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use crossterm::event::{
        Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers,
        MouseButton as CtButton, MouseEvent, MouseEventKind,
    };

    use super::{Event, Key, KeyInput, MouseButton};

    #[test]
    fn converts_ctrl_chars_and_drops_releases() {
        let now = Instant::now();
        let press = CtEvent::Key(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL));
        assert_eq!(Event::from_crossterm(press, now), Some(Event::Key(KeyInput::ctrl('f'))));

        let release = CtEvent::Key(KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(Event::from_crossterm(release, now), None);
    }

    #[test]
    fn stamps_clicks_with_the_given_instant() {
        let now = Instant::now();
        let click = CtEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(CtButton::Left),
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(
            Event::from_crossterm(click, now),
            Some(Event::Click { col: 7, row: 3, button: MouseButton::Left, at: now })
        );
    }

    #[test]
    fn text_excludes_control_chords() {
        assert_eq!(KeyInput::char('a').text(), Some('a'));
        assert_eq!(KeyInput::ctrl('a').text(), None);
        assert_eq!(KeyInput::new(Key::Enter).text(), None);
        assert!(Event::Resize { width: 1, height: 1 }.is_broadcast());
        assert!(!Event::key(Key::Esc).is_broadcast());
    }
}
