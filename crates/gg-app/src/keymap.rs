use crossterm::event::{KeyCode, KeyModifiers};
use gg_editor::{Direction, InputKey};

/// Pas de redimensionnement (Alt+flèches).
pub const RESIZE_STEP: i32 = 4;
/// Pas de seuil (PgUp/PgDn).
pub const THRESHOLD_STEP: i16 = 8;
/// Pas de taille de cellule (F2/F3).
pub const PIXEL_STEP: i16 = 2;

/// What a key press asks the app to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Grid editing: handed to `apply_input`.
    Edit(InputKey),
    Quit,
    /// Esc: close help if open, quit otherwise.
    Back,
    ToggleHelp,
    OpenImage,
    DropImage,
    ClearGrid,
    Export,
    ToggleAscii,
    ToggleNewline,
    ToggleBom,
    ToggleWhitespace,
    ToggleInvert,
    CyclePalette,
    Threshold(i16),
    Resize { rows: i32, cols: i32 },
    PixelSize(i16),
    Ignore,
}

fn direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

/// Map a crossterm key press to an [`Action`].
#[must_use]
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('q' | 'c') => Action::Quit,
            KeyCode::Char('o') => Action::OpenImage,
            KeyCode::Char('x') => Action::DropImage,
            KeyCode::Char('n') => Action::ClearGrid,
            KeyCode::Char('s') => Action::Export,
            KeyCode::Char('e') => Action::ToggleAscii,
            KeyCode::Char('l') => Action::ToggleNewline,
            KeyCode::Char('b') => Action::ToggleBom,
            KeyCode::Char('w') => Action::ToggleWhitespace,
            KeyCode::Char('r') => Action::ToggleInvert,
            KeyCode::Char('p') => Action::CyclePalette,
            KeyCode::Char('t') => Action::Edit(InputKey::Activate),
            _ => Action::Ignore,
        };
    }

    if modifiers.contains(KeyModifiers::ALT) {
        return match direction(code) {
            Some(Direction::Up) => Action::Resize {
                rows: -RESIZE_STEP,
                cols: 0,
            },
            Some(Direction::Down) => Action::Resize {
                rows: RESIZE_STEP,
                cols: 0,
            },
            Some(Direction::Left) => Action::Resize {
                rows: 0,
                cols: -RESIZE_STEP,
            },
            Some(Direction::Right) => Action::Resize {
                rows: 0,
                cols: RESIZE_STEP,
            },
            None => Action::Ignore,
        };
    }

    match code {
        KeyCode::Esc => Action::Back,
        KeyCode::F(1) => Action::ToggleHelp,
        KeyCode::F(2) => Action::PixelSize(-PIXEL_STEP),
        KeyCode::F(3) => Action::PixelSize(PIXEL_STEP),
        KeyCode::PageUp => Action::Threshold(THRESHOLD_STEP),
        KeyCode::PageDown => Action::Threshold(-THRESHOLD_STEP),
        KeyCode::Backspace => Action::Edit(InputKey::Backspace),
        KeyCode::Enter => Action::Edit(InputKey::Enter),
        KeyCode::Char(ch) => Action::Edit(InputKey::Char(ch)),
        other => direction(other).map_or(Action::Ignore, |d| Action::Edit(InputKey::Arrow(d))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_shifted_chars_are_edits() {
        assert_eq!(
            map_key(KeyCode::Char('a'), KeyModifiers::NONE),
            Action::Edit(InputKey::Char('a'))
        );
        assert_eq!(
            map_key(KeyCode::Char('A'), KeyModifiers::SHIFT),
            Action::Edit(InputKey::Char('A'))
        );
        assert_eq!(
            map_key(KeyCode::Char(' '), KeyModifiers::NONE),
            Action::Edit(InputKey::Char(' '))
        );
    }

    #[test]
    fn control_chords_never_type() {
        assert_eq!(map_key(KeyCode::Char('s'), KeyModifiers::CONTROL), Action::Export);
        assert_eq!(map_key(KeyCode::Char('c'), KeyModifiers::CONTROL), Action::Quit);
        assert_eq!(map_key(KeyCode::Char('z'), KeyModifiers::CONTROL), Action::Ignore);
        assert_eq!(
            map_key(KeyCode::Char('t'), KeyModifiers::CONTROL),
            Action::Edit(InputKey::Activate)
        );
    }

    #[test]
    fn arrows_move_and_alt_arrows_resize() {
        assert_eq!(
            map_key(KeyCode::Left, KeyModifiers::NONE),
            Action::Edit(InputKey::Arrow(Direction::Left))
        );
        assert_eq!(
            map_key(KeyCode::Right, KeyModifiers::ALT),
            Action::Resize { rows: 0, cols: 4 }
        );
    }

    #[test]
    fn function_keys() {
        assert_eq!(map_key(KeyCode::F(1), KeyModifiers::NONE), Action::ToggleHelp);
        assert_eq!(map_key(KeyCode::PageDown, KeyModifiers::NONE), Action::Threshold(-8));
        assert_eq!(map_key(KeyCode::Tab, KeyModifiers::NONE), Action::Ignore);
    }
}
