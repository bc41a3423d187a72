use crate::model::GridEditor;
use crate::navigation::{
    Bounds, Cursor, Direction, is_printable, is_printable_char, move_directional, move_next,
    move_next_line, move_prev,
};

/// Entrée utilisateur, déjà détachée de la surface d'entrée concrète.
///
/// `Activate` is a direct activation of the focused cell (mouse click or an
/// explicit toggle binding). It is distinct from typing a space, which is a
/// printable `Char(' ')`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKey {
    /// Character entry.
    Char(char),
    Backspace,
    Enter,
    /// Toggle the focused cell.
    Activate,
    Arrow(Direction),
    /// Anything else: ignored.
    Other,
}

impl InputKey {
    /// Classify a key name (`"a"`, `"Backspace"`, `"ArrowUp"`...).
    ///
    /// # Example
    /// ```
    /// use gg_editor::{InputKey, Direction};
    /// assert_eq!(InputKey::from_key_name("x"), InputKey::Char('x'));
    /// assert_eq!(InputKey::from_key_name(" "), InputKey::Char(' '));
    /// assert_eq!(InputKey::from_key_name("ArrowLeft"), InputKey::Arrow(Direction::Left));
    /// assert_eq!(InputKey::from_key_name("é"), InputKey::Other);
    /// ```
    #[must_use]
    pub fn from_key_name(key: &str) -> Self {
        if is_printable(key) {
            return key.chars().next().map_or(Self::Other, Self::Char);
        }
        match key {
            "Backspace" => Self::Backspace,
            "Enter" => Self::Enter,
            "ArrowUp" => Self::Arrow(Direction::Up),
            "ArrowDown" => Self::Arrow(Direction::Down),
            "ArrowLeft" => Self::Arrow(Direction::Left),
            "ArrowRight" => Self::Arrow(Direction::Right),
            _ => Self::Other,
        }
    }
}

/// Apply one input at `at` and return the new focus.
///
/// | input | effect |
/// |---|---|
/// | printable | write the character, then advance |
/// | backspace | step back, then clear that cell to light |
/// | enter | start of next row |
/// | activate | toggle the cell, focus stays |
/// | arrow | move focus only |
///
/// # Example
/// ```
/// use gg_editor::{apply_input, Cursor, GridEditor, InputKey};
/// let mut editor = GridEditor::new();
/// let at = apply_input(&mut editor, Cursor::new(0, 0), InputKey::Char('h'));
/// assert_eq!(at, Cursor::new(0, 1));
/// assert_eq!(editor.snapshot().get(0, 0), Some('h'));
/// ```
pub fn apply_input(editor: &mut GridEditor, at: Cursor, key: InputKey) -> Cursor {
    let bounds = Bounds::new(editor.rows(), editor.cols());
    let at = at.clamp_to(bounds);
    match key {
        InputKey::Char(ch) if is_printable_char(ch) => {
            editor.set_cell(at.row, at.col, ch);
            move_next(bounds, at)
        }
        InputKey::Backspace => {
            let prev = move_prev(bounds, at);
            editor.set_cell(prev.row, prev.col, editor.palette().light);
            prev
        }
        InputKey::Enter => move_next_line(bounds, at),
        InputKey::Activate => {
            editor.toggle_cell(at.row, at.col);
            at
        }
        InputKey::Arrow(dir) => move_directional(bounds, at, dir),
        InputKey::Char(_) | InputKey::Other => at,
    }
}
