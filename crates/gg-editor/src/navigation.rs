//! Cursor movement over the grid. Pure coordinate math, no editor access.

/// Grid extent used for cursor math.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    /// Number of rows (≥ 1).
    pub rows: usize,
    /// Number of columns (≥ 1).
    pub cols: usize,
}

impl Bounds {
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    fn last_row(self) -> usize {
        self.rows.saturating_sub(1)
    }

    fn last_col(self) -> usize {
        self.cols.saturating_sub(1)
    }
}

/// Position de focus (ligne, colonne).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Pull the cursor back inside `bounds` (after a resize).
    ///
    /// # Example
    /// ```
    /// use gg_editor::{Bounds, Cursor};
    /// let c = Cursor::new(30, 2).clamp_to(Bounds::new(8, 8));
    /// assert_eq!(c, Cursor::new(7, 2));
    /// ```
    #[must_use]
    pub fn clamp_to(self, bounds: Bounds) -> Self {
        Self {
            row: self.row.min(bounds.last_row()),
            col: self.col.min(bounds.last_col()),
        }
    }
}

/// Arrow-key direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Avance d'une cellule, passe à la ligne suivante en fin de ligne, reste
/// sur la dernière cellule.
///
/// # Example
/// ```
/// use gg_editor::{Bounds, Cursor};
/// use gg_editor::navigation::move_next;
/// let b = Bounds::new(2, 3);
/// assert_eq!(move_next(b, Cursor::new(0, 2)), Cursor::new(1, 0));
/// assert_eq!(move_next(b, Cursor::new(1, 2)), Cursor::new(1, 2));
/// ```
#[must_use]
pub fn move_next(bounds: Bounds, at: Cursor) -> Cursor {
    if at.col < bounds.last_col() {
        Cursor::new(at.row, at.col + 1)
    } else if at.row < bounds.last_row() {
        Cursor::new(at.row + 1, 0)
    } else {
        at
    }
}

/// Recule d'une cellule, remonte en fin de ligne précédente, s'arrête à l'origine.
#[must_use]
pub fn move_prev(bounds: Bounds, at: Cursor) -> Cursor {
    if at.col > 0 {
        Cursor::new(at.row, at.col - 1)
    } else if at.row > 0 {
        Cursor::new(at.row - 1, bounds.last_col())
    } else {
        Cursor::new(0, 0)
    }
}

/// Start of the next row; on the last row, its final cell.
#[must_use]
pub fn move_next_line(bounds: Bounds, at: Cursor) -> Cursor {
    if at.row < bounds.last_row() {
        Cursor::new(at.row + 1, 0)
    } else {
        Cursor::new(at.row, bounds.last_col())
    }
}

/// One step in `dir`, clamped to the grid. No wraparound.
#[must_use]
pub fn move_directional(bounds: Bounds, at: Cursor, dir: Direction) -> Cursor {
    match dir {
        Direction::Up => Cursor::new(at.row.saturating_sub(1), at.col),
        Direction::Down => Cursor::new((at.row + 1).min(bounds.last_row()), at.col),
        Direction::Left => Cursor::new(at.row, at.col.saturating_sub(1)),
        Direction::Right => Cursor::new(at.row, (at.col + 1).min(bounds.last_col())),
    }
}

/// `true` iff `key` is exactly one character in U+0020..=U+007E.
///
/// # Example
/// ```
/// use gg_editor::navigation::is_printable;
/// assert!(is_printable(" "));
/// assert!(is_printable("~"));
/// assert!(!is_printable("é"));
/// assert!(!is_printable("ab"));
/// assert!(!is_printable("Enter"));
/// ```
#[must_use]
pub fn is_printable(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(' '..='~'), None))
}

/// Char flavour of [`is_printable`].
#[inline]
#[must_use]
pub fn is_printable_char(ch: char) -> bool {
    matches!(ch, ' '..='~')
}
