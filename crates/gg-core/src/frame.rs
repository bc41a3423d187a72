use std::fmt;

/// Buffer de pixels RGBA, row-major, 4 bytes par pixel.
///
/// Sert à la fois d'image source décodée (immuable une fois derrière un
/// `Arc`) et de buffer de sortie du resizer.
///
/// # Example
/// ```
/// use gg_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer transparent aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use gg_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.width, 100);
    /// assert_eq!(fb.height, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Crée un buffer uniformément rempli avec `rgba`.
    ///
    /// # Example
    /// ```
    /// use gg_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(2, 2, [255, 255, 255, 255]);
    /// assert_eq!(fb.pixel(1, 1), (255, 255, 255, 255));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    /// Wrap raw RGBA bytes. Returns `None` if the length does not match.
    #[must_use]
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * 4).then_some(Self {
            data,
            width,
            height,
        })
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    ///
    /// # Example
    /// ```
    /// use gg_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(10, 10);
    /// let (r, g, b, a) = fb.pixel(0, 0);
    /// assert_eq!((r, g, b, a), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// `true` when the buffer holds no pixel at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Un octet de luminance par pixel, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LumaBuffer {
    /// Brightness values [0, 255].
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl LumaBuffer {
    /// Uniform luma buffer, mostly useful in tests.
    ///
    /// # Example
    /// ```
    /// use gg_core::frame::LumaBuffer;
    /// let luma = LumaBuffer::uniform(3, 2, 200);
    /// assert_eq!(luma.data, vec![200; 6]);
    /// ```
    #[must_use]
    pub fn uniform(width: u32, height: u32, value: u8) -> Self {
        Self {
            data: vec![value; width as usize * height as usize],
            width,
            height,
        }
    }
}

/// Grille de caractères éditable, rows × cols, row-major.
///
/// Les dimensions sont fixées à la construction : un changement de taille
/// passe toujours par une nouvelle grille.
///
/// # Example
/// ```
/// use gg_core::frame::CharGrid;
/// let mut grid = CharGrid::new(4, 8, ' ');
/// assert!(grid.set(1, 2, '#'));
/// assert_eq!(grid.get(1, 2), Some('#'));
/// assert_eq!(grid.get(4, 0), None);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct CharGrid {
    cells: Vec<char>,
    rows: usize,
    cols: usize,
}

impl CharGrid {
    /// Crée une grille remplie de `fill`.
    #[must_use]
    pub fn new(rows: usize, cols: usize, fill: char) -> Self {
        Self {
            cells: vec![fill; rows * cols],
            rows,
            cols,
        }
    }

    /// Build a grid from row-major cells. Returns `None` on a length mismatch.
    ///
    /// # Example
    /// ```
    /// use gg_core::frame::CharGrid;
    /// let grid = CharGrid::from_cells(1, 2, vec!['a', 'b']).unwrap();
    /// assert_eq!(grid.row(0), &['a', 'b']);
    /// assert!(CharGrid::from_cells(2, 2, vec!['a']).is_none());
    /// ```
    #[must_use]
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<char>) -> Option<Self> {
        (cells.len() == rows * cols).then_some(Self { cells, rows, cols })
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `true` if (row, col) addresses a cell.
    #[inline(always)]
    #[must_use]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Cell at (row, col), `None` out of bounds.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        if self.in_bounds(row, col) {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Write a cell. Out-of-bounds writes are ignored and return `false`.
    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, ch: char) -> bool {
        if self.in_bounds(row, col) {
            self.cells[row * self.cols + col] = ch;
            true
        } else {
            false
        }
    }

    /// One row as a slice.
    ///
    /// # Panics
    /// Panics if `row >= self.rows()`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[char] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterate rows top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[char]> {
        // chunks_exact(0) panique ; sans colonne, `cells` est vide de toute façon.
        self.cells.chunks_exact(self.cols.max(1))
    }

    /// All cells, row-major.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// `true` if every cell equals `ch`.
    #[must_use]
    pub fn is_uniform(&self, ch: char) -> bool {
        self.cells.iter().all(|&c| c == ch)
    }
}

impl fmt::Debug for CharGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CharGrid {}x{}", self.rows, self.cols)?;
        for row in self.iter_rows() {
            let line: String = row.iter().collect();
            writeln!(f, "|{line}|")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_frame_repeats_pixel() {
        let fb = FrameBuffer::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(fb.data.len(), 24);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(fb.pixel(x, y), (1, 2, 3, 4));
            }
        }
    }

    #[test]
    fn from_raw_checks_length() {
        assert!(FrameBuffer::from_raw(2, 2, vec![0; 16]).is_some());
        assert!(FrameBuffer::from_raw(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn grid_out_of_bounds_is_ignored() {
        let mut grid = CharGrid::new(4, 4, ' ');
        assert!(!grid.set(4, 0, '#'));
        assert!(!grid.set(0, 4, '#'));
        assert!(grid.is_uniform(' '));
    }

    #[test]
    fn grid_rows_are_row_major() {
        let mut grid = CharGrid::new(2, 3, '.');
        grid.set(1, 0, 'x');
        let rows: Vec<String> = grid.iter_rows().map(|r| r.iter().collect()).collect();
        assert_eq!(rows, vec!["...".to_string(), "x..".to_string()]);
    }

    #[test]
    fn empty_grid_has_no_rows() {
        let grid = CharGrid::new(3, 0, ' ');
        assert_eq!(grid.iter_rows().count(), 0);
    }
}
