use gg_core::CoreError;
use gg_core::charset::Palette;
use gg_core::frame::{CharGrid, LumaBuffer};
use rayon::prelude::*;

/// Paramètres de seuillage luma → caractère.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdParams {
    /// Valeurs effectives strictement inférieures → dark.
    pub threshold: u8,
    /// `255 - Y` avant comparaison.
    pub invert: bool,
    /// Caractères de sortie.
    pub palette: Palette,
}

impl ThresholdParams {
    /// Map one luma value to its character.
    ///
    /// # Example
    /// ```
    /// use gg_ascii::ThresholdParams;
    /// use gg_core::charset::Palette;
    /// let p = ThresholdParams { threshold: 128, invert: false, palette: Palette::new('#', '.') };
    /// assert_eq!(p.map(127), '#');
    /// assert_eq!(p.map(128), '.');
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luma: u8) -> char {
        let effective = if self.invert { 255 - luma } else { luma };
        if effective < self.threshold {
            self.palette.dark
        } else {
            self.palette.light
        }
    }
}

/// Threshold a luma buffer into a `rows`×`cols` grid.
///
/// # Errors
/// Returns `CoreError::InvalidDimensions` (with the luma size) when the
/// buffer is not exactly `cols` wide and `rows` high, or when it is empty.
///
/// # Example
/// ```
/// use gg_ascii::{threshold_to_grid, ThresholdParams};
/// use gg_core::charset::Palette;
/// use gg_core::frame::LumaBuffer;
///
/// let luma = LumaBuffer::uniform(4, 4, 0);
/// let params = ThresholdParams { threshold: 128, invert: false, palette: Palette::new('#', '.') };
/// let grid = threshold_to_grid(&luma, 4, 4, &params).unwrap();
/// assert!(grid.is_uniform('#'));
/// assert!(threshold_to_grid(&luma, 5, 4, &params).is_err());
/// ```
pub fn threshold_to_grid(
    luma: &LumaBuffer,
    cols: usize,
    rows: usize,
    params: &ThresholdParams,
) -> Result<CharGrid, CoreError> {
    let mismatch = CoreError::InvalidDimensions {
        width: luma.width,
        height: luma.height,
    };
    if cols == 0
        || rows == 0
        || luma.width as usize != cols
        || luma.height as usize != rows
        || luma.data.len() != rows * cols
    {
        return Err(mismatch);
    }

    let mut cells = vec![params.palette.light; rows * cols];
    cells
        .par_chunks_mut(cols)
        .zip(luma.data.par_chunks(cols))
        .for_each(|(row, samples)| {
            for (cell, &value) in row.iter_mut().zip(samples) {
                *cell = params.map(value);
            }
        });

    CharGrid::from_cells(rows, cols, cells).ok_or(mismatch)
}
