/// Configuration, types, and shared structures for glyphgrid.
///
/// This crate contains all shared types, traits, and configuration logic
/// used across the glyphgrid workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use charset::Palette;
pub use config::EditorConfig;
pub use error::CoreError;
pub use frame::{CharGrid, FrameBuffer, LumaBuffer};

/// Limites de la grille éditable (inclusives).
pub mod limits {
    /// Minimum rows / cols.
    pub const GRID_MIN: usize = 4;
    /// Maximum rows / cols.
    pub const GRID_MAX: usize = 400;
    /// Minimum display size of a cell, in pixels.
    pub const PIXEL_SIZE_MIN: u8 = 8;
    /// Maximum display size of a cell, in pixels.
    pub const PIXEL_SIZE_MAX: u8 = 28;

    /// `true` if `n` is an acceptable row or column count.
    ///
    /// # Example
    /// ```
    /// use gg_core::limits::grid_dim_valid;
    /// assert!(grid_dim_valid(4));
    /// assert!(!grid_dim_valid(401));
    /// ```
    #[inline]
    #[must_use]
    pub fn grid_dim_valid(n: usize) -> bool {
        (GRID_MIN..=GRID_MAX).contains(&n)
    }
}
