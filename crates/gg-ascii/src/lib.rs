/// Character conversion engine for glyphgrid.
///
/// Converts RGBA pixels to luma, then luma to a two-character grid.
pub mod luminance;
pub mod threshold;

pub use luminance::to_luma;
pub use threshold::{ThresholdParams, threshold_to_grid};
