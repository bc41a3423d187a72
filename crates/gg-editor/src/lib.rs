/// Grid editing model for glyphgrid.
///
/// Owns the editor state, re-derives the grid from a source image off-thread,
/// discards stale results by generation, and maps keyboard input to cursor
/// moves and cell edits.
pub mod debounce;
pub mod input;
pub mod model;
pub mod navigation;
pub mod pipeline;

pub use input::{InputKey, apply_input};
pub use model::{EditorEvent, EditorStats, GridEditor};
pub use navigation::{Bounds, Cursor, Direction};
