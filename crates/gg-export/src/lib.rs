/// Plain text export for glyphgrid.
///
/// Grid → text serialization with newline and ASCII-mode policies, the
/// on-screen preview rendition, text statistics and the file writer.

pub mod file;
pub mod stats;
pub mod text;

pub use file::{filename_for, generate_filename, write_export};
pub use stats::{TextStats, text_stats};
pub use text::{ExportOptions, grid_to_text, preview_text};
