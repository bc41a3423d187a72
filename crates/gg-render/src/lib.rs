/// TUI rendering module for glyphgrid.
///
/// Provides grid canvas rendering with cursor highlight, the controls
/// sidebar, the text preview pane and the help overlay.
pub mod canvas;
pub mod ui;
