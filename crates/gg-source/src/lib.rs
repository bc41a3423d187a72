/// Image sources for glyphgrid: decoding and letterbox resizing.

pub mod image;
pub mod resize;
