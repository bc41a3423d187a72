use crate::error::CoreError;
use crate::frame::FrameBuffer;

/// Décode des octets bruts en une image RGBA.
///
/// Implémenté par : `SniffingDecoder` (contenu), `ExtensionDecoder` (nom de fichier).
/// L'éditeur essaie une chaîne de décodeurs dans l'ordre.
///
/// # Example
/// ```
/// use gg_core::traits::ImageDecoder;
/// use gg_core::frame::FrameBuffer;
/// use gg_core::CoreError;
///
/// struct Solid;
/// impl ImageDecoder for Solid {
///     fn decode(&self, _bytes: &[u8], _hint: Option<&str>) -> Result<FrameBuffer, CoreError> {
///         Ok(FrameBuffer::filled(1, 1, [255, 255, 255, 255]))
///     }
///     fn name(&self) -> &'static str { "solid" }
/// }
/// assert!(Solid.decode(&[], None).is_ok());
/// ```
pub trait ImageDecoder: Send + Sync {
    /// Decode `bytes`. `name_hint` is the original file name, if known.
    ///
    /// # Errors
    /// Returns `CoreError::Decode` or `CoreError::UnsupportedFormat` when the
    /// bytes cannot be turned into pixels by this decoder.
    fn decode(&self, bytes: &[u8], name_hint: Option<&str>) -> Result<FrameBuffer, CoreError>;

    /// Nom lisible pour les logs.
    fn name(&self) -> &'static str;
}
