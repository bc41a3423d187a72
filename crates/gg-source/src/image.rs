use std::path::Path;

use anyhow::{Context, Result};
use gg_core::CoreError;
use gg_core::frame::FrameBuffer;
use gg_core::traits::ImageDecoder;
use image::{DynamicImage, ImageFormat};

/// Décodeur principal : format deviné à partir des octets (magic bytes).
///
/// # Example
/// ```
/// use gg_core::traits::ImageDecoder;
/// use gg_source::image::SniffingDecoder;
/// assert!(SniffingDecoder.decode(b"pas une image", None).is_err());
/// ```
pub struct SniffingDecoder;

impl ImageDecoder for SniffingDecoder {
    fn decode(&self, bytes: &[u8], _name_hint: Option<&str>) -> Result<FrameBuffer, CoreError> {
        let img = image::load_from_memory(bytes).map_err(|e| CoreError::Decode {
            decoder: self.name(),
            reason: e.to_string(),
        })?;
        into_frame(&img)
    }

    fn name(&self) -> &'static str {
        "sniffing"
    }
}

/// Décodeur de repli : format tiré de l'extension du nom de fichier.
///
/// Rattrape les fichiers dont l'en-tête n'est pas reconnu par la détection
/// automatique mais dont le format est connu par ailleurs (TGA, ICO...).
pub struct ExtensionDecoder;

impl ImageDecoder for ExtensionDecoder {
    fn decode(&self, bytes: &[u8], name_hint: Option<&str>) -> Result<FrameBuffer, CoreError> {
        let name = name_hint.ok_or_else(|| CoreError::UnsupportedFormat {
            format: "<sans nom>".into(),
        })?;
        let format = ImageFormat::from_path(name).map_err(|_| CoreError::UnsupportedFormat {
            format: Path::new(name)
                .extension()
                .map_or_else(|| name.to_string(), |e| e.to_string_lossy().into_owned()),
        })?;
        let img = image::load_from_memory_with_format(bytes, format).map_err(|e| {
            CoreError::Decode {
                decoder: self.name(),
                reason: e.to_string(),
            }
        })?;
        into_frame(&img)
    }

    fn name(&self) -> &'static str {
        "extension"
    }
}

/// Chaîne de décodage par défaut : détection par contenu, puis par extension.
#[must_use]
pub fn default_decoders() -> Vec<Box<dyn ImageDecoder>> {
    vec![Box::new(SniffingDecoder), Box::new(ExtensionDecoder)]
}

/// Try each decoder in order; the first success wins.
///
/// # Errors
/// Returns the last decoder's error when every path fails, or
/// `CoreError::UnsupportedFormat` for an empty chain.
pub fn decode_with_fallback(
    decoders: &[Box<dyn ImageDecoder>],
    bytes: &[u8],
    name_hint: Option<&str>,
) -> Result<FrameBuffer, CoreError> {
    let mut last_err = CoreError::UnsupportedFormat {
        format: "aucun décodeur".into(),
    };
    for decoder in decoders {
        match decoder.decode(bytes, name_hint) {
            Ok(frame) => {
                log::debug!(
                    "Image décodée par '{}' : {}×{}",
                    decoder.name(),
                    frame.width,
                    frame.height
                );
                return Ok(frame);
            }
            Err(e) => {
                log::debug!("Décodeur '{}' en échec : {e}", decoder.name());
                last_err = e;
            }
        }
    }
    Err(last_err)
}

fn into_frame(img: &DynamicImage) -> Result<FrameBuffer, CoreError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidDimensions { width, height });
    }
    FrameBuffer::from_raw(width, height, rgba.into_raw())
        .ok_or(CoreError::InvalidDimensions { width, height })
}

/// Charge une image depuis le disque avec la chaîne de décodage par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
///
/// # Example
/// ```no_run
/// use gg_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("test.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer> {
    if !path.exists() {
        return Err(CoreError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("Impossible de charger {}", path.display()))?;
    let name = path.file_name().and_then(|n| n.to_str());
    let frame = decode_with_fallback(&default_decoders(), &bytes, name)
        .with_context(|| format!("Impossible de décoder {}", path.display()))?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn sniffing_decodes_png() {
        let frame = SniffingDecoder
            .decode(&png_bytes(3, 2, [10, 20, 30, 255]), None)
            .unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(frame.pixel(2, 1), (10, 20, 30, 255));
    }

    #[test]
    fn extension_decoder_needs_a_name() {
        let err = ExtensionDecoder
            .decode(&png_bytes(1, 1, [0, 0, 0, 255]), None)
            .unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFormat { .. }));
    }

    #[test]
    fn extension_decoder_uses_hint() {
        let frame = ExtensionDecoder
            .decode(&png_bytes(2, 2, [0, 0, 0, 255]), Some("photo.PNG"))
            .unwrap();
        assert_eq!(frame.width, 2);
    }

    #[test]
    fn fallback_reports_last_error() {
        let err = decode_with_fallback(&default_decoders(), b"garbage", Some("x.unknown"))
            .unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFormat { .. }));
    }

    #[test]
    fn fallback_succeeds_on_primary() {
        let frame =
            decode_with_fallback(&default_decoders(), &png_bytes(4, 4, [1, 2, 3, 4]), None)
                .unwrap();
        assert_eq!(frame.pixel(0, 0), (1, 2, 3, 4));
    }

    /// TGA non compressé 32 bits, origine en haut à gauche, pixels en BGRA.
    fn tga_bytes(w: u16, h: u16, rgba: [u8; 4]) -> Vec<u8> {
        let [wl, wh] = w.to_le_bytes();
        let [hl, hh] = h.to_le_bytes();
        let mut out = vec![0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, wl, wh, hl, hh, 32, 0x28];
        for _ in 0..usize::from(w) * usize::from(h) {
            out.extend_from_slice(&[rgba[2], rgba[1], rgba[0], rgba[3]]);
        }
        out
    }

    #[test]
    fn headerless_tga_needs_the_extension_path() {
        let bytes = tga_bytes(2, 1, [200, 100, 50, 255]);
        assert!(SniffingDecoder.decode(&bytes, Some("pic.tga")).is_err());

        let frame = decode_with_fallback(&default_decoders(), &bytes, Some("pic.tga")).unwrap();
        assert_eq!((frame.width, frame.height), (2, 1));
        assert_eq!(frame.pixel(1, 0), (200, 100, 50, 255));
    }

    #[test]
    fn load_image_reads_tga_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.tga");
        std::fs::write(&path, tga_bytes(3, 2, [0, 0, 0, 255])).unwrap();
        let frame = load_image(&path).unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
    }

    #[test]
    fn load_image_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.png");
        std::fs::write(&path, png_bytes(5, 1, [9, 9, 9, 255])).unwrap();
        let frame = load_image(&path).unwrap();
        assert_eq!((frame.width, frame.height), (5, 1));
    }

    #[test]
    fn missing_file_is_reported_as_such() {
        let err = load_image(Path::new("/nonexistent/img.png")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::FileNotFound { .. })
        ));
    }
}
