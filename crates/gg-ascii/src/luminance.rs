use gg_core::frame::{FrameBuffer, LumaBuffer};

/// Luminance perceptuelle BT.709 d'un pixel, arrondie au plus proche.
///
/// L'alpha est ignoré.
///
/// # Example
/// ```
/// use gg_ascii::luminance::luma709;
/// assert_eq!(luma709(255, 255, 255), 255);
/// assert_eq!(luma709(255, 0, 0), 54);
/// ```
#[inline(always)]
#[must_use]
pub fn luma709(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

/// Convert an RGBA buffer to one brightness byte per pixel.
///
/// # Example
/// ```
/// use gg_core::frame::FrameBuffer;
/// use gg_ascii::luminance::to_luma;
/// let frame = FrameBuffer::filled(4, 2, [200, 200, 200, 255]);
/// let luma = to_luma(&frame);
/// assert_eq!(luma.data, vec![200; 8]);
/// ```
#[must_use]
pub fn to_luma(frame: &FrameBuffer) -> LumaBuffer {
    let data = frame
        .data
        .chunks_exact(4)
        .map(|px| luma709(px[0], px[1], px[2]))
        .collect();
    LumaBuffer {
        data,
        width: frame.width,
        height: frame.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_follow_rec709_weights() {
        assert_eq!(luma709(0, 255, 0), 182); // 182.376
        assert_eq!(luma709(0, 0, 255), 18); // 18.411
        assert_eq!(luma709(0, 0, 0), 0);
    }

    #[test]
    fn grey_is_identity() {
        for v in 0..=255u8 {
            assert_eq!(luma709(v, v, v), v);
        }
    }

    #[test]
    fn alpha_is_ignored() {
        let opaque = FrameBuffer::filled(1, 1, [10, 120, 30, 255]);
        let clear = FrameBuffer::filled(1, 1, [10, 120, 30, 0]);
        assert_eq!(to_luma(&opaque), to_luma(&clear));
    }
}
