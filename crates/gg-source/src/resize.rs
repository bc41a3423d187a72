use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use gg_core::CoreError;
use gg_core::frame::FrameBuffer;

/// Rectangle où l'image source est dessinée dans la cible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Offset horizontal.
    pub x: u32,
    /// Offset vertical.
    pub y: u32,
    /// Largeur dessinée (≥ 1).
    pub width: u32,
    /// Hauteur dessinée (≥ 1).
    pub height: u32,
}

/// Aspect-preserving fit of `src_w`×`src_h` inside `dst_w`×`dst_h`, centered.
///
/// Drawn size is floored and clamped to at least one pixel so extreme aspect
/// ratios never produce an empty draw.
///
/// # Example
/// ```
/// use gg_source::resize::letterbox_placement;
/// let p = letterbox_placement(200, 100, 10, 10);
/// assert_eq!((p.x, p.y, p.width, p.height), (0, 2, 10, 5));
/// ```
#[must_use]
pub fn letterbox_placement(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> Placement {
    let scale = (f64::from(dst_w) / f64::from(src_w)).min(f64::from(dst_h) / f64::from(src_h));
    let width = ((f64::from(src_w) * scale).floor() as u32).clamp(1, dst_w.max(1));
    let height = ((f64::from(src_h) * scale).floor() as u32).clamp(1, dst_h.max(1));
    Placement {
        x: dst_w.saturating_sub(width) / 2,
        y: dst_h.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Letterbox resizer réutilisable wrappant fast_image_resize.
///
/// Remplit la cible avec le gris de fond, puis dessine la source mise à
/// l'échelle (Lanczos3) au centre.
///
/// # Example
/// ```
/// use gg_source::resize::Letterbox;
/// use gg_core::frame::FrameBuffer;
/// let mut lb = Letterbox::new();
/// let src = FrameBuffer::filled(100, 50, [0, 0, 0, 255]);
/// let out = lb.fit(&src, 10, 10, 255).unwrap();
/// assert_eq!((out.width, out.height), (10, 10));
/// // bande de letterbox en haut : blanche
/// assert_eq!(out.pixel(0, 0), (255, 255, 255, 255));
/// ```
pub struct Letterbox {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch image for source (owned buffer to avoid the mut borrow issue).
    src_buf: Vec<u8>,
    /// Scratch image for the scaled, not yet composited, pixels.
    scaled_buf: Vec<u8>,
}

impl Letterbox {
    /// Create a new letterbox resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
            src_buf: Vec::new(),
            scaled_buf: Vec::new(),
        }
    }

    /// Fit `src` into a fresh `cols`×`rows` RGBA buffer.
    ///
    /// Transparent source pixels are blended over `background`; the output is
    /// fully opaque.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidDimensions` if the source or the target is
    /// empty, or an error if the resize operation fails.
    pub fn fit(
        &mut self,
        src: &FrameBuffer,
        cols: u32,
        rows: u32,
        background: u8,
    ) -> Result<FrameBuffer> {
        if src.is_empty() {
            return Err(CoreError::InvalidDimensions {
                width: src.width,
                height: src.height,
            }
            .into());
        }
        if cols == 0 || rows == 0 {
            return Err(CoreError::InvalidDimensions {
                width: cols,
                height: rows,
            }
            .into());
        }

        let place = letterbox_placement(src.width, src.height, cols, rows);
        let mut dst = FrameBuffer::filled(cols, rows, [background, background, background, 255]);

        let scaled: &[u8] = if place.width == src.width && place.height == src.height {
            &src.data
        } else {
            self.scale(src, place.width, place.height)?;
            &self.scaled_buf
        };

        composite(&mut dst, scaled, place, background);
        Ok(dst)
    }

    fn scale(&mut self, src: &FrameBuffer, width: u32, height: u32) -> Result<()> {
        // fast_image_resize veut une source &mut : copie obligatoire.
        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);
        self.scaled_buf.clear();
        self.scaled_buf.resize(width as usize * height as usize * 4, 0);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x4)
                .context("Invalid source dimensions")?;
        let mut dst_image =
            Image::from_slice_u8(width, height, &mut self.scaled_buf, PixelType::U8x4)
                .context("Invalid destination dimensions")?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("Resize failed")?;
        Ok(())
    }
}

impl Default for Letterbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Blend `scaled` (RGBA, `place.width`×`place.height`) over the background at `place`.
fn composite(dst: &mut FrameBuffer, scaled: &[u8], place: Placement, background: u8) {
    let bg = u32::from(background);
    let dst_w = dst.width as usize;
    for (row, src_row) in scaled
        .chunks_exact(place.width as usize * 4)
        .take(place.height as usize)
        .enumerate()
    {
        let start = ((place.y as usize + row) * dst_w + place.x as usize) * 4;
        let dst_row = &mut dst.data[start..start + src_row.len()];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let a = u32::from(s[3]);
            for c in 0..3 {
                d[c] = ((u32::from(s[c]) * a + bg * (255 - a) + 127) / 255) as u8;
            }
            d[3] = 255;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letterbox(src: &FrameBuffer, cols: u32, rows: u32, background: u8) -> Result<FrameBuffer> {
        Letterbox::new().fit(src, cols, rows, background)
    }

    #[test]
    fn placement_square_into_wide() {
        let p = letterbox_placement(100, 100, 20, 10);
        assert_eq!(p, Placement { x: 5, y: 0, width: 10, height: 10 });
    }

    #[test]
    fn placement_clamps_degenerate_aspect() {
        // 10000×1 dans 4×4 : hauteur flooree à 0, clampée à 1
        let p = letterbox_placement(10_000, 1, 4, 4);
        assert_eq!((p.width, p.height), (4, 1));
        assert_eq!(p.y, 1);
    }

    #[test]
    fn same_size_is_copied() {
        let src = FrameBuffer::filled(4, 4, [200, 200, 200, 255]);
        let out = letterbox(&src, 4, 4, 255).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn letterbox_bands_use_background() {
        let src = FrameBuffer::filled(8, 2, [0, 0, 0, 255]);
        let out = letterbox(&src, 4, 4, 0x40).unwrap();
        // 8×2 → 4×1, centré verticalement à y = 1
        for x in 0..4 {
            assert_eq!(out.pixel(x, 0), (0x40, 0x40, 0x40, 255));
            assert_eq!(out.pixel(x, 1), (0, 0, 0, 255));
            assert_eq!(out.pixel(x, 2), (0x40, 0x40, 0x40, 255));
        }
    }

    #[test]
    fn transparent_source_shows_background() {
        let src = FrameBuffer::filled(4, 4, [0, 0, 0, 0]);
        let out = letterbox(&src, 4, 4, 255).unwrap();
        assert_eq!(out.pixel(2, 2), (255, 255, 255, 255));
    }

    #[test]
    fn uniform_downscale_stays_uniform() {
        let src = FrameBuffer::filled(64, 64, [200, 200, 200, 255]);
        let out = letterbox(&src, 4, 4, 255).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let (r, g, b, a) = out.pixel(x, y);
                assert!(r.abs_diff(200) <= 1 && g.abs_diff(200) <= 1 && b.abs_diff(200) <= 1);
                assert_eq!(a, 255);
            }
        }
    }

    #[test]
    fn empty_source_is_rejected() {
        let src = FrameBuffer::new(0, 5);
        assert!(letterbox(&src, 4, 4, 255).is_err());
    }

    #[test]
    fn reused_letterbox_matches_fresh_one() {
        let mut lb = Letterbox::new();
        let wide = FrameBuffer::filled(64, 16, [0, 0, 0, 255]);
        let tall = FrameBuffer::filled(10, 90, [120, 120, 120, 128]);

        // grande cible puis petite : le scratch garde des octets de la première passe
        let first = lb.fit(&wide, 32, 32, 255).unwrap();
        let second = lb.fit(&tall, 6, 6, 0).unwrap();
        let third = lb.fit(&wide, 8, 8, 255).unwrap();

        assert_eq!(first, letterbox(&wide, 32, 32, 255).unwrap());
        assert_eq!(second, letterbox(&tall, 6, 6, 0).unwrap());
        assert_eq!(third, letterbox(&wide, 8, 8, 255).unwrap());
        assert_eq!((second.width, second.height), (6, 6));
    }
}
