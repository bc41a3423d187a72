use serde::{Deserialize, Serialize};

/// Bloc plein / espace, palette par défaut.
pub const PALETTE_BLOCK: Palette = Palette {
    dark: '\u{2588}',
    light: ' ',
};

/// Dièse / point, lisible dans n'importe quel éditeur.
pub const PALETTE_HASH: Palette = Palette {
    dark: '#',
    light: '.',
};

/// Arobase / espace, style ASCII art classique.
pub const PALETTE_AT: Palette = Palette {
    dark: '@',
    light: ' ',
};

/// Built-in presets, cycled by the front-end.
pub const PALETTE_PRESETS: [Palette; 3] = [PALETTE_BLOCK, PALETTE_HASH, PALETTE_AT];

/// Ordered (dark, light) character pair.
///
/// Image-derived cells are always one of these two characters. Only cells
/// holding exactly one of them are flippable by a toggle.
///
/// # Example
/// ```
/// use gg_core::charset::Palette;
/// let p = Palette::new('#', '.');
/// assert!(p.contains('#'));
/// assert_eq!(p.flip('#'), Some('.'));
/// assert_eq!(p.flip('x'), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Caractère « sombre » (luminance sous le seuil).
    pub dark: char,
    /// Caractère « clair », aussi utilisé pour effacer une cellule.
    pub light: char,
}

impl Palette {
    #[must_use]
    pub const fn new(dark: char, light: char) -> Self {
        Self { dark, light }
    }

    /// `true` if `ch` is exactly the dark or the light character.
    #[inline]
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        ch == self.dark || ch == self.light
    }

    /// The other palette value, or `None` for a non-palette character.
    ///
    /// When dark and light are the same character, flipping returns it unchanged.
    #[inline]
    #[must_use]
    pub fn flip(&self, ch: char) -> Option<char> {
        if ch == self.dark {
            Some(self.light)
        } else if ch == self.light {
            Some(self.dark)
        } else {
            None
        }
    }

    /// Index of this palette among [`PALETTE_PRESETS`], if it is one.
    #[must_use]
    pub fn preset_index(&self) -> Option<usize> {
        PALETTE_PRESETS.iter().position(|p| p == self)
    }
}

impl Default for Palette {
    fn default() -> Self {
        PALETTE_BLOCK
    }
}
