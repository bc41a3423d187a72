use gg_core::charset::Palette;
use gg_core::config::{ExportConfig, Newline};
use gg_core::frame::CharGrid;

/// Espace cadratin : même chasse qu'un glyphe plein dans la plupart des polices.
pub const EM_SPACE: char = '\u{2003}';
/// Marque des espaces de fin de ligne dans l'aperçu.
pub const TRAILING_MARK: char = '·';
const BOM: char = '\u{feff}';

/// Text serialization policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub newline: Newline,
    /// Replace palette cells by `dark_char` / `light_char`.
    pub ascii_mode: bool,
    pub dark_char: char,
    pub light_char: char,
    /// Prefix the text with U+FEFF.
    pub bom: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from(&ExportConfig::default())
    }
}

impl From<&ExportConfig> for ExportOptions {
    fn from(config: &ExportConfig) -> Self {
        Self {
            newline: config.newline,
            ascii_mode: config.ascii_mode,
            dark_char: config.dark_char,
            light_char: config.light_char,
            bom: config.bom,
        }
    }
}

/// Serialize `grid` as one line per row, joined by the newline style.
///
/// ASCII mode maps `palette.dark` / `palette.light` to the configured
/// stand-ins and passes other characters through. Otherwise every space cell
/// becomes an em space and the rest is written as is. No trailing newline.
///
/// # Example
/// ```
/// use gg_core::charset::Palette;
/// use gg_core::config::Newline;
/// use gg_core::frame::CharGrid;
/// use gg_export::{grid_to_text, ExportOptions};
///
/// let mut grid = CharGrid::new(2, 3, '.');
/// grid.set(0, 0, '#');
/// grid.set(1, 2, 'x');
/// let opts = ExportOptions {
///     newline: Newline::Crlf,
///     ascii_mode: true,
///     dark_char: '@',
///     light_char: '-',
///     bom: false,
/// };
/// assert_eq!(grid_to_text(&grid, Palette::new('#', '.'), &opts), "@--\r\n--x");
/// ```
#[must_use]
pub fn grid_to_text(grid: &CharGrid, palette: Palette, opts: &ExportOptions) -> String {
    let sep = opts.newline.as_str();
    // cellules + séparateurs, en supposant des caractères ≤ 3 octets
    let mut out = String::with_capacity(grid.rows() * (grid.cols() * 3 + sep.len()) + 3);
    if opts.bom {
        out.push(BOM);
    }
    for (i, row) in grid.iter_rows().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.extend(row.iter().map(|&ch| map_cell(ch, palette, opts)));
    }
    out
}

#[inline]
fn map_cell(ch: char, palette: Palette, opts: &ExportOptions) -> char {
    if opts.ascii_mode {
        if ch == palette.dark {
            opts.dark_char
        } else if ch == palette.light {
            opts.light_char
        } else {
            ch
        }
    } else if ch == ' ' {
        EM_SPACE
    } else {
        ch
    }
}

/// On-screen rendition of exported text.
///
/// Without `show_whitespace`, every space becomes an em space. With it,
/// trailing spaces of each line become `·` and the remaining spaces become
/// em spaces; lines are rejoined with `\n`.
///
/// # Example
/// ```
/// use gg_export::preview_text;
/// assert_eq!(preview_text("a b  \nc", true), "a\u{2003}b··\nc");
/// assert_eq!(preview_text("a b", false), "a\u{2003}b");
/// ```
#[must_use]
pub fn preview_text(text: &str, show_whitespace: bool) -> String {
    if !show_whitespace {
        return text.replace(' ', "\u{2003}");
    }
    let mut out = String::with_capacity(text.len() * 2);
    for (i, line) in split_lines(text).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let body = line.trim_end_matches(' ');
        let trailing = line.len() - body.len();
        out.extend(body.chars().map(|c| if c == ' ' { EM_SPACE } else { c }));
        out.extend(std::iter::repeat_n(TRAILING_MARK, trailing));
    }
    out
}

/// Split on `\r\n`, `\n` or a lone `\r`.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(['\r', '\n']) {
            Some(pos) => {
                let skip = if current[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[pos + skip..]);
                Some(&current[..pos])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash() -> Palette {
        Palette::new('#', '.')
    }

    fn ascii(newline: Newline) -> ExportOptions {
        ExportOptions {
            newline,
            ascii_mode: true,
            dark_char: '#',
            light_char: '.',
            bom: false,
        }
    }

    #[test]
    fn ascii_mode_maps_palette_and_keeps_others() {
        let block = Palette::default();
        let mut grid = CharGrid::new(2, 2, block.light);
        grid.set(0, 0, block.dark);
        grid.set(1, 1, 'Z');
        assert_eq!(grid_to_text(&grid, block, &ascii(Newline::Lf)), "#.\n.Z");
        assert_eq!(grid_to_text(&grid, block, &ascii(Newline::Crlf)), "#.\r\n.Z");
    }

    #[test]
    fn plain_mode_widens_spaces_only() {
        let block = Palette::default();
        let mut grid = CharGrid::new(1, 3, ' ');
        grid.set(0, 1, block.dark);
        let opts = ExportOptions::default();
        assert_eq!(grid_to_text(&grid, block, &opts), "\u{2003}\u{2588}\u{2003}");
    }

    #[test]
    fn ascii_mode_light_space_stays_plain_space() {
        let block = Palette::default();
        let grid = CharGrid::new(1, 2, ' ');
        let opts = ExportOptions {
            ascii_mode: true,
            ..ExportOptions::default()
        };
        assert_eq!(grid_to_text(&grid, block, &opts), "  ");
    }

    #[test]
    fn bom_is_prefixed_once() {
        let grid = CharGrid::new(2, 2, '.');
        let opts = ExportOptions {
            bom: true,
            ..ascii(Newline::Lf)
        };
        let text = grid_to_text(&grid, hash(), &opts);
        assert!(text.starts_with('\u{feff}'));
        assert_eq!(text.matches('\u{feff}').count(), 1);
        assert_eq!(&text[3..], "..\n..");
    }

    #[test]
    fn no_trailing_newline() {
        let grid = CharGrid::new(4, 4, '.');
        let text = grid_to_text(&grid, hash(), &ascii(Newline::Lf));
        assert!(!text.ends_with('\n'));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn preview_marks_trailing_spaces_across_newline_styles() {
        assert_eq!(preview_text("ab \r\n c\r", true), "ab·\n\u{2003}c\n");
        assert_eq!(preview_text("   ", true), "···");
    }

    #[test]
    fn split_handles_mixed_separators() {
        let parts: Vec<&str> = split_lines("a\r\nb\nc\rd").collect();
        assert_eq!(parts, ["a", "b", "c", "d"]);
        assert_eq!(split_lines("").count(), 1);
        assert_eq!(split_lines("x\n").collect::<Vec<_>>(), ["x", ""]);
    }
}
