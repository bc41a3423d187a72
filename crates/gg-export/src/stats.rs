use crate::text::split_lines;

/// Comptages affichés sous l'aperçu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextStats {
    /// Segments after splitting on `\r\n`, `\n` or `\r` (≥ 1).
    pub lines: usize,
    /// Unicode scalar values, separators included.
    pub chars: usize,
    /// Unicode scalar values, separators excluded.
    pub chars_without_newlines: usize,
}

/// Count lines and characters of exported text.
///
/// # Example
/// ```
/// use gg_export::text_stats;
/// let s = text_stats("ab\ncd");
/// assert_eq!((s.lines, s.chars, s.chars_without_newlines), (2, 5, 4));
/// ```
#[must_use]
pub fn text_stats(text: &str) -> TextStats {
    let (lines, body) = split_lines(text).fold((0, 0), |(n, c), line| {
        (n + 1, c + line.chars().count())
    });
    TextStats {
        lines,
        chars: text.chars().count(),
        chars_without_newlines: body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_counts_as_one_break() {
        let s = text_stats("ab\r\ncd\ref");
        assert_eq!(s.lines, 3);
        assert_eq!(s.chars, 9);
        assert_eq!(s.chars_without_newlines, 6);
    }

    #[test]
    fn empty_text_is_one_line() {
        assert_eq!(
            text_stats(""),
            TextStats {
                lines: 1,
                chars: 0,
                chars_without_newlines: 0
            }
        );
    }

    #[test]
    fn multibyte_cells_count_once() {
        let s = text_stats("\u{2588}\u{2003}\n\u{2003}\u{2588}");
        assert_eq!((s.lines, s.chars, s.chars_without_newlines), (2, 5, 4));
    }
}
