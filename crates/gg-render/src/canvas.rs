use gg_core::charset::Palette;
use gg_core::frame::CharGrid;
use gg_editor::Cursor;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

/// Taille de cellule (px) à partir de laquelle une cellule occupe deux colonnes.
pub const WIDE_CELL_PX: u8 = 16;

/// Terminal columns used per grid cell for a given display size.
///
/// # Example
/// ```
/// use gg_render::canvas::cell_width;
/// assert_eq!(cell_width(8), 1);
/// assert_eq!(cell_width(20), 2);
/// ```
#[must_use]
pub fn cell_width(pixel_size: u8) -> u16 {
    if pixel_size >= WIDE_CELL_PX { 2 } else { 1 }
}

/// First visible index along one axis so that `focus` stays on screen.
///
/// Centered on the focus when the grid is larger than the view, then pulled
/// back so the view never runs past the end.
///
/// # Example
/// ```
/// use gg_render::canvas::viewport_origin;
/// assert_eq!(viewport_origin(3, 10, 20), 0);
/// assert_eq!(viewport_origin(50, 100, 20), 40);
/// assert_eq!(viewport_origin(99, 100, 20), 80);
/// ```
#[must_use]
pub fn viewport_origin(focus: usize, total: usize, visible: usize) -> usize {
    if visible >= total {
        return 0;
    }
    focus.saturating_sub(visible / 2).min(total - visible)
}

/// Écrit directement une `CharGrid` dans un `ratatui::Buffer`, curseur en surbrillance.
///
/// Scrolls so the cursor is always visible. Returns the (row, col) of the
/// top-left visible cell, which the app uses to map mouse clicks back.
pub fn render_grid(
    buf: &mut Buffer,
    area: Rect,
    grid: &CharGrid,
    palette: Palette,
    cursor: Cursor,
    pixel_size: u8,
) -> (usize, usize) {
    let width = cell_width(pixel_size);
    let vis_cols = usize::from(area.width / width);
    let vis_rows = usize::from(area.height);
    let row0 = viewport_origin(cursor.row, grid.rows(), vis_rows);
    let col0 = viewport_origin(cursor.col, grid.cols(), vis_cols);

    let manual = Style::default().fg(Color::Cyan);
    let focus = Style::default().add_modifier(Modifier::REVERSED);

    for (dy, row) in grid.iter_rows().skip(row0).take(vis_rows).enumerate() {
        let y = area.y + dy as u16;
        for (dx, &ch) in row.iter().skip(col0).take(vis_cols).enumerate() {
            let x = area.x + dx as u16 * width;
            let mut style = if palette.contains(ch) {
                Style::default()
            } else {
                manual
            };
            if (row0 + dy, col0 + dx) == (cursor.row, cursor.col) {
                style = style.patch(focus);
            }
            // Les cellules sombres s'étalent sur la largeur, le reste est complété par un blanc.
            let fill = if ch == palette.dark { ch } else { ' ' };
            for k in 0..width {
                if let Some(cell) = buf.cell_mut((x + k, y)) {
                    cell.set_char(if k == 0 { ch } else { fill });
                    cell.set_style(style);
                }
            }
        }
    }
    (row0, col0)
}

/// Map a terminal position inside `area` back to a grid cell.
///
/// # Example
/// ```
/// use ratatui::layout::Rect;
/// use gg_render::canvas::cell_at;
/// let area = Rect::new(2, 1, 20, 10);
/// assert_eq!(cell_at(area, (0, 0), 1, 5, 3, (8, 8)), Some((2, 3)));
/// assert_eq!(cell_at(area, (0, 0), 1, 0, 0, (8, 8)), None);
/// ```
#[must_use]
pub fn cell_at(
    area: Rect,
    origin: (usize, usize),
    width: u16,
    column: u16,
    row: u16,
    dims: (usize, usize),
) -> Option<(usize, usize)> {
    if !area.contains(ratatui::layout::Position::new(column, row)) {
        return None;
    }
    let r = origin.0 + usize::from(row - area.y);
    let c = origin.1 + usize::from((column - area.x) / width.max(1));
    (r < dims.0 && c < dims.1).then_some((r, c))
}
