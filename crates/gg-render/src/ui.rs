use gg_core::charset::{PALETTE_PRESETS, Palette};
use gg_core::config::Newline;
use gg_editor::{Cursor, GridEditor};
use gg_export::{ExportOptions, grid_to_text, preview_text, text_stats};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::canvas;

/// Largeur fixe de la barre latérale.
const SIDEBAR_WIDTH: u16 = 26;
/// Hauteur du panneau d'aperçu (bordure comprise).
const PREVIEW_HEIGHT: u16 = 10;

/// Everything the draw pass reads. Built fresh each frame by the app.
pub struct ViewModel<'a> {
    pub editor: &'a GridEditor,
    pub cursor: Cursor,
    pub export: ExportOptions,
    /// Trailing spaces shown as `·` in the preview.
    pub show_whitespace: bool,
    pub help: bool,
    /// Last status message (export path, errors).
    pub status: &'a str,
}

/// Where the grid ended up on screen, for mouse hit-testing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CanvasPlacement {
    /// Inner canvas area.
    pub area: Rect,
    /// Top-left visible cell (row, col).
    pub origin: (usize, usize),
    /// Terminal columns per cell.
    pub cell_width: u16,
}

impl CanvasPlacement {
    /// Grid cell under a terminal position, if any.
    #[must_use]
    pub fn cell_at(&self, column: u16, row: u16, dims: (usize, usize)) -> Option<(usize, usize)> {
        canvas::cell_at(self.area, self.origin, self.cell_width, column, row, dims)
    }
}

/// Draw the full UI: canvas + preview + sidebar + status line.
pub fn draw(frame: &mut Frame, view: &ViewModel<'_>) -> CanvasPlacement {
    let area = frame.area();

    // [corps | statut(1)]
    let [body, status_area] =
        Layout::vertical([Constraint::Min(4), Constraint::Length(1)]).areas(area);
    // [gauche | sidebar]
    let [left, sidebar_area] =
        Layout::horizontal([Constraint::Min(20), Constraint::Length(SIDEBAR_WIDTH)]).areas(body);
    // [canvas | aperçu]
    let [canvas_outer, preview_area] =
        Layout::vertical([Constraint::Min(4), Constraint::Length(PREVIEW_HEIGHT)]).areas(left);

    let editor = view.editor;
    let grid = editor.snapshot();
    let palette = editor.palette();

    // === Canvas ===
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Grid {}×{} ", grid.cols(), grid.rows()));
    let canvas_area = block.inner(canvas_outer);
    frame.render_widget(block, canvas_outer);
    let origin = canvas::render_grid(
        frame.buffer_mut(),
        canvas_area,
        &grid,
        palette,
        view.cursor,
        editor.pixel_size(),
    );

    // === Aperçu texte ===
    draw_preview(frame, preview_area, view);

    // === Sidebar ===
    draw_sidebar(frame, sidebar_area, view);

    // === Statut ===
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", view.status),
            Style::default().fg(Color::DarkGray),
        ))),
        status_area,
    );

    if view.help {
        draw_help_overlay(frame, area);
    }

    CanvasPlacement {
        area: canvas_area,
        origin,
        cell_width: canvas::cell_width(editor.pixel_size()),
    }
}

fn draw_preview(frame: &mut Frame, area: Rect, view: &ViewModel<'_>) {
    let editor = view.editor;
    // Le BOM est invisible : l'aperçu et les stats portent sur le texte seul.
    let opts = ExportOptions {
        bom: false,
        ..view.export
    };
    let text = grid_to_text(&editor.snapshot(), editor.palette(), &opts);
    let stats = text_stats(&text);
    let shown = preview_text(&text, view.show_whitespace);

    let lines: Vec<Line> = shown
        .lines()
        .take(usize::from(area.height.saturating_sub(2)))
        .map(|l| Line::from(l.to_owned()))
        .collect();

    let title = format!(
        " Preview · {} lines · {} chars ({} w/o newlines) ",
        stats.lines, stats.chars, stats.chars_without_newlines
    );
    let preview = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(preview, area);
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

fn palette_label(palette: Palette) -> String {
    let show = |c: char| if c == ' ' { "␠".to_owned() } else { c.to_string() };
    let preset = palette
        .preset_index()
        .map_or_else(|| "custom".to_owned(), |i| format!("{}/{}", i + 1, PALETTE_PRESETS.len()));
    format!("{}/{} ({preset})", show(palette.dark), show(palette.light))
}

/// Draw the parameter sidebar with all live values.
fn draw_sidebar(frame: &mut Frame, area: Rect, view: &ViewModel<'_>) {
    let editor = view.editor;
    let stats = editor.stats();
    let heading = Style::default().fg(Color::Yellow);

    let image_str = editor
        .image()
        .map_or_else(|| "none".to_owned(), |img| format!("{}×{}", img.width, img.height));
    let newline_str = match view.export.newline {
        Newline::Lf => "LF",
        Newline::Crlf => "CRLF",
    };

    let mut lines = vec![
        Line::from(Span::styled("─ Grid ────────", heading)),
        Line::from(format!(" Size: {}×{}", editor.cols(), editor.rows())),
        Line::from(format!(" Cell: {}px", editor.pixel_size())),
        Line::from(format!(" Cursor: {},{}", view.cursor.row, view.cursor.col)),
        Line::from(format!(" Palette: {}", palette_label(editor.palette()))),
        Line::from(""),
        Line::from(Span::styled("─ Image ───────", heading)),
        Line::from(format!(" Source: {image_str}")),
        Line::from(format!(" Threshold: {}", editor.threshold())),
        Line::from(format!(" Invert: {}", on_off(editor.invert()))),
        Line::from(""),
        Line::from(Span::styled("─ Export ──────", heading)),
        Line::from(format!(" Newline: {newline_str}")),
        Line::from(format!(" ASCII: {}", on_off(view.export.ascii_mode))),
        Line::from(format!(" BOM: {}", on_off(view.export.bom))),
        Line::from(format!(" Whitespace: {}", on_off(view.show_whitespace))),
        Line::from(""),
        Line::from(Span::styled("─ Pipeline ────", heading)),
        Line::from(format!(" Runs: {}", stats.runs_started)),
        Line::from(format!(" Applied: {}", stats.applied)),
        Line::from(format!(" Stale: {}", stats.stale_discarded)),
    ];
    if editor.is_busy() || editor.next_deadline().is_some() {
        lines.push(Line::from(Span::styled(
            " ● working",
            Style::default().fg(Color::Green),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " F1 = help",
        Style::default().fg(Color::DarkGray),
    )));

    let sidebar =
        Paragraph::new(lines).block(Block::default().borders(Borders::LEFT).title(" Params "));
    frame.render_widget(sidebar, area);
}

/// Draw the help overlay with all keybindings.
fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            " glyphgrid · Controls ",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(" ←↑↓→       Move cursor"),
        Line::from(" a-z, 0-9…  Write character"),
        Line::from(" Backspace  Clear previous cell"),
        Line::from(" Enter      Next row"),
        Line::from(" Click/^T   Toggle dark/light"),
        Line::from(" Alt+←→     Cols ±4"),
        Line::from(" Alt+↑↓     Rows ±4"),
        Line::from(" PgUp/PgDn  Threshold ±8"),
        Line::from(" ^R         Toggle invert"),
        Line::from(" ^P         Cycle palette"),
        Line::from(" F2/F3      Cell size ±"),
        Line::from(" ^O         Open image"),
        Line::from(" ^X         Drop image"),
        Line::from(" ^N         Clear grid"),
        Line::from(" ^E         Toggle ASCII mode"),
        Line::from(" ^L         Toggle LF/CRLF"),
        Line::from(" ^B         Toggle BOM"),
        Line::from(" ^W         Show whitespace"),
        Line::from(" ^S         Export .txt"),
        Line::from(" ^Q/Esc     Quit"),
        Line::from(""),
        Line::from(Span::styled(
            " Press F1 or Esc to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_width = 36u16.min(area.width);
    let help_height = (help_text.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(help_width) / 2;
    let y = area.y + area.height.saturating_sub(help_height) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );

    frame.render_widget(Clear, help_area);
    frame.render_widget(help, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gg_core::config::EditorConfig;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn editor() -> GridEditor {
        GridEditor::from_config(&EditorConfig {
            rows: 8,
            cols: 12,
            palette: Palette::new('#', '.'),
            ..EditorConfig::default()
        })
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn draw_places_canvas_inside_border() {
        let mut ed = editor();
        ed.set_cell(0, 0, '#');
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut placement = CanvasPlacement::default();
        terminal
            .draw(|f| {
                placement = draw(
                    f,
                    &ViewModel {
                        editor: &ed,
                        cursor: Cursor::new(0, 0),
                        export: ExportOptions::default(),
                        show_whitespace: false,
                        help: false,
                        status: "ready",
                    },
                );
            })
            .unwrap();
        assert_eq!((placement.area.x, placement.area.y), (1, 1));
        assert_eq!(placement.origin, (0, 0));
        assert_eq!(placement.cell_at(1, 1, (8, 12)), Some((0, 0)));

        let text = screen(&terminal);
        assert!(text.contains("Grid 12×8"));
        assert!(text.contains("Threshold: 128"));
        assert!(text.contains("ready"));
    }

    #[test]
    fn help_overlay_lists_bindings() {
        let ed = editor();
        let mut terminal = Terminal::new(TestBackend::new(80, 32)).unwrap();
        terminal
            .draw(|f| {
                draw(
                    f,
                    &ViewModel {
                        editor: &ed,
                        cursor: Cursor::default(),
                        export: ExportOptions::default(),
                        show_whitespace: true,
                        help: true,
                        status: "",
                    },
                );
            })
            .unwrap();
        let text = screen(&terminal);
        assert!(text.contains("Controls"));
        assert!(text.contains("Export .txt"));
    }

    #[test]
    fn palette_label_names_presets() {
        assert_eq!(palette_label(Palette::new('#', '.')), "#/. (2/3)");
        assert_eq!(palette_label(Palette::new('x', 'y')), "x/y (custom)");
    }
}
