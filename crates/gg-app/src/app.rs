use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use gg_core::charset::PALETTE_PRESETS;
use gg_core::config::EditorConfig;
use gg_core::limits;
use gg_editor::{Bounds, Cursor, EditorEvent, GridEditor, InputKey, apply_input};
use gg_export::{ExportOptions, grid_to_text, write_export};
use gg_render::ui::{self, CanvasPlacement, ViewModel};
use ratatui::DefaultTerminal;

use crate::keymap::{Action, map_key};

/// Période maximale entre deux rafraîchissements (résultats des workers).
const FRAME: Duration = Duration::from_millis(33);

/// État de l'application TUI autour de l'éditeur.
pub struct App {
    pub editor: GridEditor,
    pub cursor: Cursor,
    pub export: ExportOptions,
    /// Destination of `Export` (`None` = current directory).
    pub export_dir: Option<PathBuf>,
    pub show_whitespace: bool,
    pub help: bool,
    pub quitting: bool,
    pub status: String,
    events: flume::Receiver<EditorEvent>,
    config_rx: flume::Receiver<EditorConfig>,
    placement: CanvasPlacement,
    open_image_requested: bool,
}

impl App {
    /// Build the app around a fresh editor.
    #[must_use]
    pub fn new(config: &EditorConfig, config_rx: flume::Receiver<EditorConfig>) -> Self {
        let mut editor = GridEditor::from_config(config);
        let events = editor.subscribe();
        Self {
            editor,
            cursor: Cursor::default(),
            export: ExportOptions::from(&config.export),
            export_dir: config.export.directory.clone(),
            show_whitespace: false,
            help: false,
            quitting: false,
            status: "F1 = help".to_owned(),
            events,
            config_rx,
            placement: CanvasPlacement::default(),
            open_image_requested: false,
        }
    }

    /// Start decoding an image file in the background.
    pub fn load_image_file(&mut self, path: &Path) {
        match std::fs::read(path) {
            Ok(bytes) => {
                let hint = path.file_name().map(|n| n.to_string_lossy().into_owned());
                self.status = format!("Decoding {}…", path.display());
                self.editor.set_image_source(bytes, hint);
            }
            Err(e) => {
                log::warn!("Lecture de {} impossible : {e}", path.display());
                self.status = format!("Cannot read {}: {e}", path.display());
            }
        }
    }

    /// Main event loop.
    ///
    /// # Errors
    /// Returns an error if terminal operations fail.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;
        let result = self.event_loop(&mut terminal);
        crossterm::execute!(std::io::stdout(), DisableMouseCapture).ok();
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.quitting {
            // === Travail de fond : debounce, résultats, config ===
            self.pump();

            terminal.draw(|frame| {
                let view = ViewModel {
                    editor: &self.editor,
                    cursor: self.cursor,
                    export: self.export,
                    show_whitespace: self.show_whitespace,
                    help: self.help,
                    status: &self.status,
                };
                self.placement = ui::draw(frame, &view);
            })?;

            // Se réveiller à l'échéance du debounce si elle tombe avant la prochaine frame.
            let timeout = self.editor.next_deadline().map_or(FRAME, |deadline| {
                deadline.saturating_duration_since(Instant::now()).min(FRAME)
            });
            if event::poll(timeout)? {
                self.handle_event(&event::read()?);
                while event::poll(Duration::ZERO)? {
                    self.handle_event(&event::read()?);
                }
            }

            if self.open_image_requested {
                self.open_image_requested = false;
                self.open_image_dialog(terminal);
            }
        }
        Ok(())
    }

    /// Fire due debounces, apply finished results, reloaded configs and
    /// editor notifications.
    pub fn pump(&mut self) {
        self.editor.tick();
        self.editor.drain();

        while let Ok(config) = self.config_rx.try_recv() {
            self.apply_config(&config);
        }
        while let Ok(event) = self.events.try_recv() {
            match event {
                EditorEvent::GridChanged => {}
                EditorEvent::ImageLoaded { width, height } => {
                    self.status = format!("Image loaded ({width}×{height})");
                }
                EditorEvent::DecodeFailed(reason) => {
                    self.status = format!("Decode failed: {reason}");
                }
            }
        }
    }

    fn apply_config(&mut self, config: &EditorConfig) {
        self.editor.apply_config(config);
        self.export = ExportOptions::from(&config.export);
        self.export_dir.clone_from(&config.export.directory);
        self.clamp_cursor();
        self.status = "Config reloaded".to_owned();
    }

    fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => self.apply(map_key(code, modifiers)),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                let dims = (self.editor.rows(), self.editor.cols());
                if let Some((r, c)) = self.placement.cell_at(column, row, dims) {
                    self.cursor = Cursor::new(r, c);
                    self.apply(Action::Edit(InputKey::Activate));
                }
            }
            _ => {}
        }
    }

    /// Execute one action against the editor and the app state.
    pub fn apply(&mut self, action: Action) {
        if self.help && !matches!(action, Action::ToggleHelp | Action::Back | Action::Quit) {
            return;
        }
        match action {
            Action::Edit(key) => {
                self.cursor = apply_input(&mut self.editor, self.cursor, key);
            }
            Action::Quit => self.quitting = true,
            Action::Back => {
                if self.help {
                    self.help = false;
                } else {
                    self.quitting = true;
                }
            }
            Action::ToggleHelp => self.help = !self.help,
            Action::OpenImage => self.open_image_requested = true,
            Action::DropImage => {
                self.editor.clear_image();
                self.status = "Image dropped".to_owned();
            }
            Action::ClearGrid => self.editor.reset_grid(self.editor.palette().light),
            Action::Export => self.export_now(),
            Action::ToggleAscii => self.export.ascii_mode = !self.export.ascii_mode,
            Action::ToggleNewline => self.export.newline = self.export.newline.toggled(),
            Action::ToggleBom => self.export.bom = !self.export.bom,
            Action::ToggleWhitespace => self.show_whitespace = !self.show_whitespace,
            Action::ToggleInvert => self.editor.set_invert(!self.editor.invert()),
            Action::CyclePalette => {
                let next = self
                    .editor
                    .palette()
                    .preset_index()
                    .map_or(0, |i| (i + 1) % PALETTE_PRESETS.len());
                self.editor.set_palette(PALETTE_PRESETS[next]);
            }
            Action::Threshold(delta) => {
                let next = (i16::from(self.editor.threshold()) + delta).clamp(0, 255);
                self.editor.set_threshold(u8::try_from(next).unwrap_or(u8::MAX));
            }
            Action::Resize { rows, cols } => self.resize_by(rows, cols),
            Action::PixelSize(delta) => {
                let next = (i16::from(self.editor.pixel_size()) + delta).clamp(0, 255);
                self.editor
                    .set_pixel_size(u8::try_from(next).unwrap_or(limits::PIXEL_SIZE_MAX));
            }
            Action::Ignore => {}
        }
    }

    fn resize_by(&mut self, d_rows: i32, d_cols: i32) {
        let step = |current: usize, delta: i32| {
            let (min, max) = (limits::GRID_MIN as i32, limits::GRID_MAX as i32);
            let next = (current as i32 + delta).clamp(min, max);
            usize::try_from(next).unwrap_or(limits::GRID_MIN)
        };
        let rows = step(self.editor.rows(), d_rows);
        let cols = step(self.editor.cols(), d_cols);
        if (rows, cols) == (self.editor.rows(), self.editor.cols()) {
            return;
        }
        match self.editor.resize_grid(rows, cols) {
            Ok(()) => {
                self.clamp_cursor();
                self.status = format!("Grid {cols}×{rows}");
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self
            .cursor
            .clamp_to(Bounds::new(self.editor.rows(), self.editor.cols()));
    }

    fn export_now(&mut self) {
        let text = grid_to_text(&self.editor.snapshot(), self.editor.palette(), &self.export);
        let target = self
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        match write_export(&target, &text) {
            Ok(path) => self.status = format!("Exported to {}", path.display()),
            Err(e) => {
                log::warn!("Export échoué : {e:#}");
                self.status = format!("Export failed: {e:#}");
            }
        }
    }

    /// Ouvre un sélecteur natif en quittant temporairement le TUI.
    fn open_image_dialog(&mut self, terminal: &mut DefaultTerminal) {
        crossterm::terminal::disable_raw_mode().ok();
        crossterm::execute!(
            std::io::stdout(),
            DisableMouseCapture,
            crossterm::terminal::LeaveAlternateScreen
        )
        .ok();

        let picked = rfd::FileDialog::new()
            .set_title("Open Image \u{2014} glyphgrid")
            .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "gif", "webp"])
            .pick_file();

        crossterm::terminal::enable_raw_mode().ok();
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            EnableMouseCapture
        )
        .ok();
        terminal.clear().ok();

        if let Some(path) = picked {
            self.load_image_file(&path);
        }
    }
}
