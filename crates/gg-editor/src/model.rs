use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use gg_ascii::ThresholdParams;
use gg_core::charset::Palette;
use gg_core::config::EditorConfig;
use gg_core::frame::{CharGrid, FrameBuffer};
use gg_core::traits::ImageDecoder;
use gg_core::{CoreError, limits};
use gg_source::image::default_decoders;

use crate::debounce::{Debouncer, THRESHOLD_DEBOUNCE};
use crate::pipeline::{self, Job, WorkerMsg};

/// Notification envoyée aux observateurs de l'éditeur.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    /// La grille publiée a changé (édition ou re-calcul appliqué).
    GridChanged,
    /// A new image source was installed.
    ImageLoaded {
        /// Source width in pixels.
        width: u32,
        /// Source height in pixels.
        height: u32,
    },
    /// Every decode path failed; state is unchanged.
    DecodeFailed(String),
}

/// Compteurs du pipeline, pour le debug et les tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditorStats {
    /// Pipeline runs dispatched.
    pub runs_started: u64,
    /// Results installed as the grid.
    pub applied: u64,
    /// Results dropped on a generation mismatch.
    pub stale_discarded: u64,
}

/// État de l'éditeur et ses opérations.
///
/// Un seul propriétaire (`&mut self`) linéarise toutes les mutations. Les
/// décodages et re-calculs tournent sur le pool rayon ; leurs résultats ne
/// sont appliqués que dans [`GridEditor::drain`], et seulement si leur
/// génération correspond encore à la génération courante.
///
/// La grille est publiée via `ArcSwap` : un lecteur obtient toujours une
/// grille complète, jamais un mélange de l'ancienne et de la nouvelle.
///
/// # Example
/// ```
/// use gg_editor::GridEditor;
/// let mut editor = GridEditor::new();
/// editor.set_cell(0, 0, 'A');
/// assert_eq!(editor.snapshot().get(0, 0), Some('A'));
/// editor.toggle_cell(0, 0); // caractère manuel : inchangé
/// assert_eq!(editor.snapshot().get(0, 0), Some('A'));
/// ```
pub struct GridEditor {
    rows: usize,
    cols: usize,
    pixel_size: u8,
    threshold: u8,
    invert: bool,
    background: u8,
    palette: Palette,
    grid: Arc<ArcSwap<CharGrid>>,
    image: Option<Arc<FrameBuffer>>,
    /// Bumped by every change that invalidates in-flight results.
    generation: u64,
    /// Only the latest decode request may install its image.
    decode_ticket: u64,
    debounce: Debouncer,
    decoders: Arc<Vec<Box<dyn ImageDecoder>>>,
    tx: flume::Sender<WorkerMsg>,
    rx: flume::Receiver<WorkerMsg>,
    in_flight: usize,
    observers: Vec<flume::Sender<EditorEvent>>,
    stats: EditorStats,
}

impl GridEditor {
    /// Editor with default configuration (32×64, all light).
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&EditorConfig::default())
    }

    /// Build the editor from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &EditorConfig) -> Self {
        let mut config = config.clone();
        config.clamp_all();
        let rows = usize::from(config.rows);
        let cols = usize::from(config.cols);
        let (tx, rx) = flume::unbounded();
        Self {
            rows,
            cols,
            pixel_size: config.pixel_size,
            threshold: config.threshold,
            invert: config.invert,
            background: config.background,
            palette: config.palette,
            grid: Arc::new(ArcSwap::from_pointee(CharGrid::new(
                rows,
                cols,
                config.palette.light,
            ))),
            image: None,
            generation: 0,
            decode_ticket: 0,
            debounce: Debouncer::new(THRESHOLD_DEBOUNCE),
            decoders: Arc::new(default_decoders()),
            tx,
            rx,
            in_flight: 0,
            observers: Vec::new(),
            stats: EditorStats::default(),
        }
    }

    /// Replace the decoder chain (primary first).
    #[must_use]
    pub fn with_decoders(mut self, decoders: Vec<Box<dyn ImageDecoder>>) -> Self {
        self.decoders = Arc::new(decoders);
        self
    }

    // === Accès en lecture ===

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn pixel_size(&self) -> u8 {
        self.pixel_size
    }

    #[must_use]
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    #[must_use]
    pub fn invert(&self) -> bool {
        self.invert
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        self.palette
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Current image source, if any.
    #[must_use]
    pub fn image(&self) -> Option<&Arc<FrameBuffer>> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> EditorStats {
        self.stats
    }

    /// `true` while a decode or pipeline run has not been drained yet.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Complete copy-free view of the current grid.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CharGrid> {
        self.grid.load_full()
    }

    /// Shared handle for readers on other threads.
    #[must_use]
    pub fn grid_handle(&self) -> Arc<ArcSwap<CharGrid>> {
        Arc::clone(&self.grid)
    }

    /// When the pending debounced reprocess is due, if one is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Register an observer. Dropped receivers are pruned on the next event.
    pub fn subscribe(&mut self) -> flume::Receiver<EditorEvent> {
        let (tx, rx) = flume::unbounded();
        self.observers.push(tx);
        rx
    }

    // === Édition ciblée ===

    /// Write `ch` at (row, col). Out of bounds: silent no-op.
    pub fn set_cell(&mut self, row: usize, col: usize, ch: char) {
        let current = self.grid.load();
        if !current.in_bounds(row, col) {
            return;
        }
        let mut next = CharGrid::clone(&current);
        drop(current);
        next.set(row, col, ch);
        self.publish(next);
    }

    /// Flip dark ↔ light at (row, col).
    ///
    /// Cells holding any other character (typed by hand) are left untouched,
    /// unlike [`GridEditor::set_cell`] which accepts anything.
    pub fn toggle_cell(&mut self, row: usize, col: usize) {
        let Some(current) = self.grid.load().get(row, col) else {
            return;
        };
        if let Some(flipped) = self.palette.flip(current) {
            self.set_cell(row, col, flipped);
        }
    }

    // === Remplacements complets ===

    /// Replace the grid with a fresh `rows`×`cols` grid of light cells.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidDimensions` (and changes nothing) unless
    /// both values are in [4, 400].
    pub fn resize_grid(&mut self, rows: usize, cols: usize) -> Result<(), CoreError> {
        if !limits::grid_dim_valid(rows) || !limits::grid_dim_valid(cols) {
            return Err(CoreError::InvalidDimensions {
                width: cols as u32,
                height: rows as u32,
            });
        }
        self.rows = rows;
        self.cols = cols;
        self.bump_generation();
        self.publish(CharGrid::new(rows, cols, self.palette.light));
        log::debug!("Grille redimensionnée à {cols}×{rows}");
        self.process_image();
        Ok(())
    }

    /// Fill every cell with `fill` at the current size.
    pub fn reset_grid(&mut self, fill: char) {
        self.bump_generation();
        self.publish(CharGrid::new(self.rows, self.cols, fill));
    }

    // === Paramètres de conversion ===

    /// Update the threshold; the reprocess runs after 100 ms without another call.
    pub fn set_threshold(&mut self, threshold: u8) {
        self.set_threshold_at(threshold, Instant::now());
    }

    /// [`GridEditor::set_threshold`] with an explicit clock.
    pub fn set_threshold_at(&mut self, threshold: u8, now: Instant) {
        self.threshold = threshold;
        self.bump_generation();
        self.debounce.queue(now);
    }

    /// Update invert and reprocess immediately.
    pub fn set_invert(&mut self, invert: bool) {
        self.invert = invert;
        self.bump_generation();
        self.process_image();
    }

    /// Letterbox fill used by later derivations.
    pub fn set_background(&mut self, background: u8) {
        self.background = background;
        self.bump_generation();
        self.process_image();
    }

    /// Display-only cell size, clamped to [8, 28].
    pub fn set_pixel_size(&mut self, px: u8) {
        self.pixel_size = px.clamp(limits::PIXEL_SIZE_MIN, limits::PIXEL_SIZE_MAX);
    }

    /// Swap the palette.
    ///
    /// Cells holding the old dark/light are rewritten to the new pair; hand
    /// typed characters are kept.
    pub fn set_palette(&mut self, palette: Palette) {
        if palette == self.palette {
            return;
        }
        let old = self.palette;
        self.palette = palette;
        self.bump_generation();

        let current = self.grid.load_full();
        let cells = current
            .cells()
            .iter()
            .map(|&ch| {
                if ch == old.dark {
                    palette.dark
                } else if ch == old.light {
                    palette.light
                } else {
                    ch
                }
            })
            .collect();
        if let Some(next) = CharGrid::from_cells(current.rows(), current.cols(), cells) {
            self.publish(next);
        }
        self.process_image();
    }

    /// Apply a (re)loaded configuration, touching only what changed.
    pub fn apply_config(&mut self, config: &EditorConfig) {
        let mut config = config.clone();
        config.clamp_all();

        self.set_pixel_size(config.pixel_size);
        self.set_palette(config.palette);
        if (usize::from(config.rows), usize::from(config.cols)) != (self.rows, self.cols) {
            if let Err(e) = self.resize_grid(usize::from(config.rows), usize::from(config.cols)) {
                log::warn!("Taille de grille de la config ignorée : {e}");
            }
        }
        if config.background != self.background {
            self.set_background(config.background);
        }
        if config.invert != self.invert {
            self.set_invert(config.invert);
        }
        if config.threshold != self.threshold {
            self.set_threshold(config.threshold);
        }
    }

    // === Source image ===

    /// Decode raw bytes off-thread: content sniffing first, then the file
    /// name extension. Failure is reported as [`EditorEvent::DecodeFailed`].
    pub fn set_image_source(&mut self, bytes: Vec<u8>, name_hint: Option<String>) {
        self.decode_ticket += 1;
        self.in_flight += 1;
        log::debug!(
            "Décodage #{} lancé ({} octets, {:?})",
            self.decode_ticket,
            bytes.len(),
            name_hint
        );
        pipeline::spawn_decode(
            Arc::clone(&self.decoders),
            bytes,
            name_hint,
            self.decode_ticket,
            self.tx.clone(),
        );
    }

    /// Install an already decoded image and reprocess.
    pub fn set_image(&mut self, image: FrameBuffer) {
        // Un décodage encore en vol ne doit plus écraser cette image.
        self.decode_ticket += 1;
        self.install_image(image);
    }

    /// Forget the image source. The grid keeps its content.
    pub fn clear_image(&mut self) {
        self.image = None;
        self.decode_ticket += 1;
        self.debounce.cancel();
        self.bump_generation();
    }

    /// Re-derive the grid from the image with the current parameters.
    ///
    /// No-op without an image. The result is tagged with the current
    /// generation and dropped on arrival if the generation moved on.
    pub fn process_image(&mut self) {
        let Some(image) = self.image.clone() else {
            return;
        };
        // Les paramètres courants incluent déjà la dernière valeur du seuil.
        self.debounce.cancel();
        let job = Job {
            generation: self.generation,
            image,
            rows: self.rows,
            cols: self.cols,
            background: self.background,
            params: ThresholdParams {
                threshold: self.threshold,
                invert: self.invert,
                palette: self.palette,
            },
        };
        self.stats.runs_started += 1;
        self.in_flight += 1;
        pipeline::spawn_process(job, self.tx.clone());
    }

    // === Boucle de pilotage ===

    /// Fire the debounced reprocess if it is due.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// [`GridEditor::tick`] with an explicit clock.
    pub fn tick_at(&mut self, now: Instant) {
        if self.debounce.take_ready(now) {
            self.process_image();
        }
    }

    /// Apply or discard every finished worker result without blocking.
    ///
    /// Returns the number of messages handled.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.handle(msg);
            handled += 1;
        }
        handled
    }

    /// Block until nothing is in flight or `timeout` expires.
    ///
    /// Results are handled as they arrive, so follow-up work (a decode that
    /// triggers a reprocess) is waited for too. Returns `true` once idle.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.drain();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(msg) => self.handle(msg),
                Err(_) => return false,
            }
        }
        true
    }

    // === Interne ===

    fn handle(&mut self, msg: WorkerMsg) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match msg {
            WorkerMsg::Processed { generation, result } => {
                if generation != self.generation {
                    self.stats.stale_discarded += 1;
                    log::debug!(
                        "Résultat périmé ignoré (gen {generation}, courante {})",
                        self.generation
                    );
                    return;
                }
                match result {
                    Ok(grid) if grid.rows() == self.rows && grid.cols() == self.cols => {
                        self.stats.applied += 1;
                        self.publish(grid);
                    }
                    Ok(grid) => {
                        log::warn!(
                            "Grille {}×{} incohérente avec {}×{}, ignorée",
                            grid.cols(),
                            grid.rows(),
                            self.cols,
                            self.rows
                        );
                    }
                    Err(e) => log::warn!("Échec du pipeline : {e:#}"),
                }
            }
            WorkerMsg::Decoded { ticket, result } => {
                if ticket != self.decode_ticket {
                    log::debug!("Décodage #{ticket} dépassé, ignoré");
                    return;
                }
                match result {
                    Ok(image) => self.install_image(image),
                    Err(e) => {
                        log::warn!("Image non décodable : {e}");
                        self.notify(&EditorEvent::DecodeFailed(e.to_string()));
                    }
                }
            }
        }
    }

    fn install_image(&mut self, image: FrameBuffer) {
        let (width, height) = (image.width, image.height);
        log::info!("Image chargée : {width}×{height}");
        self.image = Some(Arc::new(image));
        self.bump_generation();
        self.notify(&EditorEvent::ImageLoaded { width, height });
        self.process_image();
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
    }

    fn publish(&mut self, grid: CharGrid) {
        self.grid.store(Arc::new(grid));
        self.notify(&EditorEvent::GridChanged);
    }

    fn notify(&mut self, event: &EditorEvent) {
        self.observers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Default for GridEditor {
    fn default() -> Self {
        Self::new()
    }
}
