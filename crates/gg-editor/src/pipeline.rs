use std::cell::RefCell;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use gg_ascii::{ThresholdParams, threshold_to_grid, to_luma};
use gg_core::CoreError;
use gg_core::frame::{CharGrid, FrameBuffer};
use gg_core::traits::ImageDecoder;
use gg_source::image::decode_with_fallback;
use gg_source::resize::Letterbox;

thread_local! {
    /// Un resizer par worker rayon : les buffers de travail survivent entre les jobs.
    static LETTERBOX: RefCell<Letterbox> = RefCell::new(Letterbox::new());
}

/// Snapshot of everything a grid derivation needs.
///
/// Captured on the owner thread; the worker never reads live editor state.
#[derive(Clone, Debug)]
pub struct Job {
    /// Generation active when the job was created.
    pub generation: u64,
    /// Image source.
    pub image: Arc<FrameBuffer>,
    /// Grid rows.
    pub rows: usize,
    /// Grid columns.
    pub cols: usize,
    /// Letterbox fill.
    pub background: u8,
    /// Threshold, invert, palette.
    pub params: ThresholdParams,
}

/// Messages renvoyés par les workers rayon vers le propriétaire de l'état.
pub(crate) enum WorkerMsg {
    /// Result of a resize → luma → threshold run.
    Processed {
        generation: u64,
        result: Result<CharGrid>,
    },
    /// Result of a decode request.
    Decoded {
        ticket: u64,
        result: Result<FrameBuffer, CoreError>,
    },
}

/// Letterbox → luma → seuil. Pur, sans effet de bord.
///
/// # Errors
/// Returns an error if the image or the target size is empty, or if the
/// luma buffer does not match the grid size.
///
/// # Example
/// ```
/// use gg_core::frame::FrameBuffer;
/// use gg_core::charset::Palette;
/// use gg_ascii::ThresholdParams;
/// use gg_editor::pipeline::derive_grid;
///
/// let image = FrameBuffer::filled(16, 16, [200, 200, 200, 255]);
/// let params = ThresholdParams { threshold: 128, invert: false, palette: Palette::new('#', '.') };
/// let grid = derive_grid(&image, 4, 4, 255, &params).unwrap();
/// assert!(grid.is_uniform('.'));
/// ```
pub fn derive_grid(
    image: &FrameBuffer,
    rows: usize,
    cols: usize,
    background: u8,
    params: &ThresholdParams,
) -> Result<CharGrid> {
    let resized =
        LETTERBOX.with_borrow_mut(|lb| lb.fit(image, cols as u32, rows as u32, background))?;
    let luma = to_luma(&resized);
    Ok(threshold_to_grid(&luma, cols, rows, params)?)
}

/// Run `job` on the rayon pool and report through `tx`.
pub(crate) fn spawn_process(job: Job, tx: flume::Sender<WorkerMsg>) {
    rayon::spawn(move || {
        let start = Instant::now();
        let result = derive_grid(&job.image, job.rows, job.cols, job.background, &job.params);
        log::debug!(
            "Pipeline gen {} ({}×{}) terminé en {:.1}ms",
            job.generation,
            job.cols,
            job.rows,
            start.elapsed().as_secs_f64() * 1000.0
        );
        // Receiver gone = editor dropped; nothing left to update.
        let _ = tx.send(WorkerMsg::Processed {
            generation: job.generation,
            result,
        });
    });
}

/// Decode `bytes` on the rayon pool through the decoder chain.
pub(crate) fn spawn_decode(
    decoders: Arc<Vec<Box<dyn ImageDecoder>>>,
    bytes: Vec<u8>,
    name_hint: Option<String>,
    ticket: u64,
    tx: flume::Sender<WorkerMsg>,
) {
    rayon::spawn(move || {
        let result = decode_with_fallback(&decoders, &bytes, name_hint.as_deref());
        let _ = tx.send(WorkerMsg::Decoded { ticket, result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use gg_core::charset::Palette;

    fn params(threshold: u8, invert: bool) -> ThresholdParams {
        ThresholdParams {
            threshold,
            invert,
            palette: Palette::new('#', '.'),
        }
    }

    #[test]
    fn derived_grid_has_requested_shape() {
        let image = FrameBuffer::filled(30, 7, [0, 0, 0, 255]);
        let grid = derive_grid(&image, 5, 9, 255, &params(128, false)).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (5, 9));
    }

    #[test]
    fn letterbox_bands_are_light_on_white_background() {
        // image noire très large → bande noire au centre, blanc autour
        let image = FrameBuffer::filled(40, 4, [0, 0, 0, 255]);
        let grid = derive_grid(&image, 4, 4, 255, &params(128, false)).unwrap();
        assert_eq!(grid.row(0), &['.', '.', '.', '.']);
        assert_eq!(grid.row(1), &['#', '#', '#', '#']);
        assert_eq!(grid.row(3), &['.', '.', '.', '.']);
    }

    #[test]
    fn successive_sizes_on_one_thread() {
        let image = FrameBuffer::filled(50, 20, [0, 0, 0, 255]);
        let big = derive_grid(&image, 40, 40, 255, &params(128, false)).unwrap();
        let small = derive_grid(&image, 4, 10, 255, &params(128, false)).unwrap();
        let again = derive_grid(&image, 40, 40, 255, &params(128, false)).unwrap();
        assert_eq!((small.rows(), small.cols()), (4, 10));
        assert_eq!(big, again);
    }

    #[test]
    fn empty_image_fails() {
        let image = FrameBuffer::new(0, 0);
        assert!(derive_grid(&image, 4, 4, 255, &params(128, false)).is_err());
    }

    #[test]
    fn spawned_job_reports_generation() {
        let (tx, rx) = flume::unbounded();
        let job = Job {
            generation: 7,
            image: Arc::new(FrameBuffer::filled(4, 4, [255, 255, 255, 255])),
            rows: 4,
            cols: 4,
            background: 255,
            params: params(128, false),
        };
        spawn_process(job, tx);
        match rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap() {
            WorkerMsg::Processed { generation, result } => {
                assert_eq!(generation, 7);
                assert!(result.unwrap().is_uniform('.'));
            }
            WorkerMsg::Decoded { .. } => panic!("message inattendu"),
        }
    }
}
