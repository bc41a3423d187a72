//! Scénarios de bout en bout : image → grille, debounce du seuil, résultats périmés.

use std::io::Cursor as IoCursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use gg_core::charset::Palette;
use gg_core::config::EditorConfig;
use gg_core::frame::FrameBuffer;
use gg_editor::{Cursor, EditorEvent, GridEditor, InputKey, apply_input};

const WAIT: Duration = Duration::from_secs(10);

fn editor(rows: u16, cols: u16) -> GridEditor {
    GridEditor::from_config(&EditorConfig {
        rows,
        cols,
        palette: Palette::new('#', '.'),
        ..EditorConfig::default()
    })
}

fn gray(size: u32, luma: u8) -> FrameBuffer {
    FrameBuffer::filled(size, size, [luma, luma, luma, 255])
}

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = IoCursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encodage PNG");
    out.into_inner()
}

#[test]
fn bright_image_gives_all_light_grid() {
    let mut ed = editor(4, 4);
    ed.set_image(gray(4, 200));
    assert!(ed.settle(WAIT));
    let grid = ed.snapshot();
    assert_eq!((grid.rows(), grid.cols()), (4, 4));
    assert!(grid.is_uniform('.'));
}

#[test]
fn threshold_burst_runs_once_with_last_value() {
    let mut ed = editor(4, 4);
    ed.set_image(gray(8, 105));
    assert!(ed.settle(WAIT));
    // 105 < 128 par défaut
    assert!(ed.snapshot().is_uniform('#'));
    assert_eq!(ed.stats().runs_started, 1);

    let t0 = Instant::now();
    let ms = Duration::from_millis;
    ed.set_threshold_at(120, t0);
    ed.set_threshold_at(110, t0 + ms(25));
    ed.set_threshold_at(100, t0 + ms(50));

    ed.tick_at(t0 + ms(100));
    assert_eq!(ed.stats().runs_started, 1, "trop tôt : fenêtre relancée à +50ms");

    ed.tick_at(t0 + ms(150));
    assert_eq!(ed.stats().runs_started, 2);
    ed.tick_at(t0 + ms(400));
    assert_eq!(ed.stats().runs_started, 2);

    assert!(ed.settle(WAIT));
    assert_eq!(ed.threshold(), 100);
    assert!(ed.snapshot().is_uniform('.'));
}

#[test]
fn resize_during_run_discards_stale_result() {
    let mut ed = editor(4, 4);
    ed.set_image(gray(8, 0));
    // Pas de drain entre les deux : le premier résultat est forcément périmé.
    ed.resize_grid(6, 10).unwrap();
    assert!(ed.settle(WAIT));

    let stats = ed.stats();
    assert_eq!(stats.runs_started, 2);
    assert_eq!(stats.stale_discarded, 1);
    assert_eq!(stats.applied, 1);
    let grid = ed.snapshot();
    assert_eq!((grid.rows(), grid.cols()), (6, 10));
}

#[test]
fn png_bytes_decode_and_derive() {
    let mut ed = editor(4, 4);
    let events = ed.subscribe();
    ed.set_image_source(png_bytes(12, 12, [0, 0, 0, 255]), Some("dark.png".into()));
    assert!(ed.settle(WAIT));

    assert!(ed.has_image());
    assert!(ed.snapshot().is_uniform('#'));
    let seen: Vec<EditorEvent> = events.try_iter().collect();
    assert!(seen.contains(&EditorEvent::ImageLoaded {
        width: 12,
        height: 12
    }));
    assert!(seen.contains(&EditorEvent::GridChanged));
}

#[test]
fn later_decode_wins_over_earlier_one() {
    let mut ed = editor(4, 4);
    ed.set_image_source(png_bytes(8, 8, [0, 0, 0, 255]), None);
    ed.set_image_source(png_bytes(8, 8, [255, 255, 255, 255]), None);
    assert!(ed.settle(WAIT));
    assert!(ed.snapshot().is_uniform('.'));
    assert_eq!(ed.stats().applied, 1);
}

#[test]
fn hand_edits_survive_until_next_derivation() {
    let mut ed = editor(4, 4);
    ed.set_image(gray(8, 255));
    assert!(ed.settle(WAIT));

    let mut at = Cursor::new(0, 0);
    for ch in "hi".chars() {
        at = apply_input(&mut ed, at, InputKey::Char(ch));
    }
    apply_input(&mut ed, Cursor::new(3, 3), InputKey::Activate);
    let grid = ed.snapshot();
    assert_eq!(grid.row(0), &['h', 'i', '.', '.']);
    assert_eq!(grid.get(3, 3), Some('#'));

    ed.set_invert(true);
    assert!(ed.settle(WAIT));
    assert!(ed.snapshot().is_uniform('#'));
}

#[test]
fn readers_only_see_whole_grids_across_resizes() {
    let mut ed = editor(4, 4);
    let handle = ed.grid_handle();
    let stop = Arc::new(AtomicBool::new(false));
    let sizes = [(4, 4), (30, 7), (9, 120), (400, 4)];

    let reader = {
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut seen = 0_usize;
            loop {
                let done = stop.load(Ordering::Acquire);
                let grid = handle.load_full();
                assert!(sizes.contains(&(grid.rows(), grid.cols())));
                assert_eq!(grid.cells().len(), grid.rows() * grid.cols());
                assert_eq!(grid.iter_rows().count(), grid.rows());
                assert!(grid.iter_rows().all(|row| row.len() == grid.cols()));
                assert!(grid.is_uniform('.'));
                seen += 1;
                if done {
                    break seen;
                }
            }
        })
    };

    for _ in 0..50 {
        for &(rows, cols) in &sizes {
            ed.resize_grid(rows, cols).expect("taille valide");
        }
    }
    ed.resize_grid(9, 120).expect("taille valide");
    stop.store(true, Ordering::Release);

    let seen = reader.join().expect("le lecteur n'a vu que des grilles entières");
    assert!(seen > 0);
    let last = ed.grid_handle().load_full();
    assert_eq!((last.rows(), last.cols()), (9, 120));
}
