use std::fs::File;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use gg_core::config::EditorConfig;
use gg_editor::GridEditor;
use gg_export::{ExportOptions, grid_to_text, text_stats, write_export};

pub mod app;
pub mod cli;
pub mod hotreload;
pub mod keymap;

/// Délai maximal de conversion en mode sans interface.
const HEADLESS_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    init_logging(&cli)?;

    // 3. Charger la config + overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config);

    // 4. Export sans interface
    if let Some(out) = cli.export.as_deref() {
        let image = cli
            .image
            .as_deref()
            .context("--export requiert --image")?;
        return run_headless(&config, image, out);
    }

    // 5. Hot-reload config (thread interne notify → flume)
    let (config_tx, config_rx) = flume::unbounded();
    let _watcher = if cli.config.exists() {
        Some(hotreload::spawn_config_watcher(&cli.config, config_tx)?)
    } else {
        None
    };

    // 6. Construire l'App
    let mut app_instance = app::App::new(&config, config_rx);
    if let Some(ref path) = cli.image {
        app_instance.load_image_file(path);
    }

    // 7. Initialiser le terminal ratatui
    let terminal = ratatui::init();

    // 8. Boucle principale
    let result = app_instance.run(terminal);

    // 9. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    ratatui::restore();

    result
}

/// Logs vers `--log-file` si fourni (le TUI occupe le terminal), sinon stderr.
fn init_logging(cli: &cli::Cli) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn));
    if let Some(ref path) = cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("Impossible de créer le journal {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Resolve config: --config if present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<EditorConfig> {
    if cli.config.exists() {
        gg_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(EditorConfig::default())
    }
}

/// Image → grille → texte, sans TUI.
fn run_headless(config: &EditorConfig, image: &Path, out: &Path) -> Result<()> {
    let frame = gg_source::image::load_image(image)?;
    let mut editor = GridEditor::from_config(config);
    editor.set_image(frame);
    if !editor.settle(HEADLESS_TIMEOUT) {
        anyhow::bail!("Conversion de {} trop longue", image.display());
    }

    let text = grid_to_text(
        &editor.snapshot(),
        editor.palette(),
        &ExportOptions::from(&config.export),
    );
    let written = write_export(out, &text)?;
    let stats = text_stats(&text);
    log::info!(
        "{} : {} lignes, {} caractères",
        written.display(),
        stats.lines,
        stats.chars_without_newlines
    );
    println!("{}", written.display());
    Ok(())
}
