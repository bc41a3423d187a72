use std::path::PathBuf;

use clap::Parser;
use gg_core::config::{EditorConfig, Newline};

/// glyphgrid: image-to-character grid editor with plain text export.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source initiale (PNG, JPEG, BMP, GIF, WebP, TGA, ICO).
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Nombre de lignes [4, 400].
    #[arg(long)]
    pub rows: Option<u16>,

    /// Nombre de colonnes [4, 400].
    #[arg(long)]
    pub cols: Option<u16>,

    /// Seuil de luminance [0, 255].
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Inverser la luminance avant seuillage.
    #[arg(long, default_value_t = false)]
    pub invert: bool,

    /// Export en mode ASCII (dark/light remplacés).
    #[arg(long, default_value_t = false)]
    pub ascii: bool,

    /// Fins de ligne CRLF à l'export.
    #[arg(long, default_value_t = false)]
    pub crlf: bool,

    /// Mode sans interface : convertit --image et écrit le texte ici (fichier ou dossier).
    #[arg(long, requires = "image")]
    pub export: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Écrire les logs dans ce fichier plutôt que sur stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    ///
    /// Flags only ever switch a setting on; absent flags keep the file value.
    pub fn apply_overrides(&self, config: &mut EditorConfig) {
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if self.invert {
            config.invert = true;
        }
        if self.ascii {
            config.export.ascii_mode = true;
        }
        if self.crlf {
            config.export.newline = Newline::Crlf;
        }
        config.clamp_all();
    }
}
