use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::Palette;
use crate::error::CoreError;
use crate::limits;

/// Configuration complète de l'éditeur, hot-rechargeable.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use gg_core::config::EditorConfig;
/// let config = EditorConfig::default();
/// assert_eq!((config.rows, config.cols), (32, 64));
/// assert_eq!(config.threshold, 128);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct EditorConfig {
    // === Grille ===
    /// Nombre de lignes [4, 400].
    pub rows: u16,
    /// Nombre de colonnes [4, 400].
    pub cols: u16,
    /// Taille d'affichage d'une cellule en px [8, 28]. Purement visuel.
    pub pixel_size: u8,

    // === Conversion ===
    /// Seuil de luminance : en dessous → dark.
    pub threshold: u8,
    /// Inverser la luminance avant seuillage.
    pub invert: bool,
    /// Gris de remplissage des bandes de letterbox (255 = blanc).
    pub background: u8,
    /// Paire (dark, light).
    pub palette: Palette,

    // === Export ===
    pub export: ExportConfig,
}

/// Line separator used by the text exporter.
///
/// # Example
/// ```
/// use gg_core::config::Newline;
/// assert_eq!(Newline::Crlf.as_str(), "\r\n");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Newline {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
}

impl Newline {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }

    /// The other style.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Lf => Self::Crlf,
            Self::Crlf => Self::Lf,
        }
    }
}

/// Options d'export texte.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Style de fin de ligne.
    pub newline: Newline,
    /// Remplacer dark/light par des caractères ASCII.
    pub ascii_mode: bool,
    /// Remplaçant ASCII du caractère dark.
    pub dark_char: char,
    /// Remplaçant ASCII du caractère light.
    pub light_char: char,
    /// Préfixer le fichier d'un BOM UTF-8.
    pub bom: bool,
    /// Dossier de destination des exports (`None` = répertoire courant).
    pub directory: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            newline: Newline::Lf,
            ascii_mode: false,
            dark_char: '@',
            light_char: ' ',
            bom: false,
            directory: None,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            rows: 32,
            cols: 64,
            pixel_size: 14,
            threshold: 128,
            invert: false,
            background: 255,
            palette: Palette::default(),
            export: ExportConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        let (min, max) = (limits::GRID_MIN as u16, limits::GRID_MAX as u16);
        self.rows = self.rows.clamp(min, max);
        self.cols = self.cols.clamp(min, max);
        self.pixel_size = self
            .pixel_size
            .clamp(limits::PIXEL_SIZE_MIN, limits::PIXEL_SIZE_MAX);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    grid: Option<GridSection>,
    image: Option<ImageSection>,
    palette: Option<PaletteSection>,
    export: Option<ExportSection>,
}

#[derive(Deserialize)]
struct GridSection {
    rows: Option<u32>,
    cols: Option<u32>,
    pixel_size: Option<u32>,
}

#[derive(Deserialize)]
struct ImageSection {
    threshold: Option<u32>,
    invert: Option<bool>,
    background: Option<u32>,
}

#[derive(Deserialize)]
struct PaletteSection {
    dark: Option<String>,
    light: Option<String>,
}

#[derive(Deserialize)]
struct ExportSection {
    newline: Option<Newline>,
    ascii_mode: Option<bool>,
    dark_char: Option<String>,
    light_char: Option<String>,
    bom: Option<bool>,
    directory: Option<PathBuf>,
}

/// Parse a one-character TOML string.
fn single_char(field: &str, value: &str) -> Result<char, CoreError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(CoreError::Config(format!(
            "{field} doit contenir exactement un caractère (reçu {value:?})"
        ))),
    }
}

/// Parse une config TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the TOML is malformed or a palette entry is not a
/// single character.
///
/// # Example
/// ```
/// use gg_core::config::parse_config;
/// let config = parse_config("[grid]\nrows = 2\n[palette]\ndark = \"#\"").unwrap();
/// assert_eq!(config.rows, 4); // clamped
/// assert_eq!(config.palette.dark, '#');
/// ```
pub fn parse_config(content: &str) -> Result<EditorConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = EditorConfig::default();

    if let Some(g) = file.grid {
        if let Some(v) = g.rows {
            config.rows = v.min(u32::from(u16::MAX)) as u16;
        }
        if let Some(v) = g.cols {
            config.cols = v.min(u32::from(u16::MAX)) as u16;
        }
        if let Some(v) = g.pixel_size {
            config.pixel_size = v.min(255) as u8;
        }
    }

    if let Some(i) = file.image {
        if let Some(v) = i.threshold {
            config.threshold = v.min(255) as u8;
        }
        if let Some(v) = i.invert {
            config.invert = v;
        }
        if let Some(v) = i.background {
            config.background = v.min(255) as u8;
        }
    }

    if let Some(p) = file.palette {
        if let Some(ref v) = p.dark {
            config.palette.dark = single_char("palette.dark", v)?;
        }
        if let Some(ref v) = p.light {
            config.palette.light = single_char("palette.light", v)?;
        }
    }

    if let Some(e) = file.export {
        if let Some(v) = e.newline {
            config.export.newline = v;
        }
        if let Some(v) = e.ascii_mode {
            config.export.ascii_mode = v;
        }
        if let Some(ref v) = e.dark_char {
            config.export.dark_char = single_char("export.dark_char", v)?;
        }
        if let Some(ref v) = e.light_char {
            config.export.light_char = single_char("export.light_char", v)?;
        }
        if let Some(v) = e.bom {
            config.export.bom = v;
        }
        if e.directory.is_some() {
            config.export.directory = e.directory;
        }
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use gg_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<EditorConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config =
        parse_config(&content).with_context(|| format!("Config invalide : {}", path.display()))?;
    log::debug!("Config chargée depuis {}", path.display());
    Ok(config)
}
