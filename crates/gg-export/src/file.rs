use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};

/// Export file name for the current local time: `ascii-YYYYMMDD-HHMM.txt`.
#[must_use]
pub fn generate_filename() -> String {
    filename_for(Local::now().naive_local())
}

/// [`generate_filename`] for a fixed instant.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use gg_export::filename_for;
/// let at = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap().and_hms_opt(9, 5, 59).unwrap();
/// assert_eq!(filename_for(at), "ascii-20240307-0905.txt");
/// ```
#[must_use]
pub fn filename_for(at: NaiveDateTime) -> String {
    format!("ascii-{}.txt", at.format("%Y%m%d-%H%M"))
}

/// Write `text` as UTF-8 and return the path written.
///
/// An existing directory as `target` receives a generated file name.
/// Missing parent directories are created.
///
/// # Errors
/// Retourne une erreur si le dossier ou le fichier ne peut pas être écrit.
pub fn write_export(target: &Path, text: &str) -> Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(generate_filename())
    } else {
        target.to_path_buf()
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer {}", parent.display()))?;
    }
    fs::write(&path, text).with_context(|| format!("Écriture de {} échouée", path.display()))?;
    log::info!("Export texte : {} ({} octets)", path.display(), text.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_name_has_expected_shape() {
        let name = generate_filename();
        assert!(name.starts_with("ascii-"));
        assert!(name.ends_with(".txt"));
        // ascii- + 8 chiffres + '-' + 4 chiffres + .txt
        assert_eq!(name.len(), 6 + 8 + 1 + 4 + 4);
    }

    #[test]
    fn writes_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out.txt");
        let written = write_export(&target, "@@\n  ").unwrap();
        assert_eq!(written, target);
        assert_eq!(fs::read_to_string(&written).unwrap(), "@@\n  ");
    }

    #[test]
    fn directory_target_gets_generated_name() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_export(dir.path(), "x").unwrap();
        assert_eq!(written.parent(), Some(dir.path()));
        let name = written.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("ascii-"));
    }

    #[test]
    fn bom_survives_round_trip_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_export(&dir.path().join("b.txt"), "\u{feff}a").unwrap();
        let bytes = fs::read(written).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
    }
}
