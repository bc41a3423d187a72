use std::path::Path;

use anyhow::Result;
use gg_core::config::{EditorConfig, load_config};
use notify::{Event, EventKind, RecursiveMode, Watcher};

/// Surveille le fichier config et envoie chaque version valide à la boucle principale.
///
/// Retourne le Watcher (doit rester vivant tant que l'app tourne). Une config
/// invalide est journalisée et ignorée : l'éditeur garde l'ancienne.
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
pub fn spawn_config_watcher(
    config_path: &Path,
    tx: flume::Sender<EditorConfig>,
) -> Result<impl Watcher + use<>> {
    let path = config_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let Ok(event) = res else {
            return;
        };
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return;
        }
        match load_config(&path) {
            Ok(config) => {
                log::info!("Config rechargée depuis {}", path.display());
                // Boucle principale terminée : plus personne à prévenir.
                let _ = tx.send(config);
            }
            Err(e) => log::warn!("Erreur de rechargement config : {e:#}"),
        }
    })?;

    watcher.watch(config_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
