/// Manifest assembly and the single artifact write
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::data::{Item, Manifest};
use super::layout;
use super::scanner::ScannedItem;
use crate::config::BuildConfig;
use crate::error::ContentError;

/// Place scanned items on the grid and stamp the manifest with `now`
///
/// `items` must already be in index order, as `scanner::scan` returns them.
pub fn build_at(items: &[ScannedItem], config: &BuildConfig, now: DateTime<Utc>) -> Manifest {
    let grid = layout::compute_with_default(items.len(), config.default_grid);

    let items = items
        .iter()
        .enumerate()
        .map(|(index, scanned)| Item {
            id: scanned.id.clone(),
            title: scanned.title.clone(),
            path: scanned.path.clone(),
            thumbnail: scanned.thumbnail.clone(),
            additional_images: scanned.additional_images.clone(),
            grid_position: layout::position(index, grid),
        })
        .collect();

    Manifest {
        last_updated: now,
        grid,
        items,
    }
}

/// Build a manifest stamped with the current time
pub fn build(items: &[ScannedItem], config: &BuildConfig) -> Manifest {
    build_at(items, config, Utc::now())
}

/// Write the manifest so readers never observe a partial file
///
/// The JSON goes to a sibling temporary file first and is then renamed
/// over `path`. Missing parent directories are created.
pub fn write(manifest: &Manifest, path: &Path) -> Result<(), ContentError> {
    let json = manifest.to_json()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ContentError::write(parent, e))?;
            info!(dir = %parent.display(), "created manifest directory");
        }
    }

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = Path::new(&staging);

    fs::write(staging, json).map_err(|e| ContentError::write(staging, e))?;
    if let Err(e) = fs::rename(staging, path) {
        if let Err(cleanup) = fs::remove_file(staging) {
            warn!(path = %staging.display(), error = %cleanup, "could not remove staging file");
        }
        return Err(ContentError::write(path, e));
    }

    info!(path = %path.display(), items = manifest.items.len(), "manifest written");
    Ok(())
}

/// Read a manifest written by `write`
pub fn read(path: &Path) -> Result<Manifest, ContentError> {
    let json = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
    Manifest::from_json(&json).map_err(|e| ContentError::parse(path, e))
}
