/// Build and runtime configuration
///
/// Every field has a default, so a build with no config file and no flags
/// scans `lager/` and writes `lager/config/items.json`.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::content::data::GridLayout;
use crate::content::layout::DEFAULT_GRID;
use crate::error::{ConfigError, ContentError};

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "archive-grid.json";

/// How item `path` references are written into the manifest
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    /// `/lager/item-1/`
    #[default]
    Absolute,
    /// `lager/item-1/`
    Relative,
}

/// Settings for the manifest build
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BuildConfig {
    /// Content root holding the `item-<N>` directories
    pub source_dir: PathBuf,
    /// Where the manifest is written
    pub output: PathBuf,
    /// Files every item directory should contain; absence only warns
    pub required_files: Vec<String>,
    /// Default-visible image of every item
    pub thumbnail: String,
    pub path_style: PathStyle,
    /// Public directory the item paths are rooted under
    pub public_prefix: String,
    /// Grid used for collections of four items or fewer
    pub default_grid: GridLayout,
    /// Fail the build when any item has errors
    pub strict: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("lager"),
            output: PathBuf::from("lager/config/items.json"),
            required_files: vec![
                "index.html".to_string(),
                "fullscreen.jpg".to_string(),
                "image.jpg".to_string(),
                "metadata.json".to_string(),
            ],
            thumbnail: "fullscreen.jpg".to_string(),
            path_style: PathStyle::Absolute,
            public_prefix: "lager".to_string(),
            default_grid: DEFAULT_GRID,
            strict: false,
        }
    }
}

impl BuildConfig {
    /// Load settings from a JSON file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
        let config = serde_json::from_str(&json).map_err(|e| ContentError::parse(path, e))?;
        Ok(config)
    }

    /// Load an explicitly named file, or the default file if it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Manifest `path` for an item directory, always ending in '/'
    pub fn item_path(&self, item_id: &str) -> String {
        let prefix = self.public_prefix.trim_matches('/');
        let base = if prefix.is_empty() {
            format!("{}/", item_id)
        } else {
            format!("{}/{}/", prefix, item_id)
        };
        match self.path_style {
            PathStyle::Absolute => format!("/{}", base),
            PathStyle::Relative => base,
        }
    }
}

/// Settings for a hover session
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Minimum interval between handled pointer samples
    pub throttle: Duration,
    /// Base overlay image shown under the hover overlay
    pub logo: String,
    /// Per-item metadata document, resolved under the item path
    pub metadata_file: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            throttle: Duration::from_millis(10),
            logo: "logo.jpg".to_string(),
            metadata_file: "metadata.json".to_string(),
        }
    }
}
