/// Archive grid
///
/// Build time: scan a content directory of `item-<N>` folders, validate
/// each item's metadata, lay the items out on a near-square grid and
/// write one manifest.
///
/// Runtime: render the manifest's grid on a host surface and swap a
/// full-screen overlay image to follow the pointer, fetching and caching
/// each item's focal point on first hover.

pub mod config;
pub mod content;
pub mod error;
pub mod runtime;

pub use config::{BuildConfig, PathStyle, RuntimeConfig};
pub use content::data::{CellKey, FocalPoint, GridLayout, GridPosition, Item, ItemMetadata, Manifest};
pub use error::{ConfigError, ContentError, FetchError};
