/// Content discovery and manifest build
///
/// This module handles the offline half of the system:
/// - Shared data model (data.rs)
/// - Scanning the content root for items (scanner.rs)
/// - Validating each item's metadata.json (validate.rs)
/// - Grid dimensions and cell assignment (layout.rs)
/// - Assembling and writing the manifest (manifest.rs)

pub mod data;
pub mod layout;
pub mod manifest;
pub mod scanner;
pub mod validate;
