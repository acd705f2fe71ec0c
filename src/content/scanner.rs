/// Content root scanner
///
/// Finds the `item-<N>` directories directly under the content root,
/// checks each for its required files, and reads and validates its
/// `metadata.json`. A problem with one item is recorded as a diagnostic
/// and never stops the scan of the others.
use serde_json::Value;
use std::path::Path;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use super::validate::{self, ValidationReport};
use crate::config::BuildConfig;
use crate::error::ContentError;

/// Directory name prefix of an item
pub const ITEM_PREFIX: &str = "item-";

/// Metadata document inside each item directory
pub const METADATA_FILE: &str = "metadata.json";

/// Images that are part of every item and never listed as additional
const PRIMARY_IMAGES: [&str; 2] = ["fullscreen.jpg", "image.jpg"];

/// Extensions counted as additional images
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An item found on disk, before it is placed on the grid
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedItem {
    /// Directory name, e.g. "item-3"
    pub id: String,
    /// The `<N>` of `item-<N>`; items are ordered by it
    pub number: u64,
    pub title: String,
    pub path: String,
    pub thumbnail: String,
    pub additional_images: Vec<String>,
}

/// What went wrong with one item
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// `item-<x>` where `<x>` is not a number; the directory is skipped
    BadDirectoryName,
    /// Required files absent from the directory
    MissingFiles(Vec<String>),
    /// Directory entry or `metadata.json` could not be read
    Unreadable(String),
    /// `metadata.json` is not valid JSON
    InvalidJson(String),
    /// Schema errors and/or warnings
    Validation(ValidationReport),
}

/// One reported problem, tied to the item it concerns
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub item_id: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Error class (as opposed to advisory warnings)
    pub fn is_error(&self) -> bool {
        match &self.kind {
            DiagnosticKind::InvalidJson(_) => true,
            DiagnosticKind::Validation(report) => !report.is_valid(),
            _ => false,
        }
    }
}

/// Items found by a scan, sorted by number, plus everything reported
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    pub items: Vec<ScannedItem>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanOutcome {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Gate the manifest write on metadata errors
    ///
    /// A strict build refuses any error. Otherwise the error count is
    /// returned so the caller can report it and carry on.
    pub fn check_strict(&self, strict: bool) -> Result<usize, ContentError> {
        let errors = self.error_count();
        if strict && errors > 0 {
            return Err(ContentError::InvalidItems(errors));
        }
        Ok(errors)
    }
}

/// Scan the configured content root
///
/// An absent content root yields an empty outcome, not an error.
#[tracing::instrument(skip_all, fields(root = %config.source_dir.display()))]
pub fn scan(config: &BuildConfig) -> ScanOutcome {
    let root = config.source_dir.as_path();
    let mut outcome = ScanOutcome::default();

    if !root.is_dir() {
        warn!("content root not found, building an empty grid");
        return outcome;
    }

    debug!("scanning content root");

    for entry in WalkDir::new(root).min_depth(1).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let name = e
                    .path()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                warn!(entry = %name, error = %e, "unreadable entry under content root");
                outcome.diagnostics.push(Diagnostic {
                    item_id: name,
                    kind: DiagnosticKind::Unreadable(e.to_string()),
                });
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let Some(suffix) = name.strip_prefix(ITEM_PREFIX) else {
            continue;
        };

        let Ok(number) = suffix.parse::<u64>() else {
            warn!(item = %name, "item directory name has no numeric index, skipping");
            outcome.diagnostics.push(Diagnostic {
                item_id: name,
                kind: DiagnosticKind::BadDirectoryName,
            });
            continue;
        };

        let item = scan_item(entry.path(), name, number, config, &mut outcome.diagnostics);
        outcome.items.push(item);
    }

    outcome
        .items
        .sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.id.cmp(&b.id)));

    info!(items = outcome.items.len(), "scan complete");
    outcome
}

/// Read one item directory
fn scan_item(
    dir: &Path,
    id: String,
    number: u64,
    config: &BuildConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> ScannedItem {
    let files = match list_files(dir) {
        Ok(files) => {
            check_required(&id, &files, config, diagnostics);
            files
        }
        Err(e) => {
            warn!(item = %id, error = %e, "could not list item directory");
            diagnostics.push(Diagnostic {
                item_id: id.clone(),
                kind: DiagnosticKind::Unreadable(e.to_string()),
            });
            Vec::new()
        }
    };

    let metadata = read_metadata(dir, &id, diagnostics);

    let title = match metadata.get("title") {
        Some(Value::String(title)) if !title.is_empty() => title.clone(),
        _ => format!("Item {}", number),
    };

    let mut additional_images: Vec<String> = files
        .into_iter()
        .filter(|file| is_image(file) && !PRIMARY_IMAGES.contains(&file.as_str()))
        .collect();
    additional_images.sort();

    ScannedItem {
        path: config.item_path(&id),
        thumbnail: config.thumbnail.clone(),
        id,
        number,
        title,
        additional_images,
    }
}

fn check_required(
    id: &str,
    files: &[String],
    config: &BuildConfig,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let missing: Vec<String> = config
        .required_files
        .iter()
        .filter(|file| !files.contains(file))
        .cloned()
        .collect();
    if !missing.is_empty() {
        warn!(item = %id, missing = %missing.join(", "), "item is missing required files");
        diagnostics.push(Diagnostic {
            item_id: id.to_string(),
            kind: DiagnosticKind::MissingFiles(missing),
        });
    }
}

/// Read, parse and validate `metadata.json`
///
/// Any failure degrades to an empty document so the item still builds.
fn read_metadata(dir: &Path, id: &str, diagnostics: &mut Vec<Diagnostic>) -> Value {
    let empty = Value::Object(Default::default());
    let path = dir.join(METADATA_FILE);

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(item = %id, error = %e, "could not read metadata.json");
            diagnostics.push(Diagnostic {
                item_id: id.to_string(),
                kind: DiagnosticKind::Unreadable(e.to_string()),
            });
            return empty;
        }
    };

    let metadata: Value = match serde_json::from_str(&contents) {
        Ok(metadata) => metadata,
        Err(e) => {
            error!(item = %id, error = %e, "invalid JSON in metadata.json");
            diagnostics.push(Diagnostic {
                item_id: id.to_string(),
                kind: DiagnosticKind::InvalidJson(e.to_string()),
            });
            return empty;
        }
    };

    let report = validate::validate(&metadata, id);
    for problem in &report.errors {
        error!(item = %id, "{}", problem);
    }
    for problem in &report.warnings {
        warn!(item = %id, "{}", problem);
    }

    if report.is_clean() {
        info!(item = %id, "metadata.json validated successfully");
    } else {
        diagnostics.push(Diagnostic {
            item_id: id.to_string(),
            kind: DiagnosticKind::Validation(report),
        });
    }

    if metadata.is_object() {
        metadata
    } else {
        empty
    }
}

/// Names of everything directly inside `dir`
fn list_files(dir: &Path) -> Result<Vec<String>, walkdir::Error> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .map(|e| e.map(|e| e.file_name().to_string_lossy().to_string()))
        .collect()
}

fn is_image(file: &str) -> bool {
    Path::new(file)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Create `item-<n>` with every required file and the given metadata
    fn write_item(root: &Path, name: &str, metadata: Option<&str>) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for file in ["index.html", "fullscreen.jpg", "image.jpg"] {
            fs::write(dir.join(file), b"x").unwrap();
        }
        if let Some(metadata) = metadata {
            fs::write(dir.join(METADATA_FILE), metadata).unwrap();
        }
    }

    fn config_for(root: &TempDir) -> BuildConfig {
        BuildConfig {
            source_dir: root.path().to_path_buf(),
            ..BuildConfig::default()
        }
    }

    fn metadata_for(id: &str, title: &str) -> String {
        format!(
            r#"{{"id":"{}","title":"{}","focal_point":{{"x":50,"y":50}}}}"#,
            id, title
        )
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_entries_are_reported() {
        let root = tempfile::tempdir().unwrap();
        write_item(root.path(), "item-1", Some(&metadata_for("item-1", "Dune")));
        std::os::unix::fs::symlink(root.path(), root.path().join("item-2")).unwrap();

        let outcome = scan(&config_for(&root));
        assert_eq!(outcome.items.len(), 1);
        assert!(outcome.diagnostics.iter().any(|d| {
            d.item_id == "item-2" && matches!(d.kind, DiagnosticKind::Unreadable(_))
        }));
        assert_eq!(outcome.error_count(), 0);
    }

    #[test]
    fn strict_builds_refuse_invalid_metadata() {
        let root = tempfile::tempdir().unwrap();
        write_item(root.path(), "item-1", Some(&metadata_for("item-1", "Dune")));
        write_item(root.path(), "item-2", Some(r#"{"id":"item-2","title":"x"}"#));

        let outcome = scan(&config_for(&root));
        assert_eq!(outcome.check_strict(false).unwrap(), 1);
        assert!(matches!(
            outcome.check_strict(true),
            Err(ContentError::InvalidItems(1))
        ));

        let clean = ScanOutcome::default();
        assert_eq!(clean.check_strict(true).unwrap(), 0);
    }

    #[test]
    fn missing_root_is_an_empty_scan() {
        let root = tempfile::tempdir().unwrap();
        let config = BuildConfig {
            source_dir: root.path().join("absent"),
            ..BuildConfig::default()
        };

        let outcome = scan(&config);
        assert!(outcome.items.is_empty());
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn items_are_ordered_by_number_not_name() {
        let root = tempfile::tempdir().unwrap();
        for n in [10, 2, 1] {
            let id = format!("item-{}", n);
            write_item(root.path(), &id, Some(&metadata_for(&id, "t")));
        }
        fs::create_dir_all(root.path().join("assets")).unwrap();
        fs::write(root.path().join("item-7"), b"not a directory").unwrap();

        let outcome = scan(&config_for(&root));
        let ids: Vec<&str> = outcome.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["item-1", "item-2", "item-10"]);
        assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    }

    #[test]
    fn item_fields_come_from_config_and_metadata() {
        let root = tempfile::tempdir().unwrap();
        write_item(root.path(), "item-3", Some(&metadata_for("item-3", "Harbour")));

        let outcome = scan(&config_for(&root));
        let item = &outcome.items[0];
        assert_eq!(item.title, "Harbour");
        assert_eq!(item.path, "/lager/item-3/");
        assert_eq!(item.thumbnail, "fullscreen.jpg");
        assert_eq!(item.number, 3);
    }

    #[test]
    fn missing_metadata_is_a_warning_and_defaults_the_title() {
        let root = tempfile::tempdir().unwrap();
        write_item(root.path(), "item-4", None);

        let outcome = scan(&config_for(&root));
        assert_eq!(outcome.items[0].title, "Item 4");
        assert_eq!(outcome.error_count(), 0);
        assert_eq!(
            outcome.diagnostics[0].kind,
            DiagnosticKind::MissingFiles(vec!["metadata.json".to_string()])
        );
        assert!(matches!(outcome.diagnostics[1].kind, DiagnosticKind::Unreadable(_)));
    }

    #[test]
    fn malformed_metadata_does_not_stop_the_scan() {
        let root = tempfile::tempdir().unwrap();
        write_item(root.path(), "item-1", Some("{ \"id\": "));
        write_item(root.path(), "item-2", Some(&metadata_for("item-2", "Fine")));

        let outcome = scan(&config_for(&root));
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.items[0].title, "Item 1");
        assert_eq!(outcome.items[1].title, "Fine");
        assert_eq!(outcome.error_count(), 1);
        assert!(matches!(outcome.diagnostics[0].kind, DiagnosticKind::InvalidJson(_)));
    }

    #[test]
    fn invalid_metadata_is_reported_but_included() {
        let root = tempfile::tempdir().unwrap();
        write_item(
            root.path(),
            "item-1",
            Some(r#"{"id":"item-1","title":"","focal_point":{"x":150,"y":50}}"#),
        );

        let outcome = scan(&config_for(&root));
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].title, "Item 1");

        let DiagnosticKind::Validation(report) = &outcome.diagnostics[0].kind else {
            panic!("expected a validation diagnostic");
        };
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.warnings, vec!["title is empty".to_string()]);
    }

    #[test]
    fn non_numeric_directories_are_skipped() {
        let root = tempfile::tempdir().unwrap();
        write_item(root.path(), "item-draft", Some(&metadata_for("item-draft", "t")));

        let outcome = scan(&config_for(&root));
        assert!(outcome.items.is_empty());
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::BadDirectoryName);
    }

    #[test]
    fn extra_images_are_listed() {
        let root = tempfile::tempdir().unwrap();
        write_item(root.path(), "item-1", Some(&metadata_for("item-1", "t")));
        let dir = root.path().join("item-1");
        fs::write(dir.join("detail-b.PNG"), b"x").unwrap();
        fs::write(dir.join("detail-a.jpeg"), b"x").unwrap();
        fs::write(dir.join("notes.txt"), b"x").unwrap();

        let outcome = scan(&config_for(&root));
        assert_eq!(
            outcome.items[0].additional_images,
            vec!["detail-a.jpeg".to_string(), "detail-b.PNG".to_string()]
        );
    }
}
