/// Shared data structures for the content pipeline
///
/// These structs represent the data model that flows from the build step
/// (scanner, validator, layout) into the manifest, and from the manifest
/// into the hover runtime.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical `"column-row"` key of one grid cell
///
/// Used as the lookup key everywhere downstream: rendered cells, the image
/// and link maps, and the metadata cache.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CellKey(String);

impl CellKey {
    pub fn new(column: u32, row: u32) -> Self {
        Self(format!("{}-{}", column, row))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Percentage-space coordinate of an image's subject, both axes in [0, 100]
///
/// Deserializing rejects out-of-range axes, so a parsed document can never
/// carry a focal point the build would have refused.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(try_from = "UncheckedFocalPoint")]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

impl FocalPoint {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    pub fn contains(value: f64) -> bool {
        (Self::MIN..=Self::MAX).contains(&value)
    }
}

#[derive(Deserialize)]
struct UncheckedFocalPoint {
    x: f64,
    y: f64,
}

impl TryFrom<UncheckedFocalPoint> for FocalPoint {
    type Error = String;

    fn try_from(raw: UncheckedFocalPoint) -> Result<Self, Self::Error> {
        for (axis, value) in [("x", raw.x), ("y", raw.y)] {
            if !Self::contains(value) {
                return Err(format!(
                    "focal_point.{} must be between {} and {}, got {}",
                    axis,
                    Self::MIN,
                    Self::MAX,
                    value
                ));
            }
        }
        Ok(Self { x: raw.x, y: raw.y })
    }
}

/// Strict form of an item's `metadata.json`
///
/// Required fields are always present; optional fields carry their
/// presence in the `Option`. Unknown fields are accepted and dropped so
/// newer documents keep parsing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ItemMetadata {
    pub id: String,
    pub title: String,
    pub focal_point: FocalPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullscreen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl ItemMetadata {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Grid dimensions in cells
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: u32,
    pub columns: u32,
}

impl GridLayout {
    pub fn cell_count(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.columns)
    }
}

/// Cell assigned to an item at manifest-build time
///
/// Serialized with the manifest's wire names (`x`, `y`, `quadrant`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GridPosition {
    #[serde(rename = "x")]
    pub column: u32,
    #[serde(rename = "y")]
    pub row: u32,
    #[serde(rename = "quadrant")]
    pub cell_key: CellKey,
}

impl GridPosition {
    pub fn new(column: u32, row: u32) -> Self {
        Self {
            column,
            row,
            cell_key: CellKey::new(column, row),
        }
    }
}

/// One media entry of the manifest
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Directory name, e.g. "item-3"
    pub id: String,
    pub title: String,
    /// Base reference the item's assets resolve under, always ending in '/'
    pub path: String,
    /// Filename of the default-visible image
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_images: Vec<String>,
    pub grid_position: GridPosition,
}

impl Item {
    /// Overlay image reference, `path` + `thumbnail`
    pub fn image_src(&self) -> String {
        format!("{}{}", self.path, self.thumbnail)
    }

    /// Location of the item's own metadata document
    pub fn metadata_url(&self, metadata_file: &str) -> String {
        format!("{}{}", self.path, metadata_file)
    }
}

/// The single hand-off artifact from build time to runtime
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub last_updated: DateTime<Utc>,
    pub grid: GridLayout,
    pub items: Vec<Item>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_key_is_column_then_row() {
        assert_eq!(CellKey::new(1, 0).as_str(), "1-0");
        assert_eq!(GridPosition::new(0, 2).cell_key.to_string(), "0-2");
    }

    #[test]
    fn focal_bounds_are_inclusive() {
        assert!(FocalPoint::contains(0.0));
        assert!(FocalPoint::contains(100.0));
        assert!(!FocalPoint::contains(100.1));
        assert!(!FocalPoint::contains(-0.1));
    }

    #[test]
    fn out_of_range_focal_point_does_not_parse() {
        let json = br#"{"id":"item-1","title":"t","focal_point":{"x":150,"y":-20}}"#;
        let err = ItemMetadata::from_slice(json).unwrap_err();
        assert!(err.to_string().contains("focal_point.x must be between 0 and 100"));

        let edge = br#"{"id":"item-1","title":"t","focal_point":{"x":0,"y":100}}"#;
        let metadata = ItemMetadata::from_slice(edge).unwrap();
        assert_eq!(metadata.focal_point, FocalPoint { x: 0.0, y: 100.0 });
    }

    #[test]
    fn item_uses_wire_names() {
        let item = Item {
            id: "item-2".to_string(),
            title: "Item 2".to_string(),
            path: "/lager/item-2/".to_string(),
            thumbnail: "fullscreen.jpg".to_string(),
            additional_images: Vec::new(),
            grid_position: GridPosition::new(1, 0),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["gridPosition"]["x"], 1);
        assert_eq!(value["gridPosition"]["y"], 0);
        assert_eq!(value["gridPosition"]["quadrant"], "1-0");
        assert!(value.get("additionalImages").is_none());
        assert_eq!(item.image_src(), "/lager/item-2/fullscreen.jpg");
        assert_eq!(item.metadata_url("metadata.json"), "/lager/item-2/metadata.json");
    }

    #[test]
    fn metadata_tolerates_unknown_fields() {
        let json = br#"{"id":"item-1","title":"Dune","focal_point":{"x":10,"y":90},"camera":"X100"}"#;
        let metadata = ItemMetadata::from_slice(json).unwrap();
        assert_eq!(metadata.focal_point, FocalPoint { x: 10.0, y: 90.0 });
        assert!(metadata.details.is_none());
    }
}
