/// Display surface capabilities and the grid renderer
///
/// The hover logic never touches a real display. A host implements
/// `GridSurface` (materialise cells, report their screen boxes) and
/// `Overlay` (swap and show the full-screen image); tests use a recording
/// double.
use std::collections::HashMap;
use tracing::debug;

use crate::content::data::{CellKey, FocalPoint, GridLayout, Manifest};

/// Pointer position in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Screen-space bounding box of a rendered cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// Edges count as inside
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// Everything a host needs to draw one cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub cell_key: CellKey,
    pub column: u32,
    pub row: u32,
    /// Link destination (navigation is suppressed at runtime)
    pub href: String,
    pub image_src: String,
    pub alt: String,
}

/// Where the grid lives
pub trait GridSurface {
    /// Opaque reference to one rendered cell
    type Handle;

    /// Size the grid before any cell is rendered
    fn set_grid(&mut self, layout: GridLayout);

    /// Replace the grid contents with `cells`
    fn render(&mut self, cells: &[CellView]) -> Vec<Self::Handle>;

    /// Current screen boxes of the rendered cells
    fn cell_bounds(&self) -> Vec<(CellKey, Rect)>;

    /// Warm an image so the first overlay swap is instant
    fn preload(&mut self, _src: &str) {}
}

/// The full-screen hover overlay
pub trait Overlay {
    /// Swap the overlay image; `None` keeps the current positioning
    fn update_overlay(&mut self, image_src: &str, focal_point: Option<FocalPoint>);

    fn set_overlay_visible(&mut self, visible: bool);
}

/// Image and link lookup by cell, built once from the manifest
#[derive(Debug, Clone, Default)]
pub struct CellMaps {
    images: HashMap<CellKey, String>,
    links: HashMap<CellKey, String>,
}

impl CellMaps {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let mut maps = Self::default();
        for item in &manifest.items {
            let key = item.grid_position.cell_key.clone();
            maps.images.insert(key.clone(), item.image_src());
            maps.links.insert(key, item.path.clone());
        }
        maps
    }

    /// Overlay image for `key`
    pub fn image(&self, key: &CellKey) -> Option<&str> {
        self.images.get(key).map(String::as_str)
    }

    /// Item path for `key`
    pub fn link(&self, key: &CellKey) -> Option<&str> {
        self.links.get(key).map(String::as_str)
    }

    /// Every overlay image, in cell order
    pub fn image_sources(&self) -> Vec<&str> {
        let mut keys: Vec<&CellKey> = self.images.keys().collect();
        keys.sort();
        keys.into_iter().filter_map(|key| self.image(key)).collect()
    }
}

/// Materialise the manifest on `surface`
///
/// Sizes the grid, renders one cell per item and preloads every overlay
/// image plus the logo.
pub fn render_grid<S: GridSurface + ?Sized>(
    manifest: &Manifest,
    maps: &CellMaps,
    logo: &str,
    surface: &mut S,
) -> Vec<S::Handle> {
    surface.set_grid(manifest.grid);

    let cells: Vec<CellView> = manifest
        .items
        .iter()
        .map(|item| CellView {
            cell_key: item.grid_position.cell_key.clone(),
            column: item.grid_position.column,
            row: item.grid_position.row,
            href: item.path.clone(),
            image_src: item.image_src(),
            alt: item.title.clone(),
        })
        .collect();
    let handles = surface.render(&cells);

    for src in maps.image_sources() {
        surface.preload(src);
    }
    surface.preload(logo);

    debug!(
        cells = cells.len(),
        columns = manifest.grid.columns,
        rows = manifest.grid.rows,
        "grid rendered"
    );
    handles
}

#[cfg(test)]
pub(crate) mod recording {
    //! Surface double that records every call

    use super::*;
    use crate::content::data::{GridPosition, Item};
    use chrono::Utc;
    use tokio::sync::mpsc::UnboundedSender;

    /// `count` items laid out row-major over `columns`
    pub fn manifest_with(count: u32, columns: u32) -> Manifest {
        let items = (0..count)
            .map(|index| {
                let id = format!("item-{}", index + 1);
                Item {
                    title: format!("Item {}", index + 1),
                    path: format!("/lager/{}/", id),
                    id,
                    thumbnail: "fullscreen.jpg".to_string(),
                    additional_images: Vec::new(),
                    grid_position: GridPosition::new(index % columns, index / columns),
                }
            })
            .collect();
        Manifest {
            last_updated: Utc::now(),
            grid: GridLayout {
                rows: count.div_ceil(columns).max(2),
                columns,
            },
            items,
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum SurfaceCall {
        SetGrid(GridLayout),
        Render(Vec<CellKey>),
        Preload(String),
        Overlay(String, Option<FocalPoint>),
        Visible(bool),
    }

    /// Lays cells out as `cell_size` squares from the origin
    #[derive(Debug)]
    pub struct RecordingSurface {
        pub cell_size: f64,
        pub calls: Vec<SurfaceCall>,
        pub bounds: Vec<(CellKey, Rect)>,
        /// Receives the image of every overlay update
        pub updates: Option<UnboundedSender<String>>,
    }

    impl RecordingSurface {
        pub fn new(cell_size: f64) -> Self {
            Self {
                cell_size,
                calls: Vec::new(),
                bounds: Vec::new(),
                updates: None,
            }
        }

        pub fn overlay_updates(&self) -> Vec<&SurfaceCall> {
            self.calls
                .iter()
                .filter(|call| matches!(call, SurfaceCall::Overlay(..)))
                .collect()
        }

        pub fn last_visibility(&self) -> Option<bool> {
            self.calls.iter().rev().find_map(|call| match call {
                SurfaceCall::Visible(visible) => Some(*visible),
                _ => None,
            })
        }

        /// Center of the rendered cell `key`
        pub fn center_of(&self, key: &CellKey) -> Point {
            let (_, rect) = self
                .bounds
                .iter()
                .find(|(k, _)| k == key)
                .expect("cell was rendered");
            Point::new((rect.left + rect.right) / 2.0, (rect.top + rect.bottom) / 2.0)
        }
    }

    impl GridSurface for RecordingSurface {
        type Handle = usize;

        fn set_grid(&mut self, layout: GridLayout) {
            self.calls.push(SurfaceCall::SetGrid(layout));
        }

        fn render(&mut self, cells: &[CellView]) -> Vec<usize> {
            self.bounds = cells
                .iter()
                .map(|cell| {
                    let rect = Rect::new(
                        f64::from(cell.column) * self.cell_size,
                        f64::from(cell.row) * self.cell_size,
                        self.cell_size,
                        self.cell_size,
                    );
                    (cell.cell_key.clone(), rect)
                })
                .collect();
            self.calls.push(SurfaceCall::Render(
                cells.iter().map(|cell| cell.cell_key.clone()).collect(),
            ));
            (0..cells.len()).collect()
        }

        fn cell_bounds(&self) -> Vec<(CellKey, Rect)> {
            self.bounds.clone()
        }

        fn preload(&mut self, src: &str) {
            self.calls.push(SurfaceCall::Preload(src.to_string()));
        }
    }

    impl Overlay for RecordingSurface {
        fn update_overlay(&mut self, image_src: &str, focal_point: Option<FocalPoint>) {
            self.calls
                .push(SurfaceCall::Overlay(image_src.to_string(), focal_point));
            if let Some(updates) = &self.updates {
                let _ = updates.send(image_src.to_string());
            }
        }

        fn set_overlay_visible(&mut self, visible: bool) {
            self.calls.push(SurfaceCall::Visible(visible));
        }
    }
}
