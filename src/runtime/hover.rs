/// Hover state machine
///
/// Decides, for each throttled pointer sample, whether the overlay has to
/// change. A cell whose metadata is not cached yet produces a
/// `FetchRequest`; the host performs it and hands the result back through
/// `on_fetched`, which commits it only if that cell is still the target.
/// All state lives in the machine, so independent grids never interfere.
use tracing::{debug, info};

use super::cache::{Lookup, MetadataCache};
use super::latest::{Latest, Ticket};
use super::surface::{CellMaps, Overlay};
use crate::config::RuntimeConfig;
use crate::content::data::{CellKey, FocalPoint, ItemMetadata};
use crate::error::FetchError;

/// Observable hover state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverState {
    /// No cell under the pointer, or the overlay is hidden
    Idle,
    /// Overlay settled on this cell
    Showing(CellKey),
    /// Metadata for this cell is being fetched
    Resolving(CellKey),
}

/// A metadata fetch the host must perform
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub ticket: Ticket<CellKey>,
    pub url: String,
}

/// What happened to a fetch result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Committed,
    /// The pointer moved on; result dropped
    Stale,
}

#[derive(Debug)]
pub struct HoverMachine {
    cells: CellMaps,
    metadata_file: String,
    cache: MetadataCache,
    latest: Latest<CellKey>,
    /// Cell whose image the overlay last committed
    current: Option<CellKey>,
    visible: bool,
}

impl HoverMachine {
    pub fn new(cells: CellMaps, config: &RuntimeConfig) -> Self {
        Self {
            cells,
            metadata_file: config.metadata_file.clone(),
            cache: MetadataCache::new(),
            latest: Latest::new(),
            current: None,
            visible: false,
        }
    }

    pub fn state(&self) -> HoverState {
        if let Some(target) = self.latest.target() {
            return HoverState::Resolving(target.clone());
        }
        match &self.current {
            Some(current) if self.visible => HoverState::Showing(current.clone()),
            _ => HoverState::Idle,
        }
    }

    pub fn current_cell(&self) -> Option<&CellKey> {
        self.current.as_ref()
    }

    pub fn target_cell(&self) -> Option<&CellKey> {
        self.latest.target()
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    pub fn cells(&self) -> &CellMaps {
        &self.cells
    }

    /// Handle one throttled sample resolved to `cell`
    pub fn on_sample<O: Overlay + ?Sized>(
        &mut self,
        cell: Option<&CellKey>,
        overlay: &mut O,
    ) -> Option<FetchRequest> {
        let Some(cell) = cell else {
            self.latest.clear();
            if self.visible {
                debug!("no cell under pointer, hiding overlay");
                self.hide(overlay);
            }
            return None;
        };

        if self.cells.image(cell).is_none() {
            debug!(cell = %cell, "sample on a cell without an item");
            return None;
        }

        if self.current.as_ref() == Some(cell) {
            // Back on the displayed cell: anything still in flight is stale.
            self.latest.clear();
            if !self.visible {
                overlay.set_overlay_visible(true);
                self.visible = true;
            }
            return None;
        }

        if self.latest.is_target(cell) {
            return None;
        }

        let ticket = self.latest.issue(cell.clone());
        match self.cache.request(cell) {
            Lookup::Ready(metadata) => {
                self.latest.settle(&ticket);
                self.commit(cell, Some(metadata.focal_point), overlay);
                None
            }
            Lookup::InFlight => {
                debug!(cell = %cell, "metadata already in flight");
                None
            }
            Lookup::Fetch => {
                let url = self
                    .cells
                    .link(cell)
                    .map(|path| format!("{}{}", path, self.metadata_file))
                    .unwrap_or_default();
                debug!(cell = %cell, url = %url, generation = ticket.generation(), "fetching metadata");
                Some(FetchRequest { ticket, url })
            }
        }
    }

    /// Apply the outcome of a fetch issued by `on_sample`
    ///
    /// The cache keeps a successful result even when it arrives stale.
    pub fn on_fetched<O: Overlay + ?Sized>(
        &mut self,
        ticket: Ticket<CellKey>,
        result: Result<ItemMetadata, FetchError>,
        overlay: &mut O,
    ) -> Completion {
        let cell = ticket.key().clone();
        let metadata = self.cache.settle(&cell, result);

        if !self.latest.settle(&ticket) {
            debug!(cell = %cell, generation = ticket.generation(), "discarding stale metadata");
            return Completion::Stale;
        }

        self.commit(&cell, metadata.map(|m| m.focal_point), overlay);
        Completion::Committed
    }

    /// Page hidden, window blurred or pointer left the viewport
    ///
    /// Only the overlay is hidden; current and target cells are kept so a
    /// pointer returning to the same cell needs no refetch.
    pub fn on_hidden<O: Overlay + ?Sized>(&mut self, overlay: &mut O) {
        self.hide(overlay);
    }

    /// Navigation is disabled: report where a click would have gone
    pub fn on_click(&self, cell: &CellKey) -> Option<&str> {
        let destination = self.cells.link(cell)?;
        info!(cell = %cell, destination = %destination, "navigation disabled");
        Some(destination)
    }

    fn commit<O: Overlay + ?Sized>(
        &mut self,
        cell: &CellKey,
        focal_point: Option<FocalPoint>,
        overlay: &mut O,
    ) {
        let Some(image) = self.cells.image(cell) else {
            return;
        };
        overlay.update_overlay(image, focal_point);
        overlay.set_overlay_visible(true);
        self.visible = true;
        self.current = Some(cell.clone());
    }

    fn hide<O: Overlay + ?Sized>(&mut self, overlay: &mut O) {
        overlay.set_overlay_visible(false);
        self.visible = false;
    }
}
