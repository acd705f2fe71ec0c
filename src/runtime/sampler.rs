/// Throttled pointer sampling and cell hit-testing
use std::time::{Duration, Instant};

use super::surface::{GridSurface, Point, Rect};
use crate::content::data::CellKey;

/// Minimum-interval gate
///
/// The first call always passes; later calls pass once `interval` has
/// elapsed since the last one that passed.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn admit(&mut self, now: Instant) -> bool {
        let open = match self.last {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        if open {
            self.last = Some(now);
        }
        open
    }
}

/// Result of one raw pointer event
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    /// Dropped by the throttle
    Throttled,
    /// The cell under the pointer, if any
    Resolved(Option<CellKey>),
}

/// First cell whose box contains `point`
pub fn hit_test(bounds: &[(CellKey, Rect)], point: Point) -> Option<CellKey> {
    bounds
        .iter()
        .find(|(_, rect)| rect.contains(point))
        .map(|(key, _)| key.clone())
}

#[derive(Debug, Clone)]
pub struct PointerSampler {
    throttle: Throttle,
}

impl PointerSampler {
    pub fn new(interval: Duration) -> Self {
        Self {
            throttle: Throttle::new(interval),
        }
    }

    /// Resolve a pointer event at `now`, reading the cell boxes fresh
    /// from the surface so layout changes are always honoured
    pub fn sample<S: GridSurface + ?Sized>(&mut self, now: Instant, point: Point, surface: &S) -> Sample {
        if !self.throttle.admit(now) {
            return Sample::Throttled;
        }
        Sample::Resolved(hit_test(&surface.cell_bounds(), point))
    }
}
