/// Grid dimensions and cell assignment
///
/// The layout is a pure function of the item count: small collections
/// use a fixed default grid, larger ones a near-square grid with
/// `columns = ceil(sqrt(n))` and `rows = ceil(n / columns)`.
use super::data::{GridLayout, GridPosition};

/// Grid used for collections of at most `DEFAULT_GRID_MAX_ITEMS` items
pub const DEFAULT_GRID: GridLayout = GridLayout {
    rows: 2,
    columns: 2,
};

pub const DEFAULT_GRID_MAX_ITEMS: usize = 4;

/// Compute grid dimensions for `item_count` items
pub fn compute(item_count: usize) -> GridLayout {
    compute_with_default(item_count, DEFAULT_GRID)
}

/// Compute grid dimensions, falling back to `default` for small counts
///
/// A configured default too small to hold the items is ignored.
pub fn compute_with_default(item_count: usize, default: GridLayout) -> GridLayout {
    if item_count <= DEFAULT_GRID_MAX_ITEMS && default.cell_count() >= item_count as u64 {
        return default;
    }

    let columns = ceil_sqrt(item_count as u64);
    let rows = (item_count as u64).div_ceil(columns);

    GridLayout {
        rows: rows as u32,
        columns: columns as u32,
    }
}

/// Row-major cell for the item at ordinal `index`
pub fn position(index: usize, layout: GridLayout) -> GridPosition {
    let columns = layout.columns.max(1) as usize;
    GridPosition::new((index % columns) as u32, (index / columns) as u32)
}

/// Smallest `c` with `c * c >= n`, exact for every `u64`
fn ceil_sqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut root = (n as f64).sqrt() as u64;
    while root.saturating_mul(root) > n {
        root -= 1;
    }
    while root.saturating_mul(root) < n {
        root += 1;
    }
    root
}
