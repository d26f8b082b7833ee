#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ray-cast field of view with fog-of-war memory.
//!
//! Each refresh first demotes the previous frame's visible cells to
//! [`Visibility::Seen`], then casts one ray per degree from the centre of the
//! origin cell. Rays advance in half-cell increments, mark every traversed
//! cell visible and stop on the first wall, which is itself marked visible.
//! Thin diagonal gaps can leak sight asymmetrically; the field is a stadium
//! approximation rather than exact shadow casting.

use delve_core::{CellCoord, Tile, TileGrid};
use tracing::trace;

/// Number of rays cast per refresh, one per degree.
pub const RAY_COUNT: u32 = 360;

const RAY_STEP: f64 = 0.5;

/// Knowledge state of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Never observed.
    #[default]
    Hidden,
    /// Observed earlier but not in view now.
    Seen,
    /// In view after the latest refresh.
    Visible,
}

/// Per-cell visibility matching the dimensions of a floor grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VisibilityGrid {
    width: u32,
    height: u32,
    cells: Vec<Visibility>,
}

impl VisibilityGrid {
    /// Creates an all-hidden grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![Visibility::Hidden; capacity],
        }
    }

    /// Creates an all-hidden grid sized to the floor.
    #[must_use]
    pub fn for_grid(grid: &TileGrid) -> Self {
        Self::new(grid.width(), grid.height())
    }

    /// Number of columns tracked.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows tracked.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Visibility of the cell; out-of-bounds cells read as hidden.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Visibility {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or_default()
    }

    /// Reports whether the cell is in view. Always `false` out of bounds.
    #[must_use]
    pub fn is_visible(&self, cell: CellCoord) -> bool {
        self.get(cell) == Visibility::Visible
    }

    /// Reports whether the cell was ever observed. Always `false` out of bounds.
    #[must_use]
    pub fn was_seen(&self, cell: CellCoord) -> bool {
        matches!(self.get(cell), Visibility::Seen | Visibility::Visible)
    }

    /// Number of cells currently in view.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|state| **state == Visibility::Visible)
            .count()
    }

    fn demote_visible(&mut self) {
        for state in &mut self.cells {
            if *state == Visibility::Visible {
                *state = Visibility::Seen;
            }
        }
    }

    fn mark_visible(&mut self, cell: CellCoord) {
        if let Some(state) = self
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
        {
            *state = Visibility::Visible;
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Recomputes the field of view around `origin`.
///
/// `radius` counts half-cell steps along each ray, so a radius of 8 reaches
/// roughly four cells. Cells leave the visible set only by demotion to
/// [`Visibility::Seen`]; nothing ever returns to [`Visibility::Hidden`].
pub fn update_visibility(
    grid: &TileGrid,
    visibility: &mut VisibilityGrid,
    origin: CellCoord,
    radius: u32,
) {
    visibility.demote_visible();

    let width = f64::from(grid.width());
    let height = f64::from(grid.height());
    let start_x = f64::from(origin.column()) + 0.5;
    let start_y = f64::from(origin.row()) + 0.5;

    for ray in 0..RAY_COUNT {
        let angle = f64::from(ray) * std::f64::consts::TAU / f64::from(RAY_COUNT);
        let (sin, cos) = angle.sin_cos();
        let mut x = start_x;
        let mut y = start_y;

        for _ in 0..radius {
            let tile_x = x.floor();
            let tile_y = y.floor();
            if tile_x < 0.0 || tile_y < 0.0 || tile_x >= width || tile_y >= height {
                break;
            }

            let cell = CellCoord::new(tile_x as u32, tile_y as u32);
            visibility.mark_visible(cell);
            if grid.tile(cell) == Some(Tile::Wall) {
                break;
            }

            x += cos * RAY_STEP;
            y += sin * RAY_STEP;
        }
    }

    trace!(
        column = origin.column(),
        row = origin.row(),
        visible = visibility.visible_count(),
        "refreshed field of view"
    );
}
