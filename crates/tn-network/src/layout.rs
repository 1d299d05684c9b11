//! Synthetic grid city.
//!
//! Intersections are numbered `1..=rows*cols` row-major.  Each intersection
//! connects to its right and lower neighbour; base weights are drawn
//! uniformly from `[5, 15)`.  The default city is 5 rows × 10 columns.

use tn_core::{IntersectionId, NetworkConfig, SimRng};

use crate::RoadNetworkBuilder;

/// Inclusive lower end of generated base weights.
const GRID_MIN_WEIGHT: u32 = 5;
/// Exclusive upper end of generated base weights.
const GRID_MAX_WEIGHT: u32 = 15;

/// Dimensions of a grid city.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridShape {
    pub rows: u32,
    pub cols: u32,
}

impl GridShape {
    /// The 5 × 10 city.
    pub const CLASSIC: GridShape = GridShape { rows: 5, cols: 10 };

    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Id of the intersection at (`row`, `col`), zero-based.
    #[inline]
    pub fn id_at(&self, row: u32, col: u32) -> IntersectionId {
        IntersectionId(row * self.cols + col + 1)
    }

    pub fn intersection_count(&self) -> u32 {
        self.rows * self.cols
    }

    /// Horizontal plus vertical road count.
    pub fn road_count(&self) -> u32 {
        let horizontal = self.rows * self.cols.saturating_sub(1);
        let vertical = self.rows.saturating_sub(1) * self.cols;
        horizontal + vertical
    }
}

/// Lay out a grid city into a builder.
///
/// Weights are drawn cell by cell (right road first, then down road), so the
/// same seed always yields the same city.  The caller's `config` decides how
/// the result is validated; the generated weights sit inside the default
/// `[5, 30]` bounds.
pub fn grid_layout(shape: GridShape, config: NetworkConfig, rng: &mut SimRng) -> RoadNetworkBuilder {
    let mut b = RoadNetworkBuilder::with_capacity(
        config,
        shape.intersection_count() as usize,
        shape.road_count() as usize,
    );

    for row in 0..shape.rows {
        for col in 0..shape.cols {
            b.add_intersection(shape.id_at(row, col));
        }
    }

    for row in 0..shape.rows {
        for col in 0..shape.cols {
            let here = shape.id_at(row, col);
            if col + 1 < shape.cols {
                b.add_road(here, shape.id_at(row, col + 1), rng.gen_range(GRID_MIN_WEIGHT..GRID_MAX_WEIGHT));
            }
            if row + 1 < shape.rows {
                b.add_road(here, shape.id_at(row + 1, col), rng.gen_range(GRID_MIN_WEIGHT..GRID_MAX_WEIGHT));
            }
        }
    }
    b
}
