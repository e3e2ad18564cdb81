//! Concentric ring partitioning for click ripples.

use std::collections::BTreeMap;

use crate::grid::Grid;
use crate::surface::{Point, Rect};

/// Unscaled ripple timings, in seconds
const RING_SPACING: f64 = 0.08;
const PULSE_DURATION: f64 = 0.25;
const HOLD_DURATION: f64 = 0.4;

/// Delays for one ripple, already divided by the speed multiplier
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleTiming {
    /// Delay between consecutive rings
    pub ring_spacing: f64,
    /// Colour fade length, both toward the highlight and back
    pub pulse: f64,
    /// Time the highlight is held after fading in
    pub hold: f64,
}

impl RippleTiming {
    pub fn for_speed(speed: f64) -> Self {
        RippleTiming {
            ring_spacing: RING_SPACING / speed,
            pulse: PULSE_DURATION / speed,
            hold: HOLD_DURATION / speed,
        }
    }

    pub fn ring_delay(&self, ring: u32) -> f64 {
        ring as f64 * self.ring_spacing
    }

    /// Delay between pulsing a ring and reverting it
    pub fn revert_after(&self) -> f64 {
        self.pulse + self.hold
    }
}

/// Integer cell under a surface point. May lie outside the grid.
pub fn hit_cell(point: Point, bounds: Rect, grid_size: usize) -> (i64, i64) {
    let cell_w = bounds.width / grid_size as f64;
    let cell_h = bounds.height / grid_size as f64;
    let row = ((point.y - bounds.top) / cell_h).floor() as i64;
    let col = ((point.x - bounds.left) / cell_w).floor() as i64;
    (row, col)
}

/// Groups cell indices by rounded distance from `(row, col)`, ascending
pub fn rings(grid: &Grid, row: i64, col: i64) -> BTreeMap<u32, Vec<usize>> {
    let mut rings: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (index, cell) in grid.cells().iter().enumerate() {
        let dist = (cell.row as f64 - row as f64).hypot(cell.col as f64 - col as f64);
        rings.entry(dist.round() as u32).or_default().push(index);
    }
    rings
}
