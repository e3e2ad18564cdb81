use crate::grid::Grid;
use crate::state::Orientation;

/// Real-valued grid coordinate driving the tilt
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocalPoint {
    pub row: f64,
    pub col: f64,
}

impl FocalPoint {
    pub fn new(row: f64, col: f64) -> Self {
        FocalPoint { row, col }
    }
}

/// Which configured duration a transition uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationClass {
    /// Cell inside the influence radius
    Enter,
    /// Cell settling back to neutral
    Leave,
}

/// Orientation a cell should move to, and how fast
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub orientation: Orientation,
    pub class: DurationClass,
}

/// Computes the target of every cell for a focal point, in grid order.
///
/// Cells within `radius` (inclusive) tilt by `(1 - dist / radius) * max_angle`,
/// negated on the first axis; cells beyond it return to neutral.
pub fn compute_targets(grid: &Grid, focal: FocalPoint, radius: f64, max_angle: f64) -> Vec<Target> {
    grid.cells()
        .iter()
        .map(|cell| {
            let dist = (cell.row as f64 - focal.row).hypot(cell.col as f64 - focal.col);
            if dist <= radius {
                let angle = (1.0 - dist / radius) * max_angle;
                Target {
                    orientation: Orientation::new(-angle, angle),
                    class: DurationClass::Enter,
                }
            } else {
                Target {
                    orientation: Orientation::NEUTRAL,
                    class: DurationClass::Leave,
                }
            }
        })
        .collect()
}

/// Every cell back to neutral with the leave duration
pub fn neutral_targets(grid: &Grid) -> Vec<Target> {
    vec![
        Target {
            orientation: Orientation::NEUTRAL,
            class: DurationClass::Leave,
        };
        grid.len()
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn target_at(grid: &Grid, targets: &[Target], row: usize, col: usize) -> Target {
        targets[grid.index_of(row, col).unwrap()]
    }

    #[test]
    fn focal_cell_gets_full_angle() {
        let grid = Grid::build(12);
        let targets = compute_targets(&grid, FocalPoint::new(5.0, 7.0), 3.0, 35.0);
        let center = target_at(&grid, &targets, 5, 7);
        assert_eq!(center.orientation, Orientation::new(-35.0, 35.0));
        assert_eq!(center.class, DurationClass::Enter);
    }

    #[test]
    fn cells_at_or_beyond_radius_are_neutral() {
        let grid = Grid::build(12);
        let targets = compute_targets(&grid, FocalPoint::new(5.0, 5.0), 3.0, 35.0);
        for (cell, target) in grid.cells().iter().zip(&targets) {
            let dist = (cell.row as f64 - 5.0).hypot(cell.col as f64 - 5.0);
            if dist >= 3.0 {
                assert_abs_diff_eq!(target.orientation.tilt_a.abs(), 0.0);
                assert_abs_diff_eq!(target.orientation.tilt_b.abs(), 0.0);
            }
        }
    }

    #[test]
    fn boundary_is_inclusive() {
        let grid = Grid::build(4);
        let targets = compute_targets(&grid, FocalPoint::new(1.0, 1.0), 1.0, 40.0);

        let center = target_at(&grid, &targets, 1, 1);
        assert_eq!(center.orientation, Orientation::new(-40.0, 40.0));

        // dist == radius: in range, but the angle has decayed to zero
        let edge = target_at(&grid, &targets, 0, 1);
        assert_eq!(edge.class, DurationClass::Enter);
        assert_abs_diff_eq!(edge.orientation.tilt_a, 0.0);
        assert_abs_diff_eq!(edge.orientation.tilt_b, 0.0);

        let outside = target_at(&grid, &targets, 3, 3);
        assert_eq!(outside.class, DurationClass::Leave);
        assert_eq!(outside.orientation, Orientation::NEUTRAL);
    }

    #[test]
    fn tilt_decreases_with_distance() {
        let grid = Grid::build(12);
        let focal = FocalPoint::new(4.3, 6.8);
        let targets = compute_targets(&grid, focal, 3.0, 35.0);

        let mut in_range: Vec<(f64, f64)> = grid
            .cells()
            .iter()
            .zip(&targets)
            .map(|(cell, t)| {
                let dist = (cell.row as f64 - focal.row).hypot(cell.col as f64 - focal.col);
                (dist, t.orientation.tilt_b.abs())
            })
            .filter(|(dist, _)| *dist <= 3.0)
            .collect();
        in_range.sort_by(|a, b| a.0.total_cmp(&b.0));

        assert!(in_range.len() > 1);
        for pair in in_range.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn axes_rotate_in_opposite_directions() {
        let grid = Grid::build(6);
        let targets = compute_targets(&grid, FocalPoint::new(2.5, 2.5), 3.0, 35.0);
        for target in targets.iter().filter(|t| t.class == DurationClass::Enter) {
            assert_abs_diff_eq!(target.orientation.tilt_a, -target.orientation.tilt_b);
        }
    }

    #[test]
    fn neutral_targets_cover_grid() {
        let grid = Grid::build(4);
        let targets = neutral_targets(&grid);
        assert_eq!(targets.len(), 16);
        assert!(targets
            .iter()
            .all(|t| t.orientation == Orientation::NEUTRAL && t.class == DurationClass::Leave));
    }
}
