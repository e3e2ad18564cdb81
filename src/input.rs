//! Pointer geometry: surface coordinates to grid space, and enter/leave
//! detection for hosts whose input layer only reports raw positions.

use crate::solver::FocalPoint;
use crate::surface::{Point, Rect};

/// Fractional grid coordinate under `point`, `None` for a zero-area surface
pub fn to_focal(point: Point, bounds: Rect, grid_size: usize) -> Option<FocalPoint> {
    if !bounds.has_area() || grid_size == 0 {
        return None;
    }
    let cell_w = bounds.width / grid_size as f64;
    let cell_h = bounds.height / grid_size as f64;
    Some(FocalPoint::new(
        (point.y - bounds.top) / cell_h,
        (point.x - bounds.left) / cell_w,
    ))
}

/// What a raw pointer position means for the wall
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerAction {
    Move(Point),
    Leave,
    /// Outside the wall and already reported as left
    Ignore,
}

/// Turns a stream of raw positions into move and leave events
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    inside: bool,
}

impl PointerTracker {
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    pub fn track(&mut self, point: Point, bounds: Rect) -> PointerAction {
        if bounds.contains(point) {
            self.inside = true;
            PointerAction::Move(point)
        } else {
            self.leave()
        }
    }

    /// Pointer left by other means, e.g. the window lost focus
    pub fn leave(&mut self) -> PointerAction {
        if std::mem::replace(&mut self.inside, false) {
            PointerAction::Leave
        } else {
            PointerAction::Ignore
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn converts_to_fractional_cells() {
        let bounds = Rect::new(100.0, 50.0, 240.0, 120.0);
        let focal = to_focal(Point::new(150.0, 65.0), bounds, 12).unwrap();
        assert_abs_diff_eq!(focal.col, 2.5);
        assert_abs_diff_eq!(focal.row, 1.5);
    }

    #[test]
    fn zero_area_has_no_focal_point() {
        let bounds = Rect::new(0.0, 0.0, 0.0, 10.0);
        assert_eq!(to_focal(Point::new(1.0, 1.0), bounds, 12), None);
    }

    #[test]
    fn reports_leave_once() {
        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut tracker = PointerTracker::default();
        assert_eq!(tracker.track(Point::new(20.0, 1.0), bounds), PointerAction::Ignore);
        assert!(matches!(tracker.track(Point::new(1.0, 1.0), bounds), PointerAction::Move(_)));
        assert!(tracker.is_inside());
        assert_eq!(tracker.track(Point::new(20.0, 1.0), bounds), PointerAction::Leave);
        assert_eq!(tracker.track(Point::new(21.0, 1.0), bounds), PointerAction::Ignore);
        assert_eq!(tracker.leave(), PointerAction::Ignore);
    }
}
