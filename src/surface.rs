use crate::error::WallError;
use crate::grid::Grid;

/// Surface-relative position, e.g. of the pointer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Bounding rectangle of the wall on its surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x < self.left + self.width
            && point.y >= self.top
            && point.y < self.top + self.height
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Where a wall is displayed
pub trait Surface {
    /// Current bounding rectangle, `None` when the surface is gone
    fn bounds(&self) -> Option<Rect>;

    /// Called once on mount, before any callback is scheduled
    fn attach(&mut self, grid: &Grid) -> Result<(), WallError>;

    /// Called on teardown. Must tolerate being called more than once.
    fn detach(&mut self);
}

/// Surface with fixed bounds and no output
#[derive(Clone, Debug, Default)]
pub struct HeadlessSurface {
    bounds: Option<Rect>,
    attached_cells: Option<usize>,
}

impl HeadlessSurface {
    pub fn new(bounds: Rect) -> Self {
        HeadlessSurface {
            bounds: Some(bounds),
            attached_cells: None,
        }
    }

    /// A surface that refuses to mount
    pub fn unavailable() -> Self {
        HeadlessSurface::default()
    }

    pub fn is_attached(&self) -> bool {
        self.attached_cells.is_some()
    }

    pub fn attached_cells(&self) -> Option<usize> {
        self.attached_cells
    }
}

impl Surface for HeadlessSurface {
    fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    fn attach(&mut self, grid: &Grid) -> Result<(), WallError> {
        match self.bounds {
            Some(rect) if rect.has_area() => {
                self.attached_cells = Some(grid.len());
                Ok(())
            }
            _ => Err(WallError::SurfaceUnavailable),
        }
    }

    fn detach(&mut self) {
        self.attached_cells = None;
    }
}
