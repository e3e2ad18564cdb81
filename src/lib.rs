//! A wall of small 3D cubes that tilt toward a focal point.
//!
//! The focal point follows the pointer, or wanders on its own while the
//! pointer is idle. Clicks send out rings of colour. [`wall::CubeWall`] holds
//! all state for one mounted wall and is driven entirely through its event
//! methods and [`wall::CubeWall::advance`], so any host that can supply a
//! [`scheduler::Scheduler`] and a [`surface::Surface`] can display it.

pub mod config;
pub mod error;
pub mod faces;
pub mod graphics;
pub mod grid;
pub mod input;
pub mod math;
pub mod render;
pub mod ripple;
pub mod scheduler;
pub mod solver;
pub mod state;
pub mod surface;
pub mod vertex;
pub mod wall;
pub mod wander;

pub use config::{Durations, WallConfig};
pub use error::{ColorParseError, ConfigError, WallError};
pub use scheduler::{Scheduler, TaskQueue};
pub use surface::{HeadlessSurface, Point, Rect, Surface};
pub use wall::{CubeWall, Job};
