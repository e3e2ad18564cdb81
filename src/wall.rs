//! The mounted cube wall.
//!
//! [`CubeWall`] owns every piece of animation state for one surface: the
//! grid, per-cube rotation and face state, the idle flag and the handles of
//! everything it has scheduled. Several walls may coexist; nothing here is
//! process-wide.
//!
//! Work is split into three frame streams (coalesced pointer solves, the idle
//! wanderer loop and the shared animation driver) and two kinds of timers
//! (the idle timeout and ripple pulses). Every queued job is stamped with the
//! wall's generation; jobs from an older generation or arriving after
//! teardown are dropped before they touch any state.

use std::collections::HashSet;

use log::{debug, trace};

use crate::config::WallConfig;
use crate::error::WallError;
use crate::faces::CubeFaces;
use crate::grid::{Cell, Grid};
use crate::input::to_focal;
use crate::ripple::{hit_cell, rings, RippleTiming};
use crate::scheduler::{FrameHandle, Scheduler, TimerHandle};
use crate::solver::{compute_targets, neutral_targets, FocalPoint, Target};
use crate::state::{Orientation, RotationState};
use crate::surface::{Point, Rect, Surface};
use crate::wander::Wanderer;

/// Work a wall queues on its scheduler
#[derive(Clone, Debug, PartialEq)]
pub enum Task {
    /// Retarget every cube toward a pointer position
    PointerSolve(FocalPoint),
    /// Step the idle wanderer and, when idle, retarget toward it
    Wander,
    /// Advance every running transition
    Drive,
    /// Pointer has been still long enough
    IdleTimeout,
    /// Fade a ripple ring to the highlight colour
    RipplePulse(Vec<usize>),
    /// Fade a ripple ring back to the base colour
    RippleRevert(Vec<usize>),
}

/// A [`Task`] tagged with the generation of the wall that queued it
#[derive(Clone, Debug, PartialEq)]
pub struct Job {
    generation: u64,
    task: Task,
}

/// One cube of the wall
#[derive(Clone, Debug)]
pub struct Cube {
    cell: Cell,
    rotation: RotationState,
    faces: CubeFaces,
}

impl Cube {
    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn orientation(&self) -> Orientation {
        self.rotation.current()
    }

    pub fn faces(&self) -> &CubeFaces {
        &self.faces
    }
}

/// Counters for the debug overlay and tests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WallStats {
    pub pointer_solves: u64,
    pub wander_solves: u64,
    pub resets: u64,
    pub ripples: u64,
    pub frames: u64,
    pub stale_jobs: u64,
}

pub struct CubeWall<S: Scheduler<Job>, V: Surface> {
    config: WallConfig,
    grid: Grid,
    cubes: Vec<Cube>,
    scheduler: S,
    surface: V,
    wanderer: Option<Wanderer>,
    ripple_timing: RippleTiming,
    active: bool,
    live: bool,
    generation: u64,
    pointer_frame: Option<FrameHandle>,
    wander_frame: Option<FrameHandle>,
    drive_frame: Option<FrameHandle>,
    idle_timer: Option<TimerHandle>,
    ripple_timers: HashSet<TimerHandle>,
    stats: WallStats,
}

impl<S: Scheduler<Job>, V: Surface> CubeWall<S, V> {
    /// Validates `config`, builds the grid and attaches it to `surface`.
    ///
    /// Fails without scheduling anything if the configuration is degenerate
    /// or the surface has no usable bounds.
    pub fn mount(config: WallConfig, scheduler: S, mut surface: V) -> Result<Self, WallError> {
        config.validate()?;
        match surface.bounds() {
            Some(rect) if rect.has_area() => {}
            _ => return Err(WallError::SurfaceUnavailable),
        }

        let grid = Grid::build(config.grid_size);
        surface.attach(&grid)?;

        let cubes = grid
            .cells()
            .iter()
            .map(|&cell| Cube {
                cell,
                rotation: RotationState::default(),
                faces: CubeFaces::new(config.face_color),
            })
            .collect();

        let wanderer = config.auto_animate.then(|| {
            Wanderer::new(
                config.grid_size as f64,
                config.wander_speed,
                config.wander_threshold,
                config.seed,
            )
        });

        let mut wall = CubeWall {
            ripple_timing: RippleTiming::for_speed(config.ripple_speed),
            config,
            grid,
            cubes,
            scheduler,
            surface,
            wanderer,
            active: false,
            live: true,
            generation: 1,
            pointer_frame: None,
            wander_frame: None,
            drive_frame: None,
            idle_timer: None,
            ripple_timers: HashSet::new(),
            stats: WallStats::default(),
        };
        if wall.wanderer.is_some() {
            wall.wander_frame = Some(wall.request_frame(Task::Wander));
        }

        debug!(
            "mounted {0}x{0} cube wall (radius {1}, max angle {2}, auto animate {3})",
            wall.config.grid_size, wall.config.radius, wall.config.max_angle, wall.config.auto_animate
        );
        Ok(wall)
    }

    pub fn config(&self) -> &WallConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    pub fn cube(&self, row: usize, col: usize) -> Option<&Cube> {
        self.grid.index_of(row, col).map(|i| &self.cubes[i])
    }

    /// `true` while the pointer has moved within the idle timeout
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `false` once torn down
    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn stats(&self) -> WallStats {
        self.stats
    }

    pub fn wanderer(&self) -> Option<&Wanderer> {
        self.wanderer.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut V {
        &mut self.surface
    }

    /// Current clock reading of the wall's scheduler
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Pointer moved to `point` on a surface currently bounded by `bounds`.
    ///
    /// Marks the wall active, restarts the idle timeout and replaces any solve
    /// still waiting for the next frame, so bursts of moves cost one solve.
    pub fn on_pointer_move(&mut self, point: Point, bounds: Rect) {
        if !self.live {
            return;
        }
        let Some(focal) = to_focal(point, bounds, self.grid.size()) else {
            return;
        };

        self.active = true;
        if let Some(timer) = self.idle_timer.take() {
            self.scheduler.clear_timeout(timer);
        }
        self.idle_timer = Some(self.set_timeout(self.config.idle_timeout, Task::IdleTimeout));

        if let Some(frame) = self.pointer_frame.take() {
            self.scheduler.cancel_frame(frame);
        }
        self.pointer_frame = Some(self.request_frame(Task::PointerSolve(focal)));
    }

    /// Pointer left the surface: every cube settles back to neutral
    pub fn on_pointer_leave(&mut self) {
        if !self.live {
            return;
        }
        if let Some(frame) = self.pointer_frame.take() {
            self.scheduler.cancel_frame(frame);
        }
        let now = self.scheduler.now();
        let targets = neutral_targets(&self.grid);
        self.apply_targets(&targets, now);
        self.stats.resets += 1;
    }

    /// Click at `point`: starts a ripple of colour pulses around the hit cell
    pub fn on_click(&mut self, point: Point, bounds: Rect) {
        if !self.live || !self.config.ripple_on_click || !bounds.contains(point) {
            return;
        }
        let (row, col) = hit_cell(point, bounds, self.grid.size());
        let rings = rings(&self.grid, row, col);
        debug!("ripple from cell ({row}, {col}) across {} rings", rings.len());

        for (ring, cells) in rings {
            let delay = self.ripple_timing.ring_delay(ring);
            let timer = self.set_timeout(delay, Task::RipplePulse(cells));
            self.ripple_timers.insert(timer);
        }
        self.stats.ripples += 1;
    }

    /// Runs due timers, then one frame of callbacks
    pub fn advance(&mut self) {
        if !self.live {
            return;
        }
        let now = self.scheduler.now();

        for (handle, job) in self.scheduler.take_due_timers() {
            if self.accept(&job) {
                self.run_timer(handle, job.task, now);
            }
        }

        let frame = self.scheduler.take_frame();
        if !frame.is_empty() {
            self.stats.frames += 1;
        }
        for (handle, job) in frame {
            if self.accept(&job) {
                self.run_frame(handle, job.task, now);
            }
        }
    }

    /// Cancels everything this wall scheduled and detaches from the surface.
    /// Calling it again is a no-op.
    pub fn teardown(&mut self) {
        if !self.live {
            return;
        }
        self.live = false;
        self.generation += 1;

        for frame in [
            self.pointer_frame.take(),
            self.wander_frame.take(),
            self.drive_frame.take(),
        ]
        .into_iter()
        .flatten()
        {
            self.scheduler.cancel_frame(frame);
        }
        if let Some(timer) = self.idle_timer.take() {
            self.scheduler.clear_timeout(timer);
        }
        for timer in self.ripple_timers.drain() {
            self.scheduler.clear_timeout(timer);
        }
        self.surface.detach();
        debug!("cube wall torn down, {} jobs still outstanding", self.scheduler.outstanding());
    }

    fn request_frame(&mut self, task: Task) -> FrameHandle {
        self.scheduler.request_frame(Job {
            generation: self.generation,
            task,
        })
    }

    fn set_timeout(&mut self, delay: f64, task: Task) -> TimerHandle {
        self.scheduler.set_timeout(
            delay,
            Job {
                generation: self.generation,
                task,
            },
        )
    }

    fn accept(&mut self, job: &Job) -> bool {
        if self.live && job.generation == self.generation {
            return true;
        }
        trace!("dropping stale {:?} from generation {}", job.task, job.generation);
        self.stats.stale_jobs += 1;
        false
    }

    fn run_frame(&mut self, handle: FrameHandle, task: Task, now: f64) {
        match task {
            Task::PointerSolve(focal) => {
                if self.pointer_frame == Some(handle) {
                    self.pointer_frame = None;
                }
                trace!("pointer solve at ({:.2}, {:.2})", focal.row, focal.col);
                self.solve(focal, now);
                self.stats.pointer_solves += 1;
            }
            Task::Wander => {
                if self.wander_frame == Some(handle) {
                    self.wander_frame = None;
                }
                if !self.active {
                    if let Some(focal) = self.wanderer.as_mut().map(Wanderer::step) {
                        self.solve(focal, now);
                        self.stats.wander_solves += 1;
                    }
                }
                if self.wander_frame.is_none() {
                    self.wander_frame = Some(self.request_frame(Task::Wander));
                }
            }
            Task::Drive => {
                if self.drive_frame == Some(handle) {
                    self.drive_frame = None;
                }
                let mut running = false;
                for cube in self.cubes.iter_mut() {
                    running |= cube.rotation.step(now);
                }
                if running {
                    self.ensure_driver();
                }
            }
            other => debug!("{other:?} is not a frame task"),
        }
    }

    fn run_timer(&mut self, handle: TimerHandle, task: Task, now: f64) {
        match task {
            Task::IdleTimeout => {
                if self.idle_timer == Some(handle) {
                    self.idle_timer = None;
                    self.active = false;
                }
            }
            Task::RipplePulse(cells) => {
                self.ripple_timers.remove(&handle);
                let color = self.config.ripple_color;
                let pulse = self.ripple_timing.pulse;
                for &i in &cells {
                    self.cubes[i].faces.fade_all(color, pulse, now);
                }
                let revert = self.ripple_timing.revert_after();
                let timer = self.set_timeout(revert, Task::RippleRevert(cells));
                self.ripple_timers.insert(timer);
            }
            Task::RippleRevert(cells) => {
                self.ripple_timers.remove(&handle);
                let color = self.config.face_color;
                let pulse = self.ripple_timing.pulse;
                for &i in &cells {
                    self.cubes[i].faces.fade_all(color, pulse, now);
                }
            }
            other => debug!("{other:?} is not a timer task"),
        }
    }

    fn solve(&mut self, focal: FocalPoint, now: f64) {
        let targets = compute_targets(&self.grid, focal, self.config.radius, self.config.max_angle);
        self.apply_targets(&targets, now);
    }

    fn apply_targets(&mut self, targets: &[Target], now: f64) {
        let durations = self.config.durations;
        for (cube, target) in self.cubes.iter_mut().zip(targets) {
            cube.rotation
                .begin(target.orientation, durations.for_class(target.class), now);
        }
        self.ensure_driver();
    }

    fn ensure_driver(&mut self) {
        if self.drive_frame.is_none() {
            self.drive_frame = Some(self.request_frame(Task::Drive));
        }
    }
}

impl<S: Scheduler<Job>, V: Surface> Drop for CubeWall<S, V> {
    fn drop(&mut self) {
        self.teardown();
    }
}
