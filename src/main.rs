mod terminal;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use log::{info, LevelFilter};

use cubewall::faces::Rgba;
use cubewall::graphics::Canvas;
use cubewall::input::{PointerAction, PointerTracker};
use cubewall::render::{render_wall, RenderOptions};
use cubewall::{CubeWall, Durations, Scheduler, Surface, TaskQueue, WallConfig};
use terminal::TerminalSurface;

/// A console-based 3D cube wall that tilts toward the pointer
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Cubes per side
    #[arg(long, default_value_t = 12)]
    grid_size: usize,

    /// Tilt in degrees at the focal point
    #[arg(long, default_value_t = 35.0)]
    max_angle: f64,

    /// Influence radius in cells
    #[arg(long, default_value_t = 3.0)]
    radius: f64,

    /// Seconds for cubes entering the radius
    #[arg(long, default_value_t = 0.3)]
    enter: f64,

    /// Seconds for cubes settling back to neutral
    #[arg(long, default_value_t = 0.6)]
    leave: f64,

    /// Keep still while the pointer is idle
    #[arg(long)]
    no_auto_animate: bool,

    /// Disable click ripples
    #[arg(long)]
    no_ripple: bool,

    /// Ripple highlight, e.g. "#a3ff12" or "rgba(163, 255, 18, 0.4)"
    #[arg(long, default_value = "rgba(163, 255, 18, 0.3)")]
    ripple_color: Rgba,

    /// Ripple speed multiplier
    #[arg(long, default_value_t = 1.0)]
    ripple_speed: f64,

    /// Base face colour
    #[arg(long, default_value = "#060010")]
    face_color: Rgba,

    /// Face border colour
    #[arg(long, default_value = "rgba(163, 255, 18, 0.15)")]
    edge_color: Rgba,

    /// Seconds without pointer movement before the wall wanders on its own
    #[arg(long, default_value_t = 2.0)]
    idle_timeout: f64,

    /// Seed for the idle wanderer
    #[arg(long)]
    seed: Option<u64>,

    /// Target frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start with the debug status line
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn wall_config(&self) -> WallConfig {
        WallConfig {
            grid_size: self.grid_size,
            max_angle: self.max_angle,
            radius: self.radius,
            durations: Durations {
                enter: self.enter,
                leave: self.leave,
            },
            auto_animate: !self.no_auto_animate,
            ripple_on_click: !self.no_ripple,
            ripple_color: self.ripple_color,
            ripple_speed: self.ripple_speed,
            face_color: self.face_color,
            edge_color: self.edge_color,
            idle_timeout: self.idle_timeout,
            seed: self.seed,
            ..WallConfig::default()
        }
    }
}

/// Host-side view state, toggled from the keyboard
struct ViewState {
    debug: bool,
    wireframe: bool,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl ViewState {
    fn count_frame(&mut self) {
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }
}

type TerminalWall = CubeWall<TaskQueue<cubewall::Job>, TerminalSurface>;

fn status_line(wall: &TerminalWall, view: &ViewState) -> String {
    if wall.scheduler().is_paused() {
        return "Paused  [p] resume  [q] quit".to_string();
    }
    if !view.debug {
        return "[d] debug  [p] pause  [r] reset  [w] wireframe  [q] quit".to_string();
    }
    let stats = wall.stats();
    format!(
        "{} {} | FPS: {:.1} | {} | frames: {} | solves: pointer {} wander {} | resets: {} | ripples: {} | pending: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        view.fps,
        if wall.is_active() { "active" } else { "idle" },
        stats.frames,
        stats.pointer_solves,
        stats.wander_solves,
        stats.resets,
        stats.ripples,
        wall.scheduler().outstanding(),
    )
}

/// Handles pending terminal events. Returns `false` when the user quits.
fn handle_events(
    wall: &mut TerminalWall,
    view: &mut ViewState,
    tracker: &mut PointerTracker,
) -> Result<bool, Box<dyn Error>> {
    while event::poll(Duration::ZERO)? {
        let paused = wall.scheduler().is_paused();
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(false),
                KeyCode::Char('d') | KeyCode::Char('D') => view.debug = !view.debug,
                KeyCode::Char('p') | KeyCode::Char('P') if paused => wall.scheduler_mut().resume(),
                KeyCode::Char('p') | KeyCode::Char('P') => wall.scheduler_mut().pause(),
                KeyCode::Char('w') | KeyCode::Char('W') => view.wireframe = !view.wireframe,
                KeyCode::Char('r') | KeyCode::Char('R') if !paused => wall.on_pointer_leave(),
                _ => {}
            },
            Event::Mouse(mouse) if !paused => {
                let Some(bounds) = wall.surface().bounds() else {
                    continue;
                };
                let point = wall.surface().pixel_point(mouse.column, mouse.row);
                match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        match tracker.track(point, bounds) {
                            PointerAction::Move(point) => wall.on_pointer_move(point, bounds),
                            PointerAction::Leave => wall.on_pointer_leave(),
                            PointerAction::Ignore => {}
                        }
                    }
                    MouseEventKind::Down(MouseButton::Left) if bounds.contains(point) => {
                        wall.on_click(point, bounds);
                    }
                    _ => {}
                }
            }
            Event::FocusLost => {
                if tracker.leave() == PointerAction::Leave {
                    wall.on_pointer_leave();
                }
            }
            _ => {}
        }
    }
    Ok(true)
}

fn run(wall: &mut TerminalWall, fps: u32, debug: bool) -> Result<(), Box<dyn Error>> {
    let frame_time = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    let mut view = ViewState {
        debug,
        wireframe: false,
        frames_since_last_update: 0,
        last_fps_calculation: Instant::now(),
        fps: 0.0,
    };
    let mut tracker = PointerTracker::default();
    let mut canvas = Canvas::new(0, 0, Rgba::rgb(0, 0, 0));

    loop {
        let frame_start = Instant::now();
        if !handle_events(wall, &mut view, &mut tracker)? {
            return Ok(());
        }
        // the clock is frozen while paused, so rendering holds the last frame
        if !wall.scheduler().is_paused() {
            wall.advance();
        }

        let options = RenderOptions {
            edge_color: wall.config().edge_color,
            wireframe: view.wireframe,
            ..RenderOptions::default()
        };
        if let (Some((width, height)), Some(scene)) =
            (wall.surface().canvas_size(), wall.surface().bounds())
        {
            canvas.reset(width, height, options.background);
            render_wall(wall.cubes(), wall.grid().size(), scene, wall.now(), &options, &mut canvas);
            let status = status_line(wall, &view);
            wall.surface_mut().present(&canvas, &status)?;
        }
        view.count_frame();

        if let Some(rest) = frame_time.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let log_file = File::create(path)?;
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .parse_default_env()
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .init();
    }

    let config = args.wall_config();
    info!("starting with {config:?}");
    let mut wall = CubeWall::mount(config, TaskQueue::monotonic(), TerminalSurface::new())?;
    let result = run(&mut wall, args.fps, args.debug);
    wall.teardown();
    result
}
