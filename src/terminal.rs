use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use log::{info, warn};

use cubewall::faces::Rgba;
use cubewall::graphics::Canvas;
use cubewall::grid::Grid;
use cubewall::{Point, Rect, Surface, WallError};

/// Rows reserved above the wall for the status line
const HUD_ROWS: usize = 1;

fn to_color(c: Rgba) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Terminal display: two canvas pixels per character cell using `▀`
pub struct TerminalSurface {
    out: Stdout,
    attached: bool,
}

impl TerminalSurface {
    pub fn new() -> Self {
        TerminalSurface {
            out: io::stdout(),
            attached: false,
        }
    }

    /// Canvas dimensions in pixels for the current terminal size
    pub fn canvas_size(&self) -> Option<(usize, usize)> {
        let size = termsize::get()?;
        let cols = size.cols as usize;
        let rows = (size.rows as usize).saturating_sub(HUD_ROWS);
        Some((cols, rows * 2))
    }

    /// Canvas position of the centre of a character cell
    pub fn pixel_point(&self, column: u16, row: u16) -> Point {
        let row = (row as f64) - HUD_ROWS as f64;
        Point::new(column as f64 + 0.5, row * 2.0 + 1.0)
    }

    pub fn present(&mut self, canvas: &Canvas, status: &str) -> io::Result<()> {
        let out = &mut self.out;
        queue!(out, BeginSynchronizedUpdate, cursor::MoveTo(0, 0), ResetColor)?;

        let mut line: String = status.chars().take(canvas.width()).collect();
        let pad = canvas.width().saturating_sub(line.chars().count());
        line.extend(std::iter::repeat(' ').take(pad));
        queue!(out, Print(line))?;

        let mut current: Option<(Color, Color)> = None;
        for y in 0..canvas.height() / 2 {
            queue!(out, cursor::MoveTo(0, (y + HUD_ROWS) as u16))?;
            for x in 0..canvas.width() {
                let top = to_color(canvas.pixel(x, y * 2));
                let bottom = to_color(canvas.pixel(x, y * 2 + 1));
                if current != Some((top, bottom)) {
                    queue!(out, SetForegroundColor(top), SetBackgroundColor(bottom))?;
                    current = Some((top, bottom));
                }
                queue!(out, Print('▀'))?;
            }
        }

        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush()
    }
}

impl Surface for TerminalSurface {
    /// Largest square that fits the canvas, centred
    fn bounds(&self) -> Option<Rect> {
        let (width, height) = self.canvas_size()?;
        let side = width.min(height) as f64;
        if side <= 0.0 {
            return None;
        }
        Some(Rect::new(
            ((width as f64 - side) / 2.0).floor(),
            ((height as f64 - side) / 2.0).floor(),
            side,
            side,
        ))
    }

    fn attach(&mut self, grid: &Grid) -> Result<(), WallError> {
        if self.bounds().is_none() {
            return Err(WallError::SurfaceUnavailable);
        }
        terminal::enable_raw_mode()?;
        self.attached = true;
        execute!(
            self.out,
            EnterAlternateScreen,
            DisableLineWrap,
            cursor::Hide,
            EnableMouseCapture,
            EnableFocusChange,
            cursor::MoveTo(0, 0)
        )?;
        info!("attached {0}x{0} wall to terminal", grid.size());
        Ok(())
    }

    fn detach(&mut self) {
        if !std::mem::replace(&mut self.attached, false) {
            return;
        }
        let restored = execute!(
            self.out,
            DisableFocusChange,
            DisableMouseCapture,
            EndSynchronizedUpdate,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        if let Err(err) = restored.and_then(|_| terminal::disable_raw_mode()) {
            warn!("failed to restore terminal: {err}");
        }
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.detach();
    }
}
