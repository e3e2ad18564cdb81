//! Per-cell rotation tracking.
//!
//! A [`RotationState`] owns the authoritative orientation of one cube. It is
//! either idle (holding a fixed orientation) or running a single
//! [`Transition`] which the animation driver steps once per frame.

use std::ops::{Add, Mul, Sub};

/// Rotation of a cube in degrees about two perpendicular axes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    /// Rotation about the horizontal (X) axis
    pub tilt_a: f64,
    /// Rotation about the vertical (Y) axis
    pub tilt_b: f64,
}

impl Orientation {
    pub const NEUTRAL: Orientation = Orientation {
        tilt_a: 0.0,
        tilt_b: 0.0,
    };

    pub fn new(tilt_a: f64, tilt_b: f64) -> Self {
        Orientation { tilt_a, tilt_b }
    }
}

impl Add for Orientation {
    type Output = Orientation;

    fn add(self, rhs: Orientation) -> Orientation {
        Orientation::new(self.tilt_a + rhs.tilt_a, self.tilt_b + rhs.tilt_b)
    }
}

impl Sub for Orientation {
    type Output = Orientation;

    fn sub(self, rhs: Orientation) -> Orientation {
        Orientation::new(self.tilt_a - rhs.tilt_a, self.tilt_b - rhs.tilt_b)
    }
}

impl Mul<f64> for Orientation {
    type Output = Orientation;

    fn mul(self, rhs: f64) -> Orientation {
        Orientation::new(self.tilt_a * rhs, self.tilt_b * rhs)
    }
}

/// Cubic ease-out: fast start, gentle settle
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// An in-flight change of orientation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub from: Orientation,
    pub to: Orientation,
    /// Clock reading (seconds) when the transition began
    pub start: f64,
    /// Length in seconds, always positive
    pub duration: f64,
}

impl Transition {
    /// Clock reading at which the transition completes
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// `true` once `now` has reached [`end`](Self::end), give or take a few
    /// ulps of clock rounding
    pub fn is_complete(&self, now: f64) -> bool {
        let slack = 4.0 * f64::EPSILON * (self.start.abs() + self.duration);
        now >= self.end() - slack
    }

    /// Linear progress in `[0, 1]`; exactly 1 once complete
    pub fn progress(&self, now: f64) -> f64 {
        if self.is_complete(now) {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    /// Eased orientation at `now`; exactly `to` once complete
    pub fn sample(&self, now: f64) -> Orientation {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * ease_out_cubic(progress)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning,
}

/// Authoritative orientation of one cube
#[derive(Clone, Debug, Default)]
pub struct RotationState {
    current: Orientation,
    transition: Option<Transition>,
}

impl RotationState {
    /// Last orientation applied by the driver
    pub fn current(&self) -> Orientation {
        self.current
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.transition.is_some() {
            Phase::Transitioning
        } else {
            Phase::Idle
        }
    }

    /// Interpolated orientation at `now` without advancing anything
    pub fn sample(&self, now: f64) -> Orientation {
        match &self.transition {
            Some(transition) => transition.sample(now),
            None => self.current,
        }
    }

    /// Starts a new transition, discarding any running one.
    ///
    /// The new transition departs from wherever the cube is at `now`, so
    /// retargeting mid-flight never snaps.
    pub fn begin(&mut self, to: Orientation, duration: f64, now: f64) {
        let from = self.sample(now);
        self.current = from;
        self.transition = Some(Transition {
            from,
            to,
            start: now,
            duration,
        });
    }

    /// Advances to `now`. Returns `true` while the transition is still running.
    pub fn step(&mut self, now: f64) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };
        self.current = transition.sample(now);
        if transition.is_complete(now) {
            self.transition = None;
            return false;
        }
        true
    }
}
