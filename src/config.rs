use crate::error::ConfigError;
use crate::faces::Rgba;
use crate::solver::DurationClass;

/// Transition lengths in seconds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Durations {
    pub enter: f64,
    pub leave: f64,
}

impl Durations {
    pub fn for_class(&self, class: DurationClass) -> f64 {
        match class {
            DurationClass::Enter => self.enter,
            DurationClass::Leave => self.leave,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Durations {
            enter: 0.3,
            leave: 0.6,
        }
    }
}

/// Construction-time options of a cube wall
#[derive(Clone, Debug, PartialEq)]
pub struct WallConfig {
    /// Cells per side
    pub grid_size: usize,
    /// Tilt in degrees at the focal point
    pub max_angle: f64,
    /// Influence radius in cells
    pub radius: f64,
    pub durations: Durations,
    /// Run the idle wanderer while the pointer is inactive
    pub auto_animate: bool,
    pub ripple_on_click: bool,
    pub ripple_color: Rgba,
    /// Larger is faster
    pub ripple_speed: f64,
    pub face_color: Rgba,
    pub edge_color: Rgba,
    /// Seconds without pointer movement before the wall counts as idle
    pub idle_timeout: f64,
    /// Fraction of the remaining distance the wanderer covers per frame
    pub wander_speed: f64,
    /// Distance at which the wanderer picks a new target
    pub wander_threshold: f64,
    /// Fixed seed for the wanderer; random when `None`
    pub seed: Option<u64>,
}

impl Default for WallConfig {
    fn default() -> Self {
        WallConfig {
            grid_size: 12,
            max_angle: 35.0,
            radius: 3.0,
            durations: Durations::default(),
            auto_animate: true,
            ripple_on_click: true,
            ripple_color: Rgba::rgba(163, 255, 18, 0.3),
            ripple_speed: 1.0,
            face_color: Rgba::rgb(6, 0, 16),
            edge_color: Rgba::rgba(163, 255, 18, 0.15),
            idle_timeout: 2.0,
            wander_speed: 0.015,
            wander_threshold: 0.2,
            seed: None,
        }
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl WallConfig {
    /// Rejects values that would make the distance or timing math degenerate
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if !positive(self.radius) {
            return Err(ConfigError::Radius(self.radius));
        }
        if !self.max_angle.is_finite() {
            return Err(ConfigError::MaxAngle(self.max_angle));
        }
        if !positive(self.durations.enter) {
            return Err(ConfigError::Duration {
                class: "enter",
                value: self.durations.enter,
            });
        }
        if !positive(self.durations.leave) {
            return Err(ConfigError::Duration {
                class: "leave",
                value: self.durations.leave,
            });
        }
        if !positive(self.ripple_speed) {
            return Err(ConfigError::RippleSpeed(self.ripple_speed));
        }
        if !(self.idle_timeout.is_finite() && self.idle_timeout >= 0.0) {
            return Err(ConfigError::IdleTimeout(self.idle_timeout));
        }
        if !(positive(self.wander_speed) && self.wander_speed <= 1.0) {
            return Err(ConfigError::WanderSpeed(self.wander_speed));
        }
        if !positive(self.wander_threshold) {
            return Err(ConfigError::WanderThreshold(self.wander_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = WallConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.grid_size, 12);
        assert_eq!(config.durations.for_class(DurationClass::Enter), 0.3);
        assert_eq!(config.durations.for_class(DurationClass::Leave), 0.6);
    }

    #[test]
    fn rejects_degenerate_geometry() {
        let config = WallConfig {
            grid_size: 0,
            ..WallConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::GridSize(0)));

        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = WallConfig {
                radius,
                ..WallConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::Radius(_))));
        }
    }

    #[test]
    fn rejects_bad_timing() {
        let config = WallConfig {
            durations: Durations {
                enter: 0.3,
                leave: 0.0,
            },
            ..WallConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Duration {
                class: "leave",
                value: 0.0
            })
        );

        let config = WallConfig {
            ripple_speed: 0.0,
            ..WallConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::RippleSpeed(0.0)));

        let config = WallConfig {
            wander_speed: 1.5,
            ..WallConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WanderSpeed(1.5)));
    }
}
