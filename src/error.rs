use thiserror::Error;

/// Rejected construction-time configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid size must be positive, got {0}")]
    GridSize(usize),
    #[error("radius must be a positive finite number, got {0}")]
    Radius(f64),
    #[error("max angle must be finite, got {0}")]
    MaxAngle(f64),
    #[error("{class} duration must be a positive finite number of seconds, got {value}")]
    Duration { class: &'static str, value: f64 },
    #[error("ripple speed must be a positive finite multiplier, got {0}")]
    RippleSpeed(f64),
    #[error("idle timeout must be a non-negative number of seconds, got {0}")]
    IdleTimeout(f64),
    #[error("wander speed must lie in (0, 1], got {0}")]
    WanderSpeed(f64),
    #[error("wander threshold must be positive, got {0}")]
    WanderThreshold(f64),
}

/// A colour string that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("unrecognised colour syntax: {0:?}")]
    Syntax(String),
    #[error("colour component {0:?} is not a valid number")]
    Component(String),
    #[error("expected {expected} colour components, found {found}")]
    Arity { expected: usize, found: usize },
}

/// Errors raised while mounting or hosting a cube wall.
#[derive(Error, Debug)]
pub enum WallError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("display surface is unavailable or has zero area")]
    SurfaceUnavailable,
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
