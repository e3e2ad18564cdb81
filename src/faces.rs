//! Cube face colours and the fades that animate them.

use std::fmt;
use std::str::FromStr;

use crate::error::ColorParseError;
use crate::state::ease_out_cubic;

/// 8-bit RGB colour with a fractional alpha
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    /// Component-wise interpolation, `t` in `[0, 1]`
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Composites `self` over an opaque `backdrop`
    pub fn over(self, backdrop: Rgba) -> Rgba {
        let opaque = Rgba { a: 1.0, ..self };
        Rgba {
            a: 1.0,
            ..backdrop.lerp(opaque, self.a.clamp(0.0, 1.0))
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

fn parse_channel(s: &str) -> Result<u8, ColorParseError> {
    s.trim()
        .parse::<u8>()
        .map_err(|_| ColorParseError::Component(s.trim().to_string()))
}

fn parse_alpha(s: &str) -> Result<f64, ColorParseError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|a| (0.0..=1.0).contains(a))
        .ok_or_else(|| ColorParseError::Component(s.trim().to_string()))
}

fn parse_hex_pair(s: &str) -> Result<u8, ColorParseError> {
    u8::from_str_radix(s, 16).map_err(|_| ColorParseError::Component(s.to_string()))
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    /// Accepts `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
                return Err(ColorParseError::Syntax(s.to_string()));
            }
            let r = parse_hex_pair(&hex[0..2])?;
            let g = parse_hex_pair(&hex[2..4])?;
            let b = parse_hex_pair(&hex[4..6])?;
            let a = match hex.get(6..8) {
                Some(pair) => parse_hex_pair(pair)? as f64 / 255.0,
                None => 1.0,
            };
            return Ok(Rgba { r, g, b, a });
        }

        let (body, expected) = if let Some(body) = s.strip_prefix("rgba(") {
            (body, 4)
        } else if let Some(body) = s.strip_prefix("rgb(") {
            (body, 3)
        } else {
            return Err(ColorParseError::Syntax(s.to_string()));
        };
        let body = body
            .strip_suffix(')')
            .ok_or_else(|| ColorParseError::Syntax(s.to_string()))?;
        let parts: Vec<&str> = body.split(',').collect();
        if parts.len() != expected {
            return Err(ColorParseError::Arity {
                expected,
                found: parts.len(),
            });
        }
        let a = if expected == 4 { parse_alpha(parts[3])? } else { 1.0 };
        Ok(Rgba {
            r: parse_channel(parts[0])?,
            g: parse_channel(parts[1])?,
            b: parse_channel(parts[2])?,
            a,
        })
    }
}

/// The six faces of a cube, in drawing order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
        Face::Top,
        Face::Bottom,
    ];
}

/// Colour of one face, optionally fading between two colours
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceFade {
    from: Rgba,
    to: Rgba,
    start: f64,
    duration: f64,
}

impl FaceFade {
    pub fn solid(color: Rgba) -> Self {
        FaceFade {
            from: color,
            to: color,
            start: 0.0,
            duration: 0.0,
        }
    }

    pub fn color_at(&self, now: f64) -> Rgba {
        if self.duration <= 0.0 {
            return self.to;
        }
        let progress = ((now - self.start) / self.duration).clamp(0.0, 1.0);
        if progress >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, ease_out_cubic(progress))
    }

    /// Target colour the face is heading to
    pub fn target(&self) -> Rgba {
        self.to
    }

    /// Fades from the colour shown at `now` toward `to`
    pub fn fade_to(&mut self, to: Rgba, duration: f64, now: f64) {
        *self = FaceFade {
            from: self.color_at(now),
            to,
            start: now,
            duration,
        };
    }
}

/// Appearance of every face of one cube
#[derive(Clone, Debug, PartialEq)]
pub struct CubeFaces {
    faces: [FaceFade; 6],
}

impl CubeFaces {
    pub fn new(base: Rgba) -> Self {
        CubeFaces {
            faces: [FaceFade::solid(base); 6],
        }
    }

    pub fn face(&self, face: Face) -> &FaceFade {
        &self.faces[face as usize]
    }

    /// Fades every face toward `color`
    pub fn fade_all(&mut self, color: Rgba, duration: f64, now: f64) {
        for fade in self.faces.iter_mut() {
            fade.fade_to(color, duration, now);
        }
    }

    pub fn colors_at(&self, now: f64) -> [Rgba; 6] {
        self.faces.map(|fade| fade.color_at(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parses_supported_syntaxes() {
        assert_eq!("#060010".parse::<Rgba>().unwrap(), Rgba::rgb(6, 0, 16));
        assert_eq!(
            "rgba(163, 255, 18, 0.3)".parse::<Rgba>().unwrap(),
            Rgba::rgba(163, 255, 18, 0.3)
        );
        assert_eq!("rgb(1,2,3)".parse::<Rgba>().unwrap(), Rgba::rgb(1, 2, 3));
        let with_alpha = "#ff000080".parse::<Rgba>().unwrap();
        assert_eq!((with_alpha.r, with_alpha.g, with_alpha.b), (255, 0, 0));
        assert_abs_diff_eq!(with_alpha.a, 128.0 / 255.0);
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(matches!("red".parse::<Rgba>(), Err(ColorParseError::Syntax(_))));
        assert!(matches!("#12345".parse::<Rgba>(), Err(ColorParseError::Syntax(_))));
        assert!(matches!(
            "rgba(1, 2, 3)".parse::<Rgba>(),
            Err(ColorParseError::Arity { expected: 4, found: 3 })
        ));
        assert!(matches!(
            "rgb(1, 2, 300)".parse::<Rgba>(),
            Err(ColorParseError::Component(_))
        ));
        assert!(matches!(
            "rgba(1, 2, 3, 1.5)".parse::<Rgba>(),
            Err(ColorParseError::Component(_))
        ));
    }

    #[test]
    fn over_respects_alpha() {
        let black = Rgba::rgb(0, 0, 0);
        let half_white = Rgba::rgba(255, 255, 255, 0.5);
        let mixed = half_white.over(black);
        assert_eq!((mixed.r, mixed.g, mixed.b), (128, 128, 128));
        assert_abs_diff_eq!(mixed.a, 1.0);
    }

    #[test]
    fn fade_reaches_target_and_retargets_smoothly() {
        let base = Rgba::rgb(0, 0, 0);
        let glow = Rgba::rgb(200, 100, 0);
        let mut faces = CubeFaces::new(base);
        faces.fade_all(glow, 0.25, 1.0);

        assert_eq!(faces.face(Face::Top).color_at(1.0), base);
        assert_eq!(faces.face(Face::Top).color_at(1.25), glow);

        let midway = faces.face(Face::Left).color_at(1.1);
        faces.fade_all(base, 0.25, 1.1);
        assert_eq!(faces.face(Face::Left).color_at(1.1), midway);
        assert_eq!(faces.face(Face::Left).target(), base);
        assert!(faces.colors_at(2.0).iter().all(|c| *c == base));
    }
}
