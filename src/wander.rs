use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::solver::FocalPoint;

/// Simulated focal point that drifts between random targets
#[derive(Debug)]
pub struct Wanderer {
    position: FocalPoint,
    target: FocalPoint,
    extent: f64,
    speed: f64,
    threshold: f64,
    rng: StdRng,
}

impl Wanderer {
    /// Position and target start at random points in `[0, extent)`.
    pub fn new(extent: f64, speed: f64, threshold: f64, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let position = random_point(&mut rng, extent);
        let target = random_point(&mut rng, extent);
        Wanderer {
            position,
            target,
            extent,
            speed,
            threshold,
            rng,
        }
    }

    pub fn position(&self) -> FocalPoint {
        self.position
    }

    pub fn target(&self) -> FocalPoint {
        self.target
    }

    /// Moves a fixed fraction of the remaining distance and returns the new
    /// position. A fresh target is drawn once the old one is close enough.
    pub fn step(&mut self) -> FocalPoint {
        self.position.row += (self.target.row - self.position.row) * self.speed;
        self.position.col += (self.target.col - self.position.col) * self.speed;

        let remaining =
            (self.position.row - self.target.row).hypot(self.position.col - self.target.col);
        if remaining < self.threshold {
            self.target = random_point(&mut self.rng, self.extent);
        }
        self.position
    }
}

fn random_point(rng: &mut StdRng, extent: f64) -> FocalPoint {
    FocalPoint::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: FocalPoint, b: FocalPoint) -> f64 {
        (a.row - b.row).hypot(a.col - b.col)
    }

    #[test]
    fn starts_inside_bounds() {
        for seed in 0..32 {
            let w = Wanderer::new(12.0, 0.015, 0.2, Some(seed));
            for p in [w.position(), w.target()] {
                assert!((0.0..12.0).contains(&p.row));
                assert!((0.0..12.0).contains(&p.col));
            }
        }
    }

    #[test]
    fn approaches_target() {
        let mut w = Wanderer::new(12.0, 0.015, 0.2, Some(7));
        let target = w.target();
        let before = distance(w.position(), target);
        let pos = w.step();
        if w.target() == target {
            let after = distance(pos, target);
            assert!(after < before);
            assert!((after - before * 0.985).abs() < 1e-9);
        }
    }

    #[test]
    fn picks_new_target_when_close() {
        let mut w = Wanderer::new(12.0, 0.5, 0.2, Some(3));
        let first = w.target();
        let mut retargeted = false;
        for _ in 0..200 {
            w.step();
            if w.target() != first {
                retargeted = true;
                break;
            }
        }
        assert!(retargeted);
    }

    #[test]
    fn seeded_runs_repeat() {
        let mut a = Wanderer::new(12.0, 0.015, 0.2, Some(42));
        let mut b = Wanderer::new(12.0, 0.015, 0.2, Some(42));
        for _ in 0..50 {
            assert_eq!(a.step(), b.step());
        }
    }
}
