//! Fixed-step integrator for a single body
//!
//! Explicit Euler with per-tick damping and elastic boundary reflection,
//! driven by `SimulationParameters`. One call advances one body by one tick.

use super::params::SimulationParameters;
use super::states::{Body, Bounds, NVec2};

/// Which velocity components were flipped by the boundary check
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reflection {
    pub x: bool,
    pub y: bool,
}

impl Reflection {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Instant velocity change from a force: v += F / m
pub fn apply_impulse(body: &mut Body, force: NVec2) {
    body.v += force / body.m;
}

/// Advance one body by one tick with net force `force`
///
/// Order matters for reproducibility:
/// 1. damping: v *= (1 - damping)
/// 2. impulse: v += F / m
/// 3. drift: x += v * speed_factor
/// 4. reflection: flip the velocity component whose edge left the area
///
/// Position is not clamped, so a body may sit outside the area for a tick
/// after reflecting.
pub fn step_body(body: &mut Body, force: NVec2, params: &SimulationParameters, bounds: &Bounds) -> Reflection {
    body.v *= 1.0 - params.damping;

    apply_impulse(body, force);

    body.x += body.v * params.speed_factor;

    reflect(body, bounds)
}

fn reflect(body: &mut Body, bounds: &Bounds) -> Reflection {
    let r = body.radius;
    let mut reflection = Reflection::default();

    if body.x.x - r < 0.0 || body.x.x + r > bounds.width {
        body.v.x = -body.v.x;
        reflection.x = true;
    }
    if body.x.y - r < 0.0 || body.x.y + r > bounds.height {
        body.v.y = -body.v.y;
        reflection.y = true;
    }

    reflection
}
