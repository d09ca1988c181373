//! Pairwise force model for the planet simulation
//!
//! Each interaction term implements [`PairInteraction`] and returns a signed
//! magnitude along the line from body `a` to body `b`. [`ForceModel`] bundles
//! the two terms the simulation uses (gravity and spring cohesion) and turns
//! their magnitudes into force vectors.

use crate::simulation::params::SimulationParameters;
use crate::simulation::states::{Body, NVec2};

/// Trait for pairwise force laws
/// Positive magnitude pulls `a` towards `b`, negative pushes it away
pub trait PairInteraction {
    fn magnitude(&self, a: &Body, b: &Body, distance: f64) -> f64;
}

/// Newtonian gravity without softening
/// Contributes nothing when disabled or when the bodies coincide
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64, // gravitational constant
    pub enabled: bool,
}

impl PairInteraction for NewtonianGravity {
    fn magnitude(&self, a: &Body, b: &Body, distance: f64) -> f64 {
        if !self.enabled || distance <= 0.0 {
            return 0.0;
        }
        self.G * a.m * b.m / (distance * distance)
    }
}

/// Hooke spring between every pair, always active
/// Attracts beyond `rest_length`, repels inside it
pub struct Spring {
    pub k: f64, // spring constant
    pub rest_length: f64,
}

impl PairInteraction for Spring {
    fn magnitude(&self, _a: &Body, _b: &Body, distance: f64) -> f64 {
        self.k * (distance - self.rest_length)
    }
}

/// Forces acting on `a` due to `b`; `b` feels the negation of each
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairForces {
    pub gravity: NVec2,
    pub spring: NVec2,
    pub gravity_magnitude: f64, // raw magnitude, consumed by the renderer
    pub distance: f64,
}

pub struct ForceModel {
    pub gravity: NewtonianGravity,
    pub spring: Spring,
}

impl ForceModel {
    pub fn from_params(params: &SimulationParameters) -> Self {
        Self {
            gravity: NewtonianGravity {
                G: params.G,
                enabled: params.gravity,
            },
            spring: Spring {
                k: params.spring_constant,
                rest_length: params.rest_length,
            },
        }
    }

    /// Evaluate both terms for the pair `(a, b)`
    pub fn pairwise(&self, a: &Body, b: &Body) -> PairForces {
        // r points from a to b
        let r = b.x - a.x;
        let distance = r.norm();
        let direction = line_direction(r, distance);

        let gravity_magnitude = self.gravity.magnitude(a, b, distance);
        let spring_magnitude = self.spring.magnitude(a, b, distance);

        PairForces {
            gravity: direction * gravity_magnitude,
            spring: direction * spring_magnitude,
            gravity_magnitude,
            distance,
        }
    }
}

/// Shorthand for a single evaluation with freshly built terms
pub fn pairwise_forces(a: &Body, b: &Body, params: &SimulationParameters) -> PairForces {
    ForceModel::from_params(params).pairwise(a, b)
}

// Unit vector along r. Coincident bodies have no defined direction, so the
// angle is taken as 0 (atan2(0, 0)), i.e. +x.
fn line_direction(r: NVec2, distance: f64) -> NVec2 {
    if distance > 0.0 {
        r / distance
    } else {
        NVec2::new(1.0, 0.0)
    }
}
