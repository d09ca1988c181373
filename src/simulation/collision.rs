//! Collision detection and merge resolution
//!
//! Overlapping bodies are either left alone (collide without merging: no
//! separating impulse is applied, bodies may interpenetrate) or replaced by a
//! single body conserving mass and momentum.

use crate::simulation::params::SimulationParameters;
use crate::simulation::states::Body;

#[derive(Debug, Clone, PartialEq)]
pub enum CollisionOutcome {
    None,
    Merged(Body),
}

/// True when the discs of `a` and `b` overlap
pub fn overlapping(a: &Body, b: &Body) -> bool {
    (b.x - a.x).norm() < a.radius + b.radius
}

/// Decide what happens to the pair `(a, b)` this tick
pub fn resolve(a: &Body, b: &Body, params: &SimulationParameters) -> CollisionOutcome {
    if !params.collide || !params.merging || !overlapping(a, b) {
        return CollisionOutcome::None;
    }
    CollisionOutcome::Merged(merge_bodies(a, b, params.body_radius))
}

/// Merge two bodies into one
///
/// - mass: `m_a + m_b`
/// - position and velocity: mass-weighted averages (momentum conserved)
/// - radius: the shared `radius`, not derived from the inputs
/// - colour: inherited from `a`
///
/// The merged mass is kept as the sum even though it no longer matches
/// `pi * radius^3`; the next radius change recomputes it like every other body.
pub fn merge_bodies(a: &Body, b: &Body, radius: f64) -> Body {
    let m = a.m + b.m;
    let x = (a.x * a.m + b.x * b.m) / m;
    let v = (a.momentum() + b.momentum()) / m;

    Body {
        x,
        v,
        radius,
        m,
        color: a.color,
        selected: false,
        hovered: false,
    }
}
