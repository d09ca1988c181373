//! One simulation tick over the whole body collection
//!
//! The tick reads the previous generation only. It first evaluates every
//! unordered pair once (doubled spring impulses, accumulated gravity, merge
//! decisions), then integrates the survivors, then appends merged
//! replacements to build the next generation. The input slice is never
//! mutated.

use crate::simulation::collision::{self, CollisionOutcome};
use crate::simulation::forces::ForceModel;
use crate::simulation::integrator::{apply_impulse, step_body};
use crate::simulation::params::SimulationParameters;
use crate::simulation::states::{Body, Bounds, NVec2};

/// Spring impulse applications per pair and tick: once as (i, j), once as (j, i)
pub const SPRING_PASSES: f64 = 2.0;

/// Summary of a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    pub merges: usize,
    pub reflections: usize,
}

/// Advance `prev` by one tick and return the next generation
///
/// `held` is the index of a body the pointer moved since the last tick; it is
/// copied through without integration so it stays under the cursor.
pub fn step(prev: &[Body], params: &SimulationParameters, bounds: &Bounds, held: Option<usize>) -> (Vec<Body>, StepReport) {
    let n = prev.len();
    let mut report = StepReport::default();
    if n == 0 { // no bodies, nothing to do
        return (Vec::new(), report);
    }

    let model = ForceModel::from_params(params);

    let mut spring = vec![NVec2::zeros(); n]; // applied as an impulse before damping
    let mut gravity = vec![NVec2::zeros(); n]; // net force handed to the integrator
    let mut consumed = vec![false; n]; // retired by a merge this tick
    let mut merged: Vec<Body> = Vec::new();

    // Loop over each unordered pair (i, j) with i < j
    for i in 0..n {
        let bi = &prev[i];
        for j in (i + 1)..n {
            let bj = &prev[j];

            // Forces on i; j gets the opposite (Newton's third law).
            // The spring acts once from each body's side of the pair, gravity once.
            let f = model.pairwise(bi, bj);
            let s = SPRING_PASSES * f.spring;
            spring[i] += s;
            spring[j] -= s;
            gravity[i] += f.gravity;
            gravity[j] -= f.gravity;

            // At most one merge per body per tick
            if consumed[i] || consumed[j] {
                continue;
            }
            if let CollisionOutcome::Merged(body) = collision::resolve(bi, bj, params) {
                consumed[i] = true;
                consumed[j] = true;
                merged.push(body);
            }
        }
    }

    let mut next = Vec::with_capacity(n - merged.len());
    for (i, body) in prev.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        let mut body = body.clone();
        if held != Some(i) {
            apply_impulse(&mut body, spring[i]);
            if step_body(&mut body, gravity[i], params, bounds).any() {
                report.reflections += 1;
            }
        }
        next.push(body);
    }

    report.merges = merged.len();
    next.extend(merged);

    (next, report)
}

/// Line between two bodies, for the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub from: NVec2,
    pub to: NVec2,
    pub force: f64, // raw gravity magnitude, 0 when gravity is off
    pub opacity: f64,
}

/// One connection per unordered pair of `bodies`
pub fn connections(bodies: &[Body], params: &SimulationParameters) -> Vec<Connection> {
    let model = ForceModel::from_params(params);
    let n = bodies.len();
    let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for i in 0..n {
        for j in (i + 1)..n {
            let f = model.pairwise(&bodies[i], &bodies[j]);
            out.push(Connection {
                from: bodies[i].x,
                to: bodies[j].x,
                force: f.gravity_magnitude,
                opacity: params.line_opacity,
            });
        }
    }

    out
}
