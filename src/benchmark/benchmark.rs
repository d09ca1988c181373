use std::time::Instant;

use crate::simulation::engine::step;
use crate::simulation::params::SimulationParameters;
use crate::simulation::states::{Body, BodyColor, Bounds, NVec2, HUE_STEP};

/// Helper to build a deterministic layout of `n` bodies inside `bounds`
fn make_bodies(n: usize, bounds: &Bounds, radius: f64) -> Vec<Body> {
    let mut bodies = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec2::new(
            (0.5 + 0.45 * (i_f * 0.37).sin()) * bounds.width,
            (0.5 + 0.45 * (i_f * 0.13).cos()) * bounds.height,
        );
        let v = NVec2::new((i_f * 0.07).sin(), (i_f * 0.11).cos());

        bodies.push(Body::new(x, v, radius, BodyColor::from_hue(i_f * HUE_STEP)));
    }

    bodies
}

/// Time `engine::step` for a range of body counts
/// Merging is on so the numbers include collision resolution
pub fn bench_step() {
    let ns = [50, 100, 200, 400, 800];
    let steps = 20; // ticks per measurement

    let bounds = Bounds::default();
    let params = SimulationParameters {
        merging: true,
        ..SimulationParameters::default()
    };

    for n in ns {
        let mut bodies = make_bodies(n, &bounds, params.body_radius);

        // Warm up
        let (warm, _) = step(&bodies, &params, &bounds, None);
        bodies = warm;

        let t0 = Instant::now();
        let mut merges = 0;
        for _ in 0..steps {
            let (next, report) = step(&bodies, &params, &bounds, None);
            merges += report.merges;
            bodies = next;
        }
        let per_step = t0.elapsed().as_secs_f64() / steps as f64;

        println!("N = {:5}, step = {:8.6} s, merges = {:4}, bodies left = {:5}", n, per_step, merges, bodies.len());
    }
}
