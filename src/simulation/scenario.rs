//! Build a ready-to-run controller from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime
//! [`SimulationController`]: sanitized parameters, bounds, and either the
//! explicit bodies from the file or a random layout of `body_count` bodies.

use crate::configuration::config::{BodyConfig, ParametersConfig, ScenarioConfig};
use crate::simulation::controller::SimulationController;
use crate::simulation::params::SimulationParameters;
use crate::simulation::states::{Body, BodyColor, Bounds, NVec2, HUE_STEP};

impl From<ParametersConfig> for SimulationParameters {
    fn from(p: ParametersConfig) -> Self {
        SimulationParameters {
            G: p.G,
            speed_factor: p.speed_factor,
            spring_constant: p.spring_constant,
            rest_length: p.rest_length,
            damping: p.damping,
            line_opacity: p.line_opacity,
            body_count: p.body_count,
            body_radius: p.body_radius,
            gravity: p.gravity,
            collide: p.collide,
            merging: p.merging,
        }
        .sanitized()
    }
}

pub fn build_controller(cfg: ScenarioConfig) -> SimulationController {
    let bounds = Bounds::new(cfg.world.width, cfg.world.height);
    let mut parameters = SimulationParameters::from(cfg.parameters);

    match cfg.bodies {
        Some(bodies) => {
            // Bodies: map `BodyConfig` -> runtime `Body`, radius/mass from the shared radius
            let bodies: Vec<Body> = bodies
                .iter()
                .enumerate()
                .map(|(i, bc): (usize, &BodyConfig)| {
                    let hue = bc.hue.unwrap_or(i as f64 * HUE_STEP);
                    Body::new(
                        NVec2::new(bc.x[0], bc.x[1]),
                        NVec2::new(bc.v[0], bc.v[1]),
                        parameters.body_radius,
                        BodyColor::from_hue(hue),
                    )
                })
                .collect();
            parameters.body_count = bodies.len();
            SimulationController::with_bodies(parameters, bounds, bodies, cfg.world.seed)
        }
        None => SimulationController::new(parameters, bounds, cfg.world.seed),
    }
}
