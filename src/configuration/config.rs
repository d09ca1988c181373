//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`WorldConfig`]      – simulation area and random seed
//! - [`ParametersConfig`] – physical parameters and feature flags
//! - [`BodyConfig`]       – optional explicit initial bodies
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! Every field has a default, so a partial file only overrides what it names.
//!
//! # YAML format
//!
//! ```yaml
//! world:
//!   width: 1280.0
//!   height: 720.0
//!   seed: 7                 # omit for a random layout every run
//!
//! parameters:
//!   G: 6.6743e-11           # gravitational constant
//!   speed_factor: 2.0
//!   spring_constant: 0.05
//!   rest_length: 500.0
//!   damping: 0.05           # [0, 1)
//!   line_opacity: 0.5
//!   body_count: 10          # used when `bodies` is absent
//!   body_radius: 5.0
//!   gravity: true
//!   collide: true
//!   merging: false
//!
//! bodies:                   # optional, replaces random placement
//!   - x: [ 100.0, 100.0 ]
//!     v: [   1.0,   0.0 ]
//!     hue: 200.0
//! ```

use serde::Deserialize;

use crate::simulation::params::SimulationParameters;

/// Simulation area and seed
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,  // canvas width, replaced by the window size in the viewer
    pub height: f64, // canvas height
    pub seed: Option<u64>, // deterministic seed to make runs reproducible
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            seed: None,
        }
    }
}

/// Global physical parameters and feature flags for a scenario
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub G: f64,               // gravitational constant
    pub speed_factor: f64,    // position advance per unit velocity
    pub spring_constant: f64, // spring stiffness between every pair
    pub rest_length: f64,     // distance at which springs are relaxed
    pub damping: f64,         // per-tick velocity decay
    pub line_opacity: f64,    // connection line opacity
    pub body_count: usize,    // number of random bodies
    pub body_radius: f64,     // shared radius, mass = pi * r^3
    pub gravity: bool,
    pub collide: bool,
    pub merging: bool,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        let p = SimulationParameters::default();
        Self {
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
    }
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: [f64; 2], // initial position in canvas coordinates
    #[serde(default)]
    pub v: [f64; 2], // initial velocity
    pub hue: Option<f64>, // colour hue in degrees, spaced automatically when absent
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub world: WorldConfig,
    pub parameters: ParametersConfig,
    pub bodies: Option<Vec<BodyConfig>>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }
}
