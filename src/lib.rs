pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;
pub mod error;

pub use simulation::states::{Body, BodyColor, Bounds, NVec2, mass_for_radius};
pub use simulation::params::{Applied, ParameterChange, SimulationParameters};
pub use simulation::forces::{ForceModel, NewtonianGravity, PairForces, PairInteraction, Spring, pairwise_forces};
pub use simulation::collision::{CollisionOutcome, merge_bodies, resolve};
pub use simulation::integrator::{apply_impulse, step_body, Reflection};
pub use simulation::engine::{connections, step, Connection, StepReport};
pub use simulation::controller::{Command, RunState, SimulationController};
pub use simulation::scenario::build_controller;

pub use configuration::config::{BodyConfig, ParametersConfig, ScenarioConfig, WorldConfig};

pub use error::{SimError, SimResult};

pub use visualization::vis2d::{line_width, run_2d};

pub use benchmark::benchmark::bench_step;
