pub mod states;
pub mod params;
pub mod forces;
pub mod collision;
pub mod integrator;
pub mod engine;
pub mod controller;
pub mod scenario;
