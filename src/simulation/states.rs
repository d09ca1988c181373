//! Core state types for the planet simulation.
//!
//! Defines the 2D body and the simulation area:
//! - `Body` using `NVec2` for position and velocity
//! - `BodyColor` as an opaque HSL token handed to the renderer
//! - `Bounds` for the canvas-space simulation area (origin top-left, y down)

use std::f64::consts::PI;

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

/// Golden angle in degrees, hue step between consecutive bodies
pub const HUE_STEP: f64 = 137.507_764;

/// Mass of a body with radius `r`: `pi * r^3`
pub fn mass_for_radius(radius: f64) -> f64 {
    PI * radius.powi(3)
}

/// HSL colour token, passed through to rendering untouched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyColor {
    pub hue: f64, // degrees
    pub saturation: f64, // 0..1
    pub lightness: f64, // 0..1
}

impl BodyColor {
    pub fn from_hue(hue: f64) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
            saturation: 0.5,
            lightness: 0.5,
        }
    }
}

impl Default for BodyColor {
    fn default() -> Self {
        Self::from_hue(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub radius: f64, // radius
    pub m: f64, // mass
    pub color: BodyColor,
    pub selected: bool, // written by the input adapter only
    pub hovered: bool, // written by the input adapter only
}

impl Body {
    /// Body with mass derived from its radius
    pub fn new(x: NVec2, v: NVec2, radius: f64, color: BodyColor) -> Self {
        Self {
            x,
            v,
            radius,
            m: mass_for_radius(radius),
            color,
            selected: false,
            hovered: false,
        }
    }

    /// Set the radius and recompute mass from it
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
        self.m = mass_for_radius(radius);
    }

    /// Pointer hit test: Euclidean distance to the centre <= radius
    pub fn contains(&self, p: NVec2) -> bool {
        (p - self.x).norm() <= self.radius
    }

    pub fn momentum(&self) -> NVec2 {
        self.v * self.m
    }
}

/// Simulation area in canvas coordinates: `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

const DEFAULT_WIDTH: f64 = 1280.0;
const DEFAULT_HEIGHT: f64 = 720.0;

impl Bounds {
    /// Sizes below 1 are raised to 1; non-finite sizes fall back to the default area
    pub fn new(width: f64, height: f64) -> Self {
        let side = |v: f64, fallback: f64| if v.is_finite() { v.max(1.0) } else { fallback };
        Self {
            width: side(width, DEFAULT_WIDTH),
            height: side(height, DEFAULT_HEIGHT),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}
