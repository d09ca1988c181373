//! Physical and numerical parameters for the simulation
//!
//! `SimulationParameters` is passed explicitly into every force, collision
//! and integration call. It is only mutated through the controller, which
//! funnels every change through [`SimulationParameters::apply`] so invalid
//! input is clamped instead of rejected.

use std::fmt;

use crate::error::{SimError, SimResult};

pub const MIN_RADIUS: f64 = 1.0e-3;
pub const MAX_DAMPING: f64 = 0.999;
/// Largest body count a reset will build
pub const MAX_BODIES: usize = 10_000;

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    pub G: f64, // gravitational constant, fixed after construction
    pub speed_factor: f64, // position advance per unit velocity
    pub spring_constant: f64, // spring stiffness
    pub rest_length: f64, // spring rest length
    pub damping: f64, // per-tick velocity decay, [0, 1)
    pub line_opacity: f64, // rendering passthrough
    pub body_count: usize, // target count used on reset
    pub body_radius: f64, // shared radius of every body
    pub gravity: bool,
    pub collide: bool,
    pub merging: bool,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            G: 6.67430e-11,
            speed_factor: 2.0,
            spring_constant: 0.05,
            rest_length: 500.0,
            damping: 0.05,
            line_opacity: 0.5,
            body_count: 10,
            body_radius: 5.0,
            gravity: true,
            collide: true,
            merging: false,
        }
    }
}

/// Value that was actually stored after clamping
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Applied {
    Number(f64),
    Count(usize),
    Flag(bool),
    /// Non-finite input, previous value kept
    Ignored,
}

/// A single parameter update from the control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterChange {
    BodyCount(i64),
    BodyRadius(f64),
    SpringConstant(f64),
    RestLength(f64),
    LineOpacity(f64),
    SpeedFactor(f64),
    Damping(f64),
    Gravity(bool),
    Collide(bool),
    Merging(bool),
}

impl ParameterChange {
    /// Parse a textual `name=value` pair, e.g. from the command line
    pub fn parse(name: &str, value: &str) -> SimResult<Self> {
        let value = value.trim();
        let number = || {
            value.parse::<f64>().map_err(|_| SimError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
            })
        };
        let flag = || match value {
            "true" | "on" | "1" => Ok(true),
            "false" | "off" | "0" => Ok(false),
            _ => Err(SimError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
            }),
        };

        match name.trim() {
            "body_count" | "count" => {
                // accept "12" as well as "12.0" from sliders
                let n = number()?;
                if !n.is_finite() {
                    return Err(SimError::InvalidValue {
                        name: name.to_string(),
                        value: value.to_string(),
                    });
                }
                Ok(Self::BodyCount(n as i64))
            }
            "body_radius" | "radius" => Ok(Self::BodyRadius(number()?)),
            "spring_constant" => Ok(Self::SpringConstant(number()?)),
            "rest_length" => Ok(Self::RestLength(number()?)),
            "line_opacity" | "opacity" => Ok(Self::LineOpacity(number()?)),
            "speed_factor" => Ok(Self::SpeedFactor(number()?)),
            "damping" => Ok(Self::Damping(number()?)),
            "gravity" => Ok(Self::Gravity(flag()?)),
            "collide" => Ok(Self::Collide(flag()?)),
            "merging" => Ok(Self::Merging(flag()?)),
            other => Err(SimError::UnknownParameter {
                name: other.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BodyCount(_) => "body_count",
            Self::BodyRadius(_) => "body_radius",
            Self::SpringConstant(_) => "spring_constant",
            Self::RestLength(_) => "rest_length",
            Self::LineOpacity(_) => "line_opacity",
            Self::SpeedFactor(_) => "speed_factor",
            Self::Damping(_) => "damping",
            Self::Gravity(_) => "gravity",
            Self::Collide(_) => "collide",
            Self::Merging(_) => "merging",
        }
    }
}

impl fmt::Display for ParameterChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BodyCount(n) => write!(f, "{}={}", self.name(), n),
            Self::BodyRadius(v)
            | Self::SpringConstant(v)
            | Self::RestLength(v)
            | Self::LineOpacity(v)
            | Self::SpeedFactor(v)
            | Self::Damping(v) => write!(f, "{}={}", self.name(), v),
            Self::Gravity(b) | Self::Collide(b) | Self::Merging(b) => {
                write!(f, "{}={}", self.name(), b)
            }
        }
    }
}

impl SimulationParameters {
    /// Store a change, clamped to its valid range
    ///
    /// Only updates the parameter itself; rebuilding bodies for count and
    /// radius changes is the controller's job.
    pub fn apply(&mut self, change: ParameterChange) -> Applied {
        let finite = |v: f64| v.is_finite();
        match change {
            ParameterChange::BodyCount(n) => {
                self.body_count = n.clamp(0, MAX_BODIES as i64) as usize;
                Applied::Count(self.body_count)
            }
            ParameterChange::BodyRadius(r) if finite(r) => {
                self.body_radius = r.max(MIN_RADIUS);
                Applied::Number(self.body_radius)
            }
            ParameterChange::SpringConstant(k) if finite(k) => {
                self.spring_constant = k;
                Applied::Number(k)
            }
            ParameterChange::RestLength(l) if finite(l) => {
                self.rest_length = l.max(0.0);
                Applied::Number(self.rest_length)
            }
            ParameterChange::LineOpacity(o) if finite(o) => {
                self.line_opacity = o.clamp(0.0, 1.0);
                Applied::Number(self.line_opacity)
            }
            ParameterChange::SpeedFactor(s) if finite(s) => {
                self.speed_factor = s.max(0.0);
                Applied::Number(self.speed_factor)
            }
            ParameterChange::Damping(d) if finite(d) => {
                self.damping = d.clamp(0.0, MAX_DAMPING);
                Applied::Number(self.damping)
            }
            ParameterChange::Gravity(b) => {
                self.gravity = b;
                Applied::Flag(b)
            }
            ParameterChange::Collide(b) => {
                self.collide = b;
                Applied::Flag(b)
            }
            ParameterChange::Merging(b) => {
                self.merging = b;
                Applied::Flag(b)
            }
            _ => Applied::Ignored,
        }
    }

    /// Clamp every field into range, used after loading from a file
    ///
    /// Non-finite values fall back to the defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let pick = |name: &str, v: f64, fallback: f64| {
            if v.is_finite() {
                v
            } else {
                log::warn!("ignoring non-finite {name}, using {fallback}");
                fallback
            }
        };

        Self {
            G: pick("G", self.G, defaults.G),
            speed_factor: pick("speed_factor", self.speed_factor, defaults.speed_factor).max(0.0),
            spring_constant: pick("spring_constant", self.spring_constant, defaults.spring_constant),
            rest_length: pick("rest_length", self.rest_length, defaults.rest_length).max(0.0),
            damping: pick("damping", self.damping, defaults.damping).clamp(0.0, MAX_DAMPING),
            line_opacity: pick("line_opacity", self.line_opacity, defaults.line_opacity).clamp(0.0, 1.0),
            body_radius: pick("body_radius", self.body_radius, defaults.body_radius).max(MIN_RADIUS),
            body_count: self.body_count.min(MAX_BODIES),
            ..self
        }
    }
}
