//! Simulation controller: run state, parameters and the authoritative bodies
//!
//! The controller owns everything that lives across ticks. Input events and
//! control-panel changes arrive as [`Command`]s in a FIFO queue and are only
//! applied between ticks by [`SimulationController::frame`], so a tick never
//! observes a half-applied change.
//!
//! State machine:
//!
//! ```text
//! Idle --start--> Running <--start/pause--> Paused
//!   any --stop--> Stopped --reset--> Idle
//! ```

use std::collections::VecDeque;

use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{SimError, SimResult};
use crate::simulation::engine::{self, Connection, StepReport};
use crate::simulation::params::{Applied, ParameterChange, SimulationParameters, MAX_BODIES};
use crate::simulation::states::{Body, BodyColor, Bounds, NVec2, HUE_STEP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Stopped,
}

/// Discrete input applied between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    SetParameter(ParameterChange),
    Start,
    Pause,
    TogglePause,
    Stop,
    Reset(usize),
}

#[derive(Resource)]
pub struct SimulationController {
    params: SimulationParameters,
    bounds: Bounds,
    bodies: Vec<Body>,
    state: RunState,
    commands: VecDeque<Command>,
    dragging: bool,
    held: Option<usize>, // body moved by the pointer since the last tick
    rng: StdRng,
    ticks: u64,
    merges: u64,
}

impl SimulationController {
    /// Controller with `params.body_count` randomly placed bodies
    pub fn new(params: SimulationParameters, bounds: Bounds, seed: Option<u64>) -> Self {
        let mut controller = Self::with_bodies(params, bounds, Vec::new(), seed);
        controller.reset(controller.params.body_count);
        controller
    }

    /// Controller starting from an explicit collection
    ///
    /// Every body gets the shared radius and the matching mass.
    pub fn with_bodies(params: SimulationParameters, bounds: Bounds, mut bodies: Vec<Body>, seed: Option<u64>) -> Self {
        let params = params.sanitized();
        for b in bodies.iter_mut() {
            b.set_radius(params.body_radius);
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            params,
            bounds,
            bodies,
            state: RunState::Idle,
            commands: VecDeque::new(),
            dragging: false,
            held: None,
            rng,
            ticks: 0,
            merges: 0,
        }
    }

    // accessors ==============================================================================

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Merges performed since construction
    pub fn merge_count(&self) -> u64 {
        self.merges
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.bodies.iter().position(|b| b.selected)
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.bodies.iter().position(|b| b.hovered)
    }

    pub fn connections(&self) -> Vec<Connection> {
        engine::connections(&self.bodies, &self.params)
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.m).sum()
    }

    // run state ==============================================================================

    pub fn start(&mut self) -> SimResult<()> {
        match self.state {
            RunState::Idle | RunState::Paused => {
                self.transition(RunState::Running);
                Ok(())
            }
            from => Err(SimError::InvalidTransition { from, command: "start" }),
        }
    }

    pub fn pause(&mut self) -> SimResult<()> {
        match self.state {
            RunState::Running => {
                self.transition(RunState::Paused);
                Ok(())
            }
            from => Err(SimError::InvalidTransition { from, command: "pause" }),
        }
    }

    /// Single start/pause button
    pub fn toggle_running(&mut self) -> SimResult<()> {
        if self.state == RunState::Running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Always succeeds; the viewer clears its surface while stopped
    pub fn stop(&mut self) {
        self.dragging = false;
        self.held = None;
        self.transition(RunState::Stopped);
    }

    fn transition(&mut self, to: RunState) {
        if self.state != to {
            log::info!("simulation {:?} -> {:?}", self.state, to);
            self.state = to;
        }
    }

    // bodies & parameters ====================================================================

    /// Replace the collection with `count` fresh bodies
    ///
    /// Positions are uniform inside the bounds, velocity components uniform in
    /// [-1, 1), hues spaced by [`HUE_STEP`] from a random start. `count` is
    /// capped at [`MAX_BODIES`].
    pub fn reset(&mut self, count: usize) {
        let count = count.min(MAX_BODIES);
        let Bounds { width, height } = self.bounds;
        let radius = self.params.body_radius;
        let hue0 = self.rng.gen_range(0.0..360.0);

        let mut bodies = Vec::with_capacity(count);
        for i in 0..count {
            let x = NVec2::new(self.rng.gen_range(0.0..width), self.rng.gen_range(0.0..height));
            let v = NVec2::new(self.rng.gen_range(-1.0..1.0), self.rng.gen_range(-1.0..1.0));
            let color = BodyColor::from_hue(hue0 + i as f64 * HUE_STEP);
            bodies.push(Body::new(x, v, radius, color));
        }

        self.bodies = bodies;
        self.params.body_count = count;
        self.dragging = false;
        self.held = None;
        if self.state == RunState::Stopped {
            self.transition(RunState::Idle);
        }
        log::info!("reset: {} bodies, radius {}", count, radius);
    }

    /// Apply a parameter change, clamped, effective from the next tick
    ///
    /// Body count resets the collection; radius updates every body at once.
    pub fn set_parameter(&mut self, change: ParameterChange) -> Applied {
        let applied = self.params.apply(change);

        match applied {
            Applied::Ignored => {
                log::warn!("ignoring non-finite parameter input {change}");
            }
            Applied::Count(n) => self.reset(n),
            Applied::Number(r) if matches!(change, ParameterChange::BodyRadius(_)) => {
                for b in self.bodies.iter_mut() {
                    b.set_radius(r);
                }
            }
            _ => {}
        }

        applied
    }

    /// Window sizing collaborator; bodies are not moved
    pub fn set_bounds(&mut self, width: f64, height: f64) {
        self.bounds = Bounds::new(width, height);
    }

    // input ==================================================================================

    /// Select the nearest body under the pointer and start dragging it
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        let hit = self.hit_test(NVec2::new(x, y));
        for (i, b) in self.bodies.iter_mut().enumerate() {
            b.selected = Some(i) == hit;
        }
        self.dragging = hit.is_some();
    }

    /// Drag the selected body, or update hover when not dragging
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let p = NVec2::new(x, y);

        if self.dragging {
            if let Some(i) = self.selected_index() {
                self.bodies[i].x = p;
                self.held = Some(i);
                return;
            }
            // the dragged body merged away
            self.dragging = false;
        }

        let hit = self.hit_test(p);
        for (i, b) in self.bodies.iter_mut().enumerate() {
            b.hovered = Some(i) == hit;
        }
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    // nearest body whose disc contains p
    fn hit_test(&self, p: NVec2) -> Option<usize> {
        self.bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| b.contains(p))
            .min_by(|(_, a), (_, b)| (a.x - p).norm().total_cmp(&(b.x - p).norm()))
            .map(|(i, _)| i)
    }

    // ticking ================================================================================

    pub fn enqueue(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Apply one command immediately
    pub fn apply(&mut self, command: Command) -> SimResult<()> {
        match command {
            Command::PointerDown { x, y } => self.pointer_down(x, y),
            Command::PointerMove { x, y } => self.pointer_move(x, y),
            Command::PointerUp => self.pointer_up(),
            Command::SetParameter(change) => {
                self.set_parameter(change);
            }
            Command::Start => self.start()?,
            Command::Pause => self.pause()?,
            Command::TogglePause => self.toggle_running()?,
            Command::Stop => self.stop(),
            Command::Reset(count) => self.reset(count),
        }
        Ok(())
    }

    /// Drain queued commands, then tick once if running
    ///
    /// Called once per frame by the scheduler. Returns the tick report when a
    /// tick ran.
    pub fn frame(&mut self) -> Option<StepReport> {
        while let Some(command) = self.commands.pop_front() {
            if let Err(e) = self.apply(command) {
                log::warn!("dropping {:?}: {}", command, e);
            }
        }

        if self.state == RunState::Running {
            Some(self.tick())
        } else {
            None
        }
    }

    /// Run `n` ticks regardless of run state; queued commands are left alone
    pub fn advance(&mut self, n: usize) -> StepReport {
        let mut total = StepReport::default();
        for _ in 0..n {
            let report = self.tick();
            total.merges += report.merges;
            total.reflections += report.reflections;
        }
        total
    }

    fn tick(&mut self) -> StepReport {
        let held = self.held.take();
        let (next, report) = engine::step(&self.bodies, &self.params, &self.bounds, held);

        self.bodies = next;
        self.ticks += 1;
        self.merges += report.merges as u64;

        if self.dragging && self.selected_index().is_none() {
            self.dragging = false;
        }
        if report.merges > 0 {
            log::debug!("tick {}: {} merges, {} bodies left", self.ticks, report.merges, self.bodies.len());
        } else {
            log::trace!("tick {}: {:?}", self.ticks, report);
        }

        report
    }
}
