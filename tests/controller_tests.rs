//! Controller tests: run-state machine, command queue, parameter handling,
//! pointer input and scenario loading. Everything runs headless.

use std::collections::HashSet;
use std::f64::consts::PI;

use planetsim::simulation::params::{Applied, MAX_BODIES, MAX_DAMPING, MIN_RADIUS};
use planetsim::{
    build_controller, Body, BodyColor, Bounds, Command, NVec2, ParameterChange, RunState, ScenarioConfig,
    SimError, SimulationController, SimulationParameters,
};

fn body_at(x: f64, y: f64, vx: f64, vy: f64) -> Body {
    Body::new(NVec2::new(x, y), NVec2::new(vx, vy), 5.0, BodyColor::from_hue(x))
}

/// Bodies only drift: no gravity, no springs, no damping
fn quiet_params() -> SimulationParameters {
    SimulationParameters {
        speed_factor: 1.0,
        spring_constant: 0.0,
        damping: 0.0,
        gravity: false,
        ..SimulationParameters::default()
    }
}

fn controller_with(bodies: Vec<Body>) -> SimulationController {
    SimulationController::with_bodies(quiet_params(), Bounds::new(1000.0, 1000.0), bodies, Some(1))
}

fn random_controller(count: usize, seed: u64) -> SimulationController {
    let params = SimulationParameters {
        body_count: count,
        ..SimulationParameters::default()
    };
    SimulationController::new(params, Bounds::new(800.0, 600.0), Some(seed))
}

// ==================================================================================
// State machine tests
// ==================================================================================

#[test]
fn starts_idle_and_runs_through_the_lifecycle() {
    let mut c = random_controller(3, 1);
    assert_eq!(c.state(), RunState::Idle);

    c.start().unwrap();
    assert_eq!(c.state(), RunState::Running);

    c.pause().unwrap();
    assert_eq!(c.state(), RunState::Paused);

    c.start().unwrap();
    assert_eq!(c.state(), RunState::Running);

    c.stop();
    assert_eq!(c.state(), RunState::Stopped);
}

#[test]
fn invalid_transitions_are_rejected() {
    let mut c = random_controller(3, 1);

    assert_eq!(
        c.pause(),
        Err(SimError::InvalidTransition { from: RunState::Idle, command: "pause" })
    );

    c.start().unwrap();
    assert!(c.start().is_err());

    c.stop();
    assert!(c.start().is_err());
    assert!(c.toggle_running().is_err());
    assert_eq!(c.state(), RunState::Stopped);
}

#[test]
fn stop_works_from_every_state() {
    let mut idle = random_controller(1, 1);
    idle.stop();
    assert_eq!(idle.state(), RunState::Stopped);

    let mut paused = random_controller(1, 1);
    paused.start().unwrap();
    paused.pause().unwrap();
    paused.stop();
    assert_eq!(paused.state(), RunState::Stopped);

    // stopping twice is fine
    paused.stop();
    assert_eq!(paused.state(), RunState::Stopped);
}

#[test]
fn reset_leaves_stopped() {
    let mut c = random_controller(3, 1);
    c.stop();
    c.reset(4);

    assert_eq!(c.state(), RunState::Idle);
    assert_eq!(c.bodies().len(), 4);
    c.start().unwrap();
}

#[test]
fn toggle_alternates_running_and_paused() {
    let mut c = random_controller(2, 1);

    c.toggle_running().unwrap();
    assert_eq!(c.state(), RunState::Running);
    c.toggle_running().unwrap();
    assert_eq!(c.state(), RunState::Paused);
    c.toggle_running().unwrap();
    assert_eq!(c.state(), RunState::Running);
}

// ==================================================================================
// Frame / command queue tests
// ==================================================================================

#[test]
fn frame_only_ticks_while_running() {
    let mut c = controller_with(vec![body_at(100.0, 100.0, 1.0, 0.0)]);

    assert!(c.frame().is_none());
    assert_eq!(c.tick_count(), 0);
    assert_eq!(c.bodies()[0].x, NVec2::new(100.0, 100.0));

    c.start().unwrap();
    assert!(c.frame().is_some());
    assert_eq!(c.tick_count(), 1);
    assert_eq!(c.bodies()[0].x, NVec2::new(101.0, 100.0));

    c.pause().unwrap();
    let before = c.bodies().to_vec();
    assert!(c.frame().is_none());
    assert_eq!(c.bodies(), &before[..], "pause retains the collection as-is");
}

#[test]
fn zero_ticks_leave_bodies_unchanged() {
    let mut c = random_controller(6, 9);
    let before = c.bodies().to_vec();

    let report = c.advance(0);

    assert_eq!(report.merges, 0);
    assert_eq!(c.bodies(), &before[..]);
    assert_eq!(c.tick_count(), 0);
}

#[test]
fn queued_commands_apply_in_order_before_the_tick() {
    let mut c = controller_with(vec![body_at(100.0, 100.0, 1.0, 0.0)]);

    c.enqueue(Command::Start);
    c.enqueue(Command::SetParameter(ParameterChange::SpeedFactor(3.0)));
    c.enqueue(Command::SetParameter(ParameterChange::SpeedFactor(2.0)));
    assert_eq!(c.pending_commands(), 3);
    assert_eq!(c.state(), RunState::Idle, "nothing applies until the frame");

    c.frame();

    assert_eq!(c.pending_commands(), 0);
    assert_eq!(c.state(), RunState::Running);
    assert_eq!(c.params().speed_factor, 2.0);
    // the tick already used the new speed factor
    assert_eq!(c.bodies()[0].x, NVec2::new(102.0, 100.0));
}

#[test]
fn rejected_commands_are_dropped() {
    let mut c = controller_with(vec![body_at(100.0, 100.0, 0.0, 0.0)]);

    c.enqueue(Command::Pause); // invalid while idle
    c.enqueue(Command::Start);
    c.frame();

    assert_eq!(c.state(), RunState::Running);
    assert_eq!(c.tick_count(), 1);
}

#[test]
fn stop_command_prevents_the_next_tick() {
    let mut c = controller_with(vec![body_at(100.0, 100.0, 1.0, 0.0)]);
    c.start().unwrap();

    c.enqueue(Command::Stop);
    assert!(c.frame().is_none());
    assert_eq!(c.tick_count(), 0);
}

// ==================================================================================
// Parameter tests
// ==================================================================================

#[test]
fn radius_change_updates_every_mass() {
    let mut c = random_controller(12, 3);

    let applied = c.set_parameter(ParameterChange::BodyRadius(8.0));

    assert_eq!(applied, Applied::Number(8.0));
    for b in c.bodies() {
        assert_eq!(b.radius, 8.0);
        assert!((b.m - PI * 512.0).abs() < 1e-9);
    }
}

#[test]
fn radius_change_also_resets_merged_masses() {
    let params = SimulationParameters {
        merging: true,
        ..quiet_params()
    };
    let bodies = vec![body_at(100.0, 100.0, 0.0, 0.0), body_at(103.0, 100.0, 0.0, 0.0)];
    let mut c = SimulationController::with_bodies(params, Bounds::new(1000.0, 1000.0), bodies, Some(1));

    c.advance(1);
    assert_eq!(c.bodies().len(), 1);
    assert!((c.bodies()[0].m - 2.0 * PI * 125.0).abs() < 1e-9);
    assert_eq!(c.merge_count(), 1);

    c.set_parameter(ParameterChange::BodyRadius(3.0));
    assert!((c.bodies()[0].m - PI * 27.0).abs() < 1e-9);
}

#[test]
fn body_count_change_resets_the_collection() {
    let mut c = random_controller(5, 3);

    c.set_parameter(ParameterChange::BodyCount(9));
    assert_eq!(c.bodies().len(), 9);
    assert_eq!(c.params().body_count, 9);

    let applied = c.set_parameter(ParameterChange::BodyCount(-4));
    assert_eq!(applied, Applied::Count(0));
    assert!(c.bodies().is_empty());
}

#[test]
fn invalid_values_are_clamped() {
    let mut c = random_controller(2, 3);

    assert_eq!(c.set_parameter(ParameterChange::BodyRadius(-1.0)), Applied::Number(MIN_RADIUS));
    assert!(c.bodies().iter().all(|b| b.radius == MIN_RADIUS && b.m > 0.0));

    assert_eq!(c.set_parameter(ParameterChange::Damping(1.5)), Applied::Number(MAX_DAMPING));
    assert_eq!(c.set_parameter(ParameterChange::Damping(-0.2)), Applied::Number(0.0));
    assert_eq!(c.set_parameter(ParameterChange::LineOpacity(2.0)), Applied::Number(1.0));
    assert_eq!(c.set_parameter(ParameterChange::RestLength(-10.0)), Applied::Number(0.0));
    assert_eq!(c.set_parameter(ParameterChange::SpeedFactor(-1.0)), Applied::Number(0.0));
}

#[test]
fn non_finite_values_are_ignored() {
    let mut c = random_controller(2, 3);
    let before = c.params().clone();

    assert_eq!(c.set_parameter(ParameterChange::SpringConstant(f64::NAN)), Applied::Ignored);
    assert_eq!(c.set_parameter(ParameterChange::BodyRadius(f64::INFINITY)), Applied::Ignored);

    assert_eq!(c.params(), &before);
}

#[test]
fn flags_and_spring_settings_only_change_parameters() {
    let mut c = random_controller(4, 3);
    let before = c.bodies().to_vec();

    c.set_parameter(ParameterChange::SpringConstant(0.2));
    c.set_parameter(ParameterChange::RestLength(120.0));
    c.set_parameter(ParameterChange::Merging(true));
    c.set_parameter(ParameterChange::Gravity(false));

    assert_eq!(c.bodies(), &before[..]);
    let p = c.params();
    assert_eq!((p.spring_constant, p.rest_length, p.merging, p.gravity), (0.2, 120.0, true, false));
}

#[test]
fn parameter_changes_parse_from_text() {
    assert_eq!(ParameterChange::parse("merging", "true"), Ok(ParameterChange::Merging(true)));
    assert_eq!(ParameterChange::parse("count", "12"), Ok(ParameterChange::BodyCount(12)));
    assert_eq!(
        ParameterChange::parse("spring_constant", " 0.25 "),
        Ok(ParameterChange::SpringConstant(0.25))
    );
    assert_eq!(
        ParameterChange::parse("warp", "9"),
        Err(SimError::UnknownParameter { name: "warp".into() })
    );
    assert!(matches!(
        ParameterChange::parse("radius", "big"),
        Err(SimError::InvalidValue { .. })
    ));
}

#[test]
fn non_finite_count_text_is_rejected() {
    for text in ["nan", "inf", "-inf"] {
        assert!(
            matches!(ParameterChange::parse("count", text), Err(SimError::InvalidValue { .. })),
            "count={text} should not parse"
        );
    }
}

#[test]
fn huge_body_counts_are_capped() {
    let mut c = random_controller(3, 7);

    let change = ParameterChange::parse("count", "1e30").unwrap();
    assert_eq!(c.set_parameter(change), Applied::Count(MAX_BODIES));
    assert_eq!(c.bodies().len(), MAX_BODIES);
    assert_eq!(c.params().body_count, MAX_BODIES);

    assert_eq!(c.set_parameter(ParameterChange::BodyCount(i64::MAX)), Applied::Count(MAX_BODIES));

    c.reset(usize::MAX);
    assert_eq!(c.bodies().len(), MAX_BODIES);
}

#[test]
fn rejected_count_keeps_the_collection() {
    let mut c = random_controller(5, 7);
    let before = c.bodies().to_vec();

    if let Ok(change) = ParameterChange::parse("count", "nan") {
        c.set_parameter(change);
    }

    assert_eq!(c.bodies(), &before[..]);
    assert_eq!(c.params().body_count, 5);
}

// ==================================================================================
// Reset tests
// ==================================================================================

#[test]
fn reset_places_bodies_inside_bounds_with_shared_radius() {
    let c = random_controller(50, 11);
    let Bounds { width, height } = c.bounds();

    assert_eq!(c.bodies().len(), 50);
    for b in c.bodies() {
        assert!((0.0..width).contains(&b.x.x) && (0.0..height).contains(&b.x.y));
        assert!((-1.0..1.0).contains(&b.v.x) && (-1.0..1.0).contains(&b.v.y));
        assert_eq!(b.radius, c.params().body_radius);
        assert!((b.m - PI * b.radius.powi(3)).abs() < 1e-9);
        assert!(!b.selected && !b.hovered);
    }
}

#[test]
fn reset_gives_every_body_its_own_colour() {
    let c = random_controller(40, 5);
    let hues: HashSet<u64> = c.bodies().iter().map(|b| (b.color.hue * 1e6) as u64).collect();
    assert_eq!(hues.len(), 40);
}

#[test]
fn seeded_controllers_are_reproducible() {
    let mut a = random_controller(10, 42);
    let mut b = random_controller(10, 42);
    assert_eq!(a.bodies(), b.bodies());

    a.advance(120);
    b.advance(120);
    assert_eq!(a.bodies(), b.bodies());
}

// ==================================================================================
// Pointer input tests
// ==================================================================================

#[test]
fn pointer_down_selects_nearest_hit() {
    let mut c = controller_with(vec![body_at(100.0, 100.0, 0.0, 0.0), body_at(104.0, 100.0, 0.0, 0.0)]);

    c.pointer_down(103.0, 100.0);

    assert_eq!(c.selected_index(), Some(1));
    assert!(c.is_dragging());
    assert!(!c.bodies()[0].selected);
}

#[test]
fn pointer_down_on_empty_space_clears_selection() {
    let mut c = controller_with(vec![body_at(100.0, 100.0, 0.0, 0.0)]);
    c.pointer_down(100.0, 100.0);
    c.pointer_up();
    assert_eq!(c.selected_index(), Some(0));

    c.pointer_down(500.0, 500.0);
    assert_eq!(c.selected_index(), None);
    assert!(!c.is_dragging());
}

#[test]
fn dragged_body_follows_pointer_and_skips_one_tick() {
    let mut c = controller_with(vec![body_at(100.0, 100.0, 1.0, 0.0), body_at(500.0, 500.0, 0.0, 1.0)]);
    c.start().unwrap();

    c.enqueue(Command::PointerDown { x: 100.0, y: 100.0 });
    c.enqueue(Command::PointerMove { x: 300.0, y: 300.0 });
    c.frame();

    // held under the cursor for the tick that followed the move
    assert_eq!(c.bodies()[0].x, NVec2::new(300.0, 300.0));
    assert_eq!(c.bodies()[1].x, NVec2::new(500.0, 501.0));

    // no move this frame: integration resumes
    c.frame();
    assert_eq!(c.bodies()[0].x, NVec2::new(301.0, 300.0));
}

#[test]
fn pointer_up_ends_drag_and_move_hovers() {
    let mut c = controller_with(vec![body_at(100.0, 100.0, 0.0, 0.0), body_at(300.0, 300.0, 0.0, 0.0)]);

    c.pointer_down(100.0, 100.0);
    c.pointer_up();
    assert!(!c.is_dragging());

    c.pointer_move(302.0, 299.0);
    assert_eq!(c.hovered_index(), Some(1));
    assert_eq!(c.bodies()[0].x, NVec2::new(100.0, 100.0), "released body is not dragged");

    c.pointer_move(700.0, 700.0);
    assert_eq!(c.hovered_index(), None);
}

#[test]
fn drag_ends_when_the_body_merges_away() {
    let params = SimulationParameters {
        merging: true,
        ..quiet_params()
    };
    let bodies = vec![body_at(100.0, 100.0, 0.0, 0.0), body_at(103.0, 100.0, 0.0, 0.0)];
    let mut c = SimulationController::with_bodies(params, Bounds::new(1000.0, 1000.0), bodies, Some(1));

    c.pointer_down(100.0, 100.0);
    assert!(c.is_dragging());

    c.advance(1);
    assert_eq!(c.bodies().len(), 1);
    assert_eq!(c.selected_index(), None);
    assert!(!c.is_dragging());
}

// ==================================================================================
// Scenario tests
// ==================================================================================

#[test]
fn scenario_with_explicit_bodies() {
    let yaml = r#"
world:
  width: 800.0
  height: 600.0
parameters:
  body_radius: 10.0
  merging: true
bodies:
  - x: [ 200.0, 300.0 ]
    v: [   2.0,   0.0 ]
  - x: [ 600.0, 300.0 ]
    hue: 210.0
"#;
    let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
    let c = build_controller(cfg);

    assert_eq!(c.bounds(), Bounds::new(800.0, 600.0));
    assert_eq!(c.bodies().len(), 2);
    assert_eq!(c.params().body_count, 2);
    assert!(c.params().merging);
    assert_eq!(c.bodies()[0].v, NVec2::new(2.0, 0.0));
    assert_eq!(c.bodies()[1].v, NVec2::zeros());
    assert_eq!(c.bodies()[1].color.hue, 210.0);
    assert!((c.bodies()[0].m - PI * 1000.0).abs() < 1e-9);
}

#[test]
fn partial_scenario_falls_back_to_defaults() {
    let cfg = ScenarioConfig::from_yaml_str("parameters:\n  body_count: 4\n  damping: 3.0\n").unwrap();
    let c = build_controller(cfg);
    let defaults = SimulationParameters::default();

    assert_eq!(c.bodies().len(), 4);
    assert_eq!(c.params().damping, MAX_DAMPING);
    assert_eq!(c.params().rest_length, defaults.rest_length);
    assert_eq!(c.params().G, defaults.G);
    assert_eq!(c.state(), RunState::Idle);
}

#[test]
fn scenario_values_that_cannot_be_built_are_clamped() {
    let yaml = "world:\n  width: .inf\n  height: 500.0\nparameters:\n  body_count: 18446744073709551615\n";
    let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
    let c = build_controller(cfg);

    assert_eq!(c.bounds(), Bounds::new(1280.0, 500.0));
    assert_eq!(c.bodies().len(), MAX_BODIES);
    assert!(c.bodies().iter().all(|b| b.x.x < 1280.0 && b.x.y < 500.0));
}
