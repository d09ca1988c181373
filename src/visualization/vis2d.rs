use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::math::primitives::Circle;
use bevy::window::{PrimaryWindow, WindowResolution};

use crate::simulation::controller::{Command, RunState, SimulationController};
use crate::simulation::params::ParameterChange;
use crate::simulation::states::{Body, Bounds, NVec2};

#[derive(Component)]
struct BodyIndex(pub usize);

/// Unit circle shared by every body, scaled by the body radius
#[derive(Resource)]
struct BodyMesh(Mesh2dHandle);

/// Startup options for the viewer
#[derive(Resource, Clone, Copy)]
struct ViewerOptions {
    // place bodies randomly over the real window size once it exists
    randomize_on_start: bool,
}

/// Connection line width: thicker for stronger gravity, 1 when gravity is off
pub fn line_width(force: f64, gravity: bool) -> f64 {
    if gravity {
        (force * 1e-10).clamp(1.0, 10.0)
    } else {
        1.0
    }
}

pub fn run_2d(controller: SimulationController, randomize_on_start: bool) {
    let Bounds { width, height } = controller.bounds();
    println!("run_2d: starting Bevy 2D viewer with {} bodies", controller.bodies().len());

    App::new()
        .insert_resource(controller)
        .insert_resource(ViewerOptions { randomize_on_start })
        .insert_resource(ClearColor(Color::WHITE))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "planetsim".into(),
                resolution: WindowResolution::new(width as f32, height as f32),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_systems(Startup, setup_system)
        .add_systems(Update, (input_system, physics_step_system, sync_bodies_system, draw_overlay_system).chain())
        .run();
}

fn setup_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut controller: ResMut<SimulationController>,
    options: Res<ViewerOptions>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    // 2D camera
    commands.spawn(Camera2dBundle::default());
    commands.insert_resource(BodyMesh(Mesh2dHandle(meshes.add(Circle::new(1.0)))));

    if let Ok(window) = windows.get_single() {
        controller.set_bounds(window.width() as f64, window.height() as f64);
    }
    if options.randomize_on_start {
        let count = controller.params().body_count;
        controller.reset(count);
    }
    if let Err(e) = controller.start() {
        warn!("viewer could not start the simulation: {}", e);
    }
}

// Mouse and keyboard -> queued commands, applied before the next tick
fn input_system(
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut cursor: EventReader<CursorMoved>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut controller: ResMut<SimulationController>,
) {
    for event in cursor.read() {
        controller.enqueue(Command::PointerMove {
            x: event.position.x as f64,
            y: event.position.y as f64,
        });
    }

    if buttons.just_pressed(MouseButton::Left) {
        if let Some(p) = windows.get_single().ok().and_then(|w| w.cursor_position()) {
            controller.enqueue(Command::PointerDown { x: p.x as f64, y: p.y as f64 });
        }
    }
    if buttons.just_released(MouseButton::Left) {
        controller.enqueue(Command::PointerUp);
    }

    let p = controller.params().clone();
    let mut commands: Vec<Command> = Vec::new();

    if keys.just_pressed(KeyCode::Space) {
        commands.push(Command::TogglePause);
    }
    if keys.just_pressed(KeyCode::Escape) {
        commands.push(Command::Stop);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        commands.push(Command::Reset(p.body_count));
    }

    let change = |key: KeyCode, c: ParameterChange| keys.just_pressed(key).then_some(c);
    let changes = [
        change(KeyCode::ArrowUp, ParameterChange::BodyCount(p.body_count as i64 + 1)),
        change(KeyCode::ArrowDown, ParameterChange::BodyCount(p.body_count as i64 - 1)),
        change(KeyCode::Equal, ParameterChange::BodyRadius(p.body_radius + 1.0)),
        change(KeyCode::Minus, ParameterChange::BodyRadius(p.body_radius - 1.0)),
        change(KeyCode::BracketRight, ParameterChange::SpringConstant(p.spring_constant * 2.0)),
        change(KeyCode::BracketLeft, ParameterChange::SpringConstant(p.spring_constant / 2.0)),
        change(KeyCode::Period, ParameterChange::RestLength(p.rest_length + 50.0)),
        change(KeyCode::Comma, ParameterChange::RestLength(p.rest_length - 50.0)),
        change(KeyCode::KeyO, ParameterChange::LineOpacity(p.line_opacity - 0.1)),
        change(KeyCode::KeyP, ParameterChange::LineOpacity(p.line_opacity + 0.1)),
        change(KeyCode::KeyG, ParameterChange::Gravity(!p.gravity)),
        change(KeyCode::KeyC, ParameterChange::Collide(!p.collide)),
        change(KeyCode::KeyM, ParameterChange::Merging(!p.merging)),
    ];
    commands.extend(changes.into_iter().flatten().map(Command::SetParameter));

    for command in commands {
        controller.enqueue(command);
    }
}

fn physics_step_system(mut controller: ResMut<SimulationController>, windows: Query<&Window, With<PrimaryWindow>>) {
    if let Ok(window) = windows.get_single() {
        let bounds = controller.bounds();
        let (w, h) = (window.width() as f64, window.height() as f64);
        if bounds.width != w || bounds.height != h {
            controller.set_bounds(w, h);
        }
    }
    controller.frame();
}

// canvas (origin top-left, y down) -> world (origin centre, y up)
fn to_world(p: NVec2, bounds: &Bounds) -> Vec2 {
    Vec2::new(
        (p.x - bounds.width * 0.5) as f32,
        (bounds.height * 0.5 - p.y) as f32,
    )
}

fn fill_color(body: &Body) -> Color {
    if body.selected {
        Color::srgb(1.0, 0.0, 0.0)
    } else if body.hovered {
        Color::srgb(0.68, 0.85, 0.90)
    } else {
        let c = body.color;
        Color::hsl(c.hue as f32, c.saturation as f32, c.lightness as f32)
    }
}

// Keep one circle entity per body and copy position, radius and colour over
fn sync_bodies_system(
    mut commands: Commands,
    controller: Res<SimulationController>,
    mesh: Option<Res<BodyMesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &BodyIndex, &mut Transform, &Handle<ColorMaterial>, &mut Visibility)>,
) {
    let Some(mesh) = mesh else { return };
    let bodies = controller.bodies();
    let bounds = controller.bounds();
    let stopped = controller.state() == RunState::Stopped;

    let mut present = vec![false; bodies.len()];
    for (entity, BodyIndex(i), mut transform, material, mut visibility) in &mut query {
        let Some(b) = bodies.get(*i) else {
            commands.entity(entity).despawn();
            continue;
        };
        present[*i] = true;

        let p = to_world(b.x, &bounds);
        transform.translation = p.extend(1.0);
        transform.scale = Vec3::splat(b.radius as f32);
        if let Some(material) = materials.get_mut(material) {
            material.color = fill_color(b);
        }
        *visibility = if stopped { Visibility::Hidden } else { Visibility::Inherited };
    }

    for (i, b) in bodies.iter().enumerate().filter(|(i, _)| !present[*i]) {
        commands.spawn((
            MaterialMesh2dBundle {
                mesh: mesh.0.clone(),
                material: materials.add(ColorMaterial::from(fill_color(b))),
                transform: Transform::from_translation(to_world(b.x, &bounds).extend(1.0))
                    .with_scale(Vec3::splat(b.radius as f32)),
                visibility: if stopped { Visibility::Hidden } else { Visibility::Inherited },
                ..Default::default()
            },
            BodyIndex(i),
        ));
    }
}

// Connection lines and the selection marker
fn draw_overlay_system(controller: Res<SimulationController>, mut gizmos: Gizmos) {
    if controller.state() == RunState::Stopped {
        return;
    }
    let bounds = controller.bounds();
    let gravity = controller.params().gravity;

    for c in controller.connections() {
        let from = to_world(c.from, &bounds);
        let to = to_world(c.to, &bounds);
        let color = Color::srgba(0.0, 0.0, 0.0, c.opacity as f32);

        // gizmo lines are 1px, stack offset copies for thickness
        let width = line_width(c.force, gravity).round() as usize;
        let normal = (to - from).perp().normalize_or_zero();
        for k in 0..width {
            let offset = normal * (k as f32 - (width as f32 - 1.0) * 0.5);
            gizmos.line_2d(from + offset, to + offset, color);
        }
    }

    if let Some(i) = controller.selected_index() {
        let b = &controller.bodies()[i];
        let centre = to_world(b.x, &bounds);
        let r = b.radius as f32;
        let yellow = Color::srgb(1.0, 1.0, 0.0);
        let plus = r * 1.5;

        gizmos.circle_2d(centre, r + 2.0, yellow);
        gizmos.line_2d(centre - Vec2::X * plus, centre + Vec2::X * plus, yellow);
        gizmos.line_2d(centre - Vec2::Y * plus, centre + Vec2::Y * plus, yellow);
    }
}
