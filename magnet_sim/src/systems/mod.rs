#![allow(
    clippy::needless_pass_by_value,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use crate::entities::{EntityRef, Polarity};
use crate::interaction::{
    hit_test, DragController, InteractionOutcome, PointerEvent, MAGNET_RADIUS, PARTICLE_RADIUS,
};
use crate::simulation::{AttractionSettings, SimulationState};
use crate::CANVAS_SIZE;
use bevy::{prelude::*, window::PrimaryWindow};
use bevy_egui::{EguiContexts, egui};

/// Upper bound on attraction passes run in a single frame
pub const MAX_TICKS_PER_FRAME: u32 = 4;

/// Ticks per frame (0.0 = paused, 1.0 = one tick per frame, 2.0 = two ticks per frame)
#[derive(Resource)]
pub struct SimulationSpeed(pub f32);

impl Default for SimulationSpeed {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Resource to signal that the simulation should go back to its initial layout
#[derive(Resource, Default)]
pub struct ResetSimulation(pub bool);

/// Fractional ticks carried between frames
#[derive(Default)]
pub struct SimulationFrameAccumulator(pub f32);

/// Convert a Bevy world position into canvas coordinates
pub fn world_to_canvas(world: Vec2) -> Vec2 {
    Vec2::new(world.x + CANVAS_SIZE.x / 2.0, CANVAS_SIZE.y / 2.0 - world.y)
}

/// Convert canvas coordinates into a Bevy world position
pub fn canvas_to_world(canvas: Vec2) -> Vec2 {
    Vec2::new(canvas.x - CANVAS_SIZE.x / 2.0, CANVAS_SIZE.y / 2.0 - canvas.y)
}

pub fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
    bevy::log::info!("Magnet simulation started");
}

/// Feed pointer messages through the drag controller
pub fn apply_pointer_events(
    mut pointer_events: MessageReader<PointerEvent>,
    mut controller: ResMut<DragController>,
    mut state: ResMut<SimulationState>,
) {
    let before = state.revision();

    for event in pointer_events.read() {
        match controller.handle(state.bypass_change_detection(), *event) {
            Ok(InteractionOutcome::Toggled(id, active)) => {
                bevy::log::info!("Magnet {} is now {}", id, if active { "active" } else { "inactive" });
            }
            Ok(InteractionOutcome::Grabbed(target)) => {
                bevy::log::debug!("Grabbed {:?}", target);
            }
            Ok(InteractionOutcome::Released(target)) => {
                bevy::log::debug!("Released {:?}", target);
            }
            Ok(InteractionOutcome::Moved(_) | InteractionOutcome::Ignored) => {}
            Err(e) => {
                bevy::log::warn!("Ignored pointer event {:?}: {}", event, e);
            }
        }
    }

    if state.revision() != before {
        state.set_changed();
    }
}

/// Run the attraction rule at the configured speed.
///
/// A pending reset is applied first so a pass never sees half-restored state.
pub fn run_attraction_ticks(
    mut state: ResMut<SimulationState>,
    mut reset: ResMut<ResetSimulation>,
    mut controller: ResMut<DragController>,
    settings: Res<AttractionSettings>,
    simulation_speed: Res<SimulationSpeed>,
    mut frame_accumulator: Local<SimulationFrameAccumulator>,
) {
    if reset.0 {
        reset.0 = false;
        state.reset();
        controller.release();
        frame_accumulator.0 = 0.0;
        bevy::log::info!("Simulation reset");
    }

    if simulation_speed.0 <= 0.0 {
        return; // Paused
    }

    frame_accumulator.0 =
        (frame_accumulator.0 + simulation_speed.0).min(MAX_TICKS_PER_FRAME as f32);

    let before = state.revision();
    while frame_accumulator.0 >= 1.0 {
        frame_accumulator.0 -= 1.0;

        let moved = state.bypass_change_detection().tick(&settings);
        if moved > 0 {
            bevy::log::debug!("Attraction tick moved {} particle(s)", moved);
        }
    }

    if state.revision() != before {
        state.set_changed();
    }
}

/// Translate mouse input on the primary window into pointer messages
pub fn capture_pointer_input(
    mouse_button_input: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    state: Res<SimulationState>,
    controller: Res<DragController>,
    mut pointer_events: MessageWriter<PointerEvent>,
    mut last_pointer: Local<Option<Vec2>>,
    egui_contexts: Option<EguiContexts>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let cursor = window.cursor_position().filter(|_| window.focused);
    let Some(cursor_position) = cursor else {
        // Losing the cursor mid-gesture aborts it
        if controller.is_active() {
            pointer_events.write(PointerEvent::Cancel);
        }
        *last_pointer = None;
        return;
    };

    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    // Convert screen coordinates to world coordinates
    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor_position) else {
        return;
    };
    let pointer = world_to_canvas(world_pos);

    if mouse_button_input.just_pressed(MouseButton::Left) {
        // Don't start gestures on top of the controls window
        if let Some(mut contexts) = egui_contexts
            && let Ok(ctx) = contexts.ctx_mut()
            && (ctx.wants_pointer_input() || ctx.is_pointer_over_area())
        {
            return;
        }
    }

    let messages = pointer_messages(
        &mouse_button_input,
        controller.is_active(),
        *last_pointer,
        pointer,
        || hit_test(&state, pointer),
    );
    for message in messages {
        pointer_events.write(message);
    }

    *last_pointer = Some(pointer);
}

/// Messages produced by one frame of left-button state with the pointer at `pointer`.
///
/// The release frame still reports where the pointer ended up before `Up`, so a
/// press and release one frame apart can become a drag.
pub fn pointer_messages(
    input: &ButtonInput<MouseButton>,
    gesture_active: bool,
    last_pointer: Option<Vec2>,
    pointer: Vec2,
    target: impl FnOnce() -> Option<EntityRef>,
) -> Vec<PointerEvent> {
    let mut messages = Vec::new();
    let released = input.just_released(MouseButton::Left);

    if input.just_pressed(MouseButton::Left) {
        messages.push(PointerEvent::Down {
            target: target(),
            pointer,
        });
    } else if (input.pressed(MouseButton::Left) || released)
        && gesture_active
        && last_pointer != Some(pointer)
    {
        messages.push(PointerEvent::Move { pointer });
    }

    // A press and release can land in the same frame
    if released {
        messages.push(PointerEvent::Up);
    }
    messages
}

fn polarity_color(polarity: Polarity) -> Color {
    match polarity {
        Polarity::North => Color::srgb_u8(0xff, 0x2d, 0x55),
        Polarity::South => Color::srgb_u8(0x00, 0x7a, 0xff),
    }
}

/// Draw magnets, their pull range and the metal particles
pub fn draw_entities(
    mut gizmos: Gizmos,
    state: Res<SimulationState>,
    settings: Res<AttractionSettings>,
) {
    let metal = Color::srgb_u8(0xb0, 0xb0, 0xb0);
    for particle in state.particles() {
        let center = canvas_to_world(particle.position());
        gizmos.circle_2d(center, PARTICLE_RADIUS, metal);
        gizmos.circle_2d(center, PARTICLE_RADIUS * 0.5, metal);
    }

    // Active magnets sit on top of inactive ones
    let (active, inactive): (Vec<_>, Vec<_>) = state.magnets().iter().partition(|m| m.active);
    for magnet in inactive.into_iter().chain(active) {
        let center = canvas_to_world(magnet.position());
        let color = polarity_color(magnet.polarity);
        gizmos.circle_2d(center, MAGNET_RADIUS, color);
        if magnet.active {
            gizmos.circle_2d(center, MAGNET_RADIUS + 4.0, Color::srgb_u8(0x33, 0x33, 0x33));
            gizmos.circle_2d(center, settings.pull_radius, color.with_alpha(0.25));
        }
    }
}

/// UI system for the egui controls window.
pub fn ui_system(
    mut contexts: EguiContexts,
    state: Res<SimulationState>,
    mut settings: ResMut<AttractionSettings>,
    mut simulation_speed: ResMut<SimulationSpeed>,
    mut reset: ResMut<ResetSimulation>,
    mut pointer_events: MessageWriter<PointerEvent>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Window::new("Controls").show(ctx, |ui| {
        ui.label("Click on a magnet to make it attract metal objects around it.");
        ui.label("Drag magnets or metal objects to move them.");

        ui.separator();

        // Magnet toggles go through the same path as clicks on the canvas
        for magnet in state.magnets() {
            let mut active = magnet.active;
            let label = format!("Magnet {} ({})", magnet.id, magnet.polarity.label());
            if ui.checkbox(&mut active, label).changed() {
                pointer_events.write(PointerEvent::Click { target: magnet.id });
            }
        }

        ui.separator();

        // Simulation speed slider
        ui.horizontal(|ui| {
            ui.label("Speed:");
            let mut speed = simulation_speed.0;
            if ui
                .add(egui::Slider::new(&mut speed, 0.0..=MAX_TICKS_PER_FRAME as f32))
                .changed()
            {
                simulation_speed.0 = speed;
            }
            if speed == 0.0 {
                ui.label("(Paused)");
            } else {
                ui.label(format!("{speed:.1}x"));
            }
        });

        ui.horizontal(|ui| {
            ui.label("Pull Radius:");
            let mut radius = settings.pull_radius;
            if ui.add(egui::Slider::new(&mut radius, 10.0..=400.0)).changed() {
                settings.pull_radius = radius;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Step Size:");
            let mut step = settings.step_size;
            if ui.add(egui::Slider::new(&mut step, 0.5..=10.0)).changed() {
                settings.step_size = step;
            }
        });

        ui.separator();

        if ui.button("Reset Magnets").clicked() {
            reset.0 = true;
        }
        });
    }
}
