use crate::interaction::{DragController, PointerEvent};
use crate::simulation::{AttractionSettings, SimulationState};
use crate::systems;
use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

/// Systems that mutate the simulation state, in the order they run each frame
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct SimulationSet;

/// Headless simulation: state, settings, pointer handling and ticking.
///
/// Needs nothing beyond `MinimalPlugins`, so tests can drive it directly.
pub struct MagnetSimPlugin;

impl Plugin for MagnetSimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationState>()
            .init_resource::<AttractionSettings>()
            .init_resource::<systems::SimulationSpeed>()
            .init_resource::<systems::ResetSimulation>()
            .init_resource::<DragController>()
            .add_message::<PointerEvent>()
            .add_systems(
                Update,
                (systems::apply_pointer_events, systems::run_attraction_ticks)
                    .chain() // input first, so a tick sees this frame's drags
                    .in_set(SimulationSet),
            );
    }
}

/// Window front end: mouse capture, gizmo drawing and the controls panel
pub struct MagnetSimWindowPlugin;

impl Plugin for MagnetSimWindowPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, systems::setup)
            .add_systems(EguiPrimaryContextPass, systems::ui_system)
            .add_systems(
                Update,
                (
                    systems::capture_pointer_input.before(SimulationSet),
                    systems::draw_entities.after(SimulationSet),
                ),
            );
    }
}
