//! Drag magnets around and switch them on to pull metal objects in.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use magnet_sim::{WINDOW_SIZE, plugins};

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::srgb_u8(0xf2, 0xf2, 0xf2)))
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Magnet Simulation".into(),
                    resolution: WINDOW_SIZE.into(),
                    resizable: true,
                    ..default()
                }),
                ..default()
            }),
            EguiPlugin::default(),
            plugins::MagnetSimPlugin,
            plugins::MagnetSimWindowPlugin,
        ))
        .run();
}
