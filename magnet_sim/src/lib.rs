pub mod entities;
pub mod error;
pub mod interaction;
pub mod plugins;
pub mod simulation;
pub mod systems;

/// Size of the play area in canvas units (origin top-left, +y down)
pub const CANVAS_SIZE: bevy::math::Vec2 = bevy::math::Vec2::new(800.0, 600.0);
pub const WINDOW_SIZE: bevy::math::UVec2 = bevy::math::UVec2::new(1024, 720);
