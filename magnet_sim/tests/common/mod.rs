//! Headless app harness shared by the integration tests.

#![allow(dead_code)]

use bevy::prelude::*;
use magnet_sim::entities::{Magnet, MagnetId, Particle, ParticleId};
use magnet_sim::interaction::{DragController, PointerEvent, hit_test};
use magnet_sim::plugins::MagnetSimPlugin;
use magnet_sim::simulation::SimulationState;
use magnet_sim::systems::{ResetSimulation, SimulationSpeed};

/// A Bevy app running only `MinimalPlugins` and the simulation plugin.
pub struct TestApp {
    pub app: App,
}

impl TestApp {
    /// Create a paused app so only explicit ticks move particles.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(MagnetSimPlugin);
        app.insert_resource(SimulationSpeed(0.0));
        // Run one update to initialize all resources
        app.update();
        Self { app }
    }

    /// Create an app that ticks at `speed` ticks per frame.
    pub fn running(speed: f32) -> Self {
        let mut test_app = Self::new();
        test_app.set_speed(speed);
        test_app
    }

    pub fn update(&mut self) {
        self.app.update();
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.app.world_mut().resource_mut::<SimulationSpeed>().0 = speed;
    }

    /// Run exactly `n` attraction ticks, one per frame.
    pub fn step(&mut self, n: usize) {
        let previous = self.app.world().resource::<SimulationSpeed>().0;
        self.set_speed(1.0);
        for _ in 0..n {
            self.update();
        }
        self.set_speed(previous);
    }

    pub fn send(&mut self, event: PointerEvent) {
        self.app.world_mut().write_message(event);
    }

    /// Press at a canvas position, targeting whatever is under it.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let pointer = Vec2::new(x, y);
        let target = hit_test(self.state(), pointer);
        self.send(PointerEvent::Down { target, pointer });
        self.update();
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.send(PointerEvent::Move {
            pointer: Vec2::new(x, y),
        });
        self.update();
    }

    pub fn pointer_up(&mut self) {
        self.send(PointerEvent::Up);
        self.update();
    }

    pub fn click(&mut self, id: u32) {
        self.send(PointerEvent::Click {
            target: MagnetId(id),
        });
        self.update();
    }

    pub fn request_reset(&mut self) {
        self.app.world_mut().resource_mut::<ResetSimulation>().0 = true;
        self.update();
    }

    pub fn state(&self) -> &SimulationState {
        self.app.world().resource::<SimulationState>()
    }

    pub fn controller(&self) -> &DragController {
        self.app.world().resource::<DragController>()
    }

    pub fn magnet(&self, id: u32) -> Magnet {
        self.state()
            .magnet(MagnetId(id))
            .cloned()
            .unwrap_or_else(|| panic!("magnet {id} missing"))
    }

    pub fn particle(&self, id: u32) -> Particle {
        self.state()
            .particle(ParticleId(id))
            .cloned()
            .unwrap_or_else(|| panic!("particle {id} missing"))
    }
}

/// Assert two positions agree within floating point noise
pub fn assert_near(actual: Vec2, expected: Vec2) {
    assert!(
        actual.distance(expected) < 1e-3,
        "expected {expected:?}, got {actual:?}"
    );
}
