use crate::entities::{Magnet, Particle};
use bevy::prelude::*;

/// Maximum distance at which an active magnet affects a particle
pub const PULL_RADIUS: f32 = 200.0;

/// Distance a pulled particle travels in one tick
pub const STEP_SIZE: f32 = 2.0;

/// Tunable attraction parameters, defaults match the named constants
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct AttractionSettings {
    pub pull_radius: f32,
    pub step_size: f32,
}

impl Default for AttractionSettings {
    fn default() -> Self {
        Self {
            pull_radius: PULL_RADIUS,
            step_size: STEP_SIZE,
        }
    }
}

/// Find the closest active magnet to `point`.
///
/// Returns the magnet and its Euclidean distance. When several active magnets
/// are equally close the one that comes first in `magnets` wins: the comparison
/// is strict, so a later magnet only replaces the current pick if it is closer.
pub fn nearest_active_magnet(magnets: &[Magnet], point: Vec2) -> Option<(&Magnet, f32)> {
    let mut nearest: Option<(&Magnet, f32)> = None;

    for magnet in magnets.iter().filter(|m| m.active) {
        let distance = magnet.position().distance(point);
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((magnet, distance)),
        }
    }

    nearest
}

/// Move `from` by `step` along the straight line towards `target`.
///
/// The heading is `atan2(dy, dx)`. A point sitting exactly on the target has
/// heading `atan2(0, 0) = 0` and is nudged along +x. There is no clamping, so a
/// point closer than `step` overshoots the target.
pub fn step_towards(from: Vec2, target: Vec2, step: f32) -> Vec2 {
    let delta = target - from;
    let direction = delta.y.atan2(delta.x);
    Vec2::new(
        from.x + direction.cos() * step,
        from.y + direction.sin() * step,
    )
}

/// Where a single particle ends up after one tick, or `None` if it stays put
pub fn next_position(
    particle: &Particle,
    magnets: &[Magnet],
    settings: &AttractionSettings,
) -> Option<Vec2> {
    let position = particle.position();
    let (magnet, distance) = nearest_active_magnet(magnets, position)?;

    if distance < settings.pull_radius {
        Some(step_towards(position, magnet.position(), settings.step_size))
    } else {
        None
    }
}

/// Run one attraction tick over every particle.
///
/// Pure: it reads a consistent view of both collections and returns the next
/// particle collection plus the number of particles that moved. Each particle
/// gets at most one position write and there is no convergence loop.
pub fn attraction_step(
    magnets: &[Magnet],
    particles: &[Particle],
    settings: &AttractionSettings,
) -> (Vec<Particle>, usize) {
    let mut moved = 0;
    let next = particles
        .iter()
        .map(|particle| match next_position(particle, magnets, settings) {
            Some(position) => {
                moved += 1;
                particle.moved_to(position)
            }
            None => particle.clone(),
        })
        .collect();

    (next, moved)
}
