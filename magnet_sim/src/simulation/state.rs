use crate::entities::{EntityRef, Magnet, MagnetId, Particle, ParticleId, Polarity};
use crate::error::SimError;
use crate::simulation::attraction::{attraction_step, AttractionSettings};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Magnets the simulation starts with and returns to on reset
pub fn initial_magnets() -> Vec<Magnet> {
    vec![
        Magnet::new(1, 100.0, 100.0, Polarity::North),
        Magnet::new(2, 300.0, 200.0, Polarity::South),
    ]
}

/// Particles the simulation starts with and returns to on reset
pub fn initial_particles() -> Vec<Particle> {
    vec![Particle::new(1, 400.0, 400.0), Particle::new(2, 600.0, 150.0)]
}

/// Read-only view handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub magnets: Vec<Magnet>,
    pub particles: Vec<Particle>,
    pub revision: u64,
}

/// The single owner of both entity collections.
///
/// All writes go through the methods below. `revision` goes up by one for every
/// call that actually changed something, so observers can tell whether a
/// redraw is needed by comparing a number.
#[derive(Resource, Debug, Clone)]
pub struct SimulationState {
    magnets: Vec<Magnet>,
    particles: Vec<Particle>,
    revision: u64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            magnets: initial_magnets(),
            particles: initial_particles(),
            revision: 0,
        }
    }
}

impl SimulationState {
    /// Build a state from arbitrary collections.
    ///
    /// Ids must be unique within each collection.
    pub fn new(magnets: Vec<Magnet>, particles: Vec<Particle>) -> Self {
        debug_assert!(ids_unique(magnets.iter().map(|m| m.id.0)), "duplicate magnet id");
        debug_assert!(ids_unique(particles.iter().map(|p| p.id.0)), "duplicate particle id");
        Self {
            magnets,
            particles,
            revision: 0,
        }
    }

    pub fn magnets(&self) -> &[Magnet] {
        &self.magnets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn magnet(&self, id: MagnetId) -> Option<&Magnet> {
        self.magnets.iter().find(|m| m.id == id)
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    /// Current position of whatever `target` refers to
    pub fn position_of(&self, target: EntityRef) -> Option<Vec2> {
        match target {
            EntityRef::Magnet(id) => self.magnet(id).map(Magnet::position),
            EntityRef::Particle(id) => self.particle(id).map(Particle::position),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            magnets: self.magnets.clone(),
            particles: self.particles.clone(),
            revision: self.revision,
        }
    }

    /// Move a magnet. Unknown ids leave the state untouched.
    pub fn set_magnet_position(&mut self, id: MagnetId, x: f32, y: f32) -> Result<(), SimError> {
        let magnet = self
            .magnets
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(SimError::UnknownMagnet(id))?;

        if magnet.x != x || magnet.y != y {
            magnet.x = x;
            magnet.y = y;
            self.revision += 1;
        }
        Ok(())
    }

    /// Move a particle. Unknown ids leave the state untouched.
    pub fn set_particle_position(
        &mut self,
        id: ParticleId,
        x: f32,
        y: f32,
    ) -> Result<(), SimError> {
        let particle = self
            .particles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(SimError::UnknownParticle(id))?;

        if particle.x != x || particle.y != y {
            particle.x = x;
            particle.y = y;
            self.revision += 1;
        }
        Ok(())
    }

    /// Flip a magnet's active flag and return the new value
    pub fn toggle_magnet_active(&mut self, id: MagnetId) -> Result<bool, SimError> {
        let magnet = self
            .magnets
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(SimError::UnknownMagnet(id))?;

        magnet.active = !magnet.active;
        self.revision += 1;
        Ok(magnet.active)
    }

    /// Put both collections back to the initial configuration in one write
    pub fn reset(&mut self) {
        self.magnets = initial_magnets();
        self.particles = initial_particles();
        self.revision += 1;
    }

    /// Run one attraction tick and return how many particles moved.
    ///
    /// The particle collection is replaced by the one the pure step produced.
    /// `&mut self` keeps any other write from landing mid-pass.
    pub fn tick(&mut self, settings: &AttractionSettings) -> usize {
        let (next, moved) = attraction_step(&self.magnets, &self.particles, settings);
        if moved > 0 {
            self.particles = next;
            self.revision += 1;
        }
        moved
    }
}

fn ids_unique(ids: impl Iterator<Item = u32>) -> bool {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().all(|id| seen.insert(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_initial_configuration() {
        let state = SimulationState::default();
        assert_eq!(state.magnets(), initial_magnets().as_slice());
        assert_eq!(state.particles(), initial_particles().as_slice());
        assert_eq!(state.revision(), 0);

        let m1 = state.magnet(MagnetId(1)).expect("magnet 1");
        assert_eq!((m1.x, m1.y, m1.polarity, m1.active), (100.0, 100.0, Polarity::North, false));
        let m2 = state.magnet(MagnetId(2)).expect("magnet 2");
        assert_eq!((m2.x, m2.y, m2.polarity, m2.active), (300.0, 200.0, Polarity::South, false));
    }

    #[test]
    fn set_magnet_position_moves_only_that_magnet() {
        let mut state = SimulationState::default();
        state.set_magnet_position(MagnetId(2), 550.0, 160.0).expect("magnet 2 exists");

        assert_eq!(state.magnet(MagnetId(2)).map(Magnet::position), Some(Vec2::new(550.0, 160.0)));
        assert_eq!(state.magnet(MagnetId(1)), initial_magnets().first());
        assert_eq!(state.particles(), initial_particles().as_slice());
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn unknown_ids_are_reported_and_change_nothing() {
        let mut state = SimulationState::default();

        assert_eq!(
            state.set_magnet_position(MagnetId(9), 1.0, 1.0),
            Err(SimError::UnknownMagnet(MagnetId(9)))
        );
        assert_eq!(
            state.set_particle_position(ParticleId(9), 1.0, 1.0),
            Err(SimError::UnknownParticle(ParticleId(9)))
        );
        assert_eq!(
            state.toggle_magnet_active(MagnetId(0)),
            Err(SimError::UnknownMagnet(MagnetId(0)))
        );

        assert_eq!(state.magnets(), initial_magnets().as_slice());
        assert_eq!(state.particles(), initial_particles().as_slice());
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let mut state = SimulationState::default();
        for id in [MagnetId(1), MagnetId(2)] {
            let original = state.magnet(id).map(|m| m.active);
            assert_eq!(state.toggle_magnet_active(id), Ok(true));
            assert_eq!(state.toggle_magnet_active(id), Ok(false));
            assert_eq!(state.magnet(id).map(|m| m.active), original);
        }
        assert_eq!(state.revision(), 4);
    }

    #[test]
    fn writing_the_same_position_keeps_revision() {
        let mut state = SimulationState::default();
        state.set_particle_position(ParticleId(1), 400.0, 400.0).expect("particle 1 exists");
        assert_eq!(state.revision(), 0);
        state.set_particle_position(ParticleId(1), 401.0, 400.0).expect("particle 1 exists");
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn reset_restores_everything() {
        let mut state = SimulationState::default();
        state.set_magnet_position(MagnetId(1), -5.0, 7.0).expect("magnet 1 exists");
        state.toggle_magnet_active(MagnetId(2)).expect("magnet 2 exists");
        state.set_particle_position(ParticleId(2), 0.0, 0.0).expect("particle 2 exists");

        state.reset();
        assert_eq!(state.magnets(), initial_magnets().as_slice());
        assert_eq!(state.particles(), initial_particles().as_slice());
        assert_eq!(state.revision(), 4);
    }

    #[test]
    fn tick_only_bumps_revision_when_something_moved() {
        let mut state = SimulationState::default();
        let settings = AttractionSettings::default();

        assert_eq!(state.tick(&settings), 0);
        assert_eq!(state.revision(), 0);

        // magnet 2 at (300, 200) is ~304 from particle 2 and ~224 from particle 1
        state.toggle_magnet_active(MagnetId(2)).expect("magnet 2 exists");
        assert_eq!(state.tick(&settings), 0);
        assert_eq!(state.revision(), 1);

        state.set_magnet_position(MagnetId(2), 550.0, 160.0).expect("magnet 2 exists");
        assert_eq!(state.tick(&settings), 1);
        assert_eq!(state.revision(), 3);
        assert_eq!(state.particle(ParticleId(1)), initial_particles().first());
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let mut state = SimulationState::default();
        state.toggle_magnet_active(MagnetId(1)).expect("magnet 1 exists");
        let snapshot = state.snapshot();
        assert_eq!(snapshot.revision, 1);
        assert!(snapshot.magnets[0].active);
        assert_eq!(snapshot.particles, initial_particles());
    }

    #[test]
    fn snapshot_survives_json_round_trip() {
        let mut state = SimulationState::default();
        state.toggle_magnet_active(MagnetId(2)).expect("magnet 2 exists");
        state.set_magnet_position(MagnetId(2), 550.0, 160.0).expect("magnet 2 exists");
        state.tick(&AttractionSettings::default());
        let snapshot = state.snapshot();

        let json = serde_json::to_string(&snapshot).expect("snapshot serializes");
        assert!(json.contains("\"polarity\":\"South\""));
        let decoded: Snapshot = serde_json::from_str(&json).expect("snapshot deserializes");
        assert_eq!(decoded, snapshot);
    }
}
