use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a magnet, unique within the magnet collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MagnetId(pub u32);

/// Identifier of a metal particle, unique within the particle collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticleId(pub u32);

impl fmt::Display for MagnetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Magnet polarity. Only used for display, attraction ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    North,
    South,
}

impl Polarity {
    pub const fn label(self) -> &'static str {
        match self {
            Polarity::North => "North",
            Polarity::South => "South",
        }
    }
}

/// A draggable magnetic source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Magnet {
    pub id: MagnetId,
    pub x: f32,
    pub y: f32,
    pub polarity: Polarity,
    /// Whether this magnet currently pulls particles
    pub active: bool,
    /// Carried for renderers, the update step never reads it
    pub rotation: f32,
}

impl Magnet {
    /// Create an inactive, unrotated magnet
    pub fn new(id: u32, x: f32, y: f32, polarity: Polarity) -> Self {
        Self {
            id: MagnetId(id),
            x,
            y,
            polarity,
            active: false,
            rotation: 0.0,
        }
    }

    /// Builder-style activation, mostly for setting up scenarios
    pub fn activated(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A passive metal object that active magnets pull on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: ParticleId,
    pub x: f32,
    pub y: f32,
}

impl Particle {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id: ParticleId(id),
            x,
            y,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Copy of this particle placed at `position`
    pub fn moved_to(&self, position: Vec2) -> Self {
        Self {
            id: self.id,
            x: position.x,
            y: position.y,
        }
    }
}

/// Reference to any entity the pointer can grab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Magnet(MagnetId),
    Particle(ParticleId),
}

impl From<MagnetId> for EntityRef {
    fn from(id: MagnetId) -> Self {
        EntityRef::Magnet(id)
    }
}

impl From<ParticleId> for EntityRef {
    fn from(id: ParticleId) -> Self {
        EntityRef::Particle(id)
    }
}
