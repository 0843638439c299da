use crate::entities::{MagnetId, ParticleId};

/// Caller-contract violations reported by state mutations.
///
/// The state is left untouched whenever one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("no magnet with id {0}")]
    UnknownMagnet(MagnetId),

    #[error("no particle with id {0}")]
    UnknownParticle(ParticleId),
}
