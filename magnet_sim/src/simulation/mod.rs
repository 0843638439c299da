pub mod attraction;
pub mod state;

pub use attraction::{AttractionSettings, PULL_RADIUS, STEP_SIZE};
pub use state::{SimulationState, Snapshot};
