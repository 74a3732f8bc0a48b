//! Game session pipeline and the host driver

pub mod driver;
pub mod session;

pub use driver::{Driver, DriverSummary};
pub use session::{GameSession, GameSummary, StepOutput};

use crate::game::SimulationError;

/// Session-level failures surfaced to the host
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Simulation invariant violated: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Session terminated by an earlier fault; restart required")]
    SessionTerminated,
}
