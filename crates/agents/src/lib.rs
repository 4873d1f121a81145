//! Agent handles and the single-exchange session layer.

pub mod registry;
pub mod session;

pub use {
    registry::AgentRegistry,
    session::{AgentSession, StageOutcome},
};
