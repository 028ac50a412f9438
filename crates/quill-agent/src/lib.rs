//! Agent core: the iteration loop and tool-dispatch engine
//!
//! Alternates between querying the model endpoint and executing the
//! tools it requests, with every filesystem and process side effect
//! confined to a configured sandbox root.

use thiserror::Error;

pub mod agent_loop;
pub mod context;
pub mod events;
pub mod tools;

pub use agent_loop::AgentLoop;
pub use events::{EventSink, NullSink};
pub use tools::{ToolError, ToolRegistry, ToolTrait};

/// Loop-fatal errors. Tool-level faults never reach this type; they
/// are rendered into tool-result text inside the registry boundary.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("model endpoint failure: {0}")]
    Provider(String),

    #[error("iteration limit of {0} reached without a final answer")]
    IterationLimit(u32),

    #[error(transparent)]
    History(#[from] quill_history::HistoryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;
