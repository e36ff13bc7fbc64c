pub mod config;
mod context;
pub mod copier;
pub mod orchestrator;
pub mod plan;
pub mod report;
pub mod secrets;
pub mod workflow_source;

pub use context::AppContext;
pub use orchestrator::{Orchestrator, Progress};
