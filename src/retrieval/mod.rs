pub mod orchestrator;
pub mod render;
pub mod rewrite;
pub mod tool;
pub mod types;

pub use orchestrator::RetrievalOrchestrator;
pub use render::NOT_IN_SOURCE_BLOCK;
pub use tool::{OnDemandRetrievalTool, ToolContext};
pub use types::{ReferenceIndex, RetrievalResult, SourceBinding};
