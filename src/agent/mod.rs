//! Agent assembly: system prompt and session blueprint.

pub mod blueprint;
pub mod system_prompt;

pub use blueprint::{AgentBlueprint, BlueprintView};
pub use system_prompt::build_instructions;
