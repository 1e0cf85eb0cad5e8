//! System prompt builder.
//!
//! Sections (in order):
//! 1. Base instruction from the configuration store
//! 2. Tool reference, one entry per loaded tool
//! 3. Usage guidelines, specialised for the tools present
//! 4. Closing line

use crate::tools::ToolSet;
use tracing::debug;

const TOOLS_HEADER: &str = "IMPORTANT - YOU HAVE ACCESS TO THESE TOOLS:";
const GUIDELINES_HEADER: &str = "TOOL USAGE GUIDELINES:";

const SEARCH_GUIDELINE: &str =
    "- When users ask questions that require external information, USE the search_web tool";
const END_CALL_GUIDELINE: &str =
    "- When users say goodbye, want to hang up, or the conversation is complete, USE the end_call tool";

const GENERAL_GUIDELINES: &[&str] = &[
    "- When users ask for specific data or APIs, USE the appropriate custom tools",
    "- Always try to use relevant tools rather than saying you cannot help",
    "- Be proactive in using tools to provide accurate and helpful responses",
    "- If you don't have a tool for a specific task, clearly tell the user you cannot perform that action",
];

const CLOSING: &str = "Use these tools actively and appropriately to assist users effectively.";

/// Render the full instruction text for the agent.
pub fn build_instructions(base: &str, tools: &ToolSet) -> String {
    let reference: Vec<String> = tools
        .iter()
        .map(|t| format!("- {}: {}", t.name(), t.description()))
        .collect();

    let mut guidelines = Vec::new();
    if tools.contains("search_web") {
        guidelines.push(SEARCH_GUIDELINE);
    }
    if tools.contains("end_call") {
        guidelines.push(END_CALL_GUIDELINE);
    }
    guidelines.extend_from_slice(GENERAL_GUIDELINES);

    let prompt = format!(
        "{}\n\n{}\n{}\n\n{}\n{}\n\n{}",
        base,
        TOOLS_HEADER,
        reference.join("\n"),
        GUIDELINES_HEADER,
        guidelines.join("\n"),
        CLOSING
    );
    debug!("System prompt: {} chars", prompt.len());
    prompt
}
