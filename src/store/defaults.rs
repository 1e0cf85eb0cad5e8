//! Built-in agent configuration used when the remote store has nothing.

use crate::types::{AgentConfiguration, RequestType, ToolDescriptor, ToolParameter};

pub const DEFAULT_AGENT_INSTRUCTION: &str = "You are a helpful AI assistant.
Speak in a professional and friendly manner.
Be concise and clear in your responses.
Use the available tools when needed to assist users effectively.";

pub const DEFAULT_BEGIN_MESSAGE: &str =
    "Hello! I'm your AI assistant. How can I help you today?";

/// The search_web descriptor shipped with the default configuration.
pub fn default_search_web_tool() -> ToolDescriptor {
    ToolDescriptor {
        id: "search_web".into(),
        name: "search_web".into(),
        description: "Search the web using DuckDuckGo".into(),
        request_type: RequestType::Get,
        request_url: "https://api.duckduckgo.com/".into(),
        parameters: vec![ToolParameter::required("query", "The search query")],
        enabled: true,
    }
}

/// The end_call descriptor shipped with the default configuration.
pub fn default_end_call_tool() -> ToolDescriptor {
    ToolDescriptor {
        id: "end_call".into(),
        name: "end_call".into(),
        description: "End the current call/session when conversation is complete".into(),
        request_type: RequestType::Builtin,
        request_url: String::new(),
        parameters: vec![ToolParameter::optional(
            "reason",
            "Reason for ending the call",
            "Call completed",
        )],
        enabled: true,
    }
}

impl Default for AgentConfiguration {
    fn default() -> Self {
        Self {
            agent_instruction: DEFAULT_AGENT_INSTRUCTION.into(),
            begin_message: DEFAULT_BEGIN_MESSAGE.into(),
            tools: vec![default_search_web_tool(), default_end_call_tool()],
        }
    }
}

/// Opening instruction for the first reply of a session.
pub fn session_instruction(begin_message: &str) -> String {
    format!(
        "# Task\nProvide assistance by using the tools that you have access to when needed.\n\
         Begin the conversation by saying: \"{}\"\n",
        begin_message
    )
}
