//! Error types for tool construction and invocation.

use thiserror::Error;

/// A descriptor that cannot be turned into a tool. The tool is skipped; the
/// rest of the tool set still loads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("tool '{0}' has no request URL")]
    MissingUrl(String),

    #[error("tool '{tool}' declares {count} parameters (maximum {max})")]
    TooManyParameters { tool: String, count: usize, max: usize },

    #[error("no built-in implementation for tool '{0}'")]
    UnknownBuiltin(String),

    #[error("invalid tool name '{0}'")]
    InvalidName(String),

    #[error("tool '{tool}' has invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        tool: String,
        parameter: String,
        reason: &'static str,
    },
}

/// Arguments from the runtime that do not fit a tool's signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("missing required argument '{0}'")]
    Missing(String),

    #[error("unexpected argument '{0}'")]
    Unexpected(String),

    #[error("arguments must be a JSON object")]
    NotAnObject,
}

/// Caller-side failure of [`ToolSet::invoke`](super::ToolSet::invoke).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for '{tool}': {source}")]
    Arguments {
        tool: String,
        #[source]
        source: ArgumentError,
    },
}

/// Failure during a live HTTP tool call. The `Display` text is exactly what
/// the agent receives as the tool result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Unsupported request type: {0}")]
    UnsupportedMethod(String),

    #[error("Error: HTTP {status} - {body}")]
    HttpStatus { status: u16, body: String },

    #[error("An error occurred while using {tool}: {fault}")]
    Transport { tool: String, fault: String },
}
