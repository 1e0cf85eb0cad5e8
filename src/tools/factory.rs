//! Dynamic tool factory: one descriptor in, one invocable tool out.

use super::builtin;
use super::error::BuildError;
use super::http::HttpTool;
use super::traits::{Tool, ToolSignature};
use super::ToolContext;
use crate::types::ToolDescriptor;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Longest tool name the function-calling API accepts.
const MAX_NAME_LEN: usize = 64;

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Build a tool from a descriptor.
///
/// Built-in names resolve to their hand-written tool. Everything else becomes
/// an [`HttpTool`] whose signature mirrors the descriptor's parameters.
/// Construction is deterministic and performs no I/O.
pub fn build_tool(
    descriptor: &ToolDescriptor,
    ctx: &ToolContext,
) -> Result<Arc<dyn Tool>, BuildError> {
    let name = descriptor.name.as_str();
    if !is_identifier(name) || name.len() > MAX_NAME_LEN {
        return Err(BuildError::InvalidName(name.to_string()));
    }

    let url = descriptor.request_url.trim();
    if !descriptor.request_type.is_builtin() && url.is_empty() {
        return Err(BuildError::MissingUrl(name.to_string()));
    }

    if let Some(tool) = builtin::resolve(descriptor, ctx) {
        debug!("Resolved built-in tool '{}'", name);
        return Ok(tool);
    }
    if descriptor.request_type.is_builtin() {
        return Err(BuildError::UnknownBuiltin(name.to_string()));
    }

    let count = descriptor.parameters.len();
    if count > ctx.options.max_parameters {
        return Err(BuildError::TooManyParameters {
            tool: name.to_string(),
            count,
            max: ctx.options.max_parameters,
        });
    }

    let mut seen = HashSet::new();
    for param in &descriptor.parameters {
        let reason = if !is_identifier(&param.name) {
            Some("names may only contain letters, digits, '_' and '-'")
        } else if !seen.insert(param.name.as_str()) {
            Some("declared more than once")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(BuildError::InvalidParameter {
                tool: name.to_string(),
                parameter: param.name.clone(),
                reason,
            });
        }
    }

    let signature = ToolSignature::new(
        name,
        descriptor.description.clone(),
        descriptor.parameters.clone(),
    );
    debug!(
        "Built {} tool '{}' with {} parameters",
        descriptor.request_type, name, count
    );

    Ok(Arc::new(HttpTool::new(
        signature,
        descriptor.request_type.clone(),
        url,
        ctx.http.clone(),
        ctx.options.log_preview_chars,
    )))
}
