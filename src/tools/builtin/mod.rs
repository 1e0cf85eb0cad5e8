//! Hand-written tools resolved by name.

pub mod end_call;
pub mod search_web;
pub mod send_email;

pub use end_call::EndCallTool;
pub use search_web::SearchWebTool;
pub use send_email::{SendEmailTool, SmtpConfig};

use super::traits::Tool;
use super::ToolContext;
use crate::types::ToolDescriptor;
use std::sync::Arc;

/// Resolve a descriptor to its hand-written tool, if one exists.
///
/// `search_web` and `end_call` resolve by name alone. `send_email` resolves
/// only for `BUILTIN` descriptors, so a configured HTTP tool of that name
/// stays an HTTP tool. The descriptor may override the description; the
/// parameter list is fixed by the implementation.
pub fn resolve(descriptor: &ToolDescriptor, ctx: &ToolContext) -> Option<Arc<dyn Tool>> {
    let summary = Some(descriptor.description.trim()).filter(|d| !d.is_empty());

    let tool: Arc<dyn Tool> = match descriptor.name.as_str() {
        "search_web" => {
            let endpoint = Some(descriptor.request_url.trim())
                .filter(|u| !u.is_empty())
                .unwrap_or(&ctx.options.search_url);
            Arc::new(SearchWebTool::new(
                summary,
                endpoint,
                ctx.http.clone(),
                ctx.options.log_preview_chars,
            ))
        }
        "end_call" => Arc::new(EndCallTool::new(
            summary,
            ctx.session.clone(),
            ctx.terminator.clone(),
        )),
        "send_email" if descriptor.request_type.is_builtin() => {
            Arc::new(SendEmailTool::new(summary, ctx.smtp.clone()))
        }
        _ => return None,
    };
    Some(tool)
}
