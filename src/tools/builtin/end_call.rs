//! Says goodbye and ends the session.

use crate::session::{SessionControl, SessionError, SessionTerminator};
use crate::tools::traits::{BoundArgs, Tool, ToolSignature};
use crate::types::ToolParameter;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

const DEFAULT_SUMMARY: &str =
    "End the current call/session. Use when conversation is complete or user requests to hang up.";

pub const DEFAULT_REASON: &str = "Call completed";

pub struct EndCallTool {
    signature: ToolSignature,
    session: Arc<dyn SessionControl>,
    terminator: Arc<dyn SessionTerminator>,
}

impl EndCallTool {
    pub fn new(
        summary: Option<&str>,
        session: Arc<dyn SessionControl>,
        terminator: Arc<dyn SessionTerminator>,
    ) -> Self {
        Self {
            signature: ToolSignature::new(
                "end_call",
                summary.unwrap_or(DEFAULT_SUMMARY),
                vec![ToolParameter::optional(
                    "reason",
                    "Reason for ending the call",
                    DEFAULT_REASON,
                )],
            ),
            session,
            terminator,
        }
    }

    async fn end(&self, reason: &str) -> Result<(), SessionError> {
        self.session
            .generate_reply(&format!(
                "Say a polite goodbye. Reason: {}. Do NOT mention function names or special characters.",
                reason
            ))
            .await?;

        info!("Terminating session to end call...");
        self.terminator.terminate().await
    }
}

#[async_trait]
impl Tool for EndCallTool {
    fn signature(&self) -> &ToolSignature {
        &self.signature
    }

    async fn execute(&self, args: &BoundArgs) -> String {
        let reason = args.get("reason").unwrap_or(DEFAULT_REASON);
        info!("Tool 'end_call' invoked with reason: '{}'", reason);

        match self.end(reason).await {
            Ok(()) => {
                info!("Call ended successfully: {}", reason);
                format!("Call ended: {}. Goodbye!", reason)
            }
            Err(SessionError::AlreadyEnded) => {
                info!("Call ended successfully: {} (session already gone)", reason);
                format!("Call ended: {}. Goodbye!", reason)
            }
            Err(e) => {
                error!("Error ending call: {}", e);
                format!("Error ending call: {}", e)
            }
        }
    }
}
