//! Boundary to the external voice-agent runtime.
//!
//! The runtime owns turn-taking and audio. Tools only need two things from
//! it: a way to ask for a spoken reply and a way to end the session.

pub mod livekit;

pub use livekit::LiveKitRoomTerminator;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The session or hosting room no longer exists.
    #[error("session already ended")]
    AlreadyEnded,

    #[error("room service error: {0}")]
    RoomService(String),

    #[error("agent runtime error: {0}")]
    Runtime(String),
}

impl SessionError {
    pub fn is_already_ended(&self) -> bool {
        matches!(self, Self::AlreadyEnded)
    }
}

/// The conversation side of the runtime.
#[async_trait]
pub trait SessionControl: Send + Sync {
    /// Ask the agent to produce a spoken reply following `instructions`.
    async fn generate_reply(&self, instructions: &str) -> Result<(), SessionError>;
}

/// Ends the hosting session.
#[async_trait]
pub trait SessionTerminator: Send + Sync {
    /// Returns [`SessionError::AlreadyEnded`] when there is nothing left to end.
    async fn terminate(&self) -> Result<(), SessionError>;
}

/// Ends a job by cancelling its shutdown token.
#[derive(Debug, Clone, Default)]
pub struct JobShutdown {
    cancel: CancellationToken,
}

impl JobShutdown {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

#[async_trait]
impl SessionTerminator for JobShutdown {
    async fn terminate(&self) -> Result<(), SessionError> {
        if self.cancel.is_cancelled() {
            return Err(SessionError::AlreadyEnded);
        }
        info!("Shutting down job");
        self.cancel.cancel();
        Ok(())
    }
}

/// Stand-in runtime for local tool calls: logs replies instead of speaking.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSession;

#[async_trait]
impl SessionControl for ConsoleSession {
    async fn generate_reply(&self, instructions: &str) -> Result<(), SessionError> {
        info!("Agent reply requested: {}", instructions);
        Ok(())
    }
}
