//! Session termination by deleting the hosting LiveKit room.

use super::{SessionError, SessionTerminator};
use async_trait::async_trait;
use livekit_api::services::room::RoomClient;
use tracing::info;

/// Deletes one named room through the LiveKit room service.
pub struct LiveKitRoomTerminator {
    client: RoomClient,
    room_name: String,
}

impl std::fmt::Debug for LiveKitRoomTerminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveKitRoomTerminator")
            .field("room_name", &self.room_name)
            .finish()
    }
}

impl LiveKitRoomTerminator {
    pub fn new(url: &str, api_key: &str, api_secret: &str, room_name: impl Into<String>) -> Self {
        Self {
            client: RoomClient::with_api_key(url, api_key, api_secret),
            room_name: room_name.into(),
        }
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }
}

#[async_trait]
impl SessionTerminator for LiveKitRoomTerminator {
    async fn terminate(&self) -> Result<(), SessionError> {
        info!("Deleting room '{}' to end call", self.room_name);
        self.client
            .delete_room(&self.room_name)
            .await
            .map_err(|e| classify_room_error(&e.to_string()))
    }
}

/// Map a room service failure, recognising "room is already gone".
pub(crate) fn classify_room_error(message: &str) -> SessionError {
    let lower = message.to_lowercase();
    if lower.contains("requested room does not exist") || lower.contains("not_found") {
        SessionError::AlreadyEnded
    } else {
        SessionError::RoomService(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_room_counts_as_already_ended() {
        assert!(classify_room_error("twirp error: not_found: requested room does not exist")
            .is_already_ended());
        assert!(classify_room_error("Twirp error NOT_FOUND").is_already_ended());
        assert!(matches!(
            classify_room_error("permission denied"),
            SessionError::RoomService(_)
        ));
    }
}
