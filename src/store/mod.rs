//! Remote agent configuration with a built-in fallback.
//!
//! The configuration document is fetched once per session bootstrap. Any
//! failure to reach the store falls back to [`AgentConfiguration::default`],
//! so the agent stays usable with zero external configuration.

pub mod defaults;
pub mod firestore;

pub use defaults::session_instruction;
pub use firestore::{FirestoreAuth, FirestoreClient};

use crate::config::{schema::FirestoreSettings, Secrets};
use crate::types::{AgentConfiguration, ToolDescriptor};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info, warn};

/// Why the remote configuration could not be used.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no configuration store configured")]
    NotConfigured,

    #[error("configuration document not found: {0}")]
    DocumentMissing(String),

    #[error("configuration store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("configuration store unreachable: {0}")]
    Transport(String),

    #[error("malformed configuration document: {0}")]
    Malformed(String),
}

/// Explicit handle to the configuration store.
#[derive(Debug, Clone)]
pub struct ConfigService {
    client: Option<FirestoreClient>,
    collection: String,
    document: String,
}

impl ConfigService {
    /// Connect to the store described by `settings`. Never fails: a store
    /// that cannot be set up yields a service that only serves defaults.
    pub fn new(settings: &FirestoreSettings, secrets: &Secrets) -> Self {
        let client = if settings.project_id.is_empty() {
            warn!("Firestore project not configured, using default configuration");
            None
        } else {
            let auth = match (&secrets.firestore_access_token, &secrets.firebase_api_key) {
                (Some(token), _) => FirestoreAuth::Bearer(token.clone()),
                (None, Some(key)) => FirestoreAuth::ApiKey(key.clone()),
                (None, None) => FirestoreAuth::None,
            };
            match FirestoreClient::new(settings, auth) {
                Ok(client) => {
                    info!("Firestore client initialized for project '{}'", settings.project_id);
                    Some(client)
                }
                Err(e) => {
                    error!("Failed to initialize Firestore: {}", e);
                    None
                }
            }
        };

        Self {
            client,
            collection: settings.collection.clone(),
            document: settings.document.clone(),
        }
    }

    /// A service with no remote store.
    pub fn offline() -> Self {
        Self {
            client: None,
            collection: String::new(),
            document: String::new(),
        }
    }

    /// Load the configuration, falling back to defaults on any store failure.
    pub async fn load_configuration(&self) -> AgentConfiguration {
        match self.fetch().await {
            Ok(fields) => {
                info!("Configuration loaded from Firestore");
                merge_document(AgentConfiguration::default(), &fields)
            }
            Err(StoreError::NotConfigured) => {
                warn!("Configuration store not available, using default configuration");
                AgentConfiguration::default()
            }
            Err(StoreError::DocumentMissing(doc)) => {
                info!("No configuration found at {}, using defaults", doc);
                AgentConfiguration::default()
            }
            Err(e) => {
                error!("Error loading configuration: {}", e);
                AgentConfiguration::default()
            }
        }
    }

    async fn fetch(&self) -> Result<Map<String, Value>, StoreError> {
        let client = self.client.as_ref().ok_or(StoreError::NotConfigured)?;
        client.get_document(&self.collection, &self.document).await
    }
}

/// Overlay a decoded document on top of `base`, key by key.
pub fn merge_document(mut base: AgentConfiguration, fields: &Map<String, Value>) -> AgentConfiguration {
    if let Some(instruction) = fields.get("agentInstruction").and_then(Value::as_str) {
        base.agent_instruction = instruction.to_string();
    }
    if let Some(message) = fields.get("beginMessage").and_then(Value::as_str) {
        base.begin_message = message.to_string();
    }
    match fields.get("tools") {
        Some(Value::Array(entries)) => base.tools = parse_descriptors(entries),
        Some(other) => warn!("Ignoring non-list 'tools' field in configuration: {}", other),
        None => {}
    }
    base
}

/// Parse tool descriptors one by one, skipping entries that do not decode.
pub fn parse_descriptors(entries: &[Value]) -> Vec<ToolDescriptor> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            match serde_json::from_value::<ToolDescriptor>(entry.clone()) {
                Ok(descriptor) => Some(descriptor),
                Err(e) => {
                    warn!("Skipping malformed tool entry #{}: {}", index, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestType;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> ConfigService {
        let settings = FirestoreSettings {
            project_id: "demo".into(),
            base_url: server.uri(),
            ..FirestoreSettings::default()
        };
        ConfigService::new(&settings, &Secrets::default())
    }

    #[test]
    fn test_merge_overrides_only_present_keys() {
        let fields = json!({ "beginMessage": "Welcome to Acme." });
        let merged = merge_document(AgentConfiguration::default(), fields.as_object().unwrap());

        assert_eq!(merged.begin_message, "Welcome to Acme.");
        assert_eq!(merged.agent_instruction, defaults::DEFAULT_AGENT_INSTRUCTION);
        assert_eq!(merged.tools.len(), 2);
    }

    #[test]
    fn test_malformed_tool_entries_are_skipped() {
        let entries = vec![
            json!({ "name": "ok", "requestType": "post", "requestUrl": "https://x" }),
            json!({ "name": "bad", "parameters": "not-a-list" }),
            json!("not an object"),
        ];
        let parsed = parse_descriptors(&entries);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "ok");
        assert_eq!(parsed[0].request_type, RequestType::Post);
    }

    #[test]
    fn test_null_values_keep_the_tool() {
        let entries = vec![json!({
            "name": "lookup",
            "requestType": "GET",
            "requestUrl": "https://api.example.com/lookup",
            "description": null,
            "parameters": [{ "name": "id", "required": false, "defaultValue": null }]
        })];
        let parsed = parse_descriptors(&entries);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].parameters[0].default_value, "");
    }

    #[test]
    fn test_firestore_null_value_decodes_to_empty_default() {
        let document = json!({
            "tools": { "arrayValue": { "values": [
                { "mapValue": { "fields": {
                    "name": { "stringValue": "lookup" },
                    "requestUrl": { "stringValue": "https://api.example.com" },
                    "parameters": { "arrayValue": { "values": [
                        { "mapValue": { "fields": {
                            "name": { "stringValue": "id" },
                            "defaultValue": { "nullValue": null }
                        }}}
                    ]}}
                }}}
            ]}}
        });
        let fields = firestore::decode_fields(document.as_object().unwrap());
        let merged = merge_document(AgentConfiguration::default(), &fields);

        assert_eq!(merged.tools.len(), 1);
        assert_eq!(merged.tools[0].parameters[0].name, "id");
        assert_eq!(merged.tools[0].parameters[0].default_value, "");
    }

    #[tokio::test]
    async fn test_offline_service_serves_defaults() {
        let config = ConfigService::offline().load_configuration().await;
        assert_eq!(config, AgentConfiguration::default());
    }

    #[tokio::test]
    async fn test_unreachable_store_serves_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let config = service_for(&server).load_configuration().await;
        assert_eq!(config, AgentConfiguration::default());
    }

    #[tokio::test]
    async fn test_remote_document_replaces_tools() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fields": {
                    "agentInstruction": { "stringValue": "You book tables." },
                    "tools": { "arrayValue": { "values": [
                        { "mapValue": { "fields": {
                            "name": { "stringValue": "book_table" },
                            "requestType": { "stringValue": "POST" },
                            "requestUrl": { "stringValue": "https://api.example.com/book" },
                            "enabled": { "booleanValue": true }
                        }}}
                    ]}}
                }
            })))
            .mount(&server)
            .await;

        let config = service_for(&server).load_configuration().await;
        assert_eq!(config.agent_instruction, "You book tables.");
        assert_eq!(config.begin_message, defaults::DEFAULT_BEGIN_MESSAGE);
        assert_eq!(config.tools.len(), 1);
        assert_eq!(config.tools[0].name, "book_table");
    }
}
