//! Firestore REST client for the agent configuration document.

use super::StoreError;
use crate::config::schema::FirestoreSettings;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

/// How requests to Firestore are authenticated.
#[derive(Debug, Clone)]
pub enum FirestoreAuth {
    /// OAuth access token sent as a bearer header.
    Bearer(SecretString),
    /// Web API key sent as the `key` query parameter.
    ApiKey(SecretString),
    None,
}

/// Minimal Firestore document reader.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    base_url: String,
    project_id: String,
    auth: FirestoreAuth,
    http: reqwest::Client,
}

impl FirestoreClient {
    /// Create a new Firestore client.
    pub fn new(settings: &FirestoreSettings, auth: FirestoreAuth) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            project_id: settings.project_id.clone(),
            auth,
            http,
        })
    }

    fn document_url(&self, collection: &str, document: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}/{}",
            self.base_url, self.project_id, collection, document
        )
    }

    /// Fetch a document and return its fields as plain JSON.
    pub async fn get_document(
        &self,
        collection: &str,
        document: &str,
    ) -> Result<Map<String, Value>, StoreError> {
        let url = self.document_url(collection, document);
        debug!("Firestore get: {}", url);

        let mut request = self.http.get(&url);
        match &self.auth {
            FirestoreAuth::Bearer(token) => request = request.bearer_auth(token.expose_secret()),
            FirestoreAuth::ApiKey(key) => request = request.query(&[("key", key.expose_secret())]),
            FirestoreAuth::None => {}
        }

        let resp = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::DocumentMissing(format!("{}/{}", collection, document)));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        match body.get("fields") {
            Some(Value::Object(fields)) => Ok(decode_fields(fields)),
            // A document with no fields at all.
            None => Ok(Map::new()),
            Some(other) => Err(StoreError::Malformed(format!(
                "unexpected fields payload: {}",
                other
            ))),
        }
    }
}

/// Decode a Firestore `fields` map into plain JSON.
pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

/// Decode one Firestore typed value (`{"stringValue": ...}` etc.).
pub fn decode_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "booleanValue" => inner.clone(),
        // Int64 values arrive as decimal strings.
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or_else(|| inner.clone()),
        "doubleValue" => inner.clone(),
        "nullValue" => Value::Null,
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => Value::Object(decode_fields(fields)),
            _ => Value::Object(Map::new()),
        },
        "arrayValue" => match inner.get("values") {
            Some(Value::Array(values)) => Value::Array(values.iter().map(decode_value).collect()),
            _ => Value::Array(Vec::new()),
        },
        "geoPointValue" => inner.clone(),
        _ => Value::Null,
    }
}
