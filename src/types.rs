//! Shared types used across the agent runtime.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// How a configured tool is executed.
///
/// Parsed case-insensitively. Unknown values are kept verbatim so the tool
/// can still be built and report the problem when it is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestType {
    Get,
    Post,
    Put,
    Delete,
    /// Handled by a hand-written tool, not an HTTP call.
    Builtin,
    /// Anything else the configuration store contains.
    Other(String),
}

impl RequestType {
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin)
    }

    /// The HTTP method for remote request types.
    pub fn http_method(&self) -> Option<reqwest::Method> {
        match self {
            Self::Get => Some(reqwest::Method::GET),
            Self::Post => Some(reqwest::Method::POST),
            Self::Put => Some(reqwest::Method::PUT),
            Self::Delete => Some(reqwest::Method::DELETE),
            Self::Builtin | Self::Other(_) => None,
        }
    }
}

impl From<String> for RequestType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "BUILTIN" => Self::Builtin,
            _ => Self::Other(value),
        }
    }
}

impl From<RequestType> for String {
    fn from(value: RequestType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
            Self::Builtin => write!(f, "BUILTIN"),
            Self::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl Default for RequestType {
    fn default() -> Self {
        Self::Get
    }
}

// ---------------------------------------------------------------------------
// Tool descriptors
// ---------------------------------------------------------------------------

/// One declared parameter of a configured tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolParameter {
    /// Used as the HTTP field key and the exposed argument name.
    pub name: String,
    /// Semantic hint only; every value is bound as a string.
    #[serde(
        rename = "type",
        default = "default_parameter_type",
        deserialize_with = "parameter_type"
    )]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

fn default_parameter_type() -> String {
    "string".into()
}

/// Stored documents may carry explicit nulls; treat them as unset.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn parameter_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_parameter_type))
}

fn enabled_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_enabled))
}

impl ToolParameter {
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: default_parameter_type(),
            required: true,
            default_value: String::new(),
            description: description.into(),
        }
    }

    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: default_parameter_type(),
            required: false,
            default_value: default_value.into(),
            description: description.into(),
        }
    }
}

/// Declarative record describing one externally configured tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_type: RequestType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_url: String,
    /// Order is significant: it is the binding order of the tool's arguments.
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Vec<ToolParameter>,
    #[serde(default = "default_enabled", deserialize_with = "enabled_flag")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Agent configuration document
// ---------------------------------------------------------------------------

/// The agent configuration fetched once per session bootstrap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfiguration {
    pub agent_instruction: String,
    pub begin_message: String,
    pub tools: Vec<ToolDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_type_is_case_insensitive() {
        assert_eq!(RequestType::from("get".to_string()), RequestType::Get);
        assert_eq!(RequestType::from(" Post ".to_string()), RequestType::Post);
        assert_eq!(RequestType::from("builtin".to_string()), RequestType::Builtin);
        assert_eq!(
            RequestType::from("PATCH".to_string()),
            RequestType::Other("PATCH".into())
        );
        assert_eq!(RequestType::Other("patch".into()).to_string(), "patch");
    }

    #[test]
    fn test_descriptor_defaults() {
        let descriptor: ToolDescriptor = serde_json::from_value(json!({
            "name": "weather",
            "requestType": "GET",
            "requestUrl": "https://example.com/weather",
            "parameters": [{ "name": "city" }]
        }))
        .unwrap();

        assert!(descriptor.enabled);
        assert_eq!(descriptor.request_type, RequestType::Get);
        assert_eq!(descriptor.parameters[0].kind, "string");
        assert!(!descriptor.parameters[0].required);
        assert_eq!(descriptor.parameters[0].default_value, "");
    }

    #[test]
    fn test_null_fields_read_as_unset() {
        let descriptor: ToolDescriptor = serde_json::from_value(json!({
            "id": null,
            "name": "lookup",
            "description": null,
            "requestType": null,
            "requestUrl": "https://example.com",
            "enabled": null,
            "parameters": [{
                "name": "id",
                "type": null,
                "required": null,
                "defaultValue": null,
                "description": null
            }]
        }))
        .unwrap();

        assert_eq!(descriptor.id, "");
        assert_eq!(descriptor.request_type, RequestType::Get);
        assert!(descriptor.enabled);
        let param = &descriptor.parameters[0];
        assert_eq!(param.kind, "string");
        assert!(!param.required);
        assert_eq!(param.default_value, "");
        assert_eq!(param.description, "");
    }

    #[test]
    fn test_descriptor_round_trips_camel_case() {
        let descriptor = ToolDescriptor {
            id: "t1".into(),
            name: "lookup".into(),
            description: "Look something up".into(),
            request_type: RequestType::Delete,
            request_url: "https://example.com".into(),
            parameters: vec![ToolParameter::optional("id", "Record id", "42")],
            enabled: false,
        };
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["requestType"], "DELETE");
        assert_eq!(value["parameters"][0]["defaultValue"], "42");
        assert_eq!(value["parameters"][0]["type"], "string");
    }
}
