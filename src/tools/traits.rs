//! Tool trait and signature record.
//!
//! A tool is one named, documented unit with an ordered parameter list and a
//! handler that takes string arguments and returns a string. The same shape
//! serves hand-written and descriptor-generated tools, for any parameter
//! count.

use super::error::ArgumentError;
use crate::types::ToolParameter;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Definition of a tool exposed to the inference model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Name, documentation and ordered parameters of a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSignature {
    name: String,
    summary: String,
    parameters: Vec<ToolParameter>,
    documentation: String,
}

impl ToolSignature {
    pub fn new(
        name: impl Into<String>,
        summary: impl Into<String>,
        parameters: Vec<ToolParameter>,
    ) -> Self {
        let summary = summary.into();
        let documentation = render_documentation(&summary, &parameters);
        Self {
            name: name.into(),
            summary,
            parameters,
            documentation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description as configured, without the argument list.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Text the planner reads to decide how to call the tool.
    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    pub fn parameters(&self) -> &[ToolParameter] {
        &self.parameters
    }

    /// JSON Schema for the tool's parameters. Every value is a string.
    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut property = json!({
                "type": "string",
                "description": param.description,
            });
            if param.required {
                required.push(Value::String(param.name.clone()));
            } else {
                property["default"] = Value::String(param.default_value.clone());
            }
            properties.insert(param.name.clone(), property);
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.documentation.clone(),
            parameters: self.parameters_schema(),
        }
    }

    /// Bind runtime arguments to the declared parameters, in order.
    ///
    /// `null` and absent values fall back to the default; a missing required
    /// parameter or an undeclared key is an error.
    pub fn bind(&self, args: &Value) -> Result<BoundArgs, ArgumentError> {
        let empty = Map::new();
        let supplied = match args {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => return Err(ArgumentError::NotAnObject),
        };

        if let Some(extra) = supplied
            .keys()
            .find(|key| !self.parameters.iter().any(|p| &p.name == *key))
        {
            return Err(ArgumentError::Unexpected(extra.clone()));
        }

        let mut bound = Vec::with_capacity(self.parameters.len());
        for param in &self.parameters {
            let value = match supplied.get(&param.name).and_then(stringify) {
                Some(value) => value,
                None if param.required => return Err(ArgumentError::Missing(param.name.clone())),
                None => param.default_value.clone(),
            };
            bound.push((param.name.clone(), value));
        }

        Ok(BoundArgs(bound))
    }
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Documentation text: the description followed by an `Args:` block.
fn render_documentation(summary: &str, parameters: &[ToolParameter]) -> String {
    let mut doc = summary.trim_end().to_string();
    if parameters.is_empty() {
        return doc;
    }

    doc.push_str("\n\nArgs:");
    for param in parameters {
        if param.required {
            doc.push_str(&format!("\n    {}: {}", param.name, param.description));
        } else {
            doc.push_str(&format!(
                "\n    {}: {} (optional, default: '{}')",
                param.name, param.description, param.default_value
            ));
        }
    }
    doc
}

/// Arguments bound to a signature, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArgs(Vec<(String, String)>);

impl BoundArgs {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flat JSON object for request bodies.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }
}

impl fmt::Display for BoundArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': '{}'", key, value)?;
        }
        write!(f, "}}")
    }
}

/// A tool the agent runtime can call by name.
#[async_trait]
pub trait Tool: Send + Sync {
    fn signature(&self) -> &ToolSignature;

    /// Tool name (used in function calls).
    fn name(&self) -> &str {
        self.signature().name()
    }

    /// Human-readable description including the argument list.
    fn description(&self) -> &str {
        self.signature().documentation()
    }

    /// Run the tool. Never fails: every fault is rendered as text.
    async fn execute(&self, args: &BoundArgs) -> String;
}
