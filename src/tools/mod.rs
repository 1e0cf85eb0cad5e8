//! Tool registry.
//!
//! Descriptors from the configuration store become invocable tools here.
//! Every tool shares one HTTP client and one session boundary; the
//! resulting [`ToolSet`] is immutable and safe to share across tasks.

pub mod builtin;
pub mod error;
pub mod factory;
pub mod http;
pub mod traits;

pub use builtin::SmtpConfig;
pub use error::{ArgumentError, BuildError, InvokeError, RequestError};
pub use factory::build_tool;
pub use traits::{BoundArgs, Tool, ToolDefinition, ToolSignature};

use crate::config::{AgentSettings, Secrets};
use crate::session::{SessionControl, SessionTerminator};
use crate::types::ToolDescriptor;
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Build context
// ---------------------------------------------------------------------------

/// Knobs that shape generated tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOptions {
    pub max_parameters: usize,
    pub log_preview_chars: usize,
    pub search_url: String,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            max_parameters: 32,
            log_preview_chars: 500,
            search_url: "https://api.duckduckgo.com/".to_string(),
        }
    }
}

/// Everything a tool may need at construction time.
#[derive(Clone)]
pub struct ToolContext {
    pub http: reqwest::Client,
    pub session: Arc<dyn SessionControl>,
    pub terminator: Arc<dyn SessionTerminator>,
    pub smtp: SmtpConfig,
    pub options: ToolOptions,
}

impl ToolContext {
    pub fn new(
        http: reqwest::Client,
        session: Arc<dyn SessionControl>,
        terminator: Arc<dyn SessionTerminator>,
        smtp: SmtpConfig,
        options: ToolOptions,
    ) -> Self {
        Self {
            http,
            session,
            terminator,
            smtp,
            options,
        }
    }

    /// Build a context from settings and environment secrets.
    pub fn from_settings(
        settings: &AgentSettings,
        secrets: &Secrets,
        session: Arc<dyn SessionControl>,
        terminator: Arc<dyn SessionTerminator>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.tools.http_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let smtp = SmtpConfig {
            host: settings.smtp.host.clone(),
            port: settings.smtp.port,
            starttls: settings.smtp.starttls,
            username: secrets.smtp_username.clone(),
            password: secrets.smtp_password.clone(),
        };

        let options = ToolOptions {
            max_parameters: settings.tools.max_parameters,
            log_preview_chars: settings.tools.log_preview_chars,
            search_url: settings.tools.search_url.clone(),
        };

        Ok(Self::new(http, session, terminator, smtp, options))
    }

    pub fn with_options(mut self, options: ToolOptions) -> Self {
        self.options = options;
        self
    }

    /// Context with a console session and no SMTP credentials.
    #[cfg(test)]
    pub(crate) fn offline() -> Self {
        use crate::session::{ConsoleSession, JobShutdown};
        Self::new(
            reqwest::Client::new(),
            Arc::new(ConsoleSession),
            Arc::new(JobShutdown::default()),
            SmtpConfig {
                host: "smtp.invalid".into(),
                port: 587,
                starttls: true,
                username: None,
                password: None,
            },
            ToolOptions::default(),
        )
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Enabled descriptors, in input order. Nameless entries are dropped.
pub fn list_enabled_tools(descriptors: &[ToolDescriptor]) -> Vec<ToolDescriptor> {
    descriptors
        .iter()
        .filter(|d| d.enabled)
        .filter(|d| {
            if d.name.trim().is_empty() {
                warn!("Skipping tool descriptor '{}' without a name", d.id);
                false
            } else {
                true
            }
        })
        .cloned()
        .collect()
}

/// Built tools keyed by name, in first-seen order.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
    skipped: Vec<(String, BuildError)>,
}

impl ToolSet {
    /// Build every enabled descriptor. Failures are recorded and skipped.
    pub fn from_descriptors(descriptors: &[ToolDescriptor], ctx: &ToolContext) -> Self {
        let mut set = Self::default();

        for descriptor in list_enabled_tools(descriptors) {
            match build_tool(&descriptor, ctx) {
                Ok(tool) => set.insert(tool),
                Err(e) => {
                    warn!("Skipping tool '{}': {}", descriptor.name, e);
                    set.skipped.push((descriptor.name.clone(), e));
                }
            }
        }

        info!(
            "Loaded {} tools ({} skipped)",
            set.tools.len(),
            set.skipped.len()
        );
        set
    }

    /// Add a tool; one with the same name is replaced in place.
    pub fn insert(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => {
                warn!("Tool '{}' defined more than once; using the last one", tool.name());
                *slot = tool;
            }
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Descriptors that failed to build, with the reason.
    pub fn skipped(&self) -> &[(String, BuildError)] {
        &self.skipped
    }

    /// Function-calling definitions for the inference model.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.signature().definition()).collect()
    }

    /// Bind `args` and run the named tool.
    pub async fn invoke(&self, name: &str, args: &Value) -> Result<String, InvokeError> {
        let tool = self
            .get(name)
            .ok_or_else(|| InvokeError::UnknownTool(name.to_string()))?;
        let bound = tool
            .signature()
            .bind(args)
            .map_err(|source| InvokeError::Arguments {
                tool: name.to_string(),
                source,
            })?;
        Ok(tool.execute(&bound).await)
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.names())
            .field("skipped", &self.skipped)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::defaults::{default_end_call_tool, default_search_web_tool};
    use crate::types::{RequestType, ToolParameter};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn http_descriptor(name: &str, url: &str) -> ToolDescriptor {
        ToolDescriptor {
            id: format!("id-{}", name),
            name: name.into(),
            description: format!("The {} tool.", name),
            request_type: RequestType::Post,
            request_url: url.into(),
            parameters: vec![ToolParameter::required("item", "Item id")],
            enabled: true,
        }
    }

    #[test]
    fn test_list_enabled_keeps_order_and_drops_disabled() {
        let mut disabled = http_descriptor("b", "https://example.com");
        disabled.enabled = false;
        let nameless = http_descriptor("", "https://example.com");
        let descriptors = vec![
            http_descriptor("a", "https://example.com"),
            disabled,
            nameless,
            http_descriptor("c", "https://example.com"),
        ];

        let names: Vec<String> = list_enabled_tools(&descriptors)
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_default_configuration_builds_both_tools() {
        let set = ToolSet::from_descriptors(
            &[default_search_web_tool(), default_end_call_tool()],
            &ToolContext::offline(),
        );
        assert_eq!(set.names(), vec!["search_web", "end_call"]);
        assert!(set.skipped().is_empty());
    }

    #[test]
    fn test_bad_descriptor_is_skipped_others_load() {
        let set = ToolSet::from_descriptors(
            &[
                http_descriptor("first", "https://example.com"),
                http_descriptor("broken", ""),
                http_descriptor("last", "https://example.com"),
            ],
            &ToolContext::offline(),
        );

        assert_eq!(set.names(), vec!["first", "last"]);
        assert_eq!(
            set.skipped(),
            &[("broken".to_string(), BuildError::MissingUrl("broken".into()))]
        );
    }

    #[test]
    fn test_duplicate_name_replaces_in_place() {
        let mut second = http_descriptor("dup", "https://two.example.com");
        second.description = "Second definition.".into();
        let set = ToolSet::from_descriptors(
            &[
                http_descriptor("dup", "https://one.example.com"),
                http_descriptor("other", "https://example.com"),
                second,
            ],
            &ToolContext::offline(),
        );

        assert_eq!(set.names(), vec!["dup", "other"]);
        assert_eq!(set.get("dup").unwrap().signature().summary(), "Second definition.");
    }

    #[test]
    fn test_definitions_follow_tool_order() {
        let set = ToolSet::from_descriptors(
            &[default_search_web_tool(), default_end_call_tool()],
            &ToolContext::offline(),
        );
        let defs = set.definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "search_web");
        assert_eq!(defs[0].parameters["required"], json!(["query"]));
        assert_eq!(defs[1].parameters["properties"]["reason"]["default"], "Call completed");
    }

    #[tokio::test]
    async fn test_invoke_unknown_and_bad_arguments() {
        let set = ToolSet::from_descriptors(
            &[http_descriptor("lookup", "https://example.com")],
            &ToolContext::offline(),
        );

        assert_eq!(
            set.invoke("missing", &json!({})).await,
            Err(InvokeError::UnknownTool("missing".into()))
        );
        assert_eq!(
            set.invoke("lookup", &json!({})).await,
            Err(InvokeError::Arguments {
                tool: "lookup".into(),
                source: ArgumentError::Missing("item".into()),
            })
        );
    }

    #[tokio::test]
    async fn test_invoke_posts_bound_arguments() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({ "item": "42" })))
            .respond_with(ResponseTemplate::new(200).set_body_string("stored"))
            .expect(1)
            .mount(&server)
            .await;

        let set = ToolSet::from_descriptors(
            &[http_descriptor("store", &server.uri())],
            &ToolContext::offline(),
        );
        assert_eq!(
            set.invoke("store", &json!({ "item": 42 })).await,
            Ok("stored".to_string())
        );
    }
}
