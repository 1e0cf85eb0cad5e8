//! Web search through the DuckDuckGo instant answer API.

use crate::tools::http::log_preview;
use crate::tools::traits::{BoundArgs, Tool, ToolSignature};
use crate::types::ToolParameter;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

const DEFAULT_SUMMARY: &str = "Search the web using DuckDuckGo.";

/// Related topics beyond this count are dropped.
const MAX_TOPICS: usize = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct InstantAnswer {
    heading: String,
    abstract_text: String,
    #[serde(rename = "AbstractURL")]
    abstract_url: String,
    answer: String,
    definition: String,
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RelatedTopic {
    text: String,
    #[serde(rename = "FirstURL")]
    first_url: String,
    /// Grouped topics nest one level.
    topics: Vec<RelatedTopic>,
}

pub struct SearchWebTool {
    signature: ToolSignature,
    endpoint: String,
    http: reqwest::Client,
    preview_chars: usize,
}

impl SearchWebTool {
    pub fn new(
        summary: Option<&str>,
        endpoint: &str,
        http: reqwest::Client,
        preview_chars: usize,
    ) -> Self {
        Self {
            signature: ToolSignature::new(
                "search_web",
                summary.unwrap_or(DEFAULT_SUMMARY),
                vec![ToolParameter::required("query", "The search query")],
            ),
            endpoint: endpoint.to_string(),
            http,
            preview_chars,
        }
    }

    async fn search(&self, query: &str) -> Result<String> {
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .context("Search request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Search failed ({}): {}", status, body);
        }

        // The API answers with a javascript content type; parse the text.
        let body = resp.text().await.context("Failed to read search response")?;
        let answer: InstantAnswer =
            serde_json::from_str(&body).context("Failed to parse search response")?;

        Ok(format_answer(query, &answer))
    }
}

fn format_answer(query: &str, answer: &InstantAnswer) -> String {
    let mut lines = Vec::new();

    if !answer.answer.is_empty() {
        lines.push(format!("Answer: {}", answer.answer));
    }
    if !answer.abstract_text.is_empty() {
        let heading = if answer.heading.is_empty() {
            query
        } else {
            answer.heading.as_str()
        };
        lines.push(format!("{}: {}", heading, answer.abstract_text));
        if !answer.abstract_url.is_empty() {
            lines.push(format!("Source: {}", answer.abstract_url));
        }
    }
    if !answer.definition.is_empty() {
        lines.push(format!("Definition: {}", answer.definition));
    }

    let topics: Vec<&RelatedTopic> = answer
        .related_topics
        .iter()
        .flat_map(|t| {
            if t.topics.is_empty() {
                vec![t]
            } else {
                t.topics.iter().collect()
            }
        })
        .filter(|t| !t.text.is_empty())
        .take(MAX_TOPICS)
        .collect();
    if !topics.is_empty() {
        lines.push("Related:".to_string());
        for topic in topics {
            if topic.first_url.is_empty() {
                lines.push(format!("- {}", topic.text));
            } else {
                lines.push(format!("- {} ({})", topic.text, topic.first_url));
            }
        }
    }

    if lines.is_empty() {
        format!("No results found for '{}'.", query)
    } else {
        lines.join("\n")
    }
}

#[async_trait]
impl Tool for SearchWebTool {
    fn signature(&self) -> &ToolSignature {
        &self.signature
    }

    async fn execute(&self, args: &BoundArgs) -> String {
        let query = args.get("query").unwrap_or_default();
        info!("Tool 'search_web' invoked with parameters: {}", args);
        info!("Making web search request to: {}", self.endpoint);

        match self.search(query).await {
            Ok(results) => {
                info!("Tool 'search_web' completed successfully");
                info!(
                    "Tool 'search_web' response: {}",
                    log_preview(&results, self.preview_chars)
                );
                results
            }
            Err(e) => {
                error!("Tool 'search_web' exception: {:#}", e);
                format!("An error occurred while searching the web for '{}'.", query)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool(endpoint: &str) -> SearchWebTool {
        SearchWebTool::new(None, endpoint, reqwest::Client::new(), 500)
    }

    async fn search(tool: &SearchWebTool, query: &str) -> String {
        let bound = tool.signature().bind(&json!({ "query": query })).unwrap();
        tool.execute(&bound).await
    }

    #[tokio::test]
    async fn test_formats_abstract_and_topics() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "rust"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                json!({
                    "Heading": "Rust",
                    "AbstractText": "Rust is a systems programming language.",
                    "AbstractURL": "https://en.wikipedia.org/wiki/Rust",
                    "RelatedTopics": [
                        { "Text": "Cargo - package manager", "FirstURL": "https://ddg.gg/Cargo" },
                        { "Name": "Group", "Topics": [ { "Text": "Crates", "FirstURL": "" } ] }
                    ]
                })
                .to_string(),
            ))
            .mount(&server)
            .await;

        assert_eq!(
            search(&tool(&server.uri()), "rust").await,
            "Rust: Rust is a systems programming language.\n\
             Source: https://en.wikipedia.org/wiki/Rust\n\
             Related:\n\
             - Cargo - package manager (https://ddg.gg/Cargo)\n\
             - Crates"
        );
    }

    #[tokio::test]
    async fn test_empty_answer_reports_no_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        assert_eq!(
            search(&tool(&server.uri()), "zzzz").await,
            "No results found for 'zzzz'."
        );
    }

    #[tokio::test]
    async fn test_backend_fault_is_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert_eq!(
            search(&tool(&server.uri()), "cats").await,
            "An error occurred while searching the web for 'cats'."
        );
    }
}
