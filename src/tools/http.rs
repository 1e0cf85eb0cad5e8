//! Descriptor-generated tools that call an HTTP endpoint.

use super::error::RequestError;
use super::traits::{BoundArgs, Tool, ToolSignature};
use crate::types::RequestType;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{error, info};

/// Keep the first `max` characters of `text` for a log line.
pub(crate) fn log_preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// A tool that forwards its arguments to a configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpTool {
    signature: ToolSignature,
    request_type: RequestType,
    url: String,
    http: reqwest::Client,
    preview_chars: usize,
}

impl HttpTool {
    pub(crate) fn new(
        signature: ToolSignature,
        request_type: RequestType,
        url: impl Into<String>,
        http: reqwest::Client,
        preview_chars: usize,
    ) -> Self {
        Self {
            signature,
            request_type,
            url: url.into(),
            http,
            preview_chars,
        }
    }

    /// Build the outbound request: query string for GET/DELETE, JSON body
    /// for POST/PUT.
    fn request(&self, args: &BoundArgs) -> Result<reqwest::RequestBuilder, RequestError> {
        let Some(method) = self.request_type.http_method() else {
            return Err(RequestError::UnsupportedMethod(self.request_type.to_string()));
        };
        let builder = self.http.request(method, &self.url);

        if args.is_empty() {
            return Ok(builder);
        }
        Ok(match &self.request_type {
            RequestType::Get | RequestType::Delete => builder.query(args.pairs()),
            _ => builder.json(&args.to_json()),
        })
    }

    async fn send(&self, args: &BoundArgs) -> Result<String, RequestError> {
        let name = self.signature.name();
        let request = self.request(args)?;

        info!("Making {} request to: {}", self.request_type, self.url);

        let transport = |e: reqwest::Error| RequestError::Transport {
            tool: name.to_string(),
            fault: e.to_string(),
        };

        let resp = request.send().await.map_err(transport)?;
        let status = resp.status();
        info!("Tool '{}' received HTTP {}", name, status.as_u16());

        let body = resp.text().await.map_err(transport)?;
        if status != StatusCode::OK {
            return Err(RequestError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let result = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(json) => serde_json::to_string_pretty(&json).unwrap_or(body),
            Err(_) => body,
        };

        info!("Tool '{}' completed successfully", name);
        info!(
            "Tool '{}' response: {}",
            name,
            log_preview(&result, self.preview_chars)
        );
        Ok(result)
    }
}

#[async_trait]
impl Tool for HttpTool {
    fn signature(&self) -> &ToolSignature {
        &self.signature
    }

    async fn execute(&self, args: &BoundArgs) -> String {
        info!("Tool '{}' invoked with parameters: {}", self.signature.name(), args);

        match self.send(args).await {
            Ok(result) => result,
            Err(e) => {
                error!("Tool '{}' failed: {}", self.signature.name(), e);
                e.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolParameter;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool(request_type: RequestType, url: &str, params: Vec<ToolParameter>) -> HttpTool {
        HttpTool::new(
            ToolSignature::new("lookup", "Look something up.", params),
            request_type,
            url,
            reqwest::Client::new(),
            500,
        )
    }

    fn query_tool(request_type: RequestType, url: &str) -> HttpTool {
        tool(
            request_type,
            url,
            vec![ToolParameter::required("query", "The query")],
        )
    }

    async fn call(tool: &HttpTool, args: serde_json::Value) -> String {
        let bound = tool.signature().bind(&args).unwrap();
        tool.execute(&bound).await
    }

    #[test]
    fn test_log_preview_truncates_on_char_boundary() {
        assert_eq!(log_preview("short", 10), "short");
        assert_eq!(log_preview("héllo wörld", 5), "héllo...");
        assert_eq!(log_preview("exact", 5), "exact");
    }

    #[tokio::test]
    async fn test_get_sends_query_and_pretty_prints_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("query", "cats"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"a":1}"#))
            .expect(1)
            .mount(&server)
            .await;

        let tool = query_tool(RequestType::Get, &format!("{}/search", server.uri()));
        assert_eq!(call(&tool, json!({ "query": "cats" })).await, "{\n  \"a\": 1\n}");
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_returned_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let tool = query_tool(RequestType::Get, &server.uri());
        assert_eq!(call(&tool, json!({ "query": "cats" })).await, "ok");
    }

    #[tokio::test]
    async fn test_delete_uses_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(query_param("query", "42"))
            .respond_with(ResponseTemplate::new(200).set_body_string("deleted"))
            .expect(1)
            .mount(&server)
            .await;

        let tool = query_tool(RequestType::Delete, &server.uri());
        assert_eq!(call(&tool, json!({ "query": "42" })).await, "deleted");
    }

    #[tokio::test]
    async fn test_post_and_put_send_json_body() {
        let server = MockServer::start().await;
        for verb in ["POST", "PUT"] {
            Mock::given(method(verb))
                .and(body_json(json!({ "name": "Ada", "party": "2" })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
                .expect(1)
                .mount(&server)
                .await;
        }

        let params = vec![
            ToolParameter::required("name", "Guest name"),
            ToolParameter::optional("party", "Party size", "2"),
        ];
        for request_type in [RequestType::Post, RequestType::Put] {
            let tool = tool(request_type, &server.uri(), params.clone());
            assert_eq!(
                call(&tool, json!({ "name": "Ada" })).await,
                "{\n  \"ok\": true\n}"
            );
        }
    }

    #[tokio::test]
    async fn test_non_200_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let tool = query_tool(RequestType::Get, &server.uri());
        assert_eq!(
            call(&tool, json!({ "query": "cats" })).await,
            "Error: HTTP 404 - not found"
        );
    }

    #[tokio::test]
    async fn test_other_2xx_is_not_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_string("created"))
            .mount(&server)
            .await;

        let tool = tool(RequestType::Post, &server.uri(), Vec::new());
        assert_eq!(call(&tool, json!({})).await, "Error: HTTP 201 - created");
    }

    #[tokio::test]
    async fn test_transport_fault_becomes_text() {
        // Nothing listens on port 1.
        let tool = query_tool(RequestType::Get, "http://127.0.0.1:1/search");
        let result = call(&tool, json!({ "query": "cats" })).await;
        assert!(
            result.starts_with("An error occurred while using lookup: "),
            "unexpected result: {}",
            result
        );
    }

    #[tokio::test]
    async fn test_unsupported_method_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tool = query_tool(RequestType::Other("PATCH".into()), &server.uri());
        assert_eq!(
            call(&tool, json!({ "query": "cats" })).await,
            "Unsupported request type: PATCH"
        );
    }
}
