//! Ollama API request and response types.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// Non-streamed reply of `POST /api/generate`.
///
/// Only `response` is required; the rest is logged when present.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
    #[serde(default)]
    pub total_duration: Option<u64>,
}

/// Reply of `GET /api/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

/// A model available on the local server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelInfo {
    /// Model name including tag, e.g. `llama3.2:latest`.
    pub name: String,
    /// Size on disk in bytes.
    #[serde(default)]
    pub size: Option<u64>,
}

impl ModelInfo {
    /// Whether this entry is `model`, with or without the implicit `:latest` tag.
    #[must_use]
    pub fn matches(&self, model: &str) -> bool {
        self.name == model
            || self
                .name
                .strip_suffix(":latest")
                .is_some_and(|base| base == model)
    }
}

/// Ollama error response.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest {
            model: "llama3.2",
            prompt: "user: hi",
            stream: false,
        };
        let json = serde_json::to_value(&request).expect("serialization should succeed");
        assert_eq!(
            json,
            serde_json::json!({"model": "llama3.2", "prompt": "user: hi", "stream": false})
        );
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "model": "llama3.2",
            "created_at": "2024-01-01T00:00:00Z",
            "response": "Hello!",
            "done": true,
            "context": [1, 2, 3],
            "eval_count": 5
        }"#;

        let response: GenerateResponse =
            serde_json::from_str(json).expect("deserialization should succeed");
        assert_eq!(response.response, "Hello!");
        assert_eq!(response.eval_count, Some(5));
    }

    #[test]
    fn test_response_requires_response_field() {
        let result = serde_json::from_str::<GenerateResponse>(r#"{"done": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_model_info_matches_latest_tag() {
        let info = ModelInfo {
            name: "qwen3:latest".to_owned(),
            size: None,
        };
        assert!(info.matches("qwen3"));
        assert!(info.matches("qwen3:latest"));
        assert!(!info.matches("qwen3:8b"));
    }
}
