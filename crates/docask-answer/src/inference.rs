//! HTTP client for the hosted extractive-QA inference API.
//!
//! Request shape: `{"inputs": {"question": ..., "context": ...}}` with bearer
//! auth. This client never returns an error: every failure mode is folded
//! into the returned answer string, matching the contract of the answering
//! path (contrast with document lookups, which raise through the API layer).

use serde_json::json;

/// Placeholder returned when the API responds 200 without an `answer` field.
pub const NO_ANSWER: &str = "No answer found.";

pub struct InferenceClient {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
}

impl InferenceClient {
    /// Build a client from configuration, with an explicit request timeout.
    pub fn new(config: &docask_core::config::InferenceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
        }
    }

    /// Ask the model a question against the given context excerpt.
    pub async fn question_answer(&self, question: &str, context: &str) -> String {
        let body = json!({
            "inputs": {
                "question": question,
                "context": context,
            }
        });

        let result = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&body)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => match resp.json::<serde_json::Value>().await {
                Ok(json) => match json.get("answer").and_then(|a| a.as_str()) {
                    Some(answer) => answer.replace('\n', " "),
                    None => NO_ANSWER.to_string(),
                },
                Err(e) => format!("An error occurred: {e}"),
            },
            Ok(resp) => {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                tracing::warn!("Inference API returned {status}");
                format!("Error: {}, {}", status.as_u16(), text)
            }
            Err(e) => {
                tracing::warn!("Inference request failed: {e}");
                format!("An error occurred: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> InferenceClient {
        let config = docask_core::config::InferenceConfig {
            // Nothing listens here; connection is refused immediately.
            api_url: "http://127.0.0.1:1/models/test".into(),
            api_token: "test-token".into(),
            timeout_secs: 2,
            chunk_size: 1000,
        };
        InferenceClient::new(&config)
    }

    #[tokio::test]
    async fn test_network_failure_becomes_answer_string() {
        let client = unreachable_client();
        let answer = client.question_answer("q", "context").await;
        assert!(answer.starts_with("An error occurred:"), "got: {answer}");
    }
}
