//! OpenAI 兼容的 Chat Completion 客户端

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::config::LlmConfig;
use crate::errors::{Result, TutorHubError};

const SYSTEM_PROMPT: &str = "You are a helpful tutoring assistant.";

pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self { http, config })
    }

    /// 启用且配置了 API Key
    pub fn is_available(&self) -> bool {
        self.config.enabled && !self.config.api_key.trim().is_empty()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.config.api_key.trim()))
                .map_err(|_| TutorHubError::llm("Invalid API key header"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// 发送单轮对话，返回第一条回复的内容
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        if !self.is_available() {
            return Err(TutorHubError::llm("LLM is disabled or has no API key"));
        }

        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );
        let body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        tracing::debug!("Sending chat completion to {} ({})", url, self.config.model);

        let resp = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(TutorHubError::llm(format!("LLM error {status}: {text}")));
        }

        let json: Value = resp.json().await?;
        json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| TutorHubError::llm("LLM response has no message content"))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::LlmConfig;

    pub fn llm_config(api_base: &str) -> LlmConfig {
        LlmConfig {
            enabled: true,
            api_base: api_base.to_string(),
            api_key: "test-key".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 300,
            temperature: 0.2,
            timeout_secs: 5,
        }
    }

    pub fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{completion_body, llm_config};
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(
                json!({"model": "gpt-3.5-turbo", "max_tokens": 300}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("hello")))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::new(llm_config(&server.uri())).unwrap();
        assert_eq!(client.complete("hi").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_complete_maps_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = LlmClient::new(llm_config(&server.uri())).unwrap();
        let err = client.complete("hi").await.unwrap_err();
        assert_eq!(err.code(), "E014");
        assert!(err.message().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_disabled_client_does_not_call_out() {
        let mut config = llm_config("http://127.0.0.1:9");
        config.api_key.clear();
        let client = LlmClient::new(config).unwrap();
        assert!(!client.is_available());
        assert!(client.complete("hi").await.is_err());
    }
}
