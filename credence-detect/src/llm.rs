//! LLM-as-judge detector
//!
//! Asks a chat model for the probability that a passage was machine-written.
//! Speaks to OpenAI-compatible endpoints (OpenAI, OpenRouter, local servers)
//! through async-openai and to Anthropic's Messages API directly.

use std::sync::LazyLock;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use tracing::debug;

use crate::{AiDetector, DetectError};

/// System prompt for authorship judgement
const DETECTOR_SYSTEM_PROMPT: &str = r#"
You are an expert in distinguishing human-written prose from text produced by large language models.

You are given a passage taken from a web article. Estimate the probability that it was generated by an AI model.

Rules:
1. Output ONLY a single decimal number between 0 and 1
2. 0 means certainly human-written, 1 means certainly AI-generated
3. Do not explain your answer
"#;

/// A probability answer needs only a handful of tokens
const VERDICT_MAX_TOKENS: u16 = 16;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?|\.\d+").unwrap());

enum Transport {
    OpenAi(Client<OpenAIConfig>),
    Anthropic {
        http: reqwest::Client,
        api_key: String,
        base_url: String,
    },
}

/// Detector that asks a chat model for a verdict
pub struct LlmDetector {
    transport: Transport,
    model: String,
}

impl LlmDetector {
    /// OpenAI or any OpenAI-compatible server when `base_url` is set
    pub fn openai(api_key: &str, model: &str, base_url: Option<&str>) -> Result<Self, DetectError> {
        if api_key.is_empty() {
            return Err(DetectError::Config("missing API key".to_string()));
        }

        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base_url) = base_url {
            config = config.with_api_base(base_url);
        }

        Ok(Self {
            transport: Transport::OpenAi(Client::with_config(config)),
            model: model.to_string(),
        })
    }

    /// Keyless local server such as Ollama or llama.cpp
    pub fn local(base_url: &str, model: &str) -> Result<Self, DetectError> {
        Self::openai("sk-local", model, Some(base_url))
    }

    pub fn openrouter(api_key: &str, model: &str) -> Result<Self, DetectError> {
        Self::openai(api_key, model, Some(OPENROUTER_BASE_URL))
    }

    pub fn anthropic(api_key: &str, model: &str, base_url: Option<&str>) -> Result<Self, DetectError> {
        if api_key.is_empty() {
            return Err(DetectError::Config("missing API key".to_string()));
        }

        Ok(Self {
            transport: Transport::Anthropic {
                http: reqwest::Client::new(),
                api_key: api_key.to_string(),
                base_url: base_url
                    .unwrap_or(ANTHROPIC_BASE_URL)
                    .trim_end_matches('/')
                    .to_string(),
            },
            model: model.to_string(),
        })
    }

    async fn ask_openai(&self, client: &Client<OpenAIConfig>, text: &str) -> Result<String, DetectError> {
        let api = |e: async_openai::error::OpenAIError| DetectError::Api(e.to_string());

        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(DETECTOR_SYSTEM_PROMPT)
                    .build()
                    .map_err(api)?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(text)
                    .build()
                    .map_err(api)?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.0)
            .max_tokens(VERDICT_MAX_TOKENS)
            .build()
            .map_err(api)?;

        let response = client.chat().create(request).await.map_err(api)?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| DetectError::Parse("empty completion".to_string()))
    }

    async fn ask_anthropic(
        &self,
        http: &reqwest::Client,
        api_key: &str,
        base_url: &str,
        text: &str,
    ) -> Result<String, DetectError> {
        let response = http
            .post(format!("{base_url}/v1/messages"))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&anthropic_request(&self.model, text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DetectError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response.json().await?;
        anthropic_reply_text(&json)
    }
}

#[async_trait]
impl AiDetector for LlmDetector {
    async fn classify(&self, text: &str) -> Result<f64, DetectError> {
        let response = match &self.transport {
            Transport::OpenAi(client) => self.ask_openai(client, text).await?,
            Transport::Anthropic {
                http,
                api_key,
                base_url,
            } => self.ask_anthropic(http, api_key, base_url, text).await?,
        };
        debug!(model = %self.model, response = %response.trim(), "LLM verdict");
        parse_probability(&response)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn anthropic_request(model: &str, text: &str) -> Value {
    json!({
        "model": model,
        "max_tokens": VERDICT_MAX_TOKENS,
        "temperature": 0.0,
        "system": DETECTOR_SYSTEM_PROMPT,
        "messages": [
            {"role": "user", "content": text}
        ]
    })
}

fn anthropic_reply_text(json: &Value) -> Result<String, DetectError> {
    json["content"]
        .as_array()
        .and_then(|blocks| blocks.iter().find_map(|block| block["text"].as_str()))
        .map(str::to_string)
        .ok_or_else(|| DetectError::Parse(format!("no text block in {json}")))
}

/// First number in a model reply, as a probability.
///
/// Values in (1, 100] are read as percentages.
pub fn parse_probability(response: &str) -> Result<f64, DetectError> {
    let value: f64 = NUMBER_REGEX
        .find(response)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| DetectError::Parse(format!("no number in {:?}", response.trim())))?;

    let probability = if value > 1.0 && value <= 100.0 {
        value / 100.0
    } else {
        value
    };

    if (0.0..=1.0).contains(&probability) {
        Ok(probability)
    } else {
        Err(DetectError::Parse(format!("out of range: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probability() {
        assert_eq!(parse_probability("0.83").unwrap(), 0.83);
        assert_eq!(parse_probability("Probability: 0.2\n").unwrap(), 0.2);
        assert_eq!(parse_probability("about 70%").unwrap(), 0.7);
        assert_eq!(parse_probability(".5").unwrap(), 0.5);
        assert_eq!(parse_probability("1").unwrap(), 1.0);
        assert!(parse_probability("I cannot tell").is_err());
        assert!(parse_probability("250").is_err());
    }

    #[test]
    fn test_missing_key_is_config_error() {
        assert!(matches!(
            LlmDetector::openai("", "gpt-4o-mini", None),
            Err(DetectError::Config(_))
        ));
        assert!(matches!(
            LlmDetector::anthropic("", "claude", None),
            Err(DetectError::Config(_))
        ));
    }

    #[test]
    fn test_detector_named_after_model() {
        let detector = LlmDetector::local("http://localhost:11434/v1", "llama3").unwrap();
        assert_eq!(detector.name(), "llama3");

        let detector = LlmDetector::openrouter("key", "meta-llama/llama-3-8b").unwrap();
        assert_eq!(detector.name(), "meta-llama/llama-3-8b");
    }

    #[test]
    fn test_anthropic_base_url_trimmed() {
        let detector =
            LlmDetector::anthropic("key", "claude", Some("http://localhost:8080/")).unwrap();
        match detector.transport {
            Transport::Anthropic { base_url, .. } => assert_eq!(base_url, "http://localhost:8080"),
            Transport::OpenAi(_) => panic!("expected Anthropic transport"),
        }
    }

    #[test]
    fn test_anthropic_request_is_short_and_deterministic() {
        let body = anthropic_request("claude", "some passage");
        assert_eq!(body["model"], "claude");
        assert_eq!(body["max_tokens"], 16);
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0]["content"], "some passage");
        assert!(body["system"].as_str().unwrap().contains("probability"));
    }

    #[test]
    fn test_anthropic_reply_text() {
        let reply = json!({"content": [{"type": "text", "text": "0.42"}]});
        assert_eq!(anthropic_reply_text(&reply).unwrap(), "0.42");

        let empty = json!({"content": []});
        assert!(matches!(anthropic_reply_text(&empty), Err(DetectError::Parse(_))));
    }
}
