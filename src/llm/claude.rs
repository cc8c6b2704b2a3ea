use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::llm::GenerationParams;

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

pub async fn complete(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    prompt: &str,
    params: GenerationParams,
) -> Result<String> {
    let request = MessagesRequest {
        model,
        max_tokens: params.max_tokens,
        temperature: params.temperature,
        messages: vec![Message {
            role: "user",
            content: prompt,
        }],
    };

    let response = client
        .post(CLAUDE_API_URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("content-type", "application/json")
        .json(&request)
        .send()
        .await
        .context("Failed to send request to Claude API")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("Claude API error {}: {}", status, error_text);
    }

    let parsed: MessagesResponse = response
        .json()
        .await
        .context("Failed to parse Claude API response")?;

    joined_text(parsed).context("No text content in Claude response")
}

fn joined_text(response: MessagesResponse) -> Option<String> {
    let text: String = response
        .content
        .into_iter()
        .filter_map(|block| block.text)
        .collect();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_structure() {
        let request = MessagesRequest {
            model: "claude-sonnet-4-20250514",
            max_tokens: 4096,
            temperature: 0.2,
            messages: vec![Message {
                role: "user",
                content: "test",
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-sonnet-4-20250514");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "test");
    }

    #[test]
    fn test_text_blocks_are_joined() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content": [{"type": "text", "text": "{\"a\":"}, {"type": "text", "text": " 1}"}]}"#,
        )
        .unwrap();
        assert_eq!(joined_text(response).as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_empty_content_is_none() {
        let response: MessagesResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(joined_text(response).is_none());
    }
}
