use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::{debug, instrument, trace, warn};

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

pub const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Build the chat-completion request body for a single user prompt.
///
/// Temperature and token limit match what the plan prompt was tuned against;
/// the reply is free text, not JSON, so no response format is forced.
pub fn build_chat_body(model: &str, prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [ { "role": "user", "content": prompt } ],
        "temperature": 0.6,
        "max_tokens": 1024,
    })
}

/// POST a chat-completion request and return the first choice's content.
#[instrument(level = "trace", skip(api_key, body))]
pub async fn request_completion(
    api_key: &str,
    body: &serde_json::Value,
    url: &str,
) -> Result<String> {
    debug!(url, "sending chat completion request");

    let client = reqwest::Client::new();
    let resp = client
        .post(url)
        .bearer_auth(api_key)
        .json(body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let err_text = resp.text().await.unwrap_or_default();
        warn!(%status, "completion API error");
        return Err(anyhow!("completion API error {status}: {err_text}"));
    }

    let raw = resp.text().await?;
    let snippet: String = raw.chars().take(200).collect();
    debug!(snippet = %snippet, "chat response body");
    trace!(raw = %raw, "chat response");

    let chat: ChatResponse = serde_json::from_str(&raw)?;
    let content = chat
        .choices
        .first()
        .ok_or_else(|| anyhow!("missing chat choice"))?
        .message
        .content
        .trim()
        .to_string();

    Ok(content)
}
