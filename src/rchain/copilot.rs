use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Credentials;
use crate::rchain::provider::{ChatMessage, Completion, GenerateOptions, RequestError, Usage};

pub const EDITOR_VERSION: &str = "vscode/1.99.3";
pub const EDITOR_PLUGIN_VERSION: &str = "copilot-chat/0.26.7";
pub const COPILOT_USER_AGENT: &str = "GitHubCopilotChat/0.26.7";

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsagePayload>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsagePayload {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

/// Client for the Copilot OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct CopilotClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl CopilotClient {
    /// Builds a client that sends the editor identification headers on every request.
    pub fn new(credentials: &Credentials) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .default_headers(copilot_headers())
            .build()
            .map_err(RequestError::Client)?;

        Ok(Self {
            client,
            endpoint: chat_completions_url(&credentials.api_url),
            api_key: credentials.copilot_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends `messages` in order and returns the first choice's text.
    pub async fn generate_text(
        &self,
        messages: &[ChatMessage],
        options: &GenerateOptions,
    ) -> Result<Completion, RequestError> {
        let payload = ChatCompletionRequest {
            model: &options.model,
            messages,
            max_tokens: options.max_tokens,
        };

        info!(
            endpoint = %self.endpoint,
            model = %options.model,
            messages = messages.len(),
            max_tokens = options.max_tokens,
            "sending chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, "chat completion request rejected");
            return Err(RequestError::from_status(status, body));
        }

        let body: ChatCompletionResponse = response.json().await?;
        let completion = completion_from_response(body)?;
        if let Some(usage) = completion.usage {
            debug!(
                prompt_tokens = ?usage.prompt_tokens,
                completion_tokens = ?usage.completion_tokens,
                total_tokens = ?usage.total_tokens,
                "chat completion usage"
            );
        }

        Ok(completion)
    }
}

fn copilot_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("editor-version"),
        HeaderValue::from_static(EDITOR_VERSION),
    );
    headers.insert(
        HeaderName::from_static("editor-plugin-version"),
        HeaderValue::from_static(EDITOR_PLUGIN_VERSION),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static(COPILOT_USER_AGENT));
    headers
}

/// Joins the base URL with the chat-completions path.
pub fn chat_completions_url(api_url: &str) -> String {
    format!("{}/chat/completions", api_url.trim_end_matches('/'))
}

fn completion_from_response(body: ChatCompletionResponse) -> Result<Completion, RequestError> {
    let usage = body.usage.map(|usage| Usage {
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
        total_tokens: usage.total_tokens,
    });
    let text = body
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or(RequestError::EmptyResponse)?;

    Ok(Completion { text, usage })
}
