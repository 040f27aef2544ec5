// API client module: the chat-completion collaborator used by the shell.
// It is a small blocking client around `reqwest`; the shell only sees the
// `ChatApi` trait so tests can swap in a fake without touching the network.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default root of the Perplexity API.
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";

/// Model every question is sent to unless overridden at startup.
pub const DEFAULT_MODEL: &str = "llama-3.1-sonar-small-128k-online";

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Failures reported by the collaborator. The shell prints these verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Where and how long to talk to the API. The credential is not part of
/// this; it is bound when a client is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// One role/content pair of a chat exchange.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Outbound chat-completion request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

impl ChatRequest {
    /// Request carrying exactly one `user` message with the question text.
    pub fn single(model: &str, question: &str) -> Self {
        ChatRequest {
            model: model.to_string(),
            messages: vec![Message {
                role: "user".into(),
                content: question.to_string(),
            }],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    pub total_tokens: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    pub message: Message,
}

/// Response body of `/chat/completions`. Only `choices` and `usage` are
/// consumed by the shell; the rest is kept for logging.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Text of the first candidate answer, if any. May be empty.
    pub fn answer(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }

    pub fn total_tokens(&self) -> Option<u64> {
        self.usage.as_ref().map(|u| u.total_tokens)
    }
}

/// Submit one request and get one answer or a failure.
pub trait ChatApi {
    fn create_chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;
}

/// Builds a client bound to a credential. The shell calls this every time
/// the credential is set.
pub type Connector = Box<dyn Fn(&str) -> Result<Box<dyn ChatApi>, ApiError>>;

/// Connector producing real HTTP clients for `config`.
pub fn perplexity_connector(config: ApiConfig) -> Connector {
    Box::new(move |token: &str| {
        let client = PerplexityClient::new(token, &config)?;
        Ok(Box::new(client) as Box<dyn ChatApi>)
    })
}

/// Blocking HTTP client bound to one credential.
pub struct PerplexityClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl PerplexityClient {
    pub fn new(token: &str, config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Client)?;
        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        Ok(PerplexityClient {
            client,
            endpoint,
            token: token.to_string(),
        })
    }
}

impl ChatApi for PerplexityClient {
    fn create_chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        debug!(endpoint = %self.endpoint, model = %request.model, "sending chat completion");
        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(request)
            .send()?;

        let status = res.status();
        // Read the body as text first so a bad payload surfaces as Decode,
        // not as a transport error.
        let body = res.text()?;
        if !status.is_success() {
            warn!(%status, "chat completion rejected");
            return Err(ApiError::Status { status, body });
        }

        let resp: ChatResponse = serde_json::from_str(&body)?;
        debug!(
            id = resp.id.as_deref().unwrap_or("-"),
            choices = resp.choices.len(),
            total_tokens = ?resp.total_tokens(),
            "chat completion received"
        );
        Ok(resp)
    }
}
