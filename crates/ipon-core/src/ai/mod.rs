//! Pluggable generative text backend abstraction
//!
//! The generative service is consumed as an opaque black box: one prompt
//! string in, one text response out. Backends are constructed explicitly and
//! injected into the insight engine; there is no process-wide client state.
//!
//! # Architecture
//!
//! - `GenerativeBackend` trait: the single suspension point of the core
//! - `GenAiClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, mock). Default: gemini
//! - `GEMINI_API_KEY`: API key (required for gemini backend)
//! - `GEMINI_MODEL`: Model name (default: gemini-1.5-flash)
//! - `GEMINI_HOST`: API host override

mod gemini;
mod mock;
pub mod parsing;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use parsing::extract_json_array;

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface to a generative text service
///
/// `generate` is the core's only suspension point: it sends one opaque prompt
/// and awaits one opaque text response. Everything the response is expected
/// to contain is convention, validated downstream by the insight engine.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Send a prompt and await the raw text response
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete generative client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum GenAiClient {
    /// Gemini generateContent API over HTTP
    Gemini(GeminiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl GenAiClient {
    /// Create a client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `gemini` (default): uses GEMINI_API_KEY / GEMINI_MODEL / GEMINI_HOST
    /// - `mock`: creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" => GeminiBackend::from_env().map(GenAiClient::Gemini),
            "mock" => Some(GenAiClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to gemini");
                GeminiBackend::from_env().map(GenAiClient::Gemini)
            }
        }
    }

    /// Create a Gemini backend directly
    pub fn gemini(host: &str, model: &str, api_key: &str) -> Self {
        GenAiClient::Gemini(GeminiBackend::new(host, model, api_key))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        GenAiClient::Mock(MockBackend::new())
    }

    /// Wrap an already-configured mock backend
    pub fn from_mock(mock: MockBackend) -> Self {
        GenAiClient::Mock(mock)
    }
}

#[async_trait]
impl GenerativeBackend for GenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            GenAiClient::Gemini(b) => b.generate(prompt).await,
            GenAiClient::Mock(b) => b.generate(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            GenAiClient::Gemini(b) => b.health_check().await,
            GenAiClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            GenAiClient::Gemini(b) => b.model(),
            GenAiClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            GenAiClient::Gemini(b) => b.host(),
            GenAiClient::Mock(b) => b.host(),
        }
    }
}
