//! Mock backend for testing
//!
//! Provides scripted responses, failures, and latency for the generative
//! service. Every prompt that actually reaches the backend is recorded, which
//! lets tests assert how many invocations the debounce and staleness logic
//! allowed through.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::GenerativeBackend;

/// One scripted generate call
#[derive(Debug, Clone)]
struct ScriptedCall {
    /// Simulated latency before resolving
    delay: Option<Duration>,
    /// Response text; None simulates a network failure
    response: Option<String>,
}

/// Mock generative backend
///
/// With no script queued, `generate` answers immediately with the default
/// response (an empty JSON array unless overridden). Queued scripted calls
/// are consumed first, in order.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    healthy: bool,
    /// Default response; None makes every unscripted call fail
    response: Option<String>,
    script: Arc<Mutex<VecDeque<ScriptedCall>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Create a new mock backend (healthy, answers `[]`)
    pub fn new() -> Self {
        Self {
            healthy: true,
            response: Some("[]".to_string()),
            script: Arc::default(),
            prompts: Arc::default(),
        }
    }

    /// Create a mock whose every unscripted call returns `response`
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            ..Self::new()
        }
    }

    /// Create a mock whose every unscripted call fails
    pub fn failing() -> Self {
        Self {
            response: None,
            ..Self::new()
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Queue one scripted call with optional latency; `response` of None
    /// simulates a failure
    pub fn push_call(&self, delay: Option<Duration>, response: Option<&str>) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(ScriptedCall {
                delay,
                response: response.map(str::to_string),
            });
    }

    /// Every prompt that reached `generate`, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of `generate` invocations so far
    pub fn call_count(&self) -> usize {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        let (delay, response) = match scripted {
            Some(call) => (call.delay, call.response),
            None => (None, self.response.clone()),
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        response.ok_or_else(|| Error::InvalidResponse("mock backend failure".into()))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
