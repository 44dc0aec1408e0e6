//! Scripted oracle stubs shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::{LlmError, TextOracle};

type Responder = Box<dyn Fn(&str) -> (Duration, Result<String, LlmError>) + Send + Sync>;

pub struct StubOracle {
    responder: Responder,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubOracle {
    /// Replies immediately with whatever `f` returns for the prompt.
    pub fn new(f: impl Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static) -> Arc<Self> {
        Self::with_latency(move |prompt| (Duration::ZERO, f(prompt)))
    }

    /// Like `new`, but each reply is delayed by the returned duration.
    pub fn with_latency(
        f: impl Fn(&str) -> (Duration, Result<String, LlmError>) + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(f),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &'static str) -> Arc<Self> {
        Self::new(move |_| Ok(text.to_string()))
    }

    pub fn failing() -> Arc<Self> {
        Self::new(|_| {
            Err(LlmError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            })
        })
    }

    /// Never answers within any reasonable timeout.
    pub fn hanging() -> Arc<Self> {
        Self::with_latency(|_| (Duration::from_secs(3600), Ok(String::new())))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextOracle for StubOracle {
    async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let (delay, result) = (self.responder)(prompt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

/// Text following the `TEXT:` marker of a translation prompt.
pub fn translation_input(prompt: &str) -> Option<&str> {
    prompt.split_once("TEXT:\n").map(|(_, text)| text)
}
