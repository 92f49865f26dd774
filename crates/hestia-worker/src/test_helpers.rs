//! Scripted image generator for tests without a provider.

use async_trait::async_trait;
use hestia_core::models::{ClassifiedError, GeneratedImage, StyleParams};
use hestia_providers::ImageGenerator;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Step = Result<GeneratedImage, ClassifiedError>;

/// Replays queued outcomes in call order; once the script is empty every call succeeds.
#[derive(Clone, Default)]
pub struct ScriptedGenerator {
    script: Arc<Mutex<VecDeque<Step>>>,
    calls: Arc<Mutex<Vec<StyleParams>>>,
    delay: Option<Duration>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcomes(outcomes: impl IntoIterator<Item = Step>) -> Self {
        let generator = Self::new();
        generator.script.lock().unwrap().extend(outcomes);
        generator
    }

    /// Sleep before answering, to exercise deadlines.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push(&self, outcome: Step) {
        self.script.lock().unwrap().push_back(outcome);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<StyleParams> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn generated(marker: u8) -> GeneratedImage {
    GeneratedImage {
        bytes: vec![marker],
        mime_type: "image/png".to_string(),
    }
}

#[async_trait]
impl ImageGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        _image: &[u8],
        _mime_type: &str,
        params: &StyleParams,
    ) -> Result<GeneratedImage, ClassifiedError> {
        self.calls.lock().unwrap().push(params.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(generated(0xff)))
    }
}
