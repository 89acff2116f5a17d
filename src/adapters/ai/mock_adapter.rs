//! Mock AI adapter for running without API calls.

use crate::domain::{DomainError, GeneratedDocument};
use crate::ports::AiPort;
use std::time::Duration;
use tracing::info;

/// Returns the draft tagged with `[MOCK]`. Simulates network latency.
pub struct MockAiAdapter {
    delay_ms: u64,
}

impl MockAiAdapter {
    pub fn new() -> Self {
        Self { delay_ms: 100 }
    }

    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }
}

impl Default for MockAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AiPort for MockAiAdapter {
    async fn refine_summary(
        &self,
        document: &GeneratedDocument,
        draft: &str,
    ) -> Result<String, DomainError> {
        info!(id = document.id(), draft_len = draft.len(), "[MOCK] Simulating summary refinement");
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        Ok(format!("[MOCK] {}", draft))
    }
}
