//! Recording model - remembers every request it saw.

use std::sync::{Mutex, MutexGuard};

use llm_core::{async_trait, ChatModel, Completion, CompletionRequest, LlmError};

/// A model that records requests before delegating to an inner model.
pub struct RecordingModel<M: ChatModel> {
    inner: M,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl<M: ChatModel> RecordingModel<M> {
    /// Wrap `inner`.
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.lock().clone()
    }

    /// Number of completions requested.
    pub fn call_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CompletionRequest>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<M: ChatModel> ChatModel for RecordingModel<M> {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        self.lock().push(request.clone());
        self.inner.complete(request).await
    }

    fn name(&self) -> &str {
        "RecordingModel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EchoModel;
    use llm_core::ChatMessage;

    #[tokio::test]
    async fn test_records_requests() {
        let model = RecordingModel::new(EchoModel::new());
        assert_eq!(model.call_count(), 0);

        model
            .complete(CompletionRequest::new(vec![ChatMessage::user("one")]).with_temperature(0.2))
            .await
            .unwrap();

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, Some(0.2));
        assert_eq!(requests[0].last_user_message(), Some("one"));
    }
}
