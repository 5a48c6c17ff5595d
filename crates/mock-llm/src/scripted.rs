//! Scripted model - reply and latency chosen by the input.

use std::time::Duration;

use llm_core::{async_trait, ChatModel, Completion, CompletionRequest, LlmError};
use tokio::time::sleep;

#[derive(Debug, Clone)]
struct Rule {
    needle: String,
    delay: Duration,
    reply: Option<String>,
}

/// A model that matches the last user message against substring rules.
///
/// The first matching rule decides the delay and the reply; a rule with no
/// reply fails with a network error. Inputs matching no rule get an empty
/// completion. Lets tests force the order in which overlapping requests
/// complete.
#[derive(Debug, Clone, Default)]
pub struct ScriptedModel {
    rules: Vec<Rule>,
}

impl ScriptedModel {
    /// Create a model with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `reply` after `delay` when the input contains `needle`.
    pub fn reply_after(
        mut self,
        needle: impl Into<String>,
        delay: Duration,
        reply: impl Into<String>,
    ) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            delay,
            reply: Some(reply.into()),
        });
        self
    }

    /// Fail after `delay` when the input contains `needle`.
    pub fn fail_after(mut self, needle: impl Into<String>, delay: Duration) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            delay,
            reply: None,
        });
        self
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        let input = request.last_user_message().unwrap_or_default();

        let Some(rule) = self.rules.iter().find(|r| input.contains(&r.needle)) else {
            return Ok(Completion::empty());
        };

        sleep(rule.delay).await;

        match &rule.reply {
            Some(reply) => Ok(Completion::text(reply.clone())),
            None => Err(LlmError::Network("scripted failure".to_string())),
        }
    }

    fn name(&self) -> &str {
        "ScriptedModel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_core::ChatMessage;

    fn ask(text: &str) -> CompletionRequest {
        CompletionRequest::new(vec![ChatMessage::user(text)])
    }

    #[tokio::test]
    async fn test_rules_match_by_substring() {
        let model = ScriptedModel::new()
            .reply_after("plumbing", Duration::ZERO, "pipes")
            .fail_after("broken", Duration::ZERO);

        let ok = model.complete(ask("we do plumbing")).await.unwrap();
        assert_eq!(ok.content.as_deref(), Some("pipes"));

        assert!(model.complete(ask("broken input")).await.is_err());

        let none = model.complete(ask("unmatched")).await.unwrap();
        assert!(none.content.is_none());
    }
}
