use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

/// The reviewer-facing dialog capability. The review flows never talk to a
/// concrete UI toolkit; they ask through this seam and await the answer, so
/// the whole workflow runs headless under test.
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Yes/no confirmation before a destructive action.
    async fn confirm(&self, message: &str) -> bool;

    /// Free-text input; `None` means the reviewer cancelled.
    async fn prompt(&self, message: &str) -> Option<String>;

    /// Fire-and-forget notice (success and failure messages alike).
    async fn alert(&self, message: &str);
}

/// Scripted dialog double. Confirm and prompt answers are consumed in FIFO
/// order; an exhausted confirm queue answers yes and an exhausted prompt
/// queue answers cancelled. Every message shown is kept for assertions.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInteraction {
    state: Arc<Mutex<ScriptState>>,
}

#[derive(Debug, Default)]
struct ScriptState {
    confirm_answers: VecDeque<bool>,
    prompt_answers: VecDeque<Option<String>>,
    alerts: Vec<String>,
    questions: Vec<String>,
}

impl ScriptedInteraction {
    pub fn answer_confirm(&self, answer: bool) -> &Self {
        self.lock().confirm_answers.push_back(answer);
        self
    }

    pub fn answer_prompt(&self, answer: Option<&str>) -> &Self {
        self.lock().prompt_answers.push_back(answer.map(str::to_string));
        self
    }

    pub fn alerts(&self) -> Vec<String> {
        self.lock().alerts.clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.lock().questions.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl Interaction for ScriptedInteraction {
    async fn confirm(&self, message: &str) -> bool {
        let mut state = self.lock();
        state.questions.push(message.to_string());
        state.confirm_answers.pop_front().unwrap_or(true)
    }

    async fn prompt(&self, message: &str) -> Option<String> {
        let mut state = self.lock();
        state.questions.push(message.to_string());
        state.prompt_answers.pop_front().flatten()
    }

    async fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::{Interaction, ScriptedInteraction};

    #[tokio::test]
    async fn scripted_answers_are_consumed_in_order() {
        let interaction = ScriptedInteraction::default();
        interaction.answer_confirm(false).answer_confirm(true);
        interaction.answer_prompt(Some("too blurry")).answer_prompt(None);

        assert!(!interaction.confirm("first?").await);
        assert!(interaction.confirm("second?").await);
        assert_eq!(interaction.prompt("reason?").await.as_deref(), Some("too blurry"));
        assert_eq!(interaction.prompt("reason?").await, None);
    }

    #[tokio::test]
    async fn exhausted_queues_default_to_yes_and_cancelled() {
        let interaction = ScriptedInteraction::default();
        assert!(interaction.confirm("anything?").await);
        assert_eq!(interaction.prompt("anything?").await, None);
    }

    #[tokio::test]
    async fn alerts_and_questions_are_recorded() {
        let interaction = ScriptedInteraction::default();
        interaction.alert("saved").await;
        let _ = interaction.confirm("sure?").await;

        assert_eq!(interaction.alerts(), vec!["saved".to_string()]);
        assert_eq!(interaction.questions(), vec!["sure?".to_string()]);
    }
}
