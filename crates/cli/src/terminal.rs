use async_trait::async_trait;
use dialoguer::{Confirm, Input};

use rentgate_dashboard::Interaction;

/// Terminal-backed dialogs for the review flows. `assume_yes` answers every
/// confirmation affirmatively, for scripted/non-interactive use.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalInteraction {
    assume_yes: bool,
}

impl TerminalInteraction {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Interaction for TerminalInteraction {
    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    async fn prompt(&self, message: &str) -> Option<String> {
        let answer = Input::<String>::new()
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
            .ok()?;
        let answer = answer.trim().to_string();
        if answer.is_empty() {
            None
        } else {
            Some(answer)
        }
    }

    async fn alert(&self, message: &str) {
        println!("{message}");
    }
}
