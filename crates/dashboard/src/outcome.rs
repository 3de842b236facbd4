/// Result of one review action, from the reviewer's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// The gateway accepted the decision and the list was reloaded.
    Completed,
    /// The reviewer answered no (or cancelled) at the confirmation step.
    DeclinedByReviewer,
    /// A request for this application is already in flight; nothing was sent.
    AlreadyProcessing,
    /// Client-side validation blocked the action; nothing was sent.
    Invalid,
    /// The gateway refused or the request failed; state was left unchanged.
    Failed,
}

impl DecisionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}
