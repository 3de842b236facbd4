use std::sync::Arc;

use tracing::{error, info};

use rentgate_core::domain::driver::{DriverApplication, DriverApplicationId, DriverDecision};
use rentgate_core::{PasswordProvisioner, ProcessingGuard, ReviewerSession};
use rentgate_gateway::ApprovalGateway;

use crate::interaction::Interaction;
use crate::outcome::DecisionOutcome;

pub const DRIVERS_EMPTY_STATE: &str = "All driver applications have been processed";

/// Pending driver applications with inline and detail-view review actions.
///
/// Both entry points (row buttons and the expanded detail view) converge on
/// the same `approve`/`reject` operations. After any successful decision the
/// flow closes the detail view, clears the selection, and reloads the whole
/// list from the gateway; there is no local patching of the previous list.
pub struct DriverReviewFlow<G, I, P> {
    gateway: Arc<G>,
    interaction: Arc<I>,
    provisioner: P,
    session: ReviewerSession,
    guard: ProcessingGuard,
    applications: Vec<DriverApplication>,
    selected: Option<DriverApplicationId>,
    last_error: Option<String>,
    loaded: bool,
}

impl<G, I, P> DriverReviewFlow<G, I, P>
where
    G: ApprovalGateway,
    I: Interaction,
    P: PasswordProvisioner,
{
    pub fn new(gateway: Arc<G>, interaction: Arc<I>, provisioner: P, session: ReviewerSession) -> Self {
        Self {
            gateway,
            interaction,
            provisioner,
            session,
            guard: ProcessingGuard::default(),
            applications: Vec::new(),
            selected: None,
            last_error: None,
            loaded: false,
        }
    }

    /// Replaces the list with one fresh fetch. Failures keep the previous
    /// list so the reviewer can retry.
    pub async fn refresh(&mut self) {
        match self.gateway.pending_drivers().await {
            Ok(applications) => {
                self.applications = applications;
                self.last_error = None;
                self.loaded = true;
            }
            Err(err) => {
                error!(error = %err, "failed to load pending driver applications");
                self.last_error =
                    Some(err.surface_message("failed to load driver applications"));
            }
        }
    }

    pub fn applications(&self) -> &[DriverApplication] {
        &self.applications
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The explicit empty-state text, only once a load has succeeded.
    pub fn empty_state(&self) -> Option<&'static str> {
        (self.loaded && self.applications.is_empty()).then_some(DRIVERS_EMPTY_STATE)
    }

    pub fn open_detail(&mut self, id: &DriverApplicationId) -> Option<&DriverApplication> {
        let application = self.applications.iter().find(|application| application.id == *id)?;
        self.selected = Some(id.clone());
        Some(application)
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&DriverApplication> {
        let id = self.selected.as_ref()?;
        self.applications.iter().find(|application| application.id == *id)
    }

    pub fn is_processing(&self, id: &DriverApplicationId) -> bool {
        self.guard.is_processing(id.as_str())
    }

    /// Shared guard handle, for surfaces that render disabled controls.
    pub fn processing_guard(&self) -> ProcessingGuard {
        self.guard.clone()
    }

    pub async fn approve(&mut self, id: &DriverApplicationId) -> DecisionOutcome {
        if !self
            .interaction
            .confirm("Approve this driver application? A temporary password will be issued.")
            .await
        {
            return DecisionOutcome::DeclinedByReviewer;
        }

        let password = self.provisioner.provision();
        let decision = DriverDecision::approve(password.clone());
        let outcome = self.decide(id, decision, "failed to approve driver").await;
        if outcome.is_completed() {
            // The one and only place the password is surfaced.
            self.interaction
                .alert(&format!(
                    "Driver approved. Temporary password: {}",
                    password.expose()
                ))
                .await;
        }
        outcome
    }

    pub async fn reject(&mut self, id: &DriverApplicationId) -> DecisionOutcome {
        if !self.interaction.confirm("Reject this driver application?").await {
            return DecisionOutcome::DeclinedByReviewer;
        }

        let outcome = self.decide(id, DriverDecision::reject(), "failed to reject driver").await;
        if outcome.is_completed() {
            self.interaction.alert("Driver application rejected.").await;
        }
        outcome
    }

    async fn decide(
        &mut self,
        id: &DriverApplicationId,
        decision: DriverDecision,
        fallback: &str,
    ) -> DecisionOutcome {
        let Some(_ticket) = self.guard.begin(id.as_str()) else {
            return DecisionOutcome::AlreadyProcessing;
        };

        match self.gateway.decide_driver(id, &decision).await {
            Ok(message) => {
                info!(
                    reviewer = %self.session.user_id,
                    application = %id.as_str(),
                    status = decision.status.as_str(),
                    "driver application decided"
                );
                if let Some(message) = message {
                    self.interaction.alert(&message).await;
                }
                self.close_detail();
                self.refresh().await;
                DecisionOutcome::Completed
            }
            Err(err) => {
                error!(
                    application = %id.as_str(),
                    error = %err,
                    "driver decision was not accepted"
                );
                self.interaction.alert(&err.surface_message(fallback)).await;
                DecisionOutcome::Failed
            }
        }
    }
}
