use std::sync::Arc;

use tracing::{debug, error, info};

use rentgate_core::domain::vehicle::{VehicleApplication, VehicleApplicationId};
use rentgate_core::flows::{transition, ApprovalFlowAction, ApprovalFlowEvent, VehicleApprovalState};
use rentgate_core::{PricingDraft, ProcessingGuard, ReviewerSession};
use rentgate_gateway::ApprovalGateway;

use crate::interaction::Interaction;
use crate::outcome::DecisionOutcome;

pub const VEHICLES_EMPTY_STATE: &str = "All Caught Up!";

/// Pending vehicle listings with a reject-with-reason gate and the two-phase
/// approve protocol: approving only opens pricing capture, and the gateway
/// call happens when a valid draft is submitted. The protocol state is the
/// `VehicleApprovalState` tagged union; this flow owns driving it and
/// performing the actions each transition emits.
pub struct VehicleReviewFlow<G, I> {
    gateway: Arc<G>,
    interaction: Arc<I>,
    session: ReviewerSession,
    guard: ProcessingGuard,
    applications: Vec<VehicleApplication>,
    selected: Option<VehicleApplicationId>,
    approval: VehicleApprovalState,
    last_error: Option<String>,
    loaded: bool,
}

impl<G, I> VehicleReviewFlow<G, I>
where
    G: ApprovalGateway,
    I: Interaction,
{
    pub fn new(gateway: Arc<G>, interaction: Arc<I>, session: ReviewerSession) -> Self {
        Self {
            gateway,
            interaction,
            session,
            guard: ProcessingGuard::default(),
            applications: Vec::new(),
            selected: None,
            approval: VehicleApprovalState::Idle,
            last_error: None,
            loaded: false,
        }
    }

    pub async fn refresh(&mut self) {
        match self.gateway.pending_vehicles().await {
            Ok(applications) => {
                self.applications = applications;
                self.last_error = None;
                self.loaded = true;
            }
            Err(err) => {
                error!(error = %err, "failed to load pending vehicle applications");
                self.last_error =
                    Some(err.surface_message("failed to load vehicle applications"));
            }
        }
    }

    pub fn applications(&self) -> &[VehicleApplication] {
        &self.applications
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn empty_state(&self) -> Option<&'static str> {
        (self.loaded && self.applications.is_empty()).then_some(VEHICLES_EMPTY_STATE)
    }

    pub fn open_detail(&mut self, id: &VehicleApplicationId) -> Option<&VehicleApplication> {
        let application = self.applications.iter().find(|application| application.id == *id)?;
        self.selected = Some(id.clone());
        Some(application)
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&VehicleApplication> {
        let id = self.selected.as_ref()?;
        self.applications.iter().find(|application| application.id == *id)
    }

    pub fn approval_state(&self) -> &VehicleApprovalState {
        &self.approval
    }

    pub fn is_processing(&self, id: &VehicleApplicationId) -> bool {
        self.guard.is_processing(id.as_str())
    }

    pub fn processing_guard(&self) -> ProcessingGuard {
        self.guard.clone()
    }

    /// Opens pricing capture for one vehicle. Invoked from a row or from the
    /// detail view; either way the detail view closes so the pricing capture
    /// is the only thing in front of the reviewer.
    pub fn begin_approval(&mut self, id: &VehicleApplicationId) -> DecisionOutcome {
        match transition(
            &self.approval,
            &ApprovalFlowEvent::ApproveRequested { vehicle_id: id.clone() },
        ) {
            Ok(outcome) => {
                self.close_detail();
                self.approval = outcome.to;
                DecisionOutcome::Completed
            }
            Err(err) => {
                debug!(error = %err, "approve request ignored");
                DecisionOutcome::Invalid
            }
        }
    }

    /// Replaces the draft under edit. A no-op unless pricing is open.
    pub fn update_draft(&mut self, draft: PricingDraft) {
        if let Ok(outcome) =
            transition(&self.approval, &ApprovalFlowEvent::DraftUpdated { draft })
        {
            self.approval = outcome.to;
        }
    }

    /// Discards the draft and closes pricing capture without any request.
    pub fn cancel_pricing(&mut self) {
        if let Ok(outcome) = transition(&self.approval, &ApprovalFlowEvent::Cancelled) {
            self.approval = outcome.to;
        }
    }

    /// Submits the open pricing draft. An invalid draft never produces a
    /// request: the validation failure lands inline on the open state and is
    /// also raised as an alert, matching how the capture surface reports it.
    pub async fn submit_pricing(&mut self) -> DecisionOutcome {
        let outcome = match transition(&self.approval, &ApprovalFlowEvent::PricingSubmitted) {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(error = %err, "pricing submit ignored");
                return DecisionOutcome::Invalid;
            }
        };
        self.approval = outcome.to;

        let Some(ApprovalFlowAction::SendApproval { vehicle_id, pricing }) =
            outcome.actions.into_iter().next()
        else {
            if let VehicleApprovalState::PricingOpen { error: Some(error), .. } = &self.approval {
                let message = error.to_string();
                self.interaction.alert(&message).await;
            }
            return DecisionOutcome::Invalid;
        };

        let Some(_ticket) = self.guard.begin(vehicle_id.as_str()) else {
            return DecisionOutcome::AlreadyProcessing;
        };

        match self.gateway.approve_vehicle(&vehicle_id, &pricing).await {
            Ok(message) => {
                info!(
                    reviewer = %self.session.user_id,
                    application = %vehicle_id.as_str(),
                    "vehicle application approved"
                );
                self.apply_event(&ApprovalFlowEvent::GatewayAccepted).await;
                self.interaction
                    .alert(&message.unwrap_or_else(|| "Vehicle approved and listed.".to_string()))
                    .await;
                DecisionOutcome::Completed
            }
            Err(err) => {
                error!(
                    application = %vehicle_id.as_str(),
                    error = %err,
                    "vehicle approval was not accepted"
                );
                self.apply_event(&ApprovalFlowEvent::GatewayRejected).await;
                self.interaction.alert(&err.surface_message("failed to approve vehicle")).await;
                DecisionOutcome::Failed
            }
        }
    }

    /// Rejects one vehicle application. A reason not supplied by the caller
    /// is prompted for; an empty or cancelled reason aborts before any
    /// request is built.
    pub async fn reject(
        &mut self,
        id: &VehicleApplicationId,
        reason: Option<String>,
    ) -> DecisionOutcome {
        let reason = match reason {
            Some(reason) => reason,
            None => match self
                .interaction
                .prompt("Reason for rejecting this vehicle application:")
                .await
            {
                Some(reason) => reason,
                None => return DecisionOutcome::Invalid,
            },
        };
        let reason = reason.trim().to_string();
        if reason.is_empty() {
            return DecisionOutcome::Invalid;
        }

        let Some(_ticket) = self.guard.begin(id.as_str()) else {
            return DecisionOutcome::AlreadyProcessing;
        };

        match self.gateway.reject_vehicle(id, &reason).await {
            Ok(message) => {
                info!(
                    reviewer = %self.session.user_id,
                    application = %id.as_str(),
                    "vehicle application rejected"
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
                    "vehicle rejection was not accepted"
                );
                self.interaction.alert(&err.surface_message("failed to reject vehicle")).await;
                DecisionOutcome::Failed
            }
        }
    }

    async fn apply_event(&mut self, event: &ApprovalFlowEvent) {
        match transition(&self.approval, event) {
            Ok(outcome) => {
                let reload = outcome
                    .actions
                    .iter()
                    .any(|action| matches!(action, ApprovalFlowAction::ReloadApplications));
                self.approval = outcome.to;
                if reload {
                    self.refresh().await;
                }
            }
            Err(err) => {
                debug!(error = %err, "approval flow event ignored");
            }
        }
    }
}
