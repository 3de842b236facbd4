use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::vehicle::VehicleApplicationId;
use crate::pricing::{PricingDraft, PricingValidationError, VehiclePricing};

/// The vehicle approve protocol is two-phase: selecting a vehicle only opens
/// pricing capture; the gateway call is deferred until a valid draft is
/// submitted. The whole protocol state lives in this one tagged union.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleApprovalState {
    Idle,
    PricingOpen {
        vehicle_id: VehicleApplicationId,
        draft: PricingDraft,
        error: Option<PricingValidationError>,
    },
}

impl VehicleApprovalState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn open_vehicle(&self) -> Option<&VehicleApplicationId> {
        match self {
            Self::Idle => None,
            Self::PricingOpen { vehicle_id, .. } => Some(vehicle_id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalFlowEvent {
    ApproveRequested { vehicle_id: VehicleApplicationId },
    DraftUpdated { draft: PricingDraft },
    PricingSubmitted,
    GatewayAccepted,
    GatewayRejected,
    Cancelled,
}

/// Side effects the caller must perform after a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalFlowAction {
    SendApproval { vehicle_id: VehicleApplicationId, pricing: VehiclePricing },
    ReloadApplications,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: VehicleApprovalState,
    pub to: VehicleApprovalState,
    pub actions: Vec<ApprovalFlowAction>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("event {event:?} is not valid in state {state:?}")]
    InvalidTransition { state: VehicleApprovalState, event: ApprovalFlowEvent },
}

/// Applies one event to the approval protocol.
///
/// A submit with an invalid draft is not a transition error: the protocol
/// stays in `PricingOpen` and records the validation failure inline, so the
/// reviewer can correct and resubmit without losing the other fields.
pub fn transition(
    current: &VehicleApprovalState,
    event: &ApprovalFlowEvent,
) -> Result<TransitionOutcome, FlowTransitionError> {
    use ApprovalFlowEvent::{
        ApproveRequested, Cancelled, DraftUpdated, GatewayAccepted, GatewayRejected,
        PricingSubmitted,
    };
    use VehicleApprovalState::{Idle, PricingOpen};

    let (to, actions) = match (current, event) {
        (Idle, ApproveRequested { vehicle_id }) => (
            PricingOpen {
                vehicle_id: vehicle_id.clone(),
                draft: PricingDraft::default(),
                error: None,
            },
            Vec::new(),
        ),
        (PricingOpen { vehicle_id, .. }, DraftUpdated { draft }) => (
            PricingOpen { vehicle_id: vehicle_id.clone(), draft: draft.clone(), error: None },
            Vec::new(),
        ),
        (PricingOpen { vehicle_id, draft, .. }, PricingSubmitted) => match draft.validate() {
            Ok(pricing) => (
                PricingOpen { vehicle_id: vehicle_id.clone(), draft: draft.clone(), error: None },
                vec![ApprovalFlowAction::SendApproval { vehicle_id: vehicle_id.clone(), pricing }],
            ),
            Err(error) => (
                PricingOpen {
                    vehicle_id: vehicle_id.clone(),
                    draft: draft.clone(),
                    error: Some(error),
                },
                Vec::new(),
            ),
        },
        (PricingOpen { .. }, GatewayAccepted) => {
            (Idle, vec![ApprovalFlowAction::ReloadApplications])
        }
        // Failure keeps the draft intact for correction and resubmission.
        (PricingOpen { vehicle_id, draft, error }, GatewayRejected) => (
            PricingOpen {
                vehicle_id: vehicle_id.clone(),
                draft: draft.clone(),
                error: error.clone(),
            },
            Vec::new(),
        ),
        (PricingOpen { .. }, Cancelled) => (Idle, Vec::new()),
        _ => {
            return Err(FlowTransitionError::InvalidTransition {
                state: current.clone(),
                event: event.clone(),
            });
        }
    };

    Ok(TransitionOutcome { from: current.clone(), to, actions })
}
