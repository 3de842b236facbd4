pub mod approval;
pub mod guard;

pub use approval::{
    transition, ApprovalFlowAction, ApprovalFlowEvent, FlowTransitionError, TransitionOutcome,
    VehicleApprovalState,
};
pub use guard::{ProcessingGuard, ProcessingTicket};
