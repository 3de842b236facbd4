pub mod config;
pub mod credentials;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod pricing;

pub use credentials::{
    PasswordFormatError, PasswordProvisioner, ProvisionedPassword, RandomPasswordProvisioner,
};
pub use domain::driver::{
    DriverApplication, DriverApplicationId, DriverDecision, DriverId, ReviewStatus,
};
pub use domain::profile::{BusinessOwnerProfile, PasswordChange, ProfileUpdate};
pub use domain::session::ReviewerSession;
pub use domain::statistics::{ApprovalStatistics, ApprovalTotals, PendingCounts};
pub use domain::vehicle::{VehicleApplication, VehicleApplicationId, VehicleLocation, VehicleOwner};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use flows::{
    transition, ApprovalFlowAction, ApprovalFlowEvent, FlowTransitionError, ProcessingGuard,
    ProcessingTicket, TransitionOutcome, VehicleApprovalState,
};
pub use pricing::{PricingDraft, PricingField, PricingValidationError, VehiclePricing};
