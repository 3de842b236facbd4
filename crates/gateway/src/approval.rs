use async_trait::async_trait;

use rentgate_core::domain::driver::{
    DriverApplication, DriverApplicationId, DriverDecision, ReviewStatus,
};
use rentgate_core::domain::vehicle::{VehicleApplication, VehicleApplicationId};
use rentgate_core::{ApprovalStatistics, VehiclePricing};

use crate::error::GatewayError;

/// The backend approval service, seen from the review dashboard. The service
/// owns application status; this client never mutates anything locally.
#[async_trait]
pub trait ApprovalGateway: Send + Sync {
    async fn pending_drivers(&self) -> Result<Vec<DriverApplication>, GatewayError>;

    async fn pending_driver_count(&self) -> Result<u64, GatewayError>;

    async fn driver(&self, id: &DriverApplicationId) -> Result<DriverApplication, GatewayError>;

    async fn drivers_by_status(
        &self,
        status: ReviewStatus,
    ) -> Result<Vec<DriverApplication>, GatewayError>;

    /// Approves or rejects one driver application. Returns the backend's
    /// success message when it sent one.
    async fn decide_driver(
        &self,
        id: &DriverApplicationId,
        decision: &DriverDecision,
    ) -> Result<Option<String>, GatewayError>;

    async fn pending_vehicles(&self) -> Result<Vec<VehicleApplication>, GatewayError>;

    /// Approves a vehicle listing. Pricing is mandatory at the type level;
    /// there is no approve-without-rates request.
    async fn approve_vehicle(
        &self,
        id: &VehicleApplicationId,
        pricing: &VehiclePricing,
    ) -> Result<Option<String>, GatewayError>;

    async fn reject_vehicle(
        &self,
        id: &VehicleApplicationId,
        reason: &str,
    ) -> Result<Option<String>, GatewayError>;

    async fn statistics(&self) -> Result<ApprovalStatistics, GatewayError>;
}
