use serde::Deserialize;

use rentgate_core::domain::driver::DriverApplication;
use rentgate_core::domain::profile::BusinessOwnerProfile;
use rentgate_core::domain::statistics::{ApprovalTotals, PendingCounts};
use rentgate_core::domain::vehicle::VehicleApplication;
use rentgate_core::ApprovalStatistics;

use crate::error::GatewayError;

/// Every gateway response carries `{ success, message?, ...payload }`.
/// Callers branch on `success` only; a false flag becomes `GatewayError::Api`
/// with the backend message, or the given context as fallback.
#[derive(Clone, Debug, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    pub fn into_message(self, context: &str) -> Result<Option<String>, GatewayError> {
        require_success(self.success, self.message.clone(), context)?;
        Ok(self.message)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct DriverListEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub drivers: Vec<DriverApplication>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DriverEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub driver: Option<DriverApplication>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CountEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VehicleListEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub vehicles: Vec<VehicleApplication>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub pending: Option<PendingCounts>,
    #[serde(default)]
    pub my_approvals: Option<ApprovalTotals>,
}

impl StatisticsEnvelope {
    pub fn into_statistics(self, context: &str) -> Result<ApprovalStatistics, GatewayError> {
        require_success(self.success, self.message, context)?;
        match (self.pending, self.my_approvals) {
            (Some(pending), Some(my_approvals)) => {
                Ok(ApprovalStatistics { pending, my_approvals })
            }
            _ => Err(GatewayError::api(format!("{context}: statistics payload was incomplete"))),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProfileEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub profile: Option<BusinessOwnerProfile>,
}

pub fn require_success(
    success: bool,
    message: Option<String>,
    context: &str,
) -> Result<(), GatewayError> {
    if success {
        return Ok(());
    }
    Err(GatewayError::Api { message: message.unwrap_or_else(|| format!("failed to {context}")) })
}
