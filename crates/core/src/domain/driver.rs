use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credentials::ProvisionedPassword;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverApplicationId(pub String);

impl DriverApplicationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// A driver onboarding application as returned by the gateway. The gateway is
/// the system of record; this is a transient view model and is never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverApplication {
    #[serde(rename = "_id")]
    pub id: DriverApplicationId,
    pub driver_id: DriverId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub years_of_experience: u32,
    pub vehicle_type: String,
    pub vehicle_model: String,
    pub vehicle_plate_number: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `PUT /drivers/approve/:driverId`. An approval carries the
/// client-provisioned one-time password so the backend can create the
/// driver's login credentials; a rejection carries none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDecision {
    pub status: ReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<ProvisionedPassword>,
}

impl DriverDecision {
    pub fn approve(password: ProvisionedPassword) -> Self {
        Self { status: ReviewStatus::Approved, new_password: Some(password) }
    }

    pub fn reject() -> Self {
        Self { status: ReviewStatus::Rejected, new_password: None }
    }
}

#[cfg(test)]
mod tests {
    use super::{DriverApplication, DriverDecision, ReviewStatus};
    use crate::credentials::ProvisionedPassword;

    #[test]
    fn driver_application_decodes_wire_shape() {
        let raw = r#"{
            "_id": "app-77",
            "driverId": "DRV-0012",
            "fullName": "Imani Okafor",
            "email": "imani@example.com",
            "phone": "+2348012345678",
            "licenseNumber": "LAG-99-1204",
            "yearsOfExperience": 6,
            "vehicleType": "sedan",
            "vehicleModel": "Toyota Camry",
            "vehiclePlateNumber": "KJA-412-XY",
            "createdAt": "2026-03-14T08:30:00Z"
        }"#;

        let application: DriverApplication =
            serde_json::from_str(raw).expect("wire shape should decode");
        assert_eq!(application.id.as_str(), "app-77");
        assert_eq!(application.driver_id.0, "DRV-0012");
        assert_eq!(application.years_of_experience, 6);
    }

    #[test]
    fn rejection_body_omits_password_field() {
        let body = serde_json::to_value(DriverDecision::reject()).expect("serialize");
        assert_eq!(body["status"], "rejected");
        assert!(body.get("newPassword").is_none());
    }

    #[test]
    fn approval_body_carries_password() {
        let password = ProvisionedPassword::parse("PnG4K9QW2ZX7").expect("valid format");
        let body = serde_json::to_value(DriverDecision::approve(password)).expect("serialize");
        assert_eq!(body["status"], "approved");
        assert_eq!(body["newPassword"], "PnG4K9QW2ZX7");
    }

    #[test]
    fn review_status_round_trips_lowercase() {
        assert_eq!(serde_json::to_value(ReviewStatus::Approved).expect("serialize"), "approved");
        assert_eq!(ReviewStatus::Pending.as_str(), "pending");
    }
}
