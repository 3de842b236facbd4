use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use rentgate_core::domain::driver::{
    DriverApplication, DriverApplicationId, DriverDecision, ReviewStatus,
};
use rentgate_core::domain::profile::{BusinessOwnerProfile, PasswordChange, ProfileUpdate};
use rentgate_core::domain::vehicle::{VehicleApplication, VehicleApplicationId};
use rentgate_core::{ApprovalStatistics, VehiclePricing};

use crate::approval::ApprovalGateway;
use crate::error::GatewayError;
use crate::profile::ProfileGateway;

/// Calls observed by the fake, in order. Tests assert on this log to prove
/// that gated actions (missing reason, invalid pricing, held processing
/// ticket) never reached the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedCall {
    PendingDrivers,
    PendingDriverCount,
    Driver { id: DriverApplicationId },
    DriversByStatus { status: ReviewStatus },
    DecideDriver { id: DriverApplicationId, decision: DriverDecision },
    PendingVehicles,
    ApproveVehicle { id: VehicleApplicationId, pricing: VehiclePricing },
    RejectVehicle { id: VehicleApplicationId, reason: String },
    Statistics,
}

/// Scripted failure for the next mutating call.
#[derive(Clone, Debug)]
enum ScriptedFailure {
    Business { message: String },
    Outage,
}

#[derive(Debug, Default)]
struct State {
    drivers: Vec<DriverApplication>,
    vehicles: Vec<VehicleApplication>,
    statistics: ApprovalStatistics,
    next_failure: Option<ScriptedFailure>,
    calls: Vec<RecordedCall>,
}

/// In-memory stand-in for the approval service. Mutating calls remove the
/// application from the pending list, the way the real backend's status
/// change makes it disappear from subsequent fetches. The statistics
/// snapshot is deliberately not recomputed by decisions, matching the
/// backend-owned, session-stale counts the dashboard displays.
#[derive(Clone, Debug, Default)]
pub struct InMemoryApprovalGateway {
    state: Arc<Mutex<State>>,
}

impl InMemoryApprovalGateway {
    pub fn with_applications(
        drivers: Vec<DriverApplication>,
        vehicles: Vec<VehicleApplication>,
    ) -> Self {
        let gateway = Self::default();
        {
            let mut state = gateway.lock();
            state.drivers = drivers;
            state.vehicles = vehicles;
        }
        gateway
    }

    pub fn set_statistics(&self, statistics: ApprovalStatistics) {
        self.lock().statistics = statistics;
    }

    /// The next call fails as a business rejection with this exact message.
    pub fn fail_next_with(&self, message: impl Into<String>) {
        self.lock().next_failure = Some(ScriptedFailure::Business { message: message.into() });
    }

    /// The next call fails as an unreachable-gateway transport error.
    pub fn fail_next_with_outage(&self) {
        self.lock().next_failure = Some(ScriptedFailure::Outage);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn remaining_drivers(&self) -> usize {
        self.lock().drivers.len()
    }

    pub fn remaining_vehicles(&self) -> usize {
        self.lock().vehicles.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn take_failure(state: &mut State) -> Result<(), GatewayError> {
        match state.next_failure.take() {
            Some(ScriptedFailure::Business { message }) => Err(GatewayError::Api { message }),
            Some(ScriptedFailure::Outage) => {
                Err(GatewayError::Unreachable("scripted outage".to_string()))
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ApprovalGateway for InMemoryApprovalGateway {
    async fn pending_drivers(&self) -> Result<Vec<DriverApplication>, GatewayError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::PendingDrivers);
        Self::take_failure(&mut state)?;
        Ok(state.drivers.clone())
    }

    async fn pending_driver_count(&self) -> Result<u64, GatewayError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::PendingDriverCount);
        Self::take_failure(&mut state)?;
        Ok(state.drivers.len() as u64)
    }

    async fn driver(&self, id: &DriverApplicationId) -> Result<DriverApplication, GatewayError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Driver { id: id.clone() });
        Self::take_failure(&mut state)?;
        state
            .drivers
            .iter()
            .find(|application| application.id == *id)
            .cloned()
            .ok_or_else(|| GatewayError::api(format!("driver `{}` was not found", id.as_str())))
    }

    async fn drivers_by_status(
        &self,
        status: ReviewStatus,
    ) -> Result<Vec<DriverApplication>, GatewayError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::DriversByStatus { status });
        Self::take_failure(&mut state)?;
        // The fake only tracks the pending queue.
        match status {
            ReviewStatus::Pending => Ok(state.drivers.clone()),
            _ => Ok(Vec::new()),
        }
    }

    async fn decide_driver(
        &self,
        id: &DriverApplicationId,
        decision: &DriverDecision,
    ) -> Result<Option<String>, GatewayError> {
        let mut state = self.lock();
        state
            .calls
            .push(RecordedCall::DecideDriver { id: id.clone(), decision: decision.clone() });
        Self::take_failure(&mut state)?;
        let before = state.drivers.len();
        state.drivers.retain(|application| application.id != *id);
        if state.drivers.len() == before {
            return Err(GatewayError::api("Already reviewed"));
        }
        Ok(Some(match decision.status {
            ReviewStatus::Approved => "Driver approved successfully".to_string(),
            _ => "Driver application rejected".to_string(),
        }))
    }

    async fn pending_vehicles(&self) -> Result<Vec<VehicleApplication>, GatewayError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::PendingVehicles);
        Self::take_failure(&mut state)?;
        Ok(state.vehicles.clone())
    }

    async fn approve_vehicle(
        &self,
        id: &VehicleApplicationId,
        pricing: &VehiclePricing,
    ) -> Result<Option<String>, GatewayError> {
        let mut state = self.lock();
        state
            .calls
            .push(RecordedCall::ApproveVehicle { id: id.clone(), pricing: pricing.clone() });
        Self::take_failure(&mut state)?;
        let before = state.vehicles.len();
        state.vehicles.retain(|application| application.id != *id);
        if state.vehicles.len() == before {
            return Err(GatewayError::api("Already reviewed"));
        }
        Ok(Some("Vehicle approved and listed".to_string()))
    }

    async fn reject_vehicle(
        &self,
        id: &VehicleApplicationId,
        reason: &str,
    ) -> Result<Option<String>, GatewayError> {
        let mut state = self.lock();
        state
            .calls
            .push(RecordedCall::RejectVehicle { id: id.clone(), reason: reason.to_string() });
        Self::take_failure(&mut state)?;
        let before = state.vehicles.len();
        state.vehicles.retain(|application| application.id != *id);
        if state.vehicles.len() == before {
            return Err(GatewayError::api("Already reviewed"));
        }
        Ok(Some("Vehicle application rejected".to_string()))
    }

    async fn statistics(&self) -> Result<ApprovalStatistics, GatewayError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Statistics);
        Self::take_failure(&mut state)?;
        Ok(state.statistics)
    }
}

/// In-memory stand-in for the auth profile service.
#[derive(Clone, Debug, Default)]
pub struct InMemoryProfileGateway {
    state: Arc<Mutex<ProfileState>>,
}

#[derive(Debug, Default)]
struct ProfileState {
    profiles: Vec<BusinessOwnerProfile>,
    next_failure: Option<String>,
}

impl InMemoryProfileGateway {
    pub fn with_profiles(profiles: Vec<BusinessOwnerProfile>) -> Self {
        let gateway = Self::default();
        gateway.lock().profiles = profiles;
        gateway
    }

    pub fn fail_next_with(&self, message: impl Into<String>) {
        self.lock().next_failure = Some(message.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ProfileState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn take_failure(state: &mut ProfileState) -> Result<(), GatewayError> {
        match state.next_failure.take() {
            Some(message) => Err(GatewayError::Api { message }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProfileGateway for InMemoryProfileGateway {
    async fn profile(&self, user_id: &str) -> Result<BusinessOwnerProfile, GatewayError> {
        let mut state = self.lock();
        Self::take_failure(&mut state)?;
        state
            .profiles
            .iter()
            .find(|profile| profile.id == user_id)
            .cloned()
            .ok_or_else(|| GatewayError::api(format!("profile `{user_id}` was not found")))
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<BusinessOwnerProfile, GatewayError> {
        let mut state = self.lock();
        Self::take_failure(&mut state)?;
        let profile = state
            .profiles
            .iter_mut()
            .find(|profile| profile.id == user_id)
            .ok_or_else(|| GatewayError::api(format!("profile `{user_id}` was not found")))?;

        if let Some(first_name) = &update.first_name {
            profile.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            profile.last_name = last_name.clone();
        }
        if let Some(phone) = &update.phone {
            profile.phone = phone.clone();
        }
        if let Some(company_name) = &update.company_name {
            profile.company_name = company_name.clone();
        }
        Ok(profile.clone())
    }

    async fn change_password(
        &self,
        user_id: &str,
        _change: &PasswordChange,
    ) -> Result<Option<String>, GatewayError> {
        let mut state = self.lock();
        Self::take_failure(&mut state)?;
        if !state.profiles.iter().any(|profile| profile.id == user_id) {
            return Err(GatewayError::api(format!("profile `{user_id}` was not found")));
        }
        Ok(Some("Password updated".to_string()))
    }

    async fn upload_profile_image(
        &self,
        user_id: &str,
        image_base64: &str,
    ) -> Result<Option<String>, GatewayError> {
        let mut state = self.lock();
        Self::take_failure(&mut state)?;
        let profile = state
            .profiles
            .iter_mut()
            .find(|profile| profile.id == user_id)
            .ok_or_else(|| GatewayError::api(format!("profile `{user_id}` was not found")))?;
        let stored = format!("https://storage.example.com/avatars/{}.jpg", profile.id);
        profile.profile_image = Some(stored.clone());
        let _ = image_base64;
        Ok(Some(stored))
    }

    async fn delete_account(&self, user_id: &str) -> Result<Option<String>, GatewayError> {
        let mut state = self.lock();
        Self::take_failure(&mut state)?;
        let before = state.profiles.len();
        state.profiles.retain(|profile| profile.id != user_id);
        if state.profiles.len() == before {
            return Err(GatewayError::api(format!("profile `{user_id}` was not found")));
        }
        Ok(Some("Account deleted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use rentgate_core::domain::driver::{
        DriverApplication, DriverApplicationId, DriverDecision, DriverId,
    };
    use rentgate_core::domain::profile::{BusinessOwnerProfile, ProfileUpdate};
    use rentgate_core::ProvisionedPassword;

    use crate::approval::ApprovalGateway;
    use crate::profile::ProfileGateway;

    use super::{InMemoryApprovalGateway, InMemoryProfileGateway, RecordedCall};

    fn driver_fixture(id: &str) -> DriverApplication {
        DriverApplication {
            id: DriverApplicationId(id.to_string()),
            driver_id: DriverId(format!("DRV-{id}")),
            full_name: "Imani Okafor".to_string(),
            email: "imani@example.com".to_string(),
            phone: "+2348012345678".to_string(),
            license_number: "LAG-99-1204".to_string(),
            years_of_experience: 6,
            vehicle_type: "sedan".to_string(),
            vehicle_model: "Toyota Camry".to_string(),
            vehicle_plate_number: "KJA-412-XY".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 14, 8, 30, 0).unwrap(),
        }
    }

    fn profile_fixture(id: &str) -> BusinessOwnerProfile {
        BusinessOwnerProfile {
            id: id.to_string(),
            first_name: "Adaeze".to_string(),
            last_name: "Eze".to_string(),
            email: "adaeze@example.com".to_string(),
            phone: "+2348098765432".to_string(),
            company_name: "Eze Mobility".to_string(),
            profile_image: None,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn decided_driver_disappears_from_subsequent_fetches() {
        let gateway = InMemoryApprovalGateway::with_applications(
            vec![driver_fixture("app-1"), driver_fixture("app-2")],
            Vec::new(),
        );

        let password = ProvisionedPassword::parse("PnG4K9QW2ZX7").expect("valid");
        gateway
            .decide_driver(&DriverApplicationId("app-1".to_string()), &DriverDecision::approve(password))
            .await
            .expect("decision accepted");

        let pending = gateway.pending_drivers().await.expect("list");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id.as_str(), "app-2");
    }

    #[tokio::test]
    async fn scripted_business_failure_fires_once_and_leaves_state_alone() {
        let gateway = InMemoryApprovalGateway::with_applications(
            vec![driver_fixture("app-1")],
            Vec::new(),
        );
        gateway.fail_next_with("Already reviewed");

        let error = gateway
            .decide_driver(&DriverApplicationId("app-1".to_string()), &DriverDecision::reject())
            .await
            .expect_err("scripted failure");
        assert_eq!(error.to_string(), "Already reviewed");
        assert_eq!(gateway.remaining_drivers(), 1);

        // The failure script is consumed; the retry goes through.
        gateway
            .decide_driver(&DriverApplicationId("app-1".to_string()), &DriverDecision::reject())
            .await
            .expect("retry succeeds");
        assert_eq!(gateway.remaining_drivers(), 0);
    }

    #[tokio::test]
    async fn call_log_preserves_order() {
        let gateway = InMemoryApprovalGateway::default();
        let _ = gateway.pending_drivers().await;
        let _ = gateway.statistics().await;

        assert_eq!(gateway.calls(), vec![RecordedCall::PendingDrivers, RecordedCall::Statistics]);
    }

    #[tokio::test]
    async fn pending_count_tracks_the_queue() {
        let gateway = InMemoryApprovalGateway::with_applications(
            vec![driver_fixture("app-1"), driver_fixture("app-2")],
            Vec::new(),
        );

        assert_eq!(gateway.pending_driver_count().await.expect("count"), 2);
        gateway
            .decide_driver(&DriverApplicationId("app-2".to_string()), &DriverDecision::reject())
            .await
            .expect("decision accepted");
        assert_eq!(gateway.pending_driver_count().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn image_upload_stores_a_url_on_the_profile() {
        let gateway = InMemoryProfileGateway::with_profiles(vec![profile_fixture("owner-1")]);

        let stored = gateway
            .upload_profile_image("owner-1", "aGVsbG8=")
            .await
            .expect("upload")
            .expect("stored url returned");
        let profile = gateway.profile("owner-1").await.expect("profile");
        assert_eq!(profile.profile_image.as_deref(), Some(stored.as_str()));
    }

    #[tokio::test]
    async fn deleted_account_is_gone_from_subsequent_reads() {
        let gateway = InMemoryProfileGateway::with_profiles(vec![profile_fixture("owner-1")]);

        gateway.delete_account("owner-1").await.expect("delete");
        let error = gateway.profile("owner-1").await.expect_err("profile is gone");
        assert!(error.to_string().contains("was not found"));
    }

    #[tokio::test]
    async fn profile_update_applies_only_set_fields() {
        let gateway = InMemoryProfileGateway::with_profiles(vec![profile_fixture("owner-1")]);

        let updated = gateway
            .update_profile(
                "owner-1",
                &ProfileUpdate { phone: Some("+2348011112222".to_string()), ..Default::default() },
            )
            .await
            .expect("update");

        assert_eq!(updated.phone, "+2348011112222");
        assert_eq!(updated.first_name, "Adaeze");
    }
}
