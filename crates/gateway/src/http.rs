use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use rentgate_core::config::{GatewayConfig, SessionConfig};
use rentgate_core::domain::driver::{
    DriverApplication, DriverApplicationId, DriverDecision, ReviewStatus,
};
use rentgate_core::domain::profile::{BusinessOwnerProfile, PasswordChange, ProfileUpdate};
use rentgate_core::domain::vehicle::{VehicleApplication, VehicleApplicationId};
use rentgate_core::{ApprovalStatistics, VehiclePricing};

use crate::approval::ApprovalGateway;
use crate::envelope::{
    require_success, Ack, CountEnvelope, DriverEnvelope, DriverListEnvelope, ProfileEnvelope,
    StatisticsEnvelope, VehicleListEnvelope,
};
use crate::error::GatewayError;
use crate::profile::ProfileGateway;

/// `reqwest`-backed client for the approval and profile services. One shared
/// connection pool; the session token rides along as a bearer header on every
/// request. No retries and no backoff: failures surface immediately and the
/// reviewer decides whether to act again.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    api_token: SecretString,
}

impl HttpGateway {
    pub fn new(gateway: &GatewayConfig, session: &SessionConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(gateway.timeout_secs))
            .build()
            .map_err(GatewayError::Transport)?;

        Ok(Self {
            client,
            base_url: gateway.base_url.trim_end_matches('/').to_string(),
            api_token: session.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        debug!(path, "gateway GET");
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .bearer_auth(self.api_token.expose_secret())
            .send()
            .await?;
        decode_envelope(response).await
    }

    async fn put_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, GatewayError> {
        debug!(path, "gateway PUT");
        let response = self
            .client
            .put(self.url(path))
            .bearer_auth(self.api_token.expose_secret())
            .json(body)
            .send()
            .await?;
        decode_envelope(response).await
    }

    async fn delete_envelope<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        debug!(path, "gateway DELETE");
        let response = self
            .client
            .delete(self.url(path))
            .bearer_auth(self.api_token.expose_secret())
            .send()
            .await?;
        decode_envelope(response).await
    }
}

/// Error statuses still carry the `{ success: false, message }` envelope, so
/// the body is decoded regardless of status; only an undecodable body on a
/// non-2xx response is reported as a status failure.
async fn decode_envelope<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    match serde_json::from_slice::<T>(&bytes) {
        Ok(value) => Ok(value),
        Err(source) => {
            if status.is_success() {
                Err(GatewayError::Decode(source))
            } else {
                Err(GatewayError::UnexpectedStatus { status: status.as_u16() })
            }
        }
    }
}

#[async_trait]
impl ApprovalGateway for HttpGateway {
    async fn pending_drivers(&self) -> Result<Vec<DriverApplication>, GatewayError> {
        let envelope: DriverListEnvelope = self.get_envelope("drivers/pending", &[]).await?;
        require_success(envelope.success, envelope.message, "load pending drivers")?;
        Ok(envelope.drivers)
    }

    async fn pending_driver_count(&self) -> Result<u64, GatewayError> {
        let envelope: CountEnvelope = self.get_envelope("drivers/pending/count", &[]).await?;
        require_success(envelope.success, envelope.message, "count pending drivers")?;
        Ok(envelope.count)
    }

    async fn driver(&self, id: &DriverApplicationId) -> Result<DriverApplication, GatewayError> {
        let envelope: DriverEnvelope =
            self.get_envelope(&format!("drivers/{}", id.as_str()), &[]).await?;
        require_success(envelope.success, envelope.message, "load driver")?;
        envelope
            .driver
            .ok_or_else(|| GatewayError::api(format!("driver `{}` was not found", id.as_str())))
    }

    async fn drivers_by_status(
        &self,
        status: ReviewStatus,
    ) -> Result<Vec<DriverApplication>, GatewayError> {
        let envelope: DriverListEnvelope =
            self.get_envelope("drivers", &[("status", status.as_str())]).await?;
        require_success(envelope.success, envelope.message, "load drivers by status")?;
        Ok(envelope.drivers)
    }

    async fn decide_driver(
        &self,
        id: &DriverApplicationId,
        decision: &DriverDecision,
    ) -> Result<Option<String>, GatewayError> {
        let body = serde_json::to_value(decision)?;
        let ack: Ack =
            self.put_envelope(&format!("drivers/approve/{}", id.as_str()), &body).await?;
        ack.into_message(match decision.status {
            ReviewStatus::Approved => "approve driver",
            _ => "reject driver",
        })
    }

    async fn pending_vehicles(&self) -> Result<Vec<VehicleApplication>, GatewayError> {
        let envelope: VehicleListEnvelope = self.get_envelope("vehicles/pending", &[]).await?;
        require_success(envelope.success, envelope.message, "load pending vehicles")?;
        Ok(envelope.vehicles)
    }

    async fn approve_vehicle(
        &self,
        id: &VehicleApplicationId,
        pricing: &VehiclePricing,
    ) -> Result<Option<String>, GatewayError> {
        let body = serde_json::to_value(pricing)?;
        let ack: Ack =
            self.put_envelope(&format!("vehicles/approve/{}", id.as_str()), &body).await?;
        ack.into_message("approve vehicle")
    }

    async fn reject_vehicle(
        &self,
        id: &VehicleApplicationId,
        reason: &str,
    ) -> Result<Option<String>, GatewayError> {
        let body = json!({ "reason": reason });
        let ack: Ack =
            self.put_envelope(&format!("vehicles/reject/{}", id.as_str()), &body).await?;
        ack.into_message("reject vehicle")
    }

    async fn statistics(&self) -> Result<ApprovalStatistics, GatewayError> {
        let envelope: StatisticsEnvelope =
            self.get_envelope("approvals/statistics", &[]).await?;
        envelope.into_statistics("load approval statistics")
    }
}

#[async_trait]
impl ProfileGateway for HttpGateway {
    async fn profile(&self, user_id: &str) -> Result<BusinessOwnerProfile, GatewayError> {
        let envelope: ProfileEnvelope = self
            .get_envelope(&format!("auth/profile/business-owner/{user_id}"), &[])
            .await?;
        require_success(envelope.success, envelope.message, "load profile")?;
        envelope
            .profile
            .ok_or_else(|| GatewayError::api(format!("profile `{user_id}` was not found")))
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<BusinessOwnerProfile, GatewayError> {
        let body = serde_json::to_value(update)?;
        let envelope: ProfileEnvelope = self
            .put_envelope(&format!("auth/profile/business-owner/{user_id}"), &body)
            .await?;
        require_success(envelope.success, envelope.message, "update profile")?;
        envelope
            .profile
            .ok_or_else(|| GatewayError::api("update succeeded but no profile was returned"))
    }

    async fn change_password(
        &self,
        user_id: &str,
        change: &PasswordChange,
    ) -> Result<Option<String>, GatewayError> {
        let body = serde_json::to_value(change)?;
        let ack: Ack = self
            .put_envelope(&format!("auth/profile/business-owner/{user_id}/password"), &body)
            .await?;
        ack.into_message("change password")
    }

    async fn upload_profile_image(
        &self,
        user_id: &str,
        image_base64: &str,
    ) -> Result<Option<String>, GatewayError> {
        let body = json!({ "image": image_base64 });
        let ack: Ack = self
            .put_envelope(&format!("auth/profile/business-owner/{user_id}/image"), &body)
            .await?;
        ack.into_message("upload profile image")
    }

    async fn delete_account(&self, user_id: &str) -> Result<Option<String>, GatewayError> {
        let ack: Ack =
            self.delete_envelope(&format!("auth/profile/business-owner/{user_id}")).await?;
        ack.into_message("delete account")
    }
}

#[cfg(test)]
mod tests {
    use rentgate_core::config::{GatewayConfig, SessionConfig};

    use super::HttpGateway;

    fn gateway() -> HttpGateway {
        HttpGateway::new(
            &GatewayConfig {
                base_url: "https://gateway.example.com/api/".to_string(),
                timeout_secs: 5,
            },
            &SessionConfig {
                user_id: "owner-1".to_string(),
                display_name: "Test Owner".to_string(),
                api_token: "tok-test".to_string().into(),
            },
        )
        .expect("client should build")
    }

    #[test]
    fn url_join_normalizes_slashes() {
        let gateway = gateway();
        assert_eq!(
            gateway.url("/drivers/pending"),
            "https://gateway.example.com/api/drivers/pending"
        );
        assert_eq!(gateway.url("drivers/pending"), "https://gateway.example.com/api/drivers/pending");
    }
}
