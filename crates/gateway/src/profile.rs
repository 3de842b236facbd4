use async_trait::async_trait;

use rentgate_core::domain::profile::{BusinessOwnerProfile, PasswordChange, ProfileUpdate};

use crate::error::GatewayError;

/// Business-owner account operations under the auth service's
/// `/auth/profile/business-owner/:userId` family.
#[async_trait]
pub trait ProfileGateway: Send + Sync {
    async fn profile(&self, user_id: &str) -> Result<BusinessOwnerProfile, GatewayError>;

    /// Applies a partial edit and returns the updated profile.
    async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<BusinessOwnerProfile, GatewayError>;

    async fn change_password(
        &self,
        user_id: &str,
        change: &PasswordChange,
    ) -> Result<Option<String>, GatewayError>;

    /// Uploads a new avatar as a base64 payload; returns the stored image URL.
    async fn upload_profile_image(
        &self,
        user_id: &str,
        image_base64: &str,
    ) -> Result<Option<String>, GatewayError>;

    async fn delete_account(&self, user_id: &str) -> Result<Option<String>, GatewayError>;
}
