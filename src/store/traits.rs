//! Backend trait definitions.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ProviderError;
use crate::onboarding::model::{Profile, ProfileUpdate};

/// The authenticated caller resolved from a bearer credential.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Access to the identity records.
///
/// `authenticate` acts with a request-scoped (non-privileged) credential;
/// `delete_user` acts with the privileged administrative credential and
/// must never be influenced by caller-supplied data beyond the already
/// authenticated user id.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the caller behind a bearer token. `None` means no valid
    /// user (expired, revoked, or already deleted) — not an error.
    async fn authenticate(&self, bearer: &str) -> Result<Option<AuthUser>, ProviderError>;

    /// Delete the identity record. Deleting an already-absent identity is
    /// a no-op success, so re-invocations of the deletion protocol are
    /// tolerated.
    async fn delete_user(&self, user_id: Uuid) -> Result<(), ProviderError>;
}

/// Access to the `profiles` table.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the row for `user_id`. A missing row is `None`, not an error.
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>, ProviderError>;

    /// Apply one field-group update to the row matching `user_id` and
    /// return the updated row.
    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Profile, ProviderError>;

    /// Delete the row matching `user_id`. Deleting an absent row is a
    /// no-op success (idempotence contract relied on by the deletion
    /// protocol).
    async fn delete_profile(&self, user_id: Uuid) -> Result<(), ProviderError>;
}
