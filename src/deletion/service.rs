//! The two-phase deletion protocol.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{DeletionError, DeletionStage};
use crate::store::{IdentityProvider, ProfileStore};

/// Runs the deletion protocol against the backend seam.
///
/// One invocation walks: authenticate → delete profile row → delete
/// identity. No retries and no rollback — a failure at the identity stage
/// leaves the documented inconsistent window (profile gone, identity
/// present), and re-invocation is safe because both deletes are no-ops on
/// already-absent targets.
pub struct DeletionService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl DeletionService {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { identity, profiles }
    }

    /// Delete the calling user's data and identity.
    ///
    /// `bearer` is the caller's own credential; nothing else from the
    /// request is consumed. Returns the deleted user id on success.
    pub async fn delete_account(&self, bearer: Option<&str>) -> Result<Uuid, DeletionError> {
        // Authenticate with the request-scoped client. No valid caller
        // means no mutation of any kind.
        let Some(bearer) = bearer else {
            warn!("Deletion request without authorization");
            return Err(DeletionError::Unauthenticated);
        };

        let user = self
            .identity
            .authenticate(bearer)
            .await
            .map_err(|e| {
                warn!(error = %e, "Caller authentication errored");
                DeletionError::Unauthenticated
            })?
            .ok_or(DeletionError::Unauthenticated)?;

        info!(user_id = %user.id, "Deletion requested, caller authenticated");

        // From here on every call runs under the privileged credential.
        // Profile row first: if this fails, the identity must survive.
        self.profiles
            .delete_profile(user.id)
            .await
            .map_err(|e| DeletionError::Failed {
                stage: DeletionStage::Profile,
                reason: e.to_string(),
            })?;

        info!(user_id = %user.id, "Profile row deleted");

        self.identity
            .delete_user(user.id)
            .await
            .map_err(|e| {
                // Known inconsistent window: the profile row is already
                // gone while the identity record remains.
                warn!(user_id = %user.id, error = %e, "Identity delete failed after profile delete");
                DeletionError::Failed {
                    stage: DeletionStage::Identity,
                    reason: e.to_string(),
                }
            })?;

        info!(user_id = %user.id, "Account deleted");
        Ok(user.id)
    }
}
