//! Session context — the app-wide identity-and-profile snapshot.
//!
//! Explicitly owned and injectable rather than ambient global state: the
//! routing decision and the onboarding step screens all receive this
//! context, which makes the gate testable with fabricated inputs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::Error;
use crate::onboarding::gate::{Destination, next_destination};
use crate::onboarding::model::Profile;
use crate::store::ProfileStore;

/// An opaque credential from the identity provider. The core only reads
/// the user id and the presence of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub access_token: String,
}

/// Live auth events from the provider's change subscription.
#[derive(Debug, Clone)]
pub enum AuthChange {
    SignedIn(Session),
    SignedOut,
}

/// Holds the current session and profile snapshot.
///
/// Lifecycle: `init` on startup fetches the profile for an existing
/// session; `apply` handles live sign-in/sign-out events; `reload_profile`
/// refreshes the snapshot after any step write.
pub struct SessionContext {
    store: Arc<dyn ProfileStore>,
    session: RwLock<Option<Session>>,
    profile: RwLock<Option<Profile>>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn ProfileStore>, session: Option<Session>) -> Self {
        Self {
            store,
            session: RwLock::new(session),
            profile: RwLock::new(None),
        }
    }

    /// Startup fetch: load the profile for the current session, if any.
    /// A missing row is simply an empty snapshot, not an error.
    pub async fn init(&self) -> Result<(), Error> {
        let user_id = {
            let session = self.session.read().await;
            match session.as_ref() {
                Some(s) => s.user_id,
                None => {
                    debug!("No session at startup, skipping profile fetch");
                    return Ok(());
                }
            }
        };

        let fetched = self.store.fetch_profile(user_id).await?;
        info!(user_id = %user_id, found = fetched.is_some(), "Initial profile fetch");
        *self.profile.write().await = fetched;
        Ok(())
    }

    /// Handle a live auth change from the provider subscription.
    pub async fn apply(&self, change: AuthChange) -> Result<(), Error> {
        match change {
            AuthChange::SignedIn(session) => {
                let user_id = session.user_id;
                *self.session.write().await = Some(session);
                let fetched = self.store.fetch_profile(user_id).await?;
                *self.profile.write().await = fetched;
                info!(user_id = %user_id, "Signed in");
            }
            AuthChange::SignedOut => {
                *self.session.write().await = None;
                *self.profile.write().await = None;
                info!("Signed out, session and profile cleared");
            }
        }
        Ok(())
    }

    /// Re-fetch the profile snapshot (after a step write).
    pub async fn reload_profile(&self) -> Result<(), Error> {
        let user_id = match self.user_id().await {
            Some(id) => id,
            None => return Ok(()),
        };
        let fetched = self.store.fetch_profile(user_id).await?;
        *self.profile.write().await = fetched;
        Ok(())
    }

    /// The routing decision for the current snapshot.
    ///
    /// `None` without a session — routing unauthenticated users is the
    /// caller's responsibility, the gate is never consulted for them.
    pub async fn destination(&self) -> Option<Destination> {
        if self.session.read().await.is_none() {
            return None;
        }
        let profile = self.profile.read().await;
        Some(next_destination(profile.as_ref()))
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn profile(&self) -> Option<Profile> {
        self.profile.read().await.clone()
    }

    pub async fn user_id(&self) -> Option<Uuid> {
        self.session.read().await.as_ref().map(|s| s.user_id)
    }
}

#[cfg(test)]
mod tests {
    use crate::store::MemoryBackend;

    use super::*;

    fn session_for(user_id: Uuid) -> Session {
        Session {
            user_id,
            access_token: "token".to_string(),
        }
    }

    #[tokio::test]
    async fn no_session_means_no_destination() {
        let backend = Arc::new(MemoryBackend::new());
        let ctx = SessionContext::new(backend, None);
        ctx.init().await.unwrap();
        assert!(ctx.destination().await.is_none());
    }

    #[tokio::test]
    async fn init_loads_profile_and_routes() {
        let backend = Arc::new(MemoryBackend::new());
        let user_id = Uuid::new_v4();
        backend.register("token", user_id);

        let ctx = SessionContext::new(
            Arc::clone(&backend) as Arc<dyn ProfileStore>,
            Some(session_for(user_id)),
        );
        ctx.init().await.unwrap();

        assert!(ctx.profile().await.is_some());
        assert_eq!(ctx.destination().await, Some(Destination::Step1));
    }

    #[tokio::test]
    async fn missing_row_routes_to_step1_without_error() {
        let backend = Arc::new(MemoryBackend::new());
        // Session for a user with no profile row at all.
        let ctx = SessionContext::new(
            backend as Arc<dyn ProfileStore>,
            Some(session_for(Uuid::new_v4())),
        );
        ctx.init().await.unwrap();
        assert!(ctx.profile().await.is_none());
        assert_eq!(ctx.destination().await, Some(Destination::Step1));
    }

    #[tokio::test]
    async fn sign_out_clears_both() {
        let backend = Arc::new(MemoryBackend::new());
        let user_id = Uuid::new_v4();
        backend.register("token", user_id);

        let ctx = SessionContext::new(Arc::clone(&backend) as Arc<dyn ProfileStore>, None);
        ctx.apply(AuthChange::SignedIn(session_for(user_id)))
            .await
            .unwrap();
        assert!(ctx.session().await.is_some());
        assert!(ctx.profile().await.is_some());

        ctx.apply(AuthChange::SignedOut).await.unwrap();
        assert!(ctx.session().await.is_none());
        assert!(ctx.profile().await.is_none());
        assert!(ctx.destination().await.is_none());
    }

    #[tokio::test]
    async fn reload_sees_step_writes() {
        let backend = Arc::new(MemoryBackend::new());
        let user_id = Uuid::new_v4();
        backend.register("token", user_id);

        let ctx = SessionContext::new(
            Arc::clone(&backend) as Arc<dyn ProfileStore>,
            Some(session_for(user_id)),
        );
        ctx.init().await.unwrap();
        assert_eq!(ctx.destination().await, Some(Destination::Step1));

        let writer = crate::onboarding::OnboardingWriter::new(
            Arc::clone(&backend) as Arc<dyn ProfileStore>,
        );
        writer
            .submit_basics(user_id, "Ana", "2003-01-01".parse().unwrap())
            .await
            .unwrap();

        ctx.reload_profile().await.unwrap();
        assert_eq!(ctx.destination().await, Some(Destination::Step2));
    }
}
