//! In-memory backend for tests and local development.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProviderError;
use crate::onboarding::model::{Profile, ProfileUpdate};

use super::traits::{AuthUser, IdentityProvider, ProfileStore};

/// A fully in-memory identity provider + profile store.
///
/// Mirrors the idempotence contract of the real backend (deleting absent
/// rows and identities succeeds) and supports per-call failure injection
/// so the deletion ordering invariant can be tested.
#[derive(Default)]
pub struct MemoryBackend {
    tokens: Mutex<HashMap<String, Uuid>>,
    identities: Mutex<HashSet<Uuid>>,
    profiles: Mutex<HashMap<Uuid, Profile>>,
    fail_profile_delete: AtomicBool,
    fail_identity_delete: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identity with a bearer token and an empty profile row,
    /// the same starting state sign-up produces.
    pub fn register(&self, token: &str, user_id: Uuid) {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), user_id);
        self.identities.lock().unwrap().insert(user_id);
        self.profiles
            .lock()
            .unwrap()
            .insert(user_id, Profile::empty(user_id));
    }

    pub fn has_identity(&self, user_id: Uuid) -> bool {
        self.identities.lock().unwrap().contains(&user_id)
    }

    pub fn has_profile(&self, user_id: Uuid) -> bool {
        self.profiles.lock().unwrap().contains_key(&user_id)
    }

    /// Make the next profile deletions fail.
    pub fn fail_profile_deletes(&self, fail: bool) {
        self.fail_profile_delete.store(fail, Ordering::SeqCst);
    }

    /// Make the next identity deletions fail.
    pub fn fail_identity_deletes(&self, fail: bool) {
        self.fail_identity_delete.store(fail, Ordering::SeqCst);
    }
}

fn injected(endpoint: &str) -> ProviderError {
    ProviderError::Request {
        endpoint: endpoint.to_string(),
        reason: "injected failure".to_string(),
    }
}

#[async_trait]
impl IdentityProvider for MemoryBackend {
    async fn authenticate(&self, bearer: &str) -> Result<Option<AuthUser>, ProviderError> {
        let user_id = self.tokens.lock().unwrap().get(bearer).copied();
        // A token whose identity record is gone no longer resolves,
        // matching the provider's behavior after deletion.
        Ok(user_id
            .filter(|id| self.identities.lock().unwrap().contains(id))
            .map(|id| AuthUser { id, email: None }))
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), ProviderError> {
        if self.fail_identity_delete.load(Ordering::SeqCst) {
            return Err(injected("memory/identity"));
        }
        self.identities.lock().unwrap().remove(&user_id);
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryBackend {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>, ProviderError> {
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Profile, ProviderError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(&user_id)
            .ok_or_else(|| ProviderError::UnexpectedStatus {
                endpoint: "memory/profiles".to_string(),
                status: 406,
                body: "no row matched".to_string(),
            })?;
        profile.apply(update);
        Ok(profile.clone())
    }

    async fn delete_profile(&self, user_id: Uuid) -> Result<(), ProviderError> {
        if self.fail_profile_delete.load(Ordering::SeqCst) {
            return Err(injected("memory/profiles"));
        }
        self.profiles.lock().unwrap().remove(&user_id);
        Ok(())
    }
}
