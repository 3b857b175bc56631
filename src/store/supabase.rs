//! Supabase HTTP backend — auth API + PostgREST `profiles` table.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::error::ProviderError;
use crate::onboarding::model::{Profile, ProfileUpdate};

use super::traits::{AuthUser, IdentityProvider, ProfileStore};

/// Upstream calls have no cancellation story of their own; a bounded
/// client timeout keeps a hung provider from blocking a request forever.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend over the Supabase HTTP surface.
///
/// Holds both credential scopes: the anonymous key backs the
/// request-scoped client used to resolve the caller, the service-role key
/// backs the privileged client used for row access and the deletion
/// steps. The privileged credential comes from deployment configuration
/// only — nothing caller-supplied reaches it beyond the authenticated
/// user id baked into the URL.
pub struct SupabaseBackend {
    base_url: String,
    anon_key: SecretString,
    service_role_key: SecretString,
    client: reqwest::Client,
}

impl SupabaseBackend {
    pub fn new(config: &ServiceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: config.supabase_url.clone(),
            anon_key: config.anon_key.clone(),
            service_role_key: config.service_role_key.clone(),
            client,
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn profiles_url(&self, user_id: Uuid) -> String {
        format!(
            "{}/rest/v1/profiles?user_id=eq.{user_id}&select=*",
            self.base_url
        )
    }

    /// Attach the privileged credential (apikey + bearer).
    fn privileged(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let key = self.service_role_key.expose_secret();
        req.header("apikey", key).bearer_auth(key)
    }
}

fn request_error(endpoint: &str, e: reqwest::Error) -> ProviderError {
    ProviderError::Request {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    }
}

async fn unexpected_status(endpoint: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ProviderError::UnexpectedStatus {
        endpoint: endpoint.to_string(),
        status,
        body,
    }
}

#[async_trait]
impl IdentityProvider for SupabaseBackend {
    async fn authenticate(&self, bearer: &str) -> Result<Option<AuthUser>, ProviderError> {
        const ENDPOINT: &str = "auth/v1/user";

        // Request-scoped client: anonymous apikey plus the caller's own
        // bearer token. An invalid or revoked token is a "no user" answer,
        // not a provider fault.
        let response = self
            .client
            .get(self.auth_url("user"))
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| request_error(ENDPOINT, e))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                let user = response.json::<AuthUser>().await.map_err(|e| {
                    ProviderError::Decode {
                        endpoint: ENDPOINT.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Some(user))
            }
            _ => Err(unexpected_status(ENDPOINT, response).await),
        }
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), ProviderError> {
        const ENDPOINT: &str = "auth/v1/admin/users";

        let response = self
            .privileged(
                self.client
                    .delete(self.auth_url(&format!("admin/users/{user_id}"))),
            )
            .send()
            .await
            .map_err(|e| request_error(ENDPOINT, e))?;

        // An identity that is already gone deletes as a no-op.
        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(unexpected_status(ENDPOINT, response).await)
        }
    }
}

#[async_trait]
impl ProfileStore for SupabaseBackend {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>, ProviderError> {
        const ENDPOINT: &str = "rest/v1/profiles";

        let response = self
            .privileged(self.client.get(self.profiles_url(user_id)))
            .header("Accept", "application/vnd.pgrst.object+json")
            .send()
            .await
            .map_err(|e| request_error(ENDPOINT, e))?;

        match response.status() {
            // PostgREST answers 406 for a single-object request matching
            // zero rows.
            StatusCode::NOT_ACCEPTABLE | StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let profile = response.json::<Profile>().await.map_err(|e| {
                    ProviderError::Decode {
                        endpoint: ENDPOINT.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Some(profile))
            }
            _ => Err(unexpected_status(ENDPOINT, response).await),
        }
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Profile, ProviderError> {
        const ENDPOINT: &str = "rest/v1/profiles";

        let response = self
            .privileged(self.client.patch(self.profiles_url(user_id)))
            .header("Accept", "application/vnd.pgrst.object+json")
            .header("Prefer", "return=representation")
            .json(update)
            .send()
            .await
            .map_err(|e| request_error(ENDPOINT, e))?;

        if response.status().is_success() {
            response
                .json::<Profile>()
                .await
                .map_err(|e| ProviderError::Decode {
                    endpoint: ENDPOINT.to_string(),
                    reason: e.to_string(),
                })
        } else {
            Err(unexpected_status(ENDPOINT, response).await)
        }
    }

    async fn delete_profile(&self, user_id: Uuid) -> Result<(), ProviderError> {
        const ENDPOINT: &str = "rest/v1/profiles";

        let response = self
            .privileged(self.client.delete(self.profiles_url(user_id)))
            .send()
            .await
            .map_err(|e| request_error(ENDPOINT, e))?;

        // A delete matching zero rows still returns 2xx, which is exactly
        // the idempotence the deletion protocol relies on.
        if response.status().is_success() {
            Ok(())
        } else {
            Err(unexpected_status(ENDPOINT, response).await)
        }
    }
}
