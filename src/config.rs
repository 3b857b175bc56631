//! Service configuration loaded from the environment.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Deployment configuration for the deletion service.
///
/// Both credentials are deployment secrets and must never be hardcoded:
/// the anon key scopes a client to the authenticated caller, the service
/// role key bypasses row-level security and is used only for the deletion
/// steps.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the Supabase project, e.g. `https://xyz.supabase.co`.
    pub supabase_url: String,
    /// Public/anonymous API key for the request-scoped client.
    pub anon_key: SecretString,
    /// Privileged service-role key for the administrative client.
    pub service_role_key: SecretString,
    /// Port the deletion endpoint listens on.
    pub port: u16,
}

impl ServiceConfig {
    /// Build config from environment variables.
    ///
    /// Required: `SUPABASE_URL`, `SUPABASE_ANON_KEY`,
    /// `SUPABASE_SERVICE_ROLE_KEY`. Optional: `PORT` (default 8000).
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url = require_var("SUPABASE_URL")?;
        let anon_key = SecretString::from(require_var("SUPABASE_ANON_KEY")?);
        let service_role_key = SecretString::from(require_var("SUPABASE_SERVICE_ROLE_KEY")?);

        let port: u16 = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("not a valid port number: {raw}"),
            })?,
            Err(_) => 8000,
        };

        Ok(Self {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            anon_key,
            service_role_key,
            port,
        })
    }
}

fn require_var(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}
