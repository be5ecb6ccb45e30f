// src/secrets.rs
//! Secret resolution: a named secret is a JSON object of string fields.

use crate::constants::{SECRET_FIELD_API_KEY, SECRET_FIELD_AUTH_TOKEN};
use crate::error::AppError;
use crate::types::{ApiKey, AuthToken};
use std::collections::HashMap;
use std::path::PathBuf;

/// Resolves a named secret to its fields.
#[async_trait::async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<HashMap<String, String>, AppError>;
}

/// Reads the secret's JSON from an environment variable.
///
/// The variable name is derived from the secret name:
/// `notion-api-key` is read from `SECRET_NOTION_API_KEY`.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn variable_name(secret_name: &str) -> String {
        let normalized: String = secret_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("SECRET_{}", normalized)
    }
}

#[async_trait::async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret(&self, name: &str) -> Result<HashMap<String, String>, AppError> {
        let variable = Self::variable_name(name);
        let raw = std::env::var(&variable).map_err(|_| AppError::SecretUnavailable {
            name: name.to_string(),
            reason: format!("{} is not set", variable),
        })?;
        parse_secret(name, &raw)
    }
}

/// Reads `{dir}/{name}.json`.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    dir: PathBuf,
}

impl FileSecretStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait::async_trait]
impl SecretStore for FileSecretStore {
    async fn get_secret(&self, name: &str) -> Result<HashMap<String, String>, AppError> {
        let path = self.dir.join(format!("{}.json", name));
        log::debug!("Reading secret '{}' from {}", name, path.display());
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::SecretUnavailable {
                name: name.to_string(),
                reason: format!("{}: {}", path.display(), e),
            })?;
        parse_secret(name, &raw)
    }
}

/// Parses a secret payload; non-string values keep their JSON text.
fn parse_secret(name: &str, raw: &str) -> Result<HashMap<String, String>, AppError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| AppError::SecretUnavailable {
            name: name.to_string(),
            reason: format!("not valid JSON: {}", e),
        })?;

    let serde_json::Value::Object(fields) = value else {
        return Err(AppError::SecretUnavailable {
            name: name.to_string(),
            reason: "expected a JSON object".to_string(),
        });
    };

    Ok(fields
        .into_iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(s) => (key, s),
            other => (key, other.to_string()),
        })
        .collect())
}

/// The two credentials the service needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: ApiKey,
    pub auth_token: AuthToken,
}

impl Credentials {
    pub async fn load(store: &dyn SecretStore, secret_name: &str) -> Result<Self, AppError> {
        let fields = store.get_secret(secret_name).await?;
        Self::from_fields(secret_name, &fields)
    }

    pub fn from_fields(
        secret_name: &str,
        fields: &HashMap<String, String>,
    ) -> Result<Self, AppError> {
        let field = |key: &str| {
            fields
                .get(key)
                .cloned()
                .ok_or_else(|| AppError::SecretUnavailable {
                    name: secret_name.to_string(),
                    reason: format!("missing field '{}'", key),
                })
        };

        Ok(Self {
            api_key: ApiKey::new(field(SECRET_FIELD_API_KEY)?)?,
            auth_token: AuthToken::new(field(SECRET_FIELD_AUTH_TOKEN)?)?,
        })
    }
}
