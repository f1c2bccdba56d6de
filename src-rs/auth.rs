use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::RepairApi;
use crate::error::{AuthError, ValidationError};

pub const ADMIN_ROLE: &str = "admin";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub access: Vec<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Logs in with username and password. Both must be non-blank.
pub fn login(api: &dyn RepairApi, username: &str, password: &str) -> Result<User, AuthError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials.into());
    }
    let credentials = Credentials {
        username: username.trim().to_string(),
        password: password.to_string(),
    };
    let user = api.login(&credentials)?;
    info!(user = %user.name, role = %user.role, "logged in");
    Ok(user)
}

/// User ids come back as numbers from some deployments.
fn id_as_string<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "unexpected user id: {}",
            other
        ))),
    }
}
