use crate::helpers::{env_opt, env_u64};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5050/api";

#[derive(Clone, Debug)]
pub struct DeskConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub upload_timeout_secs: u64,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            upload_timeout_secs: 120,
        }
    }
}

impl DeskConfig {
    /// Reads `REPAIR_DESK_*` variables, keeping defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_opt("REPAIR_DESK_API_URL").unwrap_or(defaults.base_url),
            timeout_secs: env_u64("REPAIR_DESK_TIMEOUT_SECS", defaults.timeout_secs),
            upload_timeout_secs: env_u64(
                "REPAIR_DESK_UPLOAD_TIMEOUT_SECS",
                defaults.upload_timeout_secs,
            ),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }
}
