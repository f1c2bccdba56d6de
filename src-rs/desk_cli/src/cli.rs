use clap::Parser;
use repair_desk_rs::DeskConfig;

/// Interactive repair desk: reconcile bills against repair tasks and raise indents.
///
/// Unset flags fall back to `REPAIR_DESK_API_URL`, `REPAIR_DESK_TIMEOUT_SECS`
/// and `REPAIR_DESK_UPLOAD_TIMEOUT_SECS`, then to the built-in defaults.
#[derive(Parser, Debug, Clone)]
#[command(name = "repair-desk", version, about)]
pub struct Cli {
    /// Base URL of the repair API.
    #[arg(long = "base")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Upload timeout in seconds.
    #[arg(long)]
    pub upload_timeout: Option<u64>,

    /// Log in as this user on startup.
    #[arg(short, long, env = "REPAIR_DESK_USER")]
    pub user: Option<String>,

    #[arg(long, env = "REPAIR_DESK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl Cli {
    pub fn desk_config(&self) -> DeskConfig {
        self.apply(DeskConfig::from_env())
    }

    fn apply(&self, base: DeskConfig) -> DeskConfig {
        DeskConfig {
            base_url: self.base_url.clone().unwrap_or(base.base_url),
            timeout_secs: self.timeout.unwrap_or(base.timeout_secs),
            upload_timeout_secs: self.upload_timeout.unwrap_or(base.upload_timeout_secs),
        }
    }
}
