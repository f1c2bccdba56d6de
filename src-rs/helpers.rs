use std::env;

pub fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

pub fn env_u64(key: &str, fallback: u64) -> u64 {
    match env_opt(key) {
        Some(value) => value.parse::<u64>().unwrap_or(fallback),
        None => fallback,
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Optional text fields count as set only when non-blank.
pub fn is_set(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}
