mod hash;

pub use hash::{compute_hash, hash_token};

/// Get current timestamp in ISO 8601 format
#[must_use]
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Generate a fresh row identifier.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Convert a display name into the URL slug used for uniqueness checks.
#[must_use]
pub fn slugify_name(name: &str) -> String {
    slug::slugify(name.trim())
}

/// Format a session lifetime for log lines ("30days", "12h").
#[must_use]
pub fn format_duration(duration: std::time::Duration) -> String {
    humantime::format_duration(duration).to_string()
}

#[cfg(test)]
#[path = "utils_tests.rs"]
mod utils_tests;
