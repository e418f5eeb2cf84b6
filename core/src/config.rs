//! API origin resolution.
//!
//! # Design
//! `resolve_api_base` is a pure function so the rule can be tested without
//! touching process state. `api_base` wraps it in a process-wide `OnceLock`:
//! the environment (and an optional `.env` file) is read on first use and the
//! result never changes afterwards. Changing the override needs a restart.
//!
//! Nothing else in the crate reads the environment. `HttpTransport` and
//! `CatalogClient` take the base URL as a constructor argument.

use std::sync::OnceLock;

/// Origin used when no override is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Environment variable holding the API origin override.
pub const API_BASE_ENV: &str = "BITEBOOK_API_BASE";

static API_BASE: OnceLock<String> = OnceLock::new();

/// Resolve the API origin from an optional override.
///
/// An override that is missing, empty or whitespace-only falls through to
/// [`DEFAULT_API_BASE`]. Trailing slashes are stripped so that paths starting
/// with `/` can be appended directly.
pub fn resolve_api_base(override_value: Option<&str>) -> String {
    let base = match override_value.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => DEFAULT_API_BASE,
    };
    base.trim_end_matches('/').to_string()
}

/// Process-wide API origin, resolved once from `BITEBOOK_API_BASE`.
pub fn api_base() -> &'static str {
    API_BASE.get_or_init(|| {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        let value = std::env::var(API_BASE_ENV).ok();
        let base = resolve_api_base(value.as_deref());
        tracing::debug!(api_base = %base, "resolved API origin");
        base
    })
}
