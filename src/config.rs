//! Endpoint configuration for the gateway and the portal's own routes.
//!
//! Defaults target a local stack. Environment variables override them at
//! runtime, and CLI flags override both. Configuration values are public; do
//! not store tokens here.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::env::var;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_PORTAL_BASE_URL: &str = "http://localhost:3000";

/// Gateway base URL.
pub const ENV_API_BASE_URL: &str = "PORTAL_API_GATEWAY_URL";
/// Name the web build uses for the same setting; read when the above is unset.
pub const ENV_API_BASE_URL_FALLBACK: &str = "NEXT_PUBLIC_API_GATEWAY_URL";
pub const ENV_PORTAL_BASE_URL: &str = "PORTAL_BASE_URL";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortalConfig {
    /// Prefix for every gateway call (`/v1/...`, `/users/...`).
    pub api_base_url: String,
    /// Origin serving the portal-local routes such as `/api/api-keys`.
    pub portal_base_url: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            portal_base_url: DEFAULT_PORTAL_BASE_URL.to_string(),
        }
    }
}

impl PortalConfig {
    /// Loads defaults and applies environment overrides.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();
        apply_overrides(&mut config, env_overrides());
        config
    }

    /// Applies explicit overrides (CLI flags). Empty values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, api_base_url: Option<&str>, portal_base_url: Option<&str>) -> Self {
        apply_overrides(
            &mut self,
            Overrides {
                api_base_url: api_base_url.and_then(normalize_value),
                portal_base_url: portal_base_url.and_then(normalize_value),
            },
        );
        self
    }
}

#[derive(Default)]
struct Overrides {
    api_base_url: Option<String>,
    portal_base_url: Option<String>,
}

fn env_overrides() -> Overrides {
    let read = |name: &str| var(name).ok().as_deref().and_then(normalize_value);

    Overrides {
        api_base_url: read(ENV_API_BASE_URL).or_else(|| read(ENV_API_BASE_URL_FALLBACK)),
        portal_base_url: read(ENV_PORTAL_BASE_URL),
    }
}

fn apply_overrides(config: &mut PortalConfig, overrides: Overrides) {
    if let Some(value) = overrides.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = overrides.portal_base_url {
        config.portal_base_url = value;
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Joins a base URL and a path with exactly one slash between them.
#[must_use]
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

// RFC 3986 unreserved characters stay as they are.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes an identifier for use as a single path segment.
#[must_use]
pub fn path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_value_trims_and_rejects_empty() {
        assert_eq!(normalize_value(""), None);
        assert_eq!(normalize_value("   "), None);
        assert_eq!(
            normalize_value("  https://gateway.example "),
            Some("https://gateway.example".to_string())
        );
    }

    #[test]
    fn load_uses_defaults_without_env() {
        temp_env::with_vars(
            [
                (ENV_API_BASE_URL, None::<&str>),
                (ENV_API_BASE_URL_FALLBACK, None),
                (ENV_PORTAL_BASE_URL, None),
            ],
            || {
                assert_eq!(PortalConfig::load(), PortalConfig::default());
            },
        );
    }

    #[test]
    fn load_prefers_primary_env_over_fallback() {
        temp_env::with_vars(
            [
                (ENV_API_BASE_URL, Some("https://gw.primary/api")),
                (ENV_API_BASE_URL_FALLBACK, Some("https://gw.fallback/api")),
                (ENV_PORTAL_BASE_URL, Some(" https://app.example ")),
            ],
            || {
                let config = PortalConfig::load();
                assert_eq!(config.api_base_url, "https://gw.primary/api");
                assert_eq!(config.portal_base_url, "https://app.example");
            },
        );
    }

    #[test]
    fn load_reads_fallback_when_primary_is_blank() {
        temp_env::with_vars(
            [
                (ENV_API_BASE_URL, Some("  ")),
                (ENV_API_BASE_URL_FALLBACK, Some("https://gw.fallback/api")),
            ],
            || {
                assert_eq!(PortalConfig::load().api_base_url, "https://gw.fallback/api");
            },
        );
    }

    #[test]
    fn overrides_ignore_empty_values() {
        let config = PortalConfig::default().with_overrides(Some(""), Some("  "));
        assert_eq!(config, PortalConfig::default());

        let config = PortalConfig::default().with_overrides(Some("https://gw/api"), None);
        assert_eq!(config.api_base_url, "https://gw/api");
        assert_eq!(config.portal_base_url, DEFAULT_PORTAL_BASE_URL);
    }

    #[test]
    fn build_url_handles_slashes() {
        assert_eq!(
            build_url_with_base("http://localhost:8000/api/", "/v1/teams"),
            "http://localhost:8000/api/v1/teams"
        );
        assert_eq!(
            build_url_with_base("http://localhost:8000/api", "v1/teams"),
            "http://localhost:8000/api/v1/teams"
        );
        assert_eq!(build_url_with_base("", "/v1/teams"), "/v1/teams");
    }

    #[test]
    fn path_segment_escapes_route_characters() {
        assert_eq!(path_segment("t-1_a.b~c"), "t-1_a.b~c");
        assert_eq!(path_segment("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(path_segment("sales team"), "sales%20team");
    }
}
