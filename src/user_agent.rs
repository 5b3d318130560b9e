//! Shared User-Agent string for listing and transfer requests.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/serve-clone";

/// Default User-Agent for every request issued during a run.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("serve-clone/{version} (directory-mirror; +{PROJECT_UA_URL})")
}
