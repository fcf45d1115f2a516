//! User-Agent string sent with every page request.

/// Tool name used as the User-Agent product token.
const PRODUCT: &str = "channel-puller";

/// Default User-Agent for page requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("{PRODUCT}/{version} (metadata-lookup)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_contains_crate_version() {
        let ua = default_user_agent();
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("channel-puller/")
                .and_then(|s| s.split(' ').next())
                .unwrap_or_default(),
            "UA must contain crate version: {ua}"
        );
    }

    #[test]
    fn test_user_agent_format_keywords() {
        let ua = default_user_agent();
        assert!(ua.contains("metadata-lookup"), "got: {ua}");
    }
}
