//! URL canonicalization for duplicate-task detection
//!
//! Two tasks target the same content iff their post URLs normalize to the
//! same key for the same action and network. Normalization is pure string
//! surgery and never fails: whatever arrives - scheme-less fragments, stray
//! query strings, mixed-case hosts - reduces to a comparable `host + path`
//! key.

use crate::ActionType;
use serde::{Deserialize, Serialize};

/// Mobile/short subdomain prefixes stripped from hosts, checked in order.
/// At most one is removed.
const STRIPPED_PREFIXES: &[&str] = &["www.", "m.", "mobile.", "vm."];

/// Domain aliases folded into their canonical platform host
const HOST_ALIASES: &[(&str, &str)] = &[
    ("youtu.be", "youtube.com"),
    ("youtube-nocookie.com", "youtube.com"),
];

/// Normalize a raw post URL into its canonical comparison key.
///
/// Drops the scheme, query string and fragment; lowercases the host; strips
/// one mobile subdomain prefix; folds known alias hosts; and removes a single
/// trailing slash from the path (so the root path contributes nothing).
pub fn normalize_url(raw_url: &str) -> String {
    let trimmed = raw_url.trim();

    // Scheme, if any, ends at "://"; protocol-relative URLs start with "//".
    let without_scheme = match trimmed.find("://") {
        Some(idx) => &trimmed[idx + 3..],
        None => trimmed.strip_prefix("//").unwrap_or(trimmed),
    };

    // Fragment and query never participate in the key.
    let without_fragment = without_scheme.split('#').next().unwrap_or("");
    let without_query = without_fragment.split('?').next().unwrap_or("");

    let (host, path) = match without_query.find('/') {
        Some(idx) => (&without_query[..idx], &without_query[idx..]),
        None => (without_query, ""),
    };

    let mut host = host.to_ascii_lowercase();

    for prefix in STRIPPED_PREFIXES {
        if let Some(stripped) = host.strip_prefix(prefix) {
            host = stripped.to_string();
            break;
        }
    }

    for (alias, canonical) in HOST_ALIASES {
        if host == *alias {
            host = canonical.to_string();
            break;
        }
    }

    let path = path.strip_suffix('/').unwrap_or(path);

    format!("{}{}", host, path)
}

/// Comparison key identifying "the same unit of engagement work"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DuplicateKey {
    pub url_key: String,
    pub action: ActionType,
    pub network: String,
}

impl DuplicateKey {
    pub fn new(post_url: &str, action: ActionType, network: &str) -> Self {
        Self {
            url_key: normalize_url(post_url),
            action,
            network: network.to_ascii_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_case_and_trailing_slash_are_ignored() {
        assert_eq!(
            normalize_url("https://WWW.Example.com/Post/123/"),
            normalize_url("http://example.com/Post/123"),
        );
    }

    #[test]
    fn short_link_aliases_fold_into_platform_host() {
        assert_eq!(normalize_url("https://youtu.be/abc"), normalize_url("https://youtube.com/abc"));
        assert_eq!(
            normalize_url("https://www.youtube-nocookie.com/watch"),
            "youtube.com/watch",
        );
    }

    #[test]
    fn query_and_fragment_are_dropped() {
        assert_eq!(normalize_url("https://tiktok.com/@u/video/1?lang=en#top"), "tiktok.com/@u/video/1");
    }

    #[test]
    fn at_most_one_prefix_is_stripped() {
        assert_eq!(normalize_url("https://m.youtube.com/x"), "youtube.com/x");
        assert_eq!(normalize_url("https://vm.tiktok.com/ZMabc"), "tiktok.com/ZMabc");
        // "www.m.example.com" loses only "www."
        assert_eq!(normalize_url("https://www.m.example.com/a"), "m.example.com/a");
    }

    #[test]
    fn path_case_is_preserved() {
        assert_ne!(normalize_url("https://example.com/Post"), normalize_url("https://example.com/post"));
    }

    #[test]
    fn malformed_input_never_panics() {
        for raw in ["", "   ", "not a url", "http://", "https:///path", "//host/p/", "host"] {
            let _ = normalize_url(raw);
        }
        assert_eq!(normalize_url("instagram.com/p/XYZ/"), "instagram.com/p/XYZ");
    }

    #[test]
    fn root_path_contributes_nothing() {
        assert_eq!(normalize_url("https://example.com/"), "example.com");
        assert_eq!(normalize_url("https://example.com"), "example.com");
    }

    #[test]
    fn duplicate_key_lowercases_network() {
        let a = DuplicateKey::new("https://youtu.be/abc", ActionType::Like, "YouTube");
        let b = DuplicateKey::new("https://www.youtube.com/abc/", ActionType::Like, "youtube");
        assert_eq!(a, b);
    }
}
