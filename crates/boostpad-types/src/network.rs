//! Social-network registry
//!
//! Each supported network declares which engagement actions it accepts and
//! which domain markers a post URL must carry. Validation is dispatched
//! through the registry lookup and returns a typed verdict rather than
//! raising.

use crate::ActionType;
use std::collections::HashMap;

/// Static description of one social network
#[derive(Debug, Clone)]
pub struct NetworkSpec {
    /// Registry code, lowercase (e.g. "instagram")
    pub code: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    /// Actions creators may request on this network
    pub available_actions: &'static [ActionType],
    /// A valid post URL must contain at least one of these markers
    pub url_markers: &'static [&'static str],
}

impl NetworkSpec {
    /// Whether the network accepts the given action type
    pub fn supports(&self, action: ActionType) -> bool {
        self.available_actions.contains(&action)
    }

    /// Check a raw post URL against the network's domain markers
    pub fn validate_url(&self, raw_url: &str) -> UrlVerdict {
        let lowered = raw_url.to_ascii_lowercase();
        if self.url_markers.iter().any(|marker| lowered.contains(marker)) {
            UrlVerdict::Ok
        } else {
            UrlVerdict::MissingMarker { expected: self.url_markers }
        }
    }
}

/// Typed outcome of per-network URL validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlVerdict {
    Ok,
    MissingMarker { expected: &'static [&'static str] },
}

impl UrlVerdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, UrlVerdict::Ok)
    }

    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }
}

const NETWORKS: &[NetworkSpec] = &[
    NetworkSpec {
        code: "instagram",
        display_name: "Instagram",
        available_actions: &[ActionType::Like, ActionType::Comment, ActionType::Follow],
        url_markers: &["instagram.com"],
    },
    NetworkSpec {
        code: "tiktok",
        display_name: "TikTok",
        available_actions: &[ActionType::Like, ActionType::Comment, ActionType::Follow, ActionType::View],
        url_markers: &["tiktok.com"],
    },
    NetworkSpec {
        code: "youtube",
        display_name: "YouTube",
        available_actions: &[ActionType::Like, ActionType::Comment, ActionType::Subscribe, ActionType::View],
        url_markers: &["youtube.com", "youtu.be", "youtube-nocookie.com"],
    },
    NetworkSpec {
        code: "twitter",
        display_name: "X (Twitter)",
        available_actions: &[ActionType::Like, ActionType::Comment, ActionType::Follow, ActionType::Repost],
        url_markers: &["twitter.com", "x.com"],
    },
    NetworkSpec {
        code: "facebook",
        display_name: "Facebook",
        available_actions: &[ActionType::Like, ActionType::Comment, ActionType::Follow],
        url_markers: &["facebook.com", "fb.com", "fb.watch"],
    },
    NetworkSpec {
        code: "telegram",
        display_name: "Telegram",
        available_actions: &[ActionType::Follow, ActionType::View],
        url_markers: &["t.me", "telegram.me"],
    },
];

/// Lookup table of supported networks, keyed by code
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    specs: HashMap<&'static str, &'static NetworkSpec>,
}

impl NetworkRegistry {
    /// Registry populated with the built-in network set
    pub fn with_defaults() -> Self {
        Self {
            specs: NETWORKS.iter().map(|spec| (spec.code, spec)).collect(),
        }
    }

    /// Look up a network by code, case-insensitively
    pub fn get(&self, code: &str) -> Option<&'static NetworkSpec> {
        self.specs.get(code.to_ascii_lowercase().as_str()).copied()
    }

    /// All registered network codes
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.keys().copied()
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = NetworkRegistry::with_defaults();
        assert_eq!(registry.get("Instagram").unwrap().code, "instagram");
        assert!(registry.get("myspace").is_none());
    }

    #[test]
    fn action_support_varies_per_network() {
        let registry = NetworkRegistry::with_defaults();
        let youtube = registry.get("youtube").unwrap();
        assert!(youtube.supports(ActionType::Subscribe));
        assert!(!youtube.supports(ActionType::Follow));

        let telegram = registry.get("telegram").unwrap();
        assert!(telegram.supports(ActionType::Follow));
        assert!(!telegram.supports(ActionType::Like));
    }

    #[test]
    fn url_validation_checks_domain_markers() {
        let registry = NetworkRegistry::with_defaults();
        let instagram = registry.get("instagram").unwrap();

        assert!(instagram.validate_url("https://www.instagram.com/p/XYZ/").is_ok());
        assert!(instagram.validate_url("HTTPS://INSTAGRAM.COM/p/XYZ").is_ok());

        let verdict = instagram.validate_url("https://example.com/p/XYZ");
        assert!(verdict.is_err());
        match verdict {
            UrlVerdict::MissingMarker { expected } => assert_eq!(expected, &["instagram.com"]),
            other => panic!("expected MissingMarker, got {:?}", other),
        }
    }

    #[test]
    fn short_link_hosts_validate_for_youtube() {
        let registry = NetworkRegistry::with_defaults();
        let youtube = registry.get("youtube").unwrap();
        assert!(youtube.validate_url("https://youtu.be/abc").is_ok());
    }
}
