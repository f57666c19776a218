//! Search term parsing and classification.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::domain::entities::InstallMode;

/// IPv4-shaped search terms, in priority order.
///
/// Octets are not range-checked: `999.1.1.1` is still an address lookup.
static IPV4_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}$").unwrap(),
        Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.?$").unwrap(),
        Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.?$").unwrap(),
        Regex::new(r"^[0-9]{1,3}\.$").unwrap(),
    ]
});

/// Which query shape a search term selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchKind {
    None,
    NumericId,
    Ipv4,
    DomainText,
    PathText,
}

/// A parsed search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    term: String,
    wildcard: bool,
    kind: SearchKind,
}

impl SearchQuery {
    /// Parses a raw `s` parameter.
    ///
    /// The term is trimmed; if it contains `*` the wildcard flag is set and
    /// leading and trailing `*` are removed before classification.
    pub fn parse(raw: &str, mode: InstallMode) -> Self {
        let trimmed = raw.trim();
        let wildcard = trimmed.contains('*');
        let term = if wildcard {
            trimmed.trim_matches('*').to_string()
        } else {
            trimmed.to_string()
        };
        let kind = classify(&term, wildcard, mode);

        Self {
            term,
            wildcard,
            kind,
        }
    }

    pub fn empty() -> Self {
        Self {
            term: String::new(),
            wildcard: false,
            kind: SearchKind::None,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }
}

/// Classifies a trimmed, wildcard-stripped term.
///
/// Order matters: address shapes win over numeric ids, and a wildcard turns
/// a numeric term into a text match on its digits.
pub fn classify(term: &str, wildcard: bool, mode: InstallMode) -> SearchKind {
    if term.is_empty() {
        return SearchKind::None;
    }

    if is_ipv4_shaped(term) {
        return SearchKind::Ipv4;
    }

    if !wildcard && is_site_id(term) {
        return SearchKind::NumericId;
    }

    match mode {
        InstallMode::Subdomain => SearchKind::DomainText,
        InstallMode::Subdirectory => SearchKind::PathText,
    }
}

pub fn is_ipv4_shaped(term: &str) -> bool {
    IPV4_PATTERNS.iter().any(|re| re.is_match(term))
}

// Digit strings too long for an id fall through to text matching.
fn is_site_id(term: &str) -> bool {
    term.bytes().all(|b| b.is_ascii_digit()) && term.parse::<i64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(raw: &str) -> SearchKind {
        SearchQuery::parse(raw, InstallMode::Subdomain).kind()
    }

    #[test]
    fn test_empty_term_is_none() {
        assert_eq!(kind(""), SearchKind::None);
        assert_eq!(kind("   "), SearchKind::None);
        assert_eq!(kind("*"), SearchKind::None);
    }

    #[test]
    fn test_ipv4_variants_win_over_numeric() {
        for term in ["1.2.3.4", "10.0.0", "10.0.0.", "10.0", "10.0.", "10."] {
            assert_eq!(kind(term), SearchKind::Ipv4, "term {term}");
        }
    }

    #[test]
    fn test_ipv4_octets_are_not_range_checked() {
        assert_eq!(kind("999.300.1.1"), SearchKind::Ipv4);
    }

    #[test]
    fn test_ipv4_rejects_long_octets_and_extra_parts() {
        assert_ne!(kind("1234.1.1.1"), SearchKind::Ipv4);
        assert_ne!(kind("1.2.3.4.5"), SearchKind::Ipv4);
        assert_ne!(kind("1.2.3.4."), SearchKind::Ipv4);
    }

    #[test]
    fn test_bare_octet_without_dot_is_numeric() {
        assert_eq!(kind("10"), SearchKind::NumericId);
    }

    #[test]
    fn test_wildcard_disables_numeric_id() {
        let query = SearchQuery::parse("42*", InstallMode::Subdirectory);

        assert!(query.wildcard());
        assert_eq!(query.term(), "42");
        assert_eq!(query.kind(), SearchKind::PathText);
        assert_eq!(kind("*42*"), SearchKind::DomainText);
    }

    #[test]
    fn test_wildcard_ip_prefix_is_still_ipv4() {
        let query = SearchQuery::parse("192.168.*", InstallMode::Subdomain);

        assert_eq!(query.term(), "192.168.");
        assert_eq!(query.kind(), SearchKind::Ipv4);
    }

    #[test]
    fn test_text_kind_follows_install_mode() {
        assert_eq!(
            SearchQuery::parse("shop", InstallMode::Subdomain).kind(),
            SearchKind::DomainText
        );
        assert_eq!(
            SearchQuery::parse("shop", InstallMode::Subdirectory).kind(),
            SearchKind::PathText
        );
    }

    #[test]
    fn test_overlong_digits_fall_back_to_text() {
        assert_eq!(kind("99999999999999999999999"), SearchKind::DomainText);
    }

    #[test]
    fn test_term_is_trimmed() {
        let query = SearchQuery::parse("  7  ", InstallMode::Subdomain);
        assert_eq!(query.term(), "7");
        assert_eq!(query.kind(), SearchKind::NumericId);
    }
}
