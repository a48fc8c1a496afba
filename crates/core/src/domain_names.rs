//! Domain-name candidates and label rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Top-level domains checked for every candidate name.
pub const CHECKED_TLDS: [&str; 3] = ["com", "co", "io"];

/// Number of name ideas requested from the namer per pass.
pub const NAME_SUGGESTION_COUNT: usize = 20;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("label regex is valid")
});

/// How adventurous the name generator should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingMode {
    /// Short, brandable one- or two-word names.
    #[default]
    Normal,
    /// Names with action words, suffixes and prefixes, used after a normal
    /// pass found nothing available.
    Creative,
}

/// Per-TLD availability of a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TldAvailability {
    pub com: bool,
    pub co: bool,
    pub io: bool,
}

impl TldAvailability {
    /// Whether the name can be registered under at least one checked TLD.
    pub fn any(&self) -> bool {
        self.com || self.co || self.io
    }

    /// Set availability for a TLD by name. Unknown TLDs are ignored.
    pub fn set(&mut self, tld: &str, available: bool) {
        match tld {
            "com" => self.com = available,
            "co" => self.co = available,
            "io" => self.io = available,
            _ => {}
        }
    }
}

/// A name candidate with its availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCandidate {
    pub name: String,
    pub availability: TldAvailability,
}

/// Turn a raw name idea into a domain label.
///
/// Lowercases, drops whitespace, and strips a trailing checked TLD
/// (`acme.com` -> `acme`). Returns `None` when the result is not a valid label.
pub fn normalize_suggestion(raw: &str) -> Option<String> {
    let mut name: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    for tld in CHECKED_TLDS {
        if let Some(stripped) = name.strip_suffix(&format!(".{tld}")) {
            name = stripped.to_string();
            break;
        }
    }
    is_valid_label(&name).then_some(name)
}

/// Whether `name` is a single well-formed lowercase DNS label.
pub fn is_valid_label(name: &str) -> bool {
    LABEL_RE.is_match(name)
}

/// Validate and normalize a domain name chosen by the user.
pub fn validate_domain_choice(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim().to_ascii_lowercase();
    if name.is_empty() {
        return Err(CoreError::Validation(
            "A domain name must be provided".to_string(),
        ));
    }
    if !is_valid_label(&name) {
        return Err(CoreError::Validation(format!(
            "'{name}' is not a valid domain name. Use 1-63 lowercase letters, digits or \
             hyphens, not starting or ending with a hyphen"
        )));
    }
    Ok(name)
}

/// Deduplicate normalized suggestions, preserving first-seen order.
pub fn dedupe_suggestions(raw: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.iter()
        .filter_map(|s| normalize_suggestion(s))
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_any() {
        assert!(!TldAvailability::default().any());
        let mut a = TldAvailability::default();
        a.set("io", true);
        assert!(a.any());
        a.set("dev", true);
        assert_eq!(
            a,
            TldAvailability {
                com: false,
                co: false,
                io: true
            }
        );
    }

    #[test]
    fn normalize_strips_spaces_case_and_tld() {
        assert_eq!(normalize_suggestion("Acme Pets"), Some("acmepets".into()));
        assert_eq!(normalize_suggestion("acmepets.com"), Some("acmepets".into()));
        assert_eq!(normalize_suggestion("get-acme"), Some("get-acme".into()));
    }

    #[test]
    fn normalize_rejects_invalid_labels() {
        assert_eq!(normalize_suggestion("-acme"), None);
        assert_eq!(normalize_suggestion("acme_pets"), None);
        assert_eq!(normalize_suggestion(""), None);
        assert_eq!(normalize_suggestion(&"a".repeat(64)), None);
    }

    #[test]
    fn domain_choice_validation() {
        assert_eq!(validate_domain_choice(" AcmePets ").unwrap(), "acmepets");
        assert!(validate_domain_choice("").is_err());
        assert!(validate_domain_choice("acme pets").is_err());
        assert!(validate_domain_choice("acme.com").is_err());
    }

    #[test]
    fn dedupe_preserves_order() {
        let raw = vec!["Zeta".to_string(), "alpha".into(), "zeta".into(), "bad name!".into()];
        assert_eq!(dedupe_suggestions(&raw), vec!["zeta", "alpha"]);
    }

    #[test]
    fn naming_mode_defaults_to_normal() {
        assert_eq!(NamingMode::default(), NamingMode::Normal);
        let mode: NamingMode = serde_json::from_str("\"creative\"").unwrap();
        assert_eq!(mode, NamingMode::Creative);
    }
}
