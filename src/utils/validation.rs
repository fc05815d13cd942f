//! Name and value validation utilities.
//!
//! Network and team names end up as directory names and as Kubernetes
//! namespace or pod names, so they are held to DNS label rules.

use regex::Regex;
use std::sync::LazyLock;

/// Longest name a DNS label allows
pub const MAX_LABEL_LEN: usize = 63;

static DNS_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("Invalid DNS label regex")
});

/// Validate that `name` is usable as a DNS label
///
/// # Examples
/// ```
/// use warfleet::utils::validation::validate_dns_label;
///
/// assert!(validate_dns_label("signet100").is_ok());
/// assert!(validate_dns_label("Signet_100").is_err());
/// ```
pub fn validate_dns_label(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name cannot be empty".to_string());
    }
    if name.len() > MAX_LABEL_LEN {
        return Err(format!("name '{}' is longer than {} characters", name, MAX_LABEL_LEN));
    }
    if !DNS_LABEL.is_match(name) {
        return Err(format!(
            "name '{}' must contain only lowercase letters, digits and '-', and start and end with an alphanumeric",
            name
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dns_labels() {
        assert!(validate_dns_label("regtest4").is_ok());
        assert!(validate_dns_label("wargames-aries").is_ok());
        assert!(validate_dns_label("-leading").is_err());
        assert!(validate_dns_label("trailing-").is_err());
        assert!(validate_dns_label("has.dot").is_err());
        assert!(validate_dns_label("").is_err());
        assert!(validate_dns_label(&"a".repeat(64)).is_err());
        assert!(validate_dns_label(&"a".repeat(63)).is_ok());
    }
}
