//! ID resolver module
//!
//! Resolves a transaction id or unambiguous id prefix against a fetched
//! snapshot, so users can type short ids.

use anyhow::{Result, anyhow};
use factory_dashboard::FactorySnapshot;

/// Resolve a transaction id or prefix to a full id
///
/// An exact match always wins, even if it is also a prefix of other ids.
///
/// # Errors
/// Returns an error if:
/// - No transaction matches the prefix
/// - Multiple transactions match the prefix (ambiguous)
pub fn resolve_transaction_id(snapshot: &FactorySnapshot, input: &str) -> Result<String> {
    let ids = snapshot.transactions.iter().map(|t| t.id.as_str());
    resolve(ids, input)
}

fn resolve<'a>(ids: impl Iterator<Item = &'a str> + Clone, input: &str) -> Result<String> {
    if let Some(exact) = ids.clone().find(|id| *id == input) {
        return Ok(exact.to_string());
    }

    let prefix = input.to_lowercase();
    let matches: Vec<&str> = ids
        .filter(|id| id.to_lowercase().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => Err(anyhow!(
            "No transaction found with ID starting with '{}'",
            input
        )),
        1 => Ok(matches[0].to_string()),
        _ => Err(anyhow!(
            "Ambiguous prefix '{}' matches multiple transactions: {}",
            input,
            matches.join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: [&str; 3] = ["a1b2c3", "a1ffff", "b00000"];

    #[test]
    fn test_exact_match() {
        assert_eq!(resolve(IDS.into_iter(), "a1ffff").unwrap(), "a1ffff");
    }

    #[test]
    fn test_unique_prefix() {
        assert_eq!(resolve(IDS.into_iter(), "a1b").unwrap(), "a1b2c3");
        assert_eq!(resolve(IDS.into_iter(), "B0").unwrap(), "b00000");
    }

    #[test]
    fn test_ambiguous_prefix() {
        let err = resolve(IDS.into_iter(), "a1").unwrap_err();
        assert!(err.to_string().contains("Ambiguous"));
    }

    #[test]
    fn test_no_match() {
        let err = resolve(IDS.into_iter(), "zz").unwrap_err();
        assert!(err.to_string().contains("No transaction"));
    }
}
