// src/mirror/filter.rs

//! Filter expression validation

use crate::error::{Error, Result};
use crate::query;

/// Check that a mirror filter parses; an empty filter disables filtering
pub fn validate_filter(filter: &str) -> Result<()> {
    if filter.is_empty() {
        return Ok(());
    }

    query::parse(filter)
        .map(|_| ())
        .map_err(|e| Error::InvalidFilter {
            filter: filter.to_string(),
            diagnostic: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_is_valid() {
        validate_filter("").unwrap();
    }

    #[test]
    fn test_valid_filter() {
        validate_filter("Name (nginx) | Priority (required)").unwrap();
    }

    #[test]
    fn test_invalid_filter_carries_diagnostic() {
        let err = validate_filter("Name (nginx").unwrap_err();
        match err {
            Error::InvalidFilter { filter, diagnostic } => {
                assert_eq!(filter, "Name (nginx");
                assert!(diagnostic.contains("position"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_deeply_nested_filter_is_rejected() {
        let filter = "(".repeat(100_000);
        assert!(matches!(validate_filter(&filter), Err(Error::InvalidFilter { .. })));
    }

    #[test]
    fn test_whitespace_only_filter_is_rejected() {
        assert!(matches!(validate_filter("  "), Err(Error::InvalidFilter { .. })));
    }
}
