//! # dna-core
//!
//! Core types shared across the DNA transformation pipeline crates.
//!
//! - Entity structs for data objects and transformation steps
//! - Status enums with state machine transitions
//! - The in-memory tabular model (`Dataset`, `Column`, `Value`)
//! - Cross-cutting error types
//! - Response types returned by preview and publish

pub mod dataset;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod responses;

/// Step description that bypasses synthesis and leaves the data untouched.
pub const PASS_THROUGH_DESCRIPTION: &str = "Show all rows";

/// Check whether a step description is the pass-through sentinel.
///
/// Comparison is case-sensitive after trimming surrounding whitespace.
#[must_use]
pub fn is_pass_through(description: &str) -> bool {
    description.trim() == PASS_THROUGH_DESCRIPTION
}

/// Name of the preset step that promotes the first data row to the header.
pub const HEADER_PROMOTION_NAME: &str = "First Row Promote to Header";

/// Description of the header promotion preset. Resolved without synthesis.
pub const HEADER_PROMOTION_DESCRIPTION: &str = "Skip the first row and use it as headers";

/// Same comparison rules as [`is_pass_through`].
#[must_use]
pub fn is_header_promotion(description: &str) -> bool {
    description.trim() == HEADER_PROMOTION_DESCRIPTION
}

#[cfg(test)]
mod tests {
    use super::{is_header_promotion, is_pass_through};

    #[test]
    fn pass_through_ignores_surrounding_whitespace() {
        assert!(is_pass_through("Show all rows"));
        assert!(is_pass_through("  Show all rows\n"));
    }

    #[test]
    fn pass_through_is_case_sensitive() {
        assert!(!is_pass_through("show all rows"));
        assert!(!is_pass_through("Show all rows please"));
    }

    #[test]
    fn header_promotion_matches_preset_only() {
        assert!(is_header_promotion(" Skip the first row and use it as headers "));
        assert!(!is_header_promotion("skip the first row and use it as headers"));
        assert!(!is_pass_through(super::HEADER_PROMOTION_DESCRIPTION));
    }
}
