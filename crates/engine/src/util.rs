//! Internal helpers for name validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! text handling so every name stored or compared by the engine has the same
//! shape.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Trim and NFC-normalize a name, rejecting empty values.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let normalized: String = value.trim().nfc().collect();
    if normalized.is_empty() {
        return Err(EngineError::InvalidExpense(format!(
            "{label} must not be empty"
        )));
    }
    Ok(normalized)
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.nfc().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_decomposed_names() {
        let decomposed = "Jose\u{301}";
        assert_eq!(
            normalize_required_name(decomposed, "payer").unwrap(),
            "Jos\u{e9}"
        );
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(normalize_required_name("   ", "payer").is_err());
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(Some(" lunch ")).as_deref(), Some("lunch"));
    }
}
