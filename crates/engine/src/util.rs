//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Build the accent-insensitive lookup key stored in `name_norm` columns.
///
/// Names arrive in Portuguese ("Garrafão 20L", "José") and must collide on
/// lookup regardless of accents, case, or spacing. NFKD-decompose, drop the
/// combining marks, lowercase, and collapse separator runs to single spaces.
pub(crate) fn normalize_lookup_name(input: &str) -> String {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in input.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_key_strips_accents_and_case() {
        assert_eq!(normalize_lookup_name("Garrafão 20L"), "garrafao 20l");
        assert_eq!(normalize_lookup_name("  JOSÉ  DA SILVA "), "jose da silva");
    }

    #[test]
    fn lookup_key_collapses_separators() {
        assert_eq!(normalize_lookup_name("Água - Mineral"), "agua mineral");
        assert_eq!(normalize_lookup_name(""), "");
    }
}
