//! Small helpers shared across the crate.
//!
//! Plugin, file and tag names are compared case-insensitively everywhere.
//! All such comparisons go through [`name_key`] so that every call site folds
//! case the same way.

/// Normalized lookup key for a plugin, file or tag name.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Case-insensitive name equality.
pub fn names_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || name_key(a) == name_key(b)
}
