//! Identifier normalisation and synthesis
//!
//! Identifiers arrive namespace-qualified (`CO_360:0000045`) and are stored as
//! their bare numeric suffix (`45`). On OBO output they are re-qualified with
//! the run's root id and padded to [`ID_WIDTH`] digits.

use regex::Regex;

/// Digits in a generated OBO identifier
pub const ID_WIDTH: usize = 7;

static TRAIT_WORD: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"(?i)\btraits?\b").expect("Valid trait word regex pattern")
});

static WHITESPACE: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"\s+").expect("Valid whitespace regex pattern"));

/// Build `{root_id}:{id}` with the id left-padded with zeros to [`ID_WIDTH`].
///
/// Ids already at or beyond the pad width are kept whole.
///
/// ```
/// use trait_ontology_core::ids::generate_id;
/// assert_eq!(generate_id("CO_360", "45"), "CO_360:0000045");
/// assert_eq!(generate_id("CO_360", "123456789"), "CO_360:123456789");
/// ```
#[must_use]
pub fn generate_id(root_id: &str, id: &str) -> String {
    format!("{root_id}:{:0>width$}", normalize_id(id), width = ID_WIDTH)
}

/// Strip a `{namespace}:` prefix and leading zeros from an identifier.
///
/// A value made only of zeros normalises to `"0"`; blank input stays blank.
#[must_use]
pub fn normalize_id(raw: &str) -> String {
    let raw = raw.trim();
    let local = raw.rsplit_once(':').map_or(raw, |(_, local)| local).trim();
    if local.is_empty() {
        return String::new();
    }
    let stripped = local.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// Numeric value of a normalised identifier, if it is purely numeric
#[must_use]
pub fn numeric_id(id: &str) -> Option<u64> {
    id.trim().parse::<u64>().ok()
}

/// Derive a trait class id from its name.
///
/// The word "trait" or "traits" is removed (any case) and remaining
/// whitespace runs collapse to a single underscore.
///
/// ```
/// use trait_ontology_core::ids::trait_class_id;
/// assert_eq!(trait_class_id("Abiotic stress traits"), "Abiotic_stress");
/// ```
#[must_use]
pub fn trait_class_id(name: &str) -> String {
    let without = TRAIT_WORD.replace_all(name, " ");
    WHITESPACE
        .replace_all(without.trim(), "_")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generate_id_pads() {
        assert_eq!(generate_id("CO_360", "45"), "CO_360:0000045");
        assert_eq!(generate_id("CO_360", "CO_360:0000045"), "CO_360:0000045");
        assert_eq!(generate_id("CO_360", "1234567"), "CO_360:1234567");
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("CO_360:0000045"), "45");
        assert_eq!(normalize_id("0000000"), "0");
        assert_eq!(normalize_id(" 12 "), "12");
        assert_eq!(normalize_id(""), "");
    }

    #[test]
    fn test_trait_class_id() {
        assert_eq!(trait_class_id("Agronomic trait"), "Agronomic");
        assert_eq!(trait_class_id("Morphological Traits"), "Morphological");
        assert_eq!(trait_class_id("Biotic  stress"), "Biotic_stress");
        assert_eq!(trait_class_id("Quality"), "Quality");
        assert_eq!(trait_class_id("Portrait shape"), "Portrait_shape");
    }

    proptest! {
        #[test]
        fn generated_ids_keep_every_digit(n in 0u64..10_000_000_000) {
            let id = generate_id("CO_1", &n.to_string());
            let local = id.strip_prefix("CO_1:").unwrap();
            prop_assert!(local.len() >= ID_WIDTH);
            prop_assert_eq!(local.parse::<u64>().unwrap(), n);
        }
    }
}
