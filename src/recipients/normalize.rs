//! Canonical casing for human names.

use regex::Captures;
use regex::Regex;
use std::sync::LazyLock;

/// A word character (ASCII letters, digits, underscore) that starts a word.
static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)[0-9A-Za-z_]").expect("Hardcode regex pattern"));

/// Lower-cases the whole name, then upper-cases the first character of every word.
///
/// Words are runs of ASCII word characters, so `-`, `'`, spaces and any
/// non-ASCII letter all start a new word: `"MARY-JANE o'brien"` becomes
/// `"Mary-Jane O'Brien"`. The function is idempotent.
pub fn normalize_name(name: &str) -> String {
    let lower = name.to_lowercase();
    WORD_START
        .replace_all(&lower, |captures: &Captures| captures[0].to_ascii_uppercase())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(normalize_name("SMITH"), "Smith");
        assert_eq!(normalize_name("john paul"), "John Paul");
        assert_eq!(normalize_name("MARY-JANE o'brien"), "Mary-Jane O'Brien");
    }

    #[test]
    fn keeps_whitespace_and_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("  ada  lovelace "), "  Ada  Lovelace ");
    }

    #[test]
    fn non_ascii_letters_break_words() {
        assert_eq!(normalize_name("JOSÉ"), "José");
        assert_eq!(normalize_name("élodie"), "éLodie");
    }

    #[test]
    fn digits_and_underscores_are_word_characters() {
        assert_eq!(normalize_name("3rd_party x2"), "3rd_party X2");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(name in "[ -~À-ÿ]{0,40}") {
            let once = normalize_name(&name);
            prop_assert_eq!(normalize_name(&once), once);
        }

        #[test]
        fn normalization_only_changes_case(name in "[ -~]{0,40}") {
            prop_assert_eq!(normalize_name(&name).to_lowercase(), name.to_lowercase());
        }
    }
}
