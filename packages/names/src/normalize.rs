//! Name normalization for clubs, meets, and regions.
//!
//! Provides a deterministic pipeline used on both sides of every name
//! comparison, so that "East Coast Gold W/L Team" and
//! "east coast gold wl team" fold to the same key.

use regex::Regex;
use std::sync::LazyLock;

/// Characters that do not survive normalization. Whitespace is kept so
/// word boundaries can be collapsed afterwards.
static STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]+").expect("valid regex"));

/// Normalizes a free-text name into a comparable search key.
///
/// The pipeline:
/// 1. Lowercase
/// 2. Strip everything outside `[a-z0-9]` and whitespace
/// 3. Collapse whitespace runs to a single space
/// 4. Trim
///
/// Punctuation is removed rather than replaced, so `"W/L"` becomes
/// `"wl"`. An input with no letters or digits normalizes to the empty
/// string.
#[must_use]
pub fn normalize(name: &str) -> String {
    let lower = name.to_lowercase();
    let stripped = STRIP_RE.replace_all(&lower, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Converts a name into a URL slug.
///
/// Same as [`normalize`], with each word joined by a single hyphen.
/// The result never has leading, trailing, or repeated hyphens.
#[must_use]
pub fn slugify(name: &str) -> String {
    normalize(name)
        .split(' ')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Generic slug-to-name conversion: hyphens become spaces and each word
/// gets an uppercase first letter.
///
/// Used only when a slug has no entry in the region table.
#[must_use]
pub fn title_case_slug(slug: &str) -> String {
    slug.replace('-', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize("East Coast Gold W/L Team"), "east coast gold wl team");
    }

    #[test]
    fn collapses_whitespace_left_by_stripping() {
        assert_eq!(normalize("  Iron  &  Oak  "), "iron oak");
    }

    #[test]
    fn empty_and_punctuation_only_normalize_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("--- / !!"), "");
        assert_eq!(slugify("--- / !!"), "");
    }

    #[test]
    fn drops_non_ascii_letters() {
        assert_eq!(normalize("Café Barbell"), "caf barbell");
    }

    #[test]
    fn slugifies_words_with_single_hyphens() {
        assert_eq!(slugify("Texas - Oklahoma"), "texas-oklahoma");
        assert_eq!(slugify("  New   York "), "new-york");
    }

    #[test]
    fn embedded_hyphens_do_not_round_trip() {
        assert_eq!(
            slugify("Pennsylvania-West Virginia"),
            "pennsylvaniawest-virginia"
        );
    }

    #[test]
    fn slugify_is_stable_under_normalize() {
        for name in [
            "Pennsylvania-West Virginia",
            "Hawaii and International",
            "  Mixed\tWhite\nSpace ",
            "Über Strength #1",
            "",
            "...",
        ] {
            assert_eq!(slugify(&normalize(name)), slugify(name), "input {name:?}");
        }
    }

    #[test]
    fn title_cases_slug_words() {
        assert_eq!(title_case_slug("carolina"), "Carolina");
        assert_eq!(title_case_slug("southern-ohio"), "Southern Ohio");
    }
}
