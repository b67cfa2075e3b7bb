//! Compile-time table of irregular WSO region slugs.
//!
//! Most region slugs turn back into display names by title-casing their
//! words. The exceptions (embedded hyphens, acronyms, lowercase joining
//! words) are listed in `regions.toml`, embedded via `include_str!`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::normalize::title_case_slug;

/// Number of embedded special-case entries. Enforced by a test.
#[cfg(test)]
const EXPECTED_REGION_COUNT: usize = 16;

const REGIONS_TOML: &str = include_str!("../regions.toml");

/// A single slug → display name mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegionAlias {
    /// URL slug as it appears in request paths.
    pub slug: String,
    /// Canonical region name as stored on boundary rows.
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct RegionFile {
    #[serde(default)]
    region: Vec<RegionAlias>,
}

/// Lookup table of slugs that need special handling.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    by_slug: BTreeMap<String, String>,
}

impl RegionTable {
    /// Builds a table from explicit aliases. Later duplicates win.
    #[must_use]
    pub fn new(aliases: impl IntoIterator<Item = RegionAlias>) -> Self {
        Self {
            by_slug: aliases.into_iter().map(|a| (a.slug, a.name)).collect(),
        }
    }

    /// Returns the embedded table.
    ///
    /// # Panics
    ///
    /// Panics if the embedded `regions.toml` fails to parse. It is a
    /// compile-time constant, so a failure is a development error caught
    /// by the tests below.
    #[must_use]
    pub fn embedded() -> &'static Self {
        static TABLE: LazyLock<RegionTable> = LazyLock::new(|| {
            let file: RegionFile = toml::de::from_str(REGIONS_TOML)
                .unwrap_or_else(|e| panic!("Failed to parse embedded regions.toml: {e}"));
            RegionTable::new(file.region)
        });
        &TABLE
    }

    /// Looks up `slug` in this table.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&str> {
        self.by_slug.get(slug).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }

    /// Iterates `(slug, name)` pairs in slug order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_slug.iter().map(|(s, n)| (s.as_str(), n.as_str()))
    }
}

/// Looks up an irregular slug in `table`.
///
/// Returns `None` when the slug has no special case; callers then fall
/// back to [`title_case_slug`].
#[must_use]
pub fn resolve_special_case<'a>(slug: &str, table: &'a RegionTable) -> Option<&'a str> {
    table.get(slug)
}

/// Converts a region slug back into its display name using the embedded
/// table, falling back to title-casing the slug's words.
///
/// Returns `None` for an empty slug so that callers never search for an
/// empty region name.
#[must_use]
pub fn slug_to_region_name(slug: &str) -> Option<String> {
    let slug = slug.trim();
    if slug.is_empty() {
        return None;
    }

    let name = resolve_special_case(slug, RegionTable::embedded())
        .map_or_else(|| title_case_slug(slug), ToString::to_string);

    log::debug!("Resolved region slug '{slug}' to '{name}'");
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_regions() {
        let table = RegionTable::embedded();
        assert_eq!(
            table.len(),
            EXPECTED_REGION_COUNT,
            "Expected {EXPECTED_REGION_COUNT} region aliases, found {}. \
             Update EXPECTED_REGION_COUNT after adding/removing entries.",
            table.len()
        );
    }

    #[test]
    fn region_names_are_unique() {
        let mut seen = BTreeSet::new();
        for (slug, name) in RegionTable::embedded().iter() {
            assert!(seen.insert(name), "Duplicate region name {name} for {slug}");
        }
    }

    #[test]
    fn resolves_embedded_hyphen_names() {
        assert_eq!(
            slug_to_region_name("pennsylvania-west-virginia").as_deref(),
            Some("Pennsylvania-West Virginia")
        );
        assert_eq!(slug_to_region_name("dmv").as_deref(), Some("DMV"));
        assert_eq!(
            slug_to_region_name("hawaii-and-international").as_deref(),
            Some("Hawaii and International")
        );
    }

    #[test]
    fn falls_back_to_title_case() {
        assert_eq!(slug_to_region_name("carolina").as_deref(), Some("Carolina"));
        assert_eq!(
            slug_to_region_name("southern-ohio").as_deref(),
            Some("Southern Ohio")
        );
    }

    #[test]
    fn empty_slug_resolves_to_nothing() {
        assert_eq!(slug_to_region_name(""), None);
        assert_eq!(slug_to_region_name("   "), None);
    }

    #[test]
    fn custom_table_lookup() {
        let table = RegionTable::new([RegionAlias {
            slug: "socal".to_string(),
            name: "California South".to_string(),
        }]);
        assert_eq!(resolve_special_case("socal", &table), Some("California South"));
        assert_eq!(resolve_special_case("norcal", &table), None);
    }
}
