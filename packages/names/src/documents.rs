//! Normalized documents for an external full-text search index.
//!
//! The search engine itself (prefix and fuzzy matching) is not part of
//! this workspace. This module only produces the documents it indexes,
//! with names already folded into search keys and slugs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::normalize::{normalize, slugify};

/// What a search document points at.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentKind {
    /// A barbell club.
    Club,
    /// A competition.
    Meet,
    /// A WSO region.
    Region,
}

/// A single search index document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocument {
    /// Stable identifier (`"<kind>:<slug>"`).
    pub id: String,
    /// Document kind.
    pub kind: DocumentKind,
    /// Display name, trimmed but otherwise as stored.
    pub name: String,
    /// URL slug for linking.
    pub slug: String,
    /// Normalized key the index matches against.
    pub search_key: String,
    /// Secondary line (e.g. city/state or region name).
    pub subtitle: Option<String>,
}

/// Builds a document for one named entity.
///
/// Returns `None` if the name normalizes to the empty string, since an
/// empty key would match every query.
#[must_use]
pub fn build_document(
    kind: DocumentKind,
    name: &str,
    subtitle: Option<&str>,
) -> Option<SearchDocument> {
    let search_key = normalize(name);
    if search_key.is_empty() {
        return None;
    }

    let slug = slugify(name);

    Some(SearchDocument {
        id: format!("{kind}:{slug}"),
        kind,
        name: name.trim().to_string(),
        slug,
        search_key,
        subtitle: subtitle
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string),
    })
}

/// Builds documents for many entities, dropping empty names and keeping
/// only the first document for each `(kind, slug)` pair.
pub fn build_documents<'a>(
    entries: impl IntoIterator<Item = (DocumentKind, &'a str, Option<&'a str>)>,
) -> Vec<SearchDocument> {
    let mut seen = BTreeSet::new();
    let mut docs = Vec::new();

    for (kind, name, subtitle) in entries {
        let Some(doc) = build_document(kind, name, subtitle) else {
            log::debug!("Skipping search document with empty key: {name:?}");
            continue;
        };
        if seen.insert((doc.kind, doc.slug.clone())) {
            docs.push(doc);
        }
    }

    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_club_document() {
        let doc = build_document(DocumentKind::Club, " Iron & Oak W/L ", Some("Austin, TX"))
            .unwrap();
        assert_eq!(doc.id, "club:iron-oak-wl");
        assert_eq!(doc.name, "Iron & Oak W/L");
        assert_eq!(doc.search_key, "iron oak wl");
        assert_eq!(doc.subtitle.as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn skips_names_without_letters_or_digits() {
        assert!(build_document(DocumentKind::Club, "-", None).is_none());
    }

    #[test]
    fn dedupes_by_kind_and_slug() {
        let docs = build_documents([
            (DocumentKind::Club, "Iron Oak", None),
            (DocumentKind::Club, "IRON OAK", Some("dup")),
            (DocumentKind::Region, "Iron Oak", None),
            (DocumentKind::Meet, "", None),
        ]);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].subtitle, None);
        assert_eq!(docs[1].kind, DocumentKind::Region);
    }

    #[test]
    fn serializes_camel_case() {
        let doc = build_document(DocumentKind::Region, "New England", None).unwrap();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["searchKey"], "new england");
        assert_eq!(json["kind"], "region");
        assert_eq!(doc.id, "region:new-england");
        assert_eq!("meet".parse::<DocumentKind>().unwrap(), DocumentKind::Meet);
    }
}
