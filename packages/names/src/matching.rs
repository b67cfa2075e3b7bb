//! Fuzzy resolution of URL slugs back to entity rows.
//!
//! A slug like `east-coast-gold-wl-team` is first widened into a
//! `LIKE` pattern ([`slug_search_pattern`]) to fetch a handful of
//! candidate rows, then [`best_match`] picks the closest one.

use crate::normalize::slugify;

/// How closely a candidate's slug matches the requested slug.
///
/// Variants are ordered so that a higher variant is a better match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchScore {
    /// Returned by the broader query but otherwise unrelated.
    Weak = 1,
    /// One slug contains the other.
    Partial = 2,
    /// Slugs are identical.
    Exact = 3,
}

impl MatchScore {
    /// Numeric score (1-3).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }
}

/// Re-slugifies a requested slug so stray punctuation and case drop out.
fn target_key(target_slug: &str) -> String {
    slugify(&target_slug.replace('-', " "))
}

/// Scores a candidate name against a requested slug.
///
/// Both sides are slugified first. An empty candidate slug is never more than
/// [`MatchScore::Weak`], since the empty string is contained in
/// everything.
#[must_use]
pub fn score_candidate(target_slug: &str, candidate_name: &str) -> MatchScore {
    let target = target_key(target_slug);
    let candidate = slugify(candidate_name);

    if candidate.is_empty() || target.is_empty() {
        MatchScore::Weak
    } else if candidate == target {
        MatchScore::Exact
    } else if candidate.contains(&target) || target.contains(&candidate) {
        MatchScore::Partial
    } else {
        MatchScore::Weak
    }
}

/// Picks the candidate whose name best matches `target_slug`.
///
/// Ties keep the first-encountered candidate. Returns `None` when the
/// slug has no letters or digits, or there are no candidates.
pub fn best_match<'a, T>(
    target_slug: &str,
    candidates: &'a [T],
    name_of: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    if target_key(target_slug).is_empty() {
        return None;
    }

    let mut best: Option<(&T, MatchScore)> = None;

    for candidate in candidates {
        let score = score_candidate(target_slug, name_of(candidate));
        log::debug!(
            "Candidate '{}' scored {} against '{target_slug}'",
            name_of(candidate),
            score.value()
        );
        match best {
            Some((_, current)) if score <= current => {}
            _ => best = Some((candidate, score)),
        }
        if score == MatchScore::Exact {
            break;
        }
    }

    best.map(|(candidate, _)| candidate)
}

/// Widens a slug into a case-insensitive `LIKE` pattern.
///
/// Words are joined by `%` wildcards, and two-letter words get a
/// wildcard between their characters so that `wl` matches `W/L`.
/// Returns `None` for a slug with no words.
///
/// `"east-coast-gold-wl-team"` → `"%east%coast%gold%w%l%team%"`
#[must_use]
pub fn slug_search_pattern(slug: &str) -> Option<String> {
    let words: Vec<String> = slug
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            if word.chars().count() == 2 {
                word.chars().map(String::from).collect::<Vec<_>>().join("%")
            } else {
                word.to_string()
            }
        })
        .collect();

    if words.is_empty() {
        return None;
    }

    Some(format!("%{}%", words.join("%")))
}
