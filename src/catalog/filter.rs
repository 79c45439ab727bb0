//! Pure search/filter predicates and facet derivation over a slice of sounds.

use std::collections::{BTreeMap, BTreeSet};

use crate::library::Sound;

/// Tag-filter label that selects sounds with no tags at all.
pub const UNTAGGED: &str = "Untagged";

/// Case-insensitive substring match across name, category, tags and notes.
///
/// A blank query matches everything.
pub fn matches_query(sound: &Sound, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();

    sound.name.to_lowercase().contains(&q)
        || sound
            .category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(&q))
        || sound.tags.iter().any(|t| t.to_lowercase().contains(&q))
        || sound.notes.to_lowercase().contains(&q)
}

/// Every selected tag must be present.
///
/// [`UNTAGGED`] takes precedence: once selected, only sounds with an empty tag
/// set match and the other selected tags are ignored.
pub fn matches_tags(sound: &Sound, tag_filters: &BTreeSet<String>) -> bool {
    if tag_filters.contains(UNTAGGED) {
        return sound.is_untagged();
    }
    tag_filters.iter().all(|wanted| sound.has_tag(wanted))
}

pub fn filter_sounds<'a>(
    sounds: &'a [Sound],
    query: &str,
    tag_filters: &BTreeSet<String>,
) -> Vec<&'a Sound> {
    sounds
        .iter()
        .filter(|s| matches_query(s, query) && matches_tags(s, tag_filters))
        .collect()
}

/// Sorted, distinct tags across `sounds`.
pub fn distinct_tags(sounds: &[Sound]) -> Vec<String> {
    sounds
        .iter()
        .flat_map(|s| s.tags.iter().cloned())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Number of sounds carrying each tag, keyed in sorted tag order.
pub fn tag_counts(sounds: &[Sound]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for tag in sounds.iter().flat_map(|s| s.tags.iter()) {
        *counts.entry(tag.clone()).or_default() += 1;
    }
    counts
}
