//! # Tag Helpers
//!
//! Tags are free-form keywords attached to content items, profiles and mood
//! logs. They are always compared after trimming and lowercasing, so every
//! write path and every comparison goes through these helpers.

use std::collections::BTreeSet;

/// Normalizes a single tag. Returns `None` for tags that are blank once trimmed.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes a list of tags, dropping blanks and duplicates.
///
/// The first occurrence of each tag keeps its position.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = BTreeSet::new();
    tags.into_iter()
        .filter_map(|t| normalize_tag(t.as_ref()))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Builds a normalized tag set from any number of tag lists.
pub fn tag_set<'a, I>(sources: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    sources
        .into_iter()
        .flatten()
        .filter_map(|t| normalize_tag(t))
        .collect()
}

/// Counts the distinct tags of `item_tags` found in `interests`.
pub fn count_matches(item_tags: &[String], interests: &BTreeSet<String>) -> usize {
    if interests.is_empty() {
        return 0;
    }
    normalize_tags(item_tags)
        .iter()
        .filter(|t| interests.contains(*t))
        .count()
}

/// Returns true when the item shares at least one tag with `interests`.
pub fn overlaps(item_tags: &[String], interests: &BTreeSet<String>) -> bool {
    item_tags
        .iter()
        .filter_map(|t| normalize_tag(t))
        .any(|t| interests.contains(&t))
}
