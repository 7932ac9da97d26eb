//! # Recommendation Engine
//!
//! Produces a short, ranked list of content for one user. The flow:
//! 1.  **Signals**: the profile, the latest mood log and the recent
//!     interactions are fetched concurrently. Concerns and symptoms form the
//!     user's interest tags.
//! 2.  **Candidate Pool**: up to 50 items, newest first, sharing a tag with
//!     the interests (when there are any) and not among the 10 most recently
//!     viewed items.
//! 3.  **Scoring**: 10 points per shared tag, 5 for a preferred content type,
//!     1 for an approachable difficulty.
//! 4.  **Ranking**: zero scores are dropped when interests exist, then the
//!     pool is sorted by score and recency and cut to 5 items.
//!
//! The engine only reads. It never records views or touches stored entities.

use crate::{
    constants::{
        APPROACHABLE_DIFFICULTY_WEIGHT, CANDIDATE_POOL_SIZE, EXCLUDE_VIEWED_COUNT,
        MAX_RECOMMENDATIONS, PREFERRED_TYPE_WEIGHT, RECENTLY_VIEWED_LIMIT, TAG_MATCH_WEIGHT,
    },
    errors::StoreError,
    providers::db::storage::{ContentStore, InteractionStore, MoodLogStore, ProfileStore},
    tags::{count_matches, tag_set},
    types::{
        CandidateQuery, ContentItem, ContentType, Difficulty, MoodLogEntry, Recommendations,
        ScoredCandidate, UserProfile,
    },
};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info};

pub const REASON_INTERESTS_AND_TYPES: &str =
    "Based on your interests/mood and content type preferences.";
pub const REASON_INTERESTS: &str = "Based on your interests/mood.";
pub const REASON_TYPES: &str = "Based on content type preferences.";
pub const REASON_GENERIC: &str = "Here are some suggestions we think you'll find useful.";
pub const REASON_RELAXED: &str = "We couldn't find specific matches for all your preferences, but here are some general suggestions.";

/// Errors raised while computing recommendations.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// One of the collaborator stores failed. No partial result is produced.
    #[error("Failed to fetch recommendation inputs: {0}")]
    Fetch(#[from] StoreError),
}

/// Builds the interest-tag set from the profile's concerns and the latest
/// mood's symptoms. Missing inputs contribute nothing.
pub fn interest_tags(
    profile: Option<&UserProfile>,
    latest_mood: Option<&MoodLogEntry>,
) -> BTreeSet<String> {
    let concerns = profile.map(|p| p.areas_of_concern.as_slice()).unwrap_or(&[]);
    let symptoms = latest_mood.map(|m| m.symptoms.as_slice()).unwrap_or(&[]);
    tag_set([concerns, symptoms])
}

fn is_approachable(difficulty: Option<Difficulty>) -> bool {
    matches!(
        difficulty,
        None | Some(Difficulty::Easy) | Some(Difficulty::Medium)
    )
}

/// Scores one item. The three terms are independent and additive.
pub fn score_item(
    item: &ContentItem,
    interests: &BTreeSet<String>,
    preferred_types: &[ContentType],
) -> u32 {
    let tag_score = count_matches(&item.tags, interests) as u32 * TAG_MATCH_WEIGHT;
    let type_score = if preferred_types.contains(&item.content_type) {
        PREFERRED_TYPE_WEIGHT
    } else {
        0
    };
    let difficulty_score = if is_approachable(item.difficulty) {
        APPROACHABLE_DIFFICULTY_WEIGHT
    } else {
        0
    };
    tag_score + type_score + difficulty_score
}

/// Scores, filters, sorts and truncates the candidate pool.
///
/// Zero-score items are dropped only when `interests` is non-empty. Ties on
/// score go to the more recently updated item; remaining ties keep pool order.
pub fn rank_candidates(
    candidates: Vec<ContentItem>,
    interests: &BTreeSet<String>,
    preferred_types: &[ContentType],
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|item| {
            let score = score_item(&item, interests, preferred_types);
            ScoredCandidate { item, score }
        })
        .collect();

    if !interests.is_empty() {
        scored.retain(|c| c.score > 0);
    }

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.item.updated_at.cmp(&a.item.updated_at))
    });
    scored.truncate(MAX_RECOMMENDATIONS);
    scored
}

/// Explains which signals shaped the result.
pub fn compose_reason(
    has_interests: bool,
    has_preferred_types: bool,
    pool_size: usize,
    result_size: usize,
) -> String {
    if result_size == 0 && pool_size > 0 && has_interests {
        return REASON_RELAXED.to_string();
    }
    match (has_interests, has_preferred_types) {
        (true, true) => REASON_INTERESTS_AND_TYPES,
        (true, false) => REASON_INTERESTS,
        (false, true) => REASON_TYPES,
        (false, false) => REASON_GENERIC,
    }
    .to_string()
}

/// Computes up to five recommendations for `user_id`.
///
/// Any store failure aborts the whole computation.
pub async fn recommend<P>(provider: &P, user_id: i64) -> Result<Recommendations, RecommendError>
where
    P: ProfileStore + MoodLogStore + InteractionStore + ContentStore + ?Sized,
{
    info!(user_id, "Computing recommendations.");

    // --- Phase 1: independent signals ---
    let (profile, latest_mood, recent) = tokio::try_join!(
        provider.get_profile(user_id),
        provider.get_latest_mood_log(user_id),
        provider.get_recent_interactions(user_id, RECENTLY_VIEWED_LIMIT),
    )?;

    let interests = interest_tags(profile.as_ref(), latest_mood.as_ref());
    let preferred_types: Vec<ContentType> = profile
        .map(|p| p.preferred_content_types)
        .unwrap_or_default();

    let exclude_ids: BTreeSet<i64> = recent
        .iter()
        .take(EXCLUDE_VIEWED_COUNT)
        .map(|r| r.content_item_id)
        .collect();

    debug!(
        user_id,
        interests = ?interests,
        preferred_types = ?preferred_types,
        excluded = ?exclude_ids,
        "Collected recommendation signals."
    );

    // --- Phase 2: candidate pool ---
    let query = CandidateQuery {
        tags_overlap_any: (!interests.is_empty()).then(|| interests.clone()),
        exclude_ids,
        limit: CANDIDATE_POOL_SIZE,
    };
    let candidates = provider.query_content_candidates(&query).await?;
    let pool_size = candidates.len();

    let ranked = rank_candidates(candidates, &interests, &preferred_types);
    let reason = compose_reason(
        !interests.is_empty(),
        !preferred_types.is_empty(),
        pool_size,
        ranked.len(),
    );

    debug!(
        user_id,
        pool_size,
        scores = ?ranked.iter().map(|c| (c.item.id, c.score)).collect::<Vec<_>>(),
        "Ranked candidates."
    );

    Ok(Recommendations {
        recommendations: ranked,
        reason,
    })
}
