//! # Domain Types
//!
//! The entities the recommendation engine reads, the transient ranking types it
//! produces, and the input payloads the stores accept for writes. JSON field
//! names follow the API contract the frontend already consumes.

use crate::{constants::DEFAULT_TASK_POINTS, errors::StoreError, tags::normalize_tags};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};

/// The kind of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Article,
    Video,
    Exercise,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Video => "video",
            ContentType::Exercise => "exercise",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "article" => Ok(ContentType::Article),
            "video" => Ok(ContentType::Video),
            "exercise" => Ok(ContentType::Exercise),
            other => Err(StoreError::Validation(format!(
                "Unknown content type '{other}'"
            ))),
        }
    }
}

/// How demanding a content item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(StoreError::Validation(format!(
                "Unknown difficulty '{other}'"
            ))),
        }
    }
}

/// A piece of content that can be recommended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: i64,
    pub title: String,
    pub content_type: ContentType,
    pub body: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub source: Option<String>,
    pub estimated_time_minutes: Option<i64>,
    pub difficulty: Option<Difficulty>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's stated preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(default)]
    pub areas_of_concern: Vec<String>,
    #[serde(default)]
    pub preferred_content_types: Vec<ContentType>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// An empty profile, as created the first time a user's profile is read.
    pub fn empty(user_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            areas_of_concern: Vec::new(),
            preferred_content_types: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A single mood check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodLogEntry {
    pub id: i64,
    pub user_id: i64,
    pub mood_rating: i64,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    pub notes: Option<String>,
    pub logged_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// What a user did with a content item. One record per (user, item) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub user_id: i64,
    pub content_item_id: i64,
    pub viewed_at: DateTime<Utc>,
    pub rating: Option<i64>,
    pub is_helpful: Option<bool>,
    pub feedback_text: Option<String>,
}

/// A content item with the score it earned in one recommendation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub item: ContentItem,
    pub score: u32,
}

/// The result of a recommendation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub recommendations: Vec<ScoredCandidate>,
    pub reason: String,
}

impl Recommendations {
    /// The recommended items, in rank order.
    pub fn items(&self) -> impl Iterator<Item = &ContentItem> {
        self.recommendations.iter().map(|c| &c.item)
    }
}

/// Parameters for fetching the candidate pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateQuery {
    /// When set, only items sharing at least one of these tags qualify.
    pub tags_overlap_any: Option<BTreeSet<String>>,
    /// Items that must never be returned.
    pub exclude_ids: BTreeSet<i64>,
    pub limit: usize,
}

/// Filters for browsing the content catalogue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentFilter {
    pub tags: Vec<String>,
    pub content_type: Option<ContentType>,
    pub search: Option<String>,
}

// --- Write payloads ---

/// Distinguishes a field that was omitted from one explicitly set to `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn non_blank(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Payload for creating a content item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContentItem {
    #[serde(default)]
    pub title: String,
    pub content_type: ContentType,
    pub body: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub source: Option<String>,
    pub estimated_time_minutes: Option<i64>,
    pub difficulty: Option<Difficulty>,
}

impl NewContentItem {
    /// Checks the payload and returns it in its stored shape.
    ///
    /// Videos keep only their url, articles and exercises keep only their body.
    pub fn validate(mut self) -> Result<Self, StoreError> {
        if self.title.trim().is_empty() {
            return Err(StoreError::Validation(
                "Title and content type are required".to_string(),
            ));
        }
        match self.content_type {
            ContentType::Video => {
                if !non_blank(self.url.as_deref()) {
                    return Err(StoreError::Validation(
                        "URL is required for video content".to_string(),
                    ));
                }
                self.body = None;
            }
            ContentType::Article | ContentType::Exercise => {
                if !non_blank(self.body.as_deref()) {
                    return Err(StoreError::Validation(
                        "Body is required for articles and exercises".to_string(),
                    ));
                }
                self.url = None;
            }
        }
        self.tags = normalize_tags(&self.tags);
        Ok(self)
    }
}

/// Partial update of a content item. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdate {
    pub title: Option<String>,
    pub content_type: Option<ContentType>,
    pub body: Option<String>,
    pub url: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub source: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub estimated_time_minutes: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub difficulty: Option<Option<Difficulty>>,
}

impl ContentUpdate {
    /// Applies the update to `item` in place.
    ///
    /// Switching an item to a video clears its body; switching it to an article
    /// or exercise clears its url.
    pub fn apply_to(self, item: &mut ContentItem) -> Result<(), StoreError> {
        if let Some(title) = self.title.filter(|t| !t.trim().is_empty()) {
            item.title = title;
        }
        match self.content_type {
            Some(ContentType::Video) => {
                item.content_type = ContentType::Video;
                if let Some(url) = self.url.filter(|u| !u.trim().is_empty()) {
                    item.url = Some(url);
                }
                item.body = None;
            }
            Some(kind) => {
                item.content_type = kind;
                if let Some(body) = self.body.filter(|b| !b.trim().is_empty()) {
                    item.body = Some(body);
                }
                item.url = None;
            }
            None => {
                if self.body.is_some() {
                    item.body = self.body;
                }
                if self.url.is_some() {
                    item.url = self.url;
                }
            }
        }
        if let Some(tags) = self.tags {
            item.tags = normalize_tags(&tags);
        }
        if let Some(source) = self.source {
            item.source = source;
        }
        if let Some(minutes) = self.estimated_time_minutes {
            item.estimated_time_minutes = minutes;
        }
        if let Some(difficulty) = self.difficulty {
            item.difficulty = difficulty;
        }
        if item.content_type == ContentType::Video && !non_blank(item.url.as_deref()) {
            return Err(StoreError::Validation(
                "URL is required for video content".to_string(),
            ));
        }
        Ok(())
    }
}

/// Payload for logging a mood.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMoodLog {
    pub mood_rating: Option<i64>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    pub notes: Option<String>,
    pub logged_at: Option<DateTime<Utc>>,
}

impl NewMoodLog {
    /// Checks the rating and normalizes the tag lists. Returns the rating.
    pub fn validate(&mut self) -> Result<i64, StoreError> {
        let rating = self
            .mood_rating
            .ok_or_else(|| StoreError::Validation("Mood rating is required".to_string()))?;
        if !(1..=5).contains(&rating) {
            return Err(StoreError::Validation(
                "Mood rating must be a number between 1 and 5".to_string(),
            ));
        }
        self.symptoms = normalize_tags(&self.symptoms);
        self.triggers = normalize_tags(&self.triggers);
        Ok(rating)
    }
}

/// Partial update of a user profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub areas_of_concern: Option<Vec<String>>,
    pub preferred_content_types: Option<Vec<String>>,
}

impl ProfileUpdate {
    /// Applies the update to `profile` in place, normalizing every value.
    pub fn apply_to(self, profile: &mut UserProfile) -> Result<(), StoreError> {
        if let Some(concerns) = self.areas_of_concern {
            profile.areas_of_concern = normalize_tags(&concerns);
        }
        if let Some(types) = self.preferred_content_types {
            let mut parsed: Vec<ContentType> = Vec::new();
            for value in normalize_tags(&types) {
                let kind = value.parse::<ContentType>()?;
                if !parsed.contains(&kind) {
                    parsed.push(kind);
                }
            }
            profile.preferred_content_types = parsed;
        }
        Ok(())
    }
}

/// Payload describing an interaction with a content item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionUpdate {
    pub rating: Option<i64>,
    pub is_helpful: Option<bool>,
    pub feedback_text: Option<String>,
    /// Marks a plain view. Every interaction refreshes `viewedAt` anyway.
    #[serde(default)]
    pub viewed: Option<bool>,
}

impl InteractionUpdate {
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(StoreError::Validation(
                    "Rating must be between 1 and 5".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// A wellness task users complete for points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub points: i64,
    #[serde(default)]
    pub mood_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a task. `points` defaults to
/// [`DEFAULT_TASK_POINTS`](crate::constants::DEFAULT_TASK_POINTS).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub points: Option<i64>,
    #[serde(default)]
    pub mood_tags: Vec<String>,
}

impl NewTask {
    /// Checks the payload and returns it in its stored shape, with `points`
    /// always set.
    pub fn validate(mut self) -> Result<Self, StoreError> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(StoreError::Validation("Task title is required".to_string()));
        }
        let points = self.points.unwrap_or(DEFAULT_TASK_POINTS);
        if points < 0 {
            return Err(StoreError::Validation(
                "Task points cannot be negative".to_string(),
            ));
        }
        self.points = Some(points);
        self.description = self.description.filter(|d| !d.trim().is_empty());
        self.mood_tags = normalize_tags(&self.mood_tags);
        Ok(self)
    }
}

/// Filters for listing tasks. Both match case-insensitively.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    /// Keeps tasks tagged with this mood.
    pub mood: Option<String>,
    /// Keeps tasks whose title contains this text.
    pub search: Option<String>,
}

/// A task as listed for one user, with that user's completion time if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListing {
    #[serde(flatten)]
    pub task: Task,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A user's running score and streaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    pub points: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    /// UTC calendar day of the last completion.
    pub last_task_date: Option<NaiveDate>,
}

/// One completed task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    pub task_id: i64,
    pub completed_at: DateTime<Utc>,
}

/// A user's progress together with their latest completions, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    #[serde(flatten)]
    pub progress: TaskProgress,
    pub recent_completions: Vec<TaskCompletion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn article() -> ContentItem {
        ContentItem {
            id: 1,
            title: "Breathing basics".to_string(),
            content_type: ContentType::Article,
            body: Some("Inhale, exhale.".to_string()),
            url: None,
            tags: vec!["anxiety".to_string()],
            source: None,
            estimated_time_minutes: Some(5),
            difficulty: Some(Difficulty::Easy),
            created_at: at(0),
            updated_at: at(0),
        }
    }

    #[test]
    fn test_new_video_requires_url_and_drops_body() {
        let payload: NewContentItem = serde_json::from_value(serde_json::json!({
            "title": "Calm",
            "contentType": "video",
            "body": "ignored",
            "tags": [" Sleep "]
        }))
        .unwrap();
        assert!(matches!(
            payload.clone().validate(),
            Err(StoreError::Validation(_))
        ));

        let mut with_url = payload;
        with_url.url = Some("https://example.com/calm".to_string());
        let validated = with_url.validate().unwrap();
        assert_eq!(validated.body, None);
        assert_eq!(validated.tags, vec!["sleep".to_string()]);
    }

    #[test]
    fn test_new_article_requires_body_and_title() {
        let payload: NewContentItem = serde_json::from_value(serde_json::json!({
            "contentType": "article",
            "body": "text"
        }))
        .unwrap();
        assert!(matches!(payload.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_content_update_distinguishes_null_from_missing() {
        let mut item = article();
        let update: ContentUpdate =
            serde_json::from_value(serde_json::json!({ "difficulty": null })).unwrap();
        update.apply_to(&mut item).unwrap();
        assert_eq!(item.difficulty, None);
        assert_eq!(item.estimated_time_minutes, Some(5));
    }

    #[test]
    fn test_content_update_switching_to_video_clears_body() {
        let mut item = article();
        let update: ContentUpdate = serde_json::from_value(serde_json::json!({
            "contentType": "video",
            "url": "https://example.com/v"
        }))
        .unwrap();
        update.apply_to(&mut item).unwrap();
        assert_eq!(item.content_type, ContentType::Video);
        assert_eq!(item.body, None);
        assert_eq!(item.url.as_deref(), Some("https://example.com/v"));
    }

    #[test]
    fn test_mood_rating_bounds() {
        let mut missing = NewMoodLog::default();
        assert!(missing.validate().is_err());

        let mut too_high = NewMoodLog {
            mood_rating: Some(6),
            ..Default::default()
        };
        assert!(too_high.validate().is_err());

        let mut ok = NewMoodLog {
            mood_rating: Some(3),
            symptoms: vec!["Tired ".to_string(), "tired".to_string()],
            ..Default::default()
        };
        assert_eq!(ok.validate().unwrap(), 3);
        assert_eq!(ok.symptoms, vec!["tired".to_string()]);
    }

    #[test]
    fn test_profile_update_rejects_unknown_content_type() {
        let mut profile = UserProfile::empty(7, at(0));
        let update = ProfileUpdate {
            areas_of_concern: None,
            preferred_content_types: Some(vec!["podcast".to_string()]),
        };
        assert!(update.apply_to(&mut profile).is_err());

        let update = ProfileUpdate {
            areas_of_concern: Some(vec![" Stress".to_string()]),
            preferred_content_types: Some(vec!["Video".to_string(), "video".to_string()]),
        };
        update.apply_to(&mut profile).unwrap();
        assert_eq!(profile.areas_of_concern, vec!["stress".to_string()]);
        assert_eq!(profile.preferred_content_types, vec![ContentType::Video]);
    }

    #[test]
    fn test_new_task_defaults_and_validation() {
        let task = NewTask {
            title: "  Take a walk ".to_string(),
            description: Some("   ".to_string()),
            points: None,
            mood_tags: vec!["Stress".to_string(), " stress".to_string()],
        }
        .validate()
        .unwrap();
        assert_eq!(task.title, "Take a walk");
        assert_eq!(task.description, None);
        assert_eq!(task.points, Some(DEFAULT_TASK_POINTS));
        assert_eq!(task.mood_tags, vec!["stress".to_string()]);

        let negative = NewTask {
            title: "Walk".to_string(),
            points: Some(-1),
            ..Default::default()
        };
        assert!(matches!(negative.validate(), Err(StoreError::Validation(_))));
        assert!(NewTask::default().validate().is_err());
    }
}
