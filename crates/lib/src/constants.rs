//! # Shared Constants
//!
//! Tuning constants for the recommendation engine and task rewards, and default
//! locations shared across the `mindscribe` workspace.

/// The maximum number of items a single recommendation call returns.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// How many of the user's most recent interactions are fetched.
pub const RECENTLY_VIEWED_LIMIT: usize = 20;

/// How many of the most recently viewed items are excluded from the pool.
/// Older views stay eligible.
pub const EXCLUDE_VIEWED_COUNT: usize = 10;

/// The maximum size of the candidate pool scored per call.
pub const CANDIDATE_POOL_SIZE: usize = 50;

/// Points per tag shared between an item and the user's interests.
pub const TAG_MATCH_WEIGHT: u32 = 10;

/// Points for an item whose type is one of the user's preferred types.
pub const PREFERRED_TYPE_WEIGHT: u32 = 5;

/// Points for an item that is approachable (no difficulty, easy or medium).
pub const APPROACHABLE_DIFFICULTY_WEIGHT: u32 = 1;

/// Points awarded for a task created without an explicit value.
pub const DEFAULT_TASK_POINTS: i64 = 10;

/// How many completions the task stats report.
pub const RECENT_COMPLETIONS_LIMIT: usize = 20;

/// The root directory for local databases.
pub const DB_DIR: &str = "db";

/// The default path for the main application SQLite database.
pub const DEFAULT_DB_FILE: &str = "db/mindscribe.db";
