//! # MindScribe
//!
//! Core library for the MindScribe wellness backend. It provides:
//!
//! - The domain types shared by every crate in the workspace ([`types`]).
//! - The storage seams the recommendation engine reads through
//!   ([`providers::db::storage`]), with a SQLite implementation backed by Turso
//!   and an in-process implementation.
//! - The content recommendation engine itself ([`recommend`]).
//! - Point and streak rules for completed wellness tasks ([`tasks`]).

pub mod constants;
pub mod errors;
pub mod providers;
pub mod recommend;
pub mod tags;
pub mod tasks;
pub mod types;

pub use errors::StoreError;
pub use recommend::{recommend, RecommendError};
pub use types::{
    CandidateQuery, ContentItem, ContentType, Difficulty, InteractionRecord, MoodLogEntry,
    Recommendations, ScoredCandidate, Task, TaskProgress, TaskStats, UserProfile,
};
