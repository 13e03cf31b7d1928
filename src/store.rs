//! Abstract data-access interface for the exercise table.
//!
//! The concrete transport lives in `supabase.rs`; the orchestrator and the
//! HTTP handlers only see this trait so tests can swap in an in-memory store.

use async_trait::async_trait;

use crate::domain::{Exercise, ExerciseDraft};
use crate::error::StoreError;

#[async_trait]
pub trait ExerciseStore: Send + Sync {
    /// All exercises, newest creation time first.
    async fn list(&self) -> Result<Vec<Exercise>, StoreError>;

    /// Persist one draft under the given category; the store assigns the
    /// identifier and creation timestamp. On Err the draft must be considered
    /// not persisted — no partial application.
    async fn insert(&self, draft: &ExerciseDraft, category: &str) -> Result<Exercise, StoreError>;

    /// Remove by identifier. Succeeds unless the store reports a failure
    /// (deleting an absent id is whatever the backend says it is).
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
