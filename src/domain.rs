//! Domain models: persisted exercises and parsed-but-unsaved drafts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An exercise row as persisted in the hosted table.
///
/// The identifier and creation timestamp are assigned by the store on insert;
/// the identifier is unique and immutable once assigned. Serde renames follow
/// the table's column names (`exercices`: titre/enonce/correction/category).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: i64,
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(rename = "enonce")]
    pub statement: String,
    pub correction: String,
    /// Non-empty after save; set to the requested topic at insert time.
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// A parsed exercise candidate that has not been persisted yet.
/// No identifier, no timestamp, no category until the store accepts it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciseDraft {
    pub title: String,
    pub statement: String,
    pub correction: String,
}
