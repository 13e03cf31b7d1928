//! Public HTTP request/response DTOs (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Exercise;

/// DTO for one persisted exercise. Field names match what the frontend
/// already consumes from the hosted table.
#[derive(Debug, Serialize)]
pub struct ExerciseOut {
    pub id: i64,
    pub titre: String,
    pub enonce: String,
    pub correction: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Convert the internal `Exercise` to the public DTO.
pub fn to_out(e: &Exercise) -> ExerciseOut {
    ExerciseOut {
        id: e.id,
        titre: e.title.clone(),
        enonce: e.statement.clone(),
        correction: e.correction.clone(),
        category: e.category.clone(),
        created_at: e.created_at,
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateIn {
    pub subject: String,
}

/// Terminal report of one generation sequence. `error` is set when some
/// inserts failed even though the sequence completed.
#[derive(Serialize)]
pub struct GenerateOut {
    pub exercises: Vec<ExerciseOut>,
    pub attempted: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct CatalogOut {
    pub exercises: Vec<ExerciseOut>,
    pub categories: Vec<String>,
}

#[derive(Serialize)]
pub struct DeletedOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
