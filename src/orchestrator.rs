//! Generation orchestrator: one user topic, end to end.
//!
//! Each request walks Idle -> Requesting -> Parsing -> Persisting(n) and ends
//! in Done or Failed. Candidates are inserted sequentially in parse order, so
//! there is exactly one in-flight remote call at any moment and no
//! coordination primitive is needed. A failed insert is counted and logged
//! but never halts the remaining candidates.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::domain::Exercise;
use crate::error::GenerateError;
use crate::generate::GenerationClient;
use crate::parser::parse_exercises;
use crate::store::ExerciseStore;

/// User-facing message for one failed insert (matches the frontend wording).
const INSERT_FAILED_MSG: &str = "Erreur lors de l'ajout de l'exercice.";

/// Phases of a generation request, for logging and debugging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
  Idle,
  Requesting,
  Parsing,
  Persisting,
  Done,
  Failed,
}

/// Terminal report of a completed (Done) generation sequence.
///
/// `saved` is in completion order, which equals parse order; the caller
/// prepends them for newest-first display. When some inserts failed, `error`
/// carries the last failure's message only — the counts let a caller render
/// an aggregate without changing that behavior.
#[derive(Debug)]
pub struct GenerationReport {
  pub saved: Vec<Exercise>,
  pub attempted: usize,
  pub failed: usize,
  pub error: Option<String>,
}

pub struct Orchestrator {
  generator: Arc<dyn GenerationClient>,
  store: Arc<dyn ExerciseStore>,
}

impl Orchestrator {
  pub fn new(generator: Arc<dyn GenerationClient>, store: Arc<dyn ExerciseStore>) -> Self {
    Self { generator, store }
  }

  /// Run one generation sequence. Err is the Failed terminal state; Ok is
  /// Done, possibly with per-candidate insert failures recorded inside.
  #[instrument(level = "info", skip(self), fields(topic_len = topic.len()))]
  pub async fn generate(&self, topic: &str) -> Result<GenerationReport, GenerateError> {
    let topic = topic.trim();
    if topic.is_empty() {
      // Validation failure: never leaves Idle, the client is not invoked.
      warn!(target: "generation", phase = ?Phase::Idle, "Rejected empty topic");
      return Err(GenerateError::EmptyTopic);
    }

    debug!(target: "generation", phase = ?Phase::Requesting, %topic, "Requesting generation");
    let raw = match self.generator.generate_raw(topic).await {
      Ok(text) => text,
      Err(e) => {
        error!(target: "generation", phase = ?Phase::Failed, error = %e, "Generation request failed");
        return Err(e);
      }
    };

    debug!(target: "generation", phase = ?Phase::Parsing, raw_len = raw.len(), "Parsing response");
    let drafts = parse_exercises(&raw);
    if drafts.is_empty() {
      // Distinct user-visible outcome, not an empty success.
      error!(target: "generation", phase = ?Phase::Failed, raw_len = raw.len(), "No exercise found in response");
      return Err(GenerateError::NoExercisesFound);
    }

    let attempted = drafts.len();
    debug!(target: "generation", phase = ?Phase::Persisting, candidates = attempted, "Persisting candidates");

    let mut saved = Vec::with_capacity(attempted);
    let mut failed = 0usize;
    let mut last_error: Option<String> = None;
    for (idx, draft) in drafts.iter().enumerate() {
      match self.store.insert(draft, topic).await {
        Ok(ex) => saved.push(ex),
        Err(e) => {
          failed += 1;
          last_error = Some(INSERT_FAILED_MSG.to_string());
          error!(target: "generation", candidate = idx, error = %e, "Insert failed; continuing with remaining candidates");
        }
      }
    }

    info!(
      target: "generation",
      phase = ?Phase::Done,
      %topic,
      saved = saved.len(),
      failed,
      "Generation sequence finished"
    );
    Ok(GenerationReport { saved, attempted, failed, error: last_error })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Mutex;

  use async_trait::async_trait;
  use chrono::{Duration, TimeZone, Utc};

  use crate::domain::ExerciseDraft;
  use crate::error::StoreError;

  const THREE_ITEMS: &str = "1. Titre: A\nÉnoncé: Sa\nCorrection: Ca\n\
2. Titre: B\nÉnoncé: Sb\nCorrection: Cb\n\
3. Titre: C\nÉnoncé: Sc\nCorrection: Cc\n";

  struct MockGenerator {
    reply: Box<dyn Fn() -> Result<String, GenerateError> + Send + Sync>,
    calls: AtomicUsize,
  }

  impl MockGenerator {
    fn text(t: &'static str) -> Self {
      Self { reply: Box::new(move || Ok(t.to_string())), calls: AtomicUsize::new(0) }
    }
    fn failing(make: fn() -> GenerateError) -> Self {
      Self { reply: Box::new(move || Err(make())), calls: AtomicUsize::new(0) }
    }
  }

  #[async_trait]
  impl GenerationClient for MockGenerator {
    async fn generate_raw(&self, _topic: &str) -> Result<String, GenerateError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      (self.reply)()
    }
  }

  #[derive(Default)]
  struct MockStore {
    inserted: Mutex<Vec<(ExerciseDraft, String)>>,
    // 0-based indexes of insert calls that must fail
    fail_on: Vec<usize>,
    insert_calls: AtomicUsize,
  }

  #[async_trait]
  impl ExerciseStore for MockStore {
    async fn list(&self) -> Result<Vec<Exercise>, StoreError> {
      Ok(Vec::new())
    }

    async fn insert(&self, draft: &ExerciseDraft, category: &str) -> Result<Exercise, StoreError> {
      let n = self.insert_calls.fetch_add(1, Ordering::SeqCst);
      if self.fail_on.contains(&n) {
        return Err(StoreError::Status { status: 500, detail: "boom".into() });
      }
      self.inserted.lock().unwrap().push((draft.clone(), category.to_string()));
      Ok(Exercise {
        id: n as i64 + 1,
        title: draft.title.clone(),
        statement: draft.statement.clone(),
        correction: draft.correction.clone(),
        category: category.to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(n as i64),
      })
    }

    async fn delete(&self, _id: i64) -> Result<(), StoreError> {
      Ok(())
    }
  }

  fn orchestrator(gen: Arc<MockGenerator>, store: Arc<MockStore>) -> Orchestrator {
    Orchestrator::new(gen, store)
  }

  #[tokio::test]
  async fn empty_topic_never_invokes_the_client() {
    let gen = Arc::new(MockGenerator::text(THREE_ITEMS));
    let store = Arc::new(MockStore::default());
    let orch = orchestrator(gen.clone(), store.clone());

    for topic in ["", "   ", "\n\t"] {
      let err = orch.generate(topic).await.unwrap_err();
      assert!(matches!(err, GenerateError::EmptyTopic));
    }
    assert_eq!(gen.calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.insert_calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn rate_limit_fails_before_any_insert() {
    let gen = Arc::new(MockGenerator::failing(|| GenerateError::RateLimited));
    let store = Arc::new(MockStore::default());
    let orch = orchestrator(gen, store.clone());

    let err = orch.generate("maths").await.unwrap_err();
    assert!(matches!(err, GenerateError::RateLimited));
    assert_eq!(err.to_string(), "Vous avez dépassé la limite de requêtes.");
    assert_eq!(store.insert_calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn three_candidates_insert_in_parse_order() {
    let gen = Arc::new(MockGenerator::text(THREE_ITEMS));
    let store = Arc::new(MockStore::default());
    let orch = orchestrator(gen, store.clone());

    let report = orch.generate("  maths  ").await.unwrap();
    assert_eq!(report.attempted, 3);
    assert_eq!(report.failed, 0);
    assert!(report.error.is_none());

    let inserted = store.inserted.lock().unwrap();
    let titles: Vec<&str> = inserted.iter().map(|(d, _)| d.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
    // Category defaults to the trimmed topic on every insert.
    assert!(inserted.iter().all(|(_, cat)| cat == "maths"));

    let saved_titles: Vec<&str> = report.saved.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(saved_titles, vec!["A", "B", "C"]);
  }

  #[tokio::test]
  async fn insert_failure_does_not_halt_remaining_candidates() {
    let gen = Arc::new(MockGenerator::text(THREE_ITEMS));
    let store = Arc::new(MockStore { fail_on: vec![1], ..Default::default() });
    let orch = orchestrator(gen, store.clone());

    let report = orch.generate("maths").await.unwrap();
    assert_eq!(report.attempted, 3);
    assert_eq!(report.failed, 1);
    assert_eq!(store.insert_calls.load(Ordering::SeqCst), 3);
    assert_eq!(report.error.as_deref(), Some("Erreur lors de l'ajout de l'exercice."));

    let saved_titles: Vec<&str> = report.saved.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(saved_titles, vec!["A", "C"]);
  }

  #[tokio::test]
  async fn unparsable_text_surfaces_no_exercises_found() {
    let gen = Arc::new(MockGenerator::text("Je ne peux pas répondre à cette demande."));
    let store = Arc::new(MockStore::default());
    let orch = orchestrator(gen, store.clone());

    let err = orch.generate("maths").await.unwrap_err();
    assert!(matches!(err, GenerateError::NoExercisesFound));
    assert_eq!(store.insert_calls.load(Ordering::SeqCst), 0);
  }
}
