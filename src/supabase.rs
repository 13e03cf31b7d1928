//! PostgREST-backed implementation of the exercise store.
//!
//! The hosted table keeps the original column names (titre/enonce/correction/
//! category/created_at); `Exercise`'s serde renames line up with them, so the
//! rows deserialize straight into the domain type.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::config::StoreConfig;
use crate::domain::{Exercise, ExerciseDraft};
use crate::error::StoreError;
use crate::store::ExerciseStore;
use crate::util::trunc_for_log;

#[derive(Clone)]
pub struct SupabaseStore {
  client: reqwest::Client,
  cfg: StoreConfig,
}

/// Insert payload: a partial row, id and created_at are assigned server-side.
#[derive(Serialize)]
struct NewRow<'a> {
  titre: &'a str,
  enonce: &'a str,
  correction: &'a str,
  category: &'a str,
}

impl SupabaseStore {
  pub fn new(client: reqwest::Client, cfg: StoreConfig) -> Self {
    Self { client, cfg }
  }

  fn table_url(&self) -> String {
    format!(
      "{}/rest/v1/{}",
      self.cfg.endpoint_url.trim_end_matches('/'),
      self.cfg.table_name
    )
  }

  fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    req
      .header("apikey", &self.cfg.credential)
      .header(AUTHORIZATION, format!("Bearer {}", self.cfg.credential))
  }

  async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = res.status();
    if status.is_success() {
      return Ok(res);
    }
    let detail = res.text().await.unwrap_or_default();
    error!(target: "exogen_backend", %status, detail = %trunc_for_log(&detail, 200), "Store request failed");
    Err(StoreError::Status { status: status.as_u16(), detail })
  }
}

#[async_trait]
impl ExerciseStore for SupabaseStore {
  #[instrument(level = "info", skip(self), fields(table = %self.cfg.table_name))]
  async fn list(&self) -> Result<Vec<Exercise>, StoreError> {
    let res = self
      .authed(self.client.get(self.table_url()))
      .query(&[("select", "*"), ("order", "created_at.desc")])
      .send().await
      .map_err(|e| StoreError::Transport(e.to_string()))?;

    let rows: Vec<Exercise> = Self::check_status(res).await?
      .json().await
      .map_err(|e| StoreError::Decode(e.to_string()))?;
    info!(target: "exogen_backend", count = rows.len(), "Listed exercises");
    Ok(rows)
  }

  #[instrument(level = "info", skip(self, draft), fields(table = %self.cfg.table_name, %category, title = %draft.title))]
  async fn insert(&self, draft: &ExerciseDraft, category: &str) -> Result<Exercise, StoreError> {
    let payload = [NewRow {
      titre: &draft.title,
      enonce: &draft.statement,
      correction: &draft.correction,
      category,
    }];

    let res = self
      .authed(self.client.post(self.table_url()))
      .header(CONTENT_TYPE, "application/json")
      // Ask PostgREST to echo the persisted row back (id + created_at).
      .header("Prefer", "return=representation")
      .json(&payload)
      .send().await
      .map_err(|e| StoreError::Transport(e.to_string()))?;

    let mut rows: Vec<Exercise> = Self::check_status(res).await?
      .json().await
      .map_err(|e| StoreError::Decode(e.to_string()))?;
    let row = rows
      .drain(..)
      .next()
      .ok_or_else(|| StoreError::Decode("insert returned no row".into()))?;
    info!(target: "exogen_backend", id = row.id, "Inserted exercise");
    Ok(row)
  }

  #[instrument(level = "info", skip(self), fields(table = %self.cfg.table_name, %id))]
  async fn delete(&self, id: i64) -> Result<(), StoreError> {
    let res = self
      .authed(self.client.delete(self.table_url()))
      .query(&[("id", format!("eq.{id}"))])
      .send().await
      .map_err(|e| StoreError::Transport(e.to_string()))?;

    Self::check_status(res).await?;
    info!(target: "exogen_backend", %id, "Deleted exercise");
    Ok(())
  }
}
