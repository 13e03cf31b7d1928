//! Parsing of the raw generated text into exercise drafts.
//!
//! The generation endpoint is asked for a numbered list where every item
//! carries three labeled fields:
//!
//!   1. Titre: ...
//!      Énoncé: ...
//!      Correction: ...   (may span several lines)
//!
//! Free-text models drift, so this is a line-oriented scanner rather than a
//! pile of regexes: fragments are cut at leading "N." markers, then a small
//! current-field state machine walks each fragment's lines. Fragments missing
//! any of the three labels are dropped silently; they never count as produced
//! exercises. This module does no I/O and is deterministic.

use crate::domain::ExerciseDraft;

pub const TITLE_LABEL: &str = "Titre:";
pub const STATEMENT_LABEL: &str = "Énoncé:";
pub const CORRECTION_LABEL: &str = "Correction:";

const TITLE_FALLBACK: &str = "Sans titre";
const STATEMENT_FALLBACK: &str = "Sans énoncé";
const CORRECTION_FALLBACK: &str = "Sans correction";

/// Parse raw generated text into zero or more drafts, in input order.
/// Text before the first "N." marker is discarded.
pub fn parse_exercises(raw: &str) -> Vec<ExerciseDraft> {
  let mut fragments: Vec<Vec<&str>> = Vec::new();
  let mut current: Option<Vec<&str>> = None;

  for line in raw.lines() {
    if let Some(rest) = item_marker_rest(line) {
      if let Some(done) = current.take() {
        fragments.push(done);
      }
      current = Some(vec![rest]);
    } else if let Some(frag) = current.as_mut() {
      frag.push(line);
    }
  }
  if let Some(done) = current.take() {
    fragments.push(done);
  }

  fragments.iter().filter_map(|f| extract_draft(f)).collect()
}

/// If the line opens a new enumerated item ("  3. ..."), return the text
/// after the marker.
fn item_marker_rest(line: &str) -> Option<&str> {
  let trimmed = line.trim_start();
  let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
  if digits == 0 {
    return None;
  }
  trimmed[digits..].strip_prefix('.')
}

/// Field currently being read while walking a fragment's lines.
#[derive(Clone, Copy)]
enum Field {
  Scanning,
  Correction,
}

fn extract_draft(lines: &[&str]) -> Option<ExerciseDraft> {
  // Validity gate: all three labels must appear somewhere in the fragment.
  let has = |label: &str| lines.iter().any(|l| l.contains(label));
  if !(has(TITLE_LABEL) && has(STATEMENT_LABEL) && has(CORRECTION_LABEL)) {
    return None;
  }

  let mut title: Option<String> = None;
  let mut statement: Option<String> = None;
  let mut correction = String::new();
  let mut field = Field::Scanning;

  for line in lines {
    match field {
      Field::Correction => {
        // Everything after the correction label belongs to the correction,
        // labels included, so step-by-step solutions survive intact.
        correction.push('\n');
        correction.push_str(line);
      }
      Field::Scanning => {
        if let Some(rest) = after_label(line, CORRECTION_LABEL) {
          correction.push_str(rest.trim_start());
          field = Field::Correction;
        } else if let Some(rest) = after_label(line, TITLE_LABEL) {
          if title.is_none() {
            title = Some(rest.trim().to_string());
          }
        } else if let Some(rest) = after_label(line, STATEMENT_LABEL) {
          if statement.is_none() {
            statement = Some(rest.trim().to_string());
          }
        }
      }
    }
  }

  // Extraction stays defensive and independent of the validity gate above:
  // an empty capture falls back to a placeholder instead of failing.
  let correction = correction.trim_end().to_string();
  Some(ExerciseDraft {
    title: non_empty_or(title, TITLE_FALLBACK),
    statement: non_empty_or(statement, STATEMENT_FALLBACK),
    correction: if correction.is_empty() {
      CORRECTION_FALLBACK.to_string()
    } else {
      correction
    },
  })
}

fn after_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
  line.find(label).map(|i| &line[i + label.len()..])
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
  match value {
    Some(v) if !v.is_empty() => v,
    _ => fallback.to_string(),
  }
}
