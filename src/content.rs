//! Read-only quest catalog. Built once at startup from the seeds plus any
//! TOML quest bank, validated, and ordered by `order`.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{error, info, instrument};

use crate::domain::{Quest, Subject};

#[derive(Debug, Error, PartialEq)]
pub enum ContentError {
  #[error("quest {0} has no questions")]
  NoQuestions(String),
  #[error("quest {quest} repeats question id {question}")]
  DuplicateQuestion { quest: String, question: String },
  #[error("quest {quest} question {question}: correct answer is not one of the options")]
  AnswerNotInOptions { quest: String, question: String },
}

/// Authoring checks applied to every quest before it is served.
pub fn validate_quest(quest: &Quest) -> Result<(), ContentError> {
  if quest.questions.is_empty() {
    return Err(ContentError::NoQuestions(quest.id.clone()));
  }
  let mut seen = HashSet::new();
  for q in &quest.questions {
    if !seen.insert(q.id.as_str()) {
      return Err(ContentError::DuplicateQuestion { quest: quest.id.clone(), question: q.id.clone() });
    }
    if !q.options.iter().any(|o| q.is_correct(o)) {
      return Err(ContentError::AnswerNotInOptions { quest: quest.id.clone(), question: q.id.clone() });
    }
  }
  Ok(())
}

#[derive(Clone, Debug, Default)]
pub struct ContentStore {
  by_id: HashMap<String, Quest>,
  ordered: Vec<String>,
}

impl ContentStore {
  /// Build the catalog. Invalid quests are logged and skipped; an id seen twice keeps the first entry.
  #[instrument(level = "info", skip_all, fields(candidates = quests.len()))]
  pub fn new(quests: Vec<Quest>) -> Self {
    let mut by_id = HashMap::new();
    for quest in quests {
      if let Err(e) = validate_quest(&quest) {
        error!(target: "quest", id = %quest.id, error = %e, "Skipping invalid quest");
        continue;
      }
      if by_id.contains_key(&quest.id) {
        error!(target: "quest", id = %quest.id, "Skipping quest with duplicate id");
        continue;
      }
      by_id.insert(quest.id.clone(), quest);
    }

    let mut ordered: Vec<&Quest> = by_id.values().collect();
    ordered.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    let ordered = ordered.into_iter().map(|q| q.id.clone()).collect();

    let store = Self { by_id, ordered };
    for grade in [1u8, 2] {
      info!(target: "quest", grade, count = store.list_quests(Some(grade), None).len(), "Startup quest inventory");
    }
    store
  }

  pub fn get_quest(&self, id: &str) -> Option<&Quest> {
    self.by_id.get(id)
  }

  /// Quests in display order, optionally narrowed to a grade and subject.
  pub fn list_quests(&self, grade: Option<u8>, subject: Option<Subject>) -> Vec<&Quest> {
    self.ordered
      .iter()
      .filter_map(|id| self.by_id.get(id))
      .filter(|q| grade.map_or(true, |g| q.grade == g))
      .filter(|q| subject.map_or(true, |s| q.subject == s))
      .collect()
  }
}
