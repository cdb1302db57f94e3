//! In-memory student and progress stores.
//!
//! Every record carries a version that is bumped on each write. Writers pass the
//! version they read; a mismatch means someone else wrote in between and the
//! write is refused with `StoreError::Conflict`.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::domain::{Progress, Student, StudentProfile};

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
  #[error("Student not found: {0}")]
  StudentNotFound(String),
  #[error("Concurrent update on {entity} {id}")]
  Conflict { entity: &'static str, id: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Versioned<T> {
  pub value: T,
  pub version: u64,
}

type ProgressKey = (String, String);

#[derive(Clone, Default)]
pub struct Store {
  students: Arc<RwLock<HashMap<String, Versioned<Student>>>>,
  progress: Arc<RwLock<HashMap<ProgressKey, Versioned<Progress>>>>,
}

impl Store {
  pub fn new() -> Self {
    Self::default()
  }

  /// Onboard a student: fresh id, zero XP, level 1, no streak or badges.
  #[instrument(level = "debug", skip(self, profile), fields(grade = profile.grade))]
  pub async fn create_student(&self, profile: StudentProfile, now: DateTime<Utc>) -> Student {
    let student = Student {
      id: Uuid::new_v4().to_string(),
      name: profile.name.trim().to_string(),
      age: profile.age,
      grade: profile.grade,
      avatar: profile.avatar,
      language: profile.language,
      total_xp: 0,
      level: 1,
      current_streak: 0,
      best_streak: 0,
      badges: Vec::new(),
      quests_completed: 0,
      created_at: now,
      last_activity: now,
      last_active_day: None,
    };
    self.students
      .write()
      .await
      .insert(student.id.clone(), Versioned { value: student.clone(), version: 1 });
    debug!(target: "eduquest_backend", id = %student.id, "Student created");
    student
  }

  pub async fn get_student(&self, id: &str) -> Option<Versioned<Student>> {
    self.students.read().await.get(id).cloned()
  }

  pub async fn list_students(&self) -> Vec<Student> {
    self.students.read().await.values().map(|v| v.value.clone()).collect()
  }

  /// Replace a student record if it is still at `expected_version`. Returns the new version.
  #[allow(dead_code)]
  #[instrument(level = "debug", skip(self, student), fields(id = %student.id))]
  pub async fn update_student(&self, student: Student, expected_version: u64) -> Result<u64, StoreError> {
    let mut students = self.students.write().await;
    let slot = students
      .get_mut(&student.id)
      .ok_or_else(|| StoreError::StudentNotFound(student.id.clone()))?;
    if slot.version != expected_version {
      warn!(target: "eduquest_backend", id = %student.id, expected_version, actual = slot.version, "Student version conflict");
      return Err(StoreError::Conflict { entity: "student", id: student.id.clone() });
    }
    slot.version += 1;
    slot.value = student;
    Ok(slot.version)
  }

  pub async fn get_progress(&self, student_id: &str, quest_id: &str) -> Option<Versioned<Progress>> {
    self.progress
      .read()
      .await
      .get(&(student_id.to_string(), quest_id.to_string()))
      .cloned()
  }

  /// All progress records of a student, ordered by quest id.
  pub async fn list_progress(&self, student_id: &str) -> Vec<Progress> {
    let mut out: Vec<Progress> = self.progress
      .read()
      .await
      .values()
      .filter(|v| v.value.student_id == student_id)
      .map(|v| v.value.clone())
      .collect();
    out.sort_by(|a, b| a.quest_id.cmp(&b.quest_id));
    out
  }

  /// Write the outcome of one submission: the student and its progress record together.
  ///
  /// `expected_progress_version` is `None` when the caller saw no progress record yet;
  /// the write then fails if one appeared in the meantime.
  #[instrument(level = "debug", skip(self, student, progress), fields(student_id = %student.id, quest_id = %progress.quest_id))]
  pub async fn commit_submission(
    &self,
    student: Student,
    expected_student_version: u64,
    progress: Progress,
    expected_progress_version: Option<u64>,
  ) -> Result<(), StoreError> {
    // Lock order: students, then progress.
    let mut students = self.students.write().await;
    let mut all_progress = self.progress.write().await;

    let slot = students
      .get(&student.id)
      .ok_or_else(|| StoreError::StudentNotFound(student.id.clone()))?;
    if slot.version != expected_student_version {
      return Err(StoreError::Conflict { entity: "student", id: student.id.clone() });
    }

    let key = (progress.student_id.clone(), progress.quest_id.clone());
    let current_progress_version = all_progress.get(&key).map(|v| v.version);
    if current_progress_version != expected_progress_version {
      return Err(StoreError::Conflict { entity: "progress", id: progress.id.clone() });
    }

    let next_student_version = expected_student_version + 1;
    students.insert(student.id.clone(), Versioned { value: student, version: next_student_version });
    let next_progress_version = expected_progress_version.unwrap_or(0) + 1;
    all_progress.insert(key, Versioned { value: progress, version: next_progress_version });
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Avatar, Language};

  fn profile() -> StudentProfile {
    StudentProfile { name: "  Ananya Patel ".into(), age: 7, grade: 1, avatar: Avatar::Girl, language: Language::English }
  }

  fn progress_for(student_id: &str, attempts: u32) -> Progress {
    Progress {
      id: "p1".into(),
      student_id: student_id.into(),
      quest_id: "farmer-mangoes".into(),
      best_score: 50,
      completed: false,
      attempts,
      best_xp_earned: 25,
      last_attempt: Utc::now(),
    }
  }

  #[tokio::test]
  async fn create_and_get_student() {
    let store = Store::new();
    let s = store.create_student(profile(), Utc::now()).await;
    assert_eq!(s.name, "Ananya Patel");
    assert_eq!(s.level, 1);
    assert_eq!(s.total_xp, 0);

    let got = store.get_student(&s.id).await.unwrap();
    assert_eq!(got.version, 1);
    assert_eq!(got.value, s);
    assert!(store.get_student("missing").await.is_none());
  }

  #[tokio::test]
  async fn stale_update_is_refused() {
    let store = Store::new();
    let s = store.create_student(profile(), Utc::now()).await;

    let mut first = s.clone();
    first.total_xp = 10;
    assert_eq!(store.update_student(first, 1).await, Ok(2));

    let mut stale = s.clone();
    stale.total_xp = 99;
    assert!(matches!(store.update_student(stale, 1).await, Err(StoreError::Conflict { .. })));
    assert_eq!(store.get_student(&s.id).await.unwrap().value.total_xp, 10);
  }

  #[tokio::test]
  async fn commit_checks_both_versions() {
    let store = Store::new();
    let s = store.create_student(profile(), Utc::now()).await;

    store.commit_submission(s.clone(), 1, progress_for(&s.id, 1), None).await.unwrap();
    let stored = store.get_progress(&s.id, "farmer-mangoes").await.unwrap();
    assert_eq!(stored.version, 1);

    // Someone else already created the progress record.
    let err = store.commit_submission(s.clone(), 2, progress_for(&s.id, 1), None).await;
    assert!(matches!(err, Err(StoreError::Conflict { entity: "progress", .. })));

    // Stale student version.
    let err = store.commit_submission(s.clone(), 1, progress_for(&s.id, 2), Some(1)).await;
    assert!(matches!(err, Err(StoreError::Conflict { entity: "student", .. })));

    store.commit_submission(s.clone(), 2, progress_for(&s.id, 2), Some(1)).await.unwrap();
    assert_eq!(store.get_progress(&s.id, "farmer-mangoes").await.unwrap().value.attempts, 2);
    assert_eq!(store.list_progress(&s.id).await.len(), 1);
    assert!(store.list_progress("someone-else").await.is_empty());
  }
}
