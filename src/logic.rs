//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Onboarding and lookup of students
//!   - Quest catalog reads
//!   - Quest submission (engine + optimistic commit with bounded retry)
//!   - Hint generation (time-bounded advisor call with fixed fallback)
//!   - Leaderboard

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{Language, Progress, Student, StudentProfile, Subject};
use crate::error::ApiError;
use crate::openai::AdvisorError;
use crate::protocol::{to_out, HintOut, LeaderboardEntry, QuestOut, SubmitIn};
use crate::scoring::{score_submission, SubmissionResult};
use crate::seeds::{fallback_hint, FALLBACK_HINT_EN, FALLBACK_HINT_ODIA};
use crate::state::AppState;
use crate::store::StoreError;

const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
const MAX_LEADERBOARD_LIMIT: usize = 100;

fn validate_profile(p: &StudentProfile) -> Result<(), ApiError> {
  let name_len = p.name.trim().chars().count();
  if name_len == 0 || name_len > 50 {
    return Err(ApiError::Validation("Name must be between 1 and 50 characters".into()));
  }
  if !(1..=2).contains(&p.grade) {
    return Err(ApiError::Validation(format!("Unsupported grade {}; expected 1 or 2", p.grade)));
  }
  if !(3..=14).contains(&p.age) {
    return Err(ApiError::Validation(format!("Unsupported age {}; expected 3 to 14", p.age)));
  }
  Ok(())
}

#[instrument(level = "info", skip(state, profile), fields(grade = profile.grade))]
pub async fn create_student(state: &AppState, profile: StudentProfile) -> Result<Student, ApiError> {
  validate_profile(&profile)?;
  let student = state.store.create_student(profile, Utc::now()).await;
  info!(target: "eduquest_backend", id = %student.id, grade = student.grade, "Student onboarded");
  Ok(student)
}

pub async fn get_student(state: &AppState, student_id: &str) -> Result<Student, ApiError> {
  state
    .store
    .get_student(student_id)
    .await
    .map(|v| v.value)
    .ok_or_else(|| ApiError::NotFound(format!("Student not found: {}", student_id)))
}

pub async fn list_progress(state: &AppState, student_id: &str) -> Result<Vec<Progress>, ApiError> {
  get_student(state, student_id).await?;
  Ok(state.store.list_progress(student_id).await)
}

pub fn list_quests(state: &AppState, grade: Option<u8>, subject: Option<Subject>) -> Vec<QuestOut> {
  state.content.list_quests(grade, subject).into_iter().map(to_out).collect()
}

pub fn get_quest(state: &AppState, quest_id: &str) -> Result<QuestOut, ApiError> {
  state
    .content
    .get_quest(quest_id)
    .map(to_out)
    .ok_or_else(|| ApiError::NotFound(format!("Quest not found: {}", quest_id)))
}

/// Score a submission and persist the new student and progress records.
///
/// The read-score-commit cycle is repeated when another writer touched the same
/// records in between, up to `max_commit_retries` extra rounds.
#[instrument(level = "info", skip(state, body), fields(%student_id, quest_id = %body.quest_id, answers = body.answers.len()))]
pub async fn submit_quest(state: &AppState, student_id: &str, body: SubmitIn) -> Result<SubmissionResult, ApiError> {
  let quest = state
    .content
    .get_quest(&body.quest_id)
    .ok_or_else(|| ApiError::NotFound(format!("Quest not found: {}", body.quest_id)))?;

  let rounds = state.max_commit_retries + 1;
  for round in 1..=rounds {
    let current = state
      .store
      .get_student(student_id)
      .await
      .ok_or_else(|| ApiError::NotFound(format!("Student not found: {}", student_id)))?;
    let progress = state.store.get_progress(student_id, &quest.id).await;

    let scored = score_submission(
      quest,
      &current.value,
      progress.as_ref().map(|p| &p.value),
      &body.answers,
      Utc::now(),
      &state.rules,
    )
    .map_err(|e| {
      warn!(target: "quest", %student_id, quest_id = %quest.id, error = %e, "Submission rejected");
      ApiError::from(e)
    })?;

    let result = scored.result.clone();
    match state
      .store
      .commit_submission(scored.student, current.version, scored.progress, progress.map(|p| p.version))
      .await
    {
      Ok(()) => {
        info!(
          target: "quest",
          %student_id,
          quest_id = %quest.id,
          score = result.score,
          xp_earned = result.xp_earned,
          completed = result.completed,
          new_badges = ?result.new_badges,
          "Submission scored"
        );
        return Ok(result);
      }
      Err(StoreError::Conflict { entity, .. }) => {
        warn!(target: "quest", %student_id, quest_id = %quest.id, round, entity, "Write conflict; re-reading");
      }
      Err(e) => return Err(e.into()),
    }
  }

  error!(target: "quest", %student_id, quest_id = %quest.id, rounds, "Giving up after repeated write conflicts");
  Err(ApiError::Conflict(format!(
    "Student {} was updated concurrently; please retry",
    student_id
  )))
}

fn fallback_out(language: Language) -> HintOut {
  HintOut {
    hint: FALLBACK_HINT_EN.into(),
    hint_odia: FALLBACK_HINT_ODIA.into(),
    text: fallback_hint(language).into(),
    fallback: true,
  }
}

/// Ask the advisor for a bilingual hint. Never fails because of the advisor:
/// disabled, slow, or broken advisors all yield the fixed fallback text.
#[instrument(level = "info", skip(state), fields(%student_id, %quest_id, %question_id))]
pub async fn generate_hint(
  state: &AppState,
  student_id: &str,
  quest_id: &str,
  question_id: &str,
) -> Result<HintOut, ApiError> {
  let student = get_student(state, student_id).await?;
  let quest = state
    .content
    .get_quest(quest_id)
    .ok_or_else(|| ApiError::NotFound(format!("Quest not found: {}", quest_id)))?;
  let question = quest
    .question(question_id)
    .ok_or_else(|| ApiError::NotFound(format!("Question not found: {}", question_id)))?;

  let reply = match &state.advisor {
    None => Err(AdvisorError::Disabled),
    Some(advisor) => {
      match tokio::time::timeout(state.hint_timeout, advisor.bilingual_hint(&state.prompts, quest, question)).await {
        Ok(r) => r,
        Err(_) => Err(AdvisorError::Timeout(state.hint_timeout)),
      }
    }
  };

  match reply {
    Ok(h) => {
      let hint = h.english.unwrap_or_else(|| FALLBACK_HINT_EN.into());
      let hint_odia = h.odia.unwrap_or_else(|| FALLBACK_HINT_ODIA.into());
      let text = match student.language {
        Language::English => hint.clone(),
        Language::Odia => hint_odia.clone(),
      };
      debug!(target: "quest", %quest_id, %question_id, "Hint served by advisor");
      Ok(HintOut { hint, hint_odia, text, fallback: false })
    }
    Err(AdvisorError::Disabled) => {
      debug!(target: "quest", %quest_id, %question_id, "Advisor disabled; serving fallback hint");
      Ok(fallback_out(student.language))
    }
    Err(e) => {
      warn!(target: "quest", %quest_id, %question_id, error = %e, "Hint advisor failed; serving fallback hint");
      Ok(fallback_out(student.language))
    }
  }
}

/// Students ranked by total XP (ties broken by name), optionally for one grade.
pub async fn leaderboard(state: &AppState, grade: Option<u8>, limit: Option<usize>) -> Vec<LeaderboardEntry> {
  let limit = limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT).clamp(1, MAX_LEADERBOARD_LIMIT);
  let mut students: Vec<Student> = state
    .store
    .list_students()
    .await
    .into_iter()
    .filter(|s| grade.map_or(true, |g| s.grade == g))
    .collect();
  students.sort_by(|a, b| b.total_xp.cmp(&a.total_xp).then_with(|| a.name.cmp(&b.name)));

  students
    .into_iter()
    .take(limit)
    .enumerate()
    .map(|(i, s)| LeaderboardEntry {
      rank: i + 1,
      badges_count: s.badges.len(),
      name: s.name,
      total_xp: s.total_xp,
      level: s.level,
      avatar: s.avatar,
    })
    .collect()
}
