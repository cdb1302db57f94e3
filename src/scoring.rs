//! Scoring & gamification engine.
//!
//! `score_submission` is a pure function: it takes a quest, the student and
//! progress as last read from the store, the submitted answers and the current
//! time, and returns the new student, the new progress and the client-facing
//! result. Nothing is written here; the caller persists the returned records.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::badges::{newly_earned, Outcome};
use crate::config::GamificationRules;
use crate::domain::{BadgeCode, Progress, Quest, QuestionAnswer, Student};

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
  #[error("Quest {0} has no questions")]
  EmptyQuest(String),
  #[error("Question {0} does not belong to this quest")]
  UnknownQuestion(String),
  #[error("Question {0} was answered more than once")]
  DuplicateAnswer(String),
}

/// What the client sees after a submission.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SubmissionResult {
  pub score: u8,
  pub xp_earned: u32,
  pub correct_count: u32,
  pub total_questions: u32,
  pub completed: bool,
  pub new_badges: Vec<BadgeCode>,
  pub total_xp: u32,
  pub level: u32,
  pub level_up: bool,
  pub current_streak: u32,
}

#[derive(Clone, Debug)]
pub struct Scored {
  pub student: Student,
  pub progress: Progress,
  pub result: SubmissionResult,
}

/// `round(100 * correct / total)`, halves rounded up.
pub fn percent_score(correct: u32, total: u32) -> u8 {
  debug_assert!(total > 0 && correct <= total);
  let (c, t) = (correct as u64, total as u64);
  ((200 * c + t) / (2 * t)) as u8
}

/// `round(xp_reward * score / 100)`, halves rounded up.
pub fn scaled_xp(xp_reward: u32, score: u8) -> u32 {
  ((2 * xp_reward as u64 * score as u64 + 100) / 200) as u32
}

/// Monotonic step function: one level per `xp_per_level` XP, starting at 1.
pub fn level_for_xp(total_xp: u32, xp_per_level: u32) -> u32 {
  1 + total_xp / xp_per_level.max(1)
}

/// Apply one day of activity to the streak counters. Days are UTC calendar days.
pub fn advance_streak(student: &mut Student, today: NaiveDate) {
  match student.last_active_day {
    None => student.current_streak = 1,
    Some(last) if last == today => student.current_streak = student.current_streak.max(1),
    Some(last) if today < last => return,
    Some(last) if last.succ_opt() == Some(today) => student.current_streak += 1,
    Some(_) => student.current_streak = 1,
  }
  student.last_active_day = Some(today);
  student.best_streak = student.best_streak.max(student.current_streak);
}

/// Reject answer sets that name foreign questions or answer one question twice.
fn validate_answers(quest: &Quest, answers: &[QuestionAnswer]) -> Result<(), ScoringError> {
  if quest.questions.is_empty() {
    return Err(ScoringError::EmptyQuest(quest.id.clone()));
  }
  let mut seen = HashSet::new();
  for a in answers {
    if quest.question(&a.question_id).is_none() {
      return Err(ScoringError::UnknownQuestion(a.question_id.clone()));
    }
    if !seen.insert(a.question_id.as_str()) {
      return Err(ScoringError::DuplicateAnswer(a.question_id.clone()));
    }
  }
  Ok(())
}

pub fn score_submission(
  quest: &Quest,
  student: &Student,
  progress: Option<&Progress>,
  answers: &[QuestionAnswer],
  now: DateTime<Utc>,
  rules: &GamificationRules,
) -> Result<Scored, ScoringError> {
  validate_answers(quest, answers)?;

  let total_questions = quest.questions.len() as u32;
  let correct_count = answers
    .iter()
    .filter(|a| quest.question(&a.question_id).map_or(false, |q| q.is_correct(&a.answer)))
    .count() as u32;

  let score = percent_score(correct_count, total_questions);
  let completed = score >= rules.completion_threshold;
  let xp_earned = scaled_xp(quest.xp_reward, score);

  // Progress: attempts always move, the best-* fields only on a strictly better score.
  let next_progress = match progress {
    None => Progress {
      id: Uuid::new_v4().to_string(),
      student_id: student.id.clone(),
      quest_id: quest.id.clone(),
      best_score: score,
      completed,
      attempts: 1,
      best_xp_earned: xp_earned,
      last_attempt: now,
    },
    Some(prev) => {
      let mut p = prev.clone();
      p.attempts += 1;
      p.last_attempt = now;
      if score > prev.best_score {
        p.best_score = score;
        p.completed = prev.completed || completed;
        p.best_xp_earned = prev.best_xp_earned.max(xp_earned);
      }
      p
    }
  };
  let newly_completed = next_progress.completed && !progress.map_or(false, |p| p.completed);

  let mut next = student.clone();
  next.total_xp = next.total_xp.saturating_add(xp_earned);
  next.level = level_for_xp(next.total_xp, rules.xp_per_level).max(student.level);
  next.last_activity = now;
  advance_streak(&mut next, now.date_naive());
  if newly_completed {
    next.quests_completed += 1;
  }

  let outcome = Outcome { subject: quest.subject, score, completed };
  let new_badges = newly_earned(&next, &outcome, rules);
  next.badges.extend(new_badges.iter().copied());

  let result = SubmissionResult {
    score,
    xp_earned,
    correct_count,
    total_questions,
    completed,
    new_badges,
    total_xp: next.total_xp,
    level: next.level,
    level_up: next.level > student.level,
    current_streak: next.current_streak,
  };

  Ok(Scored { student: next, progress: next_progress, result })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Avatar, Difficulty, Language, Question, QuestionKind, Subject};
  use chrono::{Duration, TimeZone};

  fn quest(n: usize, xp_reward: u32, subject: Subject) -> Quest {
    Quest {
      id: "quest".into(),
      title: "T".into(),
      title_odia: "T".into(),
      description: "D".into(),
      description_odia: "D".into(),
      subject,
      grade: 1,
      difficulty: Difficulty::Easy,
      xp_reward,
      story_context: "S".into(),
      story_context_odia: "S".into(),
      questions: (1..=n)
        .map(|i| Question {
          id: format!("q{i}"),
          question: format!("Question {i}"),
          question_odia: format!("Question {i}"),
          kind: QuestionKind::MultipleChoice,
          image_url: None,
          options: vec!["right".into(), "wrong".into()],
          correct_answer: "right".into(),
        })
        .collect(),
      is_unlocked: true,
      order: 0,
    }
  }

  fn student() -> Student {
    let t = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    Student {
      id: "s1".into(),
      name: "Mina".into(),
      age: 7,
      grade: 1,
      avatar: Avatar::Girl,
      language: Language::English,
      total_xp: 0,
      level: 1,
      current_streak: 0,
      best_streak: 0,
      badges: vec![],
      quests_completed: 0,
      created_at: t,
      last_activity: t,
      last_active_day: None,
    }
  }

  fn answers(right: usize, wrong: usize) -> Vec<QuestionAnswer> {
    (1..=right + wrong)
      .map(|i| QuestionAnswer {
        question_id: format!("q{i}"),
        answer: if i <= right { "right".into() } else { "wrong".into() },
      })
      .collect()
  }

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap()
  }

  #[test]
  fn three_of_four_scores_75_and_30_xp() {
    let scored = score_submission(&quest(4, 40, Subject::Math), &student(), None, &answers(3, 1), now(), &GamificationRules::default()).unwrap();
    assert_eq!(scored.result.score, 75);
    assert_eq!(scored.result.xp_earned, 30);
    assert_eq!(scored.result.correct_count, 3);
    assert_eq!(scored.result.total_questions, 4);
    assert!(!scored.result.completed);
    assert!(!scored.progress.completed);
    assert_eq!(scored.student.total_xp, 30);
  }

  #[test]
  fn perfect_submission_completes_on_first_try() {
    let scored = score_submission(&quest(2, 50, Subject::Math), &student(), None, &answers(2, 0), now(), &GamificationRules::default()).unwrap();
    assert_eq!(scored.result.score, 100);
    assert_eq!(scored.result.xp_earned, 50);
    assert!(scored.result.completed);
    assert!(scored.progress.completed);
    assert_eq!(scored.progress.attempts, 1);
    assert_eq!(scored.student.quests_completed, 1);
    assert_eq!(scored.result.new_badges, vec![BadgeCode::FirstQuest, BadgeCode::MathWizard]);
    assert_eq!(scored.student.badges, scored.result.new_badges);
  }

  #[test]
  fn zero_correct_earns_nothing() {
    let scored = score_submission(&quest(3, 60, Subject::SocialStudies), &student(), None, &answers(0, 3), now(), &GamificationRules::default()).unwrap();
    assert_eq!(scored.result.score, 0);
    assert_eq!(scored.result.xp_earned, 0);
    assert!(scored.result.new_badges.is_empty());
    assert_eq!(scored.student.level, 1);
  }

  #[test]
  fn missing_answers_count_as_wrong() {
    let scored = score_submission(&quest(3, 30, Subject::Math), &student(), None, &answers(1, 0), now(), &GamificationRules::default()).unwrap();
    assert_eq!(scored.result.correct_count, 1);
    assert_eq!(scored.result.score, 33);
    assert_eq!(scored.result.xp_earned, 10);
  }

  #[test]
  fn answers_compare_case_insensitively() {
    let a = vec![QuestionAnswer { question_id: "q1".into(), answer: " RIGHT ".into() }];
    let scored = score_submission(&quest(1, 10, Subject::Math), &student(), None, &a, now(), &GamificationRules::default()).unwrap();
    assert_eq!(scored.result.score, 100);
  }

  #[test]
  fn foreign_or_repeated_question_ids_are_rejected() {
    let q = quest(2, 20, Subject::Math);
    let mut a = answers(2, 0);
    a.push(QuestionAnswer { question_id: "q9".into(), answer: "right".into() });
    assert_eq!(
      score_submission(&q, &student(), None, &a, now(), &GamificationRules::default()).unwrap_err(),
      ScoringError::UnknownQuestion("q9".into())
    );

    let dup = vec![
      QuestionAnswer { question_id: "q1".into(), answer: "right".into() },
      QuestionAnswer { question_id: "q1".into(), answer: "wrong".into() },
    ];
    assert_eq!(
      score_submission(&q, &student(), None, &dup, now(), &GamificationRules::default()).unwrap_err(),
      ScoringError::DuplicateAnswer("q1".into())
    );
  }

  #[test]
  fn empty_quest_is_a_configuration_error() {
    let q = quest(0, 20, Subject::Math);
    assert_eq!(
      score_submission(&q, &student(), None, &[], now(), &GamificationRules::default()).unwrap_err(),
      ScoringError::EmptyQuest("quest".into())
    );
  }

  #[test]
  fn lower_retry_keeps_best_score_and_counts_attempt() {
    let q = quest(4, 40, Subject::Math);
    let rules = GamificationRules::default();
    let first = score_submission(&q, &student(), None, &answers(3, 1), now(), &rules).unwrap();
    let second = score_submission(&q, &first.student, Some(&first.progress), &answers(1, 3), now(), &rules).unwrap();

    assert_eq!(second.result.score, 25);
    assert_eq!(second.progress.best_score, 75);
    assert_eq!(second.progress.best_xp_earned, 30);
    assert_eq!(second.progress.attempts, 2);
    assert_eq!(second.progress.id, first.progress.id);
    // XP still accumulates and the level never goes down.
    assert_eq!(second.student.total_xp, 40);
    assert!(second.student.level >= first.student.level);
  }

  #[test]
  fn completion_is_counted_once_per_quest() {
    let q = quest(2, 50, Subject::Math);
    let rules = GamificationRules::default();
    let first = score_submission(&q, &student(), None, &answers(2, 0), now(), &rules).unwrap();
    let second = score_submission(&q, &first.student, Some(&first.progress), &answers(2, 0), now(), &rules).unwrap();
    assert_eq!(second.student.quests_completed, 1);
    assert!(second.result.new_badges.is_empty());
    assert_eq!(second.student.badges, vec![BadgeCode::FirstQuest, BadgeCode::MathWizard]);
  }

  #[test]
  fn configurable_threshold_allows_partial_completion() {
    let rules = GamificationRules { completion_threshold: 70, ..GamificationRules::default() };
    let scored = score_submission(&quest(4, 40, Subject::Math), &student(), None, &answers(3, 1), now(), &rules).unwrap();
    assert!(scored.result.completed);
    assert_eq!(scored.result.new_badges, vec![BadgeCode::FirstQuest]);
  }

  #[test]
  fn level_up_is_reported() {
    let mut s = student();
    s.total_xp = 80;
    let scored = score_submission(&quest(2, 50, Subject::Math), &s, None, &answers(2, 0), now(), &GamificationRules::default()).unwrap();
    assert_eq!(scored.student.total_xp, 130);
    assert_eq!(scored.result.level, 2);
    assert!(scored.result.level_up);
  }

  #[test]
  fn rounding_and_levels() {
    assert_eq!(percent_score(1, 3), 33);
    assert_eq!(percent_score(2, 3), 67);
    assert_eq!(percent_score(1, 8), 13);
    assert_eq!(scaled_xp(50, 50), 25);
    assert_eq!(scaled_xp(15, 50), 8);
    assert_eq!(scaled_xp(40, 0), 0);
    assert_eq!(level_for_xp(0, 100), 1);
    assert_eq!(level_for_xp(99, 100), 1);
    assert_eq!(level_for_xp(100, 100), 2);
    let mut last = 0;
    for xp in (0..2_000).step_by(7) {
      let lvl = level_for_xp(xp, 100);
      assert!(lvl >= last);
      last = lvl;
    }
  }

  #[test]
  fn streak_follows_utc_days() {
    let mut s = student();
    let d1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

    advance_streak(&mut s, d1);
    assert_eq!(s.current_streak, 1);
    advance_streak(&mut s, d1);
    assert_eq!(s.current_streak, 1);
    advance_streak(&mut s, d1 + Duration::days(1));
    assert_eq!(s.current_streak, 2);
    advance_streak(&mut s, d1 + Duration::days(2));
    assert_eq!(s.current_streak, 3);
    assert_eq!(s.best_streak, 3);

    // Skipped a day.
    advance_streak(&mut s, d1 + Duration::days(4));
    assert_eq!(s.current_streak, 1);
    assert_eq!(s.best_streak, 3);

    // Clock went backwards: nothing changes.
    advance_streak(&mut s, d1);
    assert_eq!(s.current_streak, 1);
    assert_eq!(s.last_active_day, Some(d1 + Duration::days(4)));
  }

  #[test]
  fn seven_day_streak_earns_streak_master() {
    let q = quest(2, 10, Subject::Math);
    let rules = GamificationRules::default();
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap();
    let mut s = student();
    let mut progress = None;
    let mut earned = vec![];
    for day in 0..7 {
      let scored = score_submission(&q, &s, progress.as_ref(), &answers(0, 2), start + Duration::days(day), &rules).unwrap();
      earned.extend(scored.result.new_badges.clone());
      s = scored.student;
      progress = Some(scored.progress);
    }
    assert_eq!(s.current_streak, 7);
    assert_eq!(earned, vec![BadgeCode::StreakMaster]);
  }
}
