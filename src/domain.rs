//! Domain models used by the backend: students, quests, questions, progress, badges.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Preferred UI/hint language of a student.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
  #[default]
  English,
  Odia,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
  Math,
  SocialStudies,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

/// Avatars offered on the onboarding screen.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Avatar {
  Boy,
  Girl,
  Student,
  Tiger,
  Elephant,
  Peacock,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
  Counting,
  #[default]
  MultipleChoice,
}

/// Fixed set of achievements. Order here is the order badges are evaluated in.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCode {
  FirstQuest,
  MathWizard,
  VillageProtector,
  StreakMaster,
  KnowledgeSeeker,
}

/// Onboarding payload. Everything else on `Student` is owned by the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StudentProfile {
  pub name: String,
  pub age: u8,
  pub grade: u8,
  pub avatar: Avatar,
  #[serde(default)]
  pub language: Language,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Student {
  pub id: String,
  pub name: String,
  pub age: u8,
  pub grade: u8,
  pub avatar: Avatar,
  pub language: Language,

  pub total_xp: u32,
  pub level: u32,
  pub current_streak: u32,
  pub best_streak: u32,
  pub badges: Vec<BadgeCode>,
  pub quests_completed: u32,

  pub created_at: DateTime<Utc>,
  pub last_activity: DateTime<Utc>,
  /// UTC calendar day of the last submission that counted toward the streak.
  #[serde(default)]
  pub last_active_day: Option<NaiveDate>,
}

impl Student {
  pub fn has_badge(&self, code: BadgeCode) -> bool {
    self.badges.contains(&code)
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Question {
  pub id: String,
  pub question: String,
  pub question_odia: String,
  #[serde(default)]
  pub kind: QuestionKind,
  #[serde(default)]
  pub image_url: Option<String>,
  pub options: Vec<String>,
  pub correct_answer: String,
}

impl Question {
  /// Answers are compared trimmed and case-insensitively ("mahanadi" == "Mahanadi").
  pub fn is_correct(&self, chosen: &str) -> bool {
    self.correct_answer.trim().to_lowercase() == chosen.trim().to_lowercase()
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Quest {
  pub id: String,
  pub title: String,
  pub title_odia: String,
  pub description: String,
  pub description_odia: String,
  pub subject: Subject,
  pub grade: u8,
  pub difficulty: Difficulty,
  pub xp_reward: u32,
  pub story_context: String,
  pub story_context_odia: String,
  pub questions: Vec<Question>,
  #[serde(default = "default_unlocked")]
  pub is_unlocked: bool,
  #[serde(default)]
  pub order: u32,
}

fn default_unlocked() -> bool {
  true
}

impl Quest {
  pub fn question(&self, question_id: &str) -> Option<&Question> {
    self.questions.iter().find(|q| q.id == question_id)
  }
}

/// One chosen option for one question of a quest.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QuestionAnswer {
  pub question_id: String,
  #[serde(alias = "chosen_option")]
  pub answer: String,
}

/// Best-attempt summary for one student on one quest.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Progress {
  pub id: String,
  pub student_id: String,
  pub quest_id: String,
  pub best_score: u8,
  pub completed: bool,
  pub attempts: u32,
  pub best_xp_earned: u32,
  pub last_attempt: DateTime<Utc>,
}

/// Static catalog entry for a badge.
#[derive(Clone, Debug, Serialize)]
pub struct Badge {
  pub code: BadgeCode,
  pub name: &'static str,
  pub name_odia: &'static str,
  pub icon: &'static str,
}
