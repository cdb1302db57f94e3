//! Loading service configuration (prompts, gamification rules, advisor and store
//! tuning, optional quest bank) from TOML.
//!
//! See `AppConfig` for the expected schema. Every section is optional; missing
//! keys fall back to the defaults below.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::Quest;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub gamification: GamificationRules,
  #[serde(default)]
  pub advisor: AdvisorConfig,
  #[serde(default)]
  pub store: StoreConfig,
  /// Extra quests appended to the built-in catalog.
  #[serde(default)]
  pub quests: Vec<Quest>,
}

/// Prompts used by the hint advisor.
/// Placeholders: `{story_context}`, `{question}`, `{options}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub hint_system: String,
  pub hint_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      hint_system: "You are a helpful tutor for young students (age 6-8) in rural Odisha. \
Create encouraging, story-based hints that relate to the quest context: {story_context}\n\
Keep hints simple, fun, and culturally relevant to Odisha village life. \
Always provide both English and Odia versions.".into(),
      hint_user_template: "Question: {question}\nOptions: {options}\nContext: {story_context}\n\n\
Give a gentle, encouraging hint without revealing the answer. Make it story-based and fun!\n\n\
Format your response as:\nEnglish: [hint in English]\nOdia: [hint in Odia]".into(),
    }
  }
}

/// Thresholds used by the scoring engine and the badge table.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GamificationRules {
  /// Minimum score (0-100) for a quest to count as completed.
  pub completion_threshold: u8,
  /// XP needed per level step; level = 1 + total_xp / xp_per_level.
  pub xp_per_level: u32,
  /// Score needed for the subject mastery badges.
  pub mastery_score: u8,
  pub streak_badge_days: u32,
  pub knowledge_seeker_quests: u32,
}

impl Default for GamificationRules {
  fn default() -> Self {
    Self {
      completion_threshold: 100,
      xp_per_level: 100,
      mastery_score: 90,
      streak_badge_days: 7,
      knowledge_seeker_quests: 5,
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
  /// Upper bound for one hint round-trip, including retries inside the client.
  pub timeout_secs: u64,
  pub temperature: f32,
}

impl Default for AdvisorConfig {
  fn default() -> Self {
    Self { timeout_secs: 8, temperature: 0.7 }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  /// How many times a submission is re-read and re-applied after a version conflict.
  pub max_commit_retries: u32,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self { max_commit_retries: 3 }
  }
}

/// Parse a TOML document into `AppConfig`.
pub fn parse_config(s: &str) -> Result<AppConfig, toml::de::Error> {
  toml::from_str::<AppConfig>(s)
}

/// Attempt to load `AppConfig` from EDUQUEST_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("EDUQUEST_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "eduquest_backend", %path, extra_quests = cfg.quests.len(), "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "eduquest_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "eduquest_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Subject;

  #[test]
  fn empty_document_yields_defaults() {
    let cfg = parse_config("").unwrap();
    assert_eq!(cfg.gamification, GamificationRules::default());
    assert_eq!(cfg.advisor.timeout_secs, 8);
    assert_eq!(cfg.store.max_commit_retries, 3);
    assert!(cfg.quests.is_empty());
    assert!(cfg.prompts.hint_user_template.contains("Odia:"));
  }

  #[test]
  fn partial_sections_keep_other_defaults() {
    let cfg = parse_config(
      r#"
[gamification]
completion_threshold = 70

[advisor]
timeout_secs = 2
"#,
    )
    .unwrap();
    assert_eq!(cfg.gamification.completion_threshold, 70);
    assert_eq!(cfg.gamification.xp_per_level, 100);
    assert_eq!(cfg.advisor.timeout_secs, 2);
    assert!((cfg.advisor.temperature - 0.7).abs() < f32::EPSILON);
  }

  #[test]
  fn quest_bank_entries_parse() {
    let cfg = parse_config(
      r#"
[[quests]]
id = "temple-steps"
title = "Count the Temple Steps"
title_odia = "ମନ୍ଦିର ପାହାଚ ଗଣ"
description = "Count steps"
description_odia = "ପାହାଚ ଗଣ"
subject = "math"
grade = 2
difficulty = "medium"
xp_reward = 40
story_context = "At the temple in Bhubaneswar"
story_context_odia = "ଭୁବନେଶ୍ୱରର ମନ୍ଦିରରେ"
order = 9

[[quests.questions]]
id = "q1"
question = "2 + 3 = ?"
question_odia = "୨ + ୩ = ?"
options = ["4", "5", "6"]
correct_answer = "5"
"#,
    )
    .unwrap();
    assert_eq!(cfg.quests.len(), 1);
    let q = &cfg.quests[0];
    assert_eq!(q.subject, Subject::Math);
    assert!(q.is_unlocked);
    assert_eq!(q.questions[0].image_url, None);
  }
}
