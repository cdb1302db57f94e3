//! Badge eligibility table.
//!
//! Each entry pairs a badge code with a predicate over the already-updated
//! student and the submission outcome. Entries are evaluated in table order.

use crate::config::GamificationRules;
use crate::domain::{BadgeCode, Student, Subject};

/// What a single submission achieved, as seen by the badge predicates.
#[derive(Clone, Copy, Debug)]
pub struct Outcome {
  pub subject: Subject,
  pub score: u8,
  pub completed: bool,
}

type Predicate = fn(&Student, &Outcome, &GamificationRules) -> bool;

fn first_quest(_: &Student, o: &Outcome, _: &GamificationRules) -> bool {
  o.completed
}

fn math_wizard(_: &Student, o: &Outcome, r: &GamificationRules) -> bool {
  o.subject == Subject::Math && o.score >= r.mastery_score
}

fn village_protector(_: &Student, o: &Outcome, r: &GamificationRules) -> bool {
  o.subject == Subject::SocialStudies && o.score >= r.mastery_score
}

fn streak_master(s: &Student, _: &Outcome, r: &GamificationRules) -> bool {
  s.current_streak >= r.streak_badge_days
}

fn knowledge_seeker(s: &Student, _: &Outcome, r: &GamificationRules) -> bool {
  s.quests_completed >= r.knowledge_seeker_quests
}

const BADGE_RULES: &[(BadgeCode, Predicate)] = &[
  (BadgeCode::FirstQuest, first_quest),
  (BadgeCode::MathWizard, math_wizard),
  (BadgeCode::VillageProtector, village_protector),
  (BadgeCode::StreakMaster, streak_master),
  (BadgeCode::KnowledgeSeeker, knowledge_seeker),
];

/// Badges the student qualifies for now and does not hold yet.
pub fn newly_earned(student: &Student, outcome: &Outcome, rules: &GamificationRules) -> Vec<BadgeCode> {
  BADGE_RULES
    .iter()
    .filter(|(code, _)| !student.has_badge(*code))
    .filter(|(_, eligible)| eligible(student, outcome, rules))
    .map(|(code, _)| *code)
    .collect()
}
