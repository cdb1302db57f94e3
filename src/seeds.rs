//! Seed data: built-in quests, the badge catalog, and fixed fallback texts.
//!
//! The quest catalog guarantees the app is usable without any TOML quest bank.

use crate::domain::{
  Badge, BadgeCode, Difficulty, Language, Quest, Question, QuestionKind, Subject,
};

pub const FALLBACK_HINT_EN: &str = "You can do this! Take your time and think step by step.";
pub const FALLBACK_HINT_ODIA: &str = "ତୁମେ ଏହା କରିପାର! ସମୟ ନିଅ ଏବଂ ଧାପେ ଧାପେ ଚିନ୍ତା କର।";

pub const WELCOME_EN: &str = "Welcome to EduQuest Odisha!";
pub const WELCOME_ODIA: &str = "ଏଡୁକ୍ୱେଷ୍ଟ ଓଡ଼ିଶାରେ ସ୍ୱାଗତ!";

/// Fallback hint in the requested language.
pub fn fallback_hint(language: Language) -> &'static str {
  match language {
    Language::English => FALLBACK_HINT_EN,
    Language::Odia => FALLBACK_HINT_ODIA,
  }
}

pub fn badge_catalog() -> Vec<Badge> {
  vec![
    Badge { code: BadgeCode::FirstQuest, name: "First Steps", name_odia: "ପ୍ରଥମ ପଦକ୍ଷେପ", icon: "🌟" },
    Badge { code: BadgeCode::MathWizard, name: "Math Wizard", name_odia: "ଗଣିତ ଯାଦୁଗର", icon: "🧙‍♂️" },
    Badge { code: BadgeCode::VillageProtector, name: "Village Protector", name_odia: "ଗାଁର ରକ୍ଷକ", icon: "🛡️" },
    Badge { code: BadgeCode::StreakMaster, name: "7-Day Streak Master", name_odia: "୭ ଦିନର ଧାରା ଗୁରୁ", icon: "🔥" },
    Badge { code: BadgeCode::KnowledgeSeeker, name: "Knowledge Seeker", name_odia: "ଜ୍ଞାନ ଅନ୍ୱେଷୀ", icon: "📚" },
  ]
}

fn q(id: &str, en: &str, od: &str, kind: QuestionKind, image: Option<&str>, options: &[&str], correct: &str) -> Question {
  Question {
    id: id.into(),
    question: en.into(),
    question_odia: od.into(),
    kind,
    image_url: image.map(str::to_string),
    options: options.iter().map(|s| s.to_string()).collect(),
    correct_answer: correct.into(),
  }
}

/// Hand-authored bilingual quests for grades 1 and 2.
pub fn seed_quests() -> Vec<Quest> {
  vec![
    Quest {
      id: "farmer-mangoes".into(),
      title: "Help the Farmer Count Mangoes".into(),
      title_odia: "କୃଷକଙ୍କୁ ଆମ୍ବ ଗଣିବାରେ ସାହାଯ୍ୟ କରନ୍ତୁ".into(),
      description: "A friendly farmer needs help counting mangoes in his orchard".into(),
      description_odia: "ଜଣେ ବନ୍ଧୁ କୃଷକଙ୍କୁ ତାଙ୍କର ବଗିଚାରେ ଆମ୍ବ ଗଣିବାରେ ସାହାଯ୍ୟ ଦରକାର".into(),
      subject: Subject::Math,
      grade: 1,
      difficulty: Difficulty::Easy,
      xp_reward: 50,
      story_context: "In a beautiful village near Puri, farmer Raju has a mango orchard. Help him count the ripe mangoes so he can sell them at the market!".into(),
      story_context_odia: "ପୁରୀ ନିକଟସ୍ଥ ଏକ ସୁନ୍ଦର ଗାଁରେ, କୃଷକ ରାଜୁଙ୍କର ଆମ୍ବ ବଗିଚା ଅଛି। ତାଙ୍କୁ ପାଚିଲା ଆମ୍ବ ଗଣିବାରେ ସାହାଯ୍ୟ କର ଯାହାଫଳରେ ସେ ବଜାରରେ ବିକ୍ରି କରିପାରିବ!".into(),
      questions: vec![
        q("q1", "How many mangoes do you see?", "ତୁମେ କେତୋଟି ଆମ୍ବ ଦେଖୁଛ?", QuestionKind::Counting,
          Some("https://images.unsplash.com/photo-1502086223501-7ea6ecd79368"), &["3", "5", "7", "9"], "5"),
        q("q2", "Raju picks 2 more mangoes. How many does he have now?", "ରାଜୁ ଆଉ ୨ଟି ଆମ୍ବ ତୋଳିଲେ। ଏବେ ତାଙ୍କ ପାଖରେ କେତୋଟି ଅଛି?",
          QuestionKind::Counting, None, &["6", "7", "8", "9"], "7"),
      ],
      is_unlocked: true,
      order: 1,
    },
    Quest {
      id: "village-rivers".into(),
      title: "Protect the Village - Learn About Rivers".into(),
      title_odia: "ଗାଁକୁ ରକ୍ଷା କର - ନଦୀ ବିଷୟରେ ଜାଣ".into(),
      description: "Become a village protector by learning about Odisha's rivers".into(),
      description_odia: "ଓଡ଼ିଶାର ନଦୀ ବିଷୟରେ ଜାଣି ଗାଁର ରକ୍ଷକ ହୁଅ".into(),
      subject: Subject::SocialStudies,
      grade: 1,
      difficulty: Difficulty::Easy,
      xp_reward: 60,
      story_context: "The wise village elder needs your help to protect the village from floods. Learn about the sacred rivers of Odisha!".into(),
      story_context_odia: "ଜ୍ଞାନୀ ଗାଁର ପ୍ରାଚୀନ ବନ୍ୟାରୁ ଗାଁକୁ ରକ୍ଷା କରିବା ପାଇଁ ତୁମର ସାହାଯ୍ୟ ଦରକାର। ଓଡ଼ିଶାର ପବିତ୍ର ନଦୀଗୁଡ଼ିକ ବିଷୟରେ ଜାଣ!".into(),
      questions: vec![
        q("q1", "Which is the longest river in Odisha?", "ଓଡ଼ିଶାର ସବୁଠାରୁ ଲମ୍ବା ନଦୀ କେଉଁଟି?", QuestionKind::MultipleChoice,
          None, &["Brahmani", "Mahanadi", "Baitarani", "Subarnarekha"], "Mahanadi"),
      ],
      is_unlocked: true,
      order: 2,
    },
    Quest {
      id: "market-coins".into(),
      title: "Shopping at the Haat".into(),
      title_odia: "ହାଟରେ ବଜାର".into(),
      description: "Help Mina pay for vegetables at the weekly market".into(),
      description_odia: "ସାପ୍ତାହିକ ହାଟରେ ପରିବା କିଣିବାରେ ମୀନାକୁ ସାହାଯ୍ୟ କର".into(),
      subject: Subject::Math,
      grade: 2,
      difficulty: Difficulty::Medium,
      xp_reward: 40,
      story_context: "Every Sunday Mina goes to the village haat with her grandmother. Help her add up the prices so she pays the right amount!".into(),
      story_context_odia: "ପ୍ରତି ରବିବାର ମୀନା ଜେଜେମା ସହିତ ଗାଁ ହାଟକୁ ଯାଏ। ଠିକ୍ ଟଙ୍କା ଦେବା ପାଇଁ ଦାମ ଯୋଡ଼ିବାରେ ତାକୁ ସାହାଯ୍ୟ କର!".into(),
      questions: vec![
        q("q1", "Tomatoes cost 10 rupees and onions cost 15 rupees. What is the total?", "ଟମାଟୋ ୧୦ ଟଙ୍କା ଓ ପିଆଜ ୧୫ ଟଙ୍କା। ମୋଟ କେତେ?",
          QuestionKind::MultipleChoice, None, &["20", "25", "30", "35"], "25"),
        q("q2", "Mina pays with a 50 rupee note for 25 rupees of vegetables. How much change does she get?", "ମୀନା ୨୫ ଟଙ୍କାର ପରିବା ପାଇଁ ୫୦ ଟଙ୍କା ଦେଲା। ସେ କେତେ ଫେରସ୍ତ ପାଇବ?",
          QuestionKind::MultipleChoice, None, &["15", "20", "25", "30"], "25"),
        q("q3", "How many 5 rupee coins make 20 rupees?", "୨୦ ଟଙ୍କା ପାଇଁ କେତୋଟି ୫ ଟଙ୍କିଆ ମୁଦ୍ରା ଦରକାର?",
          QuestionKind::Counting, None, &["2", "3", "4", "5"], "4"),
        q("q4", "Which is more: 3 ten rupee notes or 1 twenty rupee note?", "କେଉଁଟି ଅଧିକ: ୩ଟି ଦଶ ଟଙ୍କିଆ ନୋଟ କି ୧ଟି କୋଡ଼ିଏ ଟଙ୍କିଆ ନୋଟ?",
          QuestionKind::MultipleChoice, None, &["3 ten rupee notes", "1 twenty rupee note"], "3 ten rupee notes"),
      ],
      is_unlocked: true,
      order: 3,
    },
    Quest {
      id: "rath-yatra".into(),
      title: "Journey with the Rath Yatra".into(),
      title_odia: "ରଥଯାତ୍ରା ସହିତ ଯାତ୍ରା".into(),
      description: "Learn about Odisha's festivals and places".into(),
      description_odia: "ଓଡ଼ିଶାର ପର୍ବପର୍ବାଣି ଓ ସ୍ଥାନ ବିଷୟରେ ଜାଣ".into(),
      subject: Subject::SocialStudies,
      grade: 2,
      difficulty: Difficulty::Medium,
      xp_reward: 50,
      story_context: "The chariots are rolling through Puri! Walk beside your friend Bapi and answer the pilgrims' questions about Odisha.".into(),
      story_context_odia: "ପୁରୀରେ ରଥ ଗଡ଼ୁଛି! ସାଙ୍ଗ ବାପି ସହିତ ଚାଲ ଏବଂ ଓଡ଼ିଶା ବିଷୟରେ ଯାତ୍ରୀଙ୍କ ପ୍ରଶ୍ନର ଉତ୍ତର ଦିଅ।".into(),
      questions: vec![
        q("q1", "In which city does the Rath Yatra take place?", "ରଥଯାତ୍ରା କେଉଁ ସହରରେ ହୁଏ?", QuestionKind::MultipleChoice,
          None, &["Cuttack", "Puri", "Sambalpur", "Berhampur"], "Puri"),
        q("q2", "What is the capital of Odisha?", "ଓଡ଼ିଶାର ରାଜଧାନୀ କେଉଁଠି?", QuestionKind::MultipleChoice,
          None, &["Bhubaneswar", "Cuttack", "Puri", "Rourkela"], "Bhubaneswar"),
      ],
      is_unlocked: true,
      order: 4,
    },
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::content::validate_quest;
  use std::collections::HashSet;

  #[test]
  fn seed_quests_are_well_formed() {
    let quests = seed_quests();
    let ids: HashSet<_> = quests.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids.len(), quests.len());
    for quest in &quests {
      validate_quest(quest).unwrap();
    }
  }

  #[test]
  fn catalog_covers_every_badge_once() {
    let codes: HashSet<_> = badge_catalog().into_iter().map(|b| b.code).collect();
    assert_eq!(codes.len(), 5);
    assert!(codes.contains(&BadgeCode::KnowledgeSeeker));
  }

  #[test]
  fn fallback_follows_language() {
    assert_eq!(fallback_hint(Language::English), FALLBACK_HINT_EN);
    assert_eq!(fallback_hint(Language::Odia), FALLBACK_HINT_ODIA);
  }
}
