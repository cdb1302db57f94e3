//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Avatar, Difficulty, Quest, QuestionAnswer, QuestionKind, Subject};

/// Quest as delivered to clients. Correct answers stay on the server.
#[derive(Debug, Serialize)]
pub struct QuestOut {
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
    pub questions: Vec<QuestionOut>,
    pub is_unlocked: bool,
    pub order: u32,
}

#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub id: String,
    pub question: String,
    pub question_odia: String,
    pub kind: QuestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub options: Vec<String>,
}

/// Convert full `Quest` (internal) to the public DTO.
pub fn to_out(q: &Quest) -> QuestOut {
    QuestOut {
        id: q.id.clone(),
        title: q.title.clone(),
        title_odia: q.title_odia.clone(),
        description: q.description.clone(),
        description_odia: q.description_odia.clone(),
        subject: q.subject,
        grade: q.grade,
        difficulty: q.difficulty,
        xp_reward: q.xp_reward,
        story_context: q.story_context.clone(),
        story_context_odia: q.story_context_odia.clone(),
        questions: q
            .questions
            .iter()
            .map(|qq| QuestionOut {
                id: qq.id.clone(),
                question: qq.question.clone(),
                question_odia: qq.question_odia.clone(),
                kind: qq.kind,
                image_url: qq.image_url.clone(),
                options: qq.options.clone(),
            })
            .collect(),
        is_unlocked: q.is_unlocked,
        order: q.order,
    }
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct WelcomeOut {
    pub message: &'static str,
    pub message_odia: &'static str,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct QuestQuery {
    pub grade: Option<u8>,
    pub subject: Option<Subject>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitIn {
    pub quest_id: String,
    #[serde(default)]
    pub answers: Vec<QuestionAnswer>,
}

#[derive(Debug, Deserialize)]
pub struct HintQuery {
    pub quest_id: String,
    pub question_id: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct HintOut {
    pub hint: String,
    pub hint_odia: String,
    /// The hint in the student's preferred language.
    pub text: String,
    /// True when the advisor was unavailable and the fixed text was used.
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub grade: Option<u8>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub total_xp: u32,
    pub level: u32,
    pub avatar: Avatar,
    pub badges_count: usize,
}
