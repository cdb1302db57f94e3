//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, instrument};

use crate::domain::{Progress, Student, StudentProfile};
use crate::error::ApiError;
use crate::logic::*;
use crate::protocol::*;
use crate::scoring::SubmissionResult;
use crate::seeds::{badge_catalog, WELCOME_EN, WELCOME_ODIA};
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_root() -> impl IntoResponse {
  Json(WelcomeOut { message: WELCOME_EN, message_odia: WELCOME_ODIA })
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(grade = body.grade))]
pub async fn http_create_student(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StudentProfile>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
  let student = create_student(&state, body).await?;
  Ok((StatusCode::CREATED, Json(student)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_student(
  State(state): State<Arc<AppState>>,
  Path(student_id): Path<String>,
) -> Result<Json<Student>, ApiError> {
  Ok(Json(get_student(&state, &student_id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_progress(
  State(state): State<Arc<AppState>>,
  Path(student_id): Path<String>,
) -> Result<Json<Vec<Progress>>, ApiError> {
  Ok(Json(list_progress(&state, &student_id).await?))
}

#[instrument(level = "info", skip(state, body), fields(quest_id = %body.quest_id, answers = body.answers.len()))]
pub async fn http_submit_quest(
  State(state): State<Arc<AppState>>,
  Path(student_id): Path<String>,
  Json(body): Json<SubmitIn>,
) -> Result<Json<SubmissionResult>, ApiError> {
  let result = submit_quest(&state, &student_id, body).await?;
  info!(target: "quest", %student_id, score = result.score, xp_earned = result.xp_earned, "HTTP submit_quest evaluated");
  Ok(Json(result))
}

#[instrument(level = "info", skip(state), fields(quest_id = %q.quest_id, question_id = %q.question_id))]
pub async fn http_generate_hint(
  State(state): State<Arc<AppState>>,
  Path(student_id): Path<String>,
  Query(q): Query<HintQuery>,
) -> Result<Json<HintOut>, ApiError> {
  let out = generate_hint(&state, &student_id, &q.quest_id, &q.question_id).await?;
  info!(target: "quest", %student_id, fallback = out.fallback, "HTTP hint served");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_quests(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestQuery>,
) -> impl IntoResponse {
  Json(list_quests(&state, q.grade, q.subject))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_quest(
  State(state): State<Arc<AppState>>,
  Path(quest_id): Path<String>,
) -> Result<Json<QuestOut>, ApiError> {
  Ok(Json(get_quest(&state, &quest_id)?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_leaderboard(
  State(state): State<Arc<AppState>>,
  Query(q): Query<LeaderboardQuery>,
) -> impl IntoResponse {
  Json(leaderboard(&state, q.grade, q.limit).await)
}

#[instrument(level = "info")]
pub async fn http_badges() -> impl IntoResponse {
  Json(badge_catalog())
}
