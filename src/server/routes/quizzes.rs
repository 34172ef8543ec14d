use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, Question},
    server::{app::AppState, extractors::AppJson},
};

use super::{method_not_allowed, ApiError, ApiResponse};

#[derive(Deserialize)]
struct QuizCategory {
    // category ids arrive as map keys from `/categories`, so strings are accepted too
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    previous_questions: Vec<i64>,
    quiz_category: Option<QuizCategory>,
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Option<Question>,
}

/// Draws the next quiz question. Category id 0 means any category; `question` is
/// null once every candidate has been asked.
async fn next_question(
    State(pool): State<SqlitePool>,
    AppJson(request): AppJson<QuizRequest>,
) -> ApiResponse<QuizQuestion> {
    let category = request.quiz_category.ok_or(ApiError::Unprocessable)?;
    let category = (category.id != 0).then_some(category.id);
    let question =
        questions::get_random_question(&pool, category, &request.previous_questions).await?;
    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/quizzes",
            post(next_question).fallback(method_not_allowed),
        )
        .with_state(state)
}
