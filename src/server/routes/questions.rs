use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        DbError, NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::PageQuery,
        extractors::{AppJson, AppPath, AppQuery},
    },
    telemetry::QUESTIONS_CNTR,
};

use super::{categories::categories_map, method_not_allowed, ApiError, ApiResponse};

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i64, String>,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Option<String>,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    AppQuery(PageQuery { page }): AppQuery<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let questions = questions::get_questions_page(&pool, page).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let categories = categories::get_all_categories(&pool).await?;
    Ok(Json(QuestionsPage {
        success: true,
        questions: questions.items,
        total_questions: questions.total,
        categories: categories_map(categories),
        current_category: None,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    AppJson(new_question): AppJson<NewQuestion>,
) -> ApiResponse<Created> {
    let id = questions::create_question(&pool, &new_question).await?;
    QUESTIONS_CNTR.with_label_values(&["created"]).inc();
    tracing::info!("Created question {id}");
    Ok(Json(Created {
        success: true,
        created: id,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
) -> ApiResponse<Deleted> {
    questions::delete_question(&pool, id)
        .await
        .map_err(|error| match error {
            DbError::NotFound => ApiError::Unprocessable,
            other => other.into(),
        })?;
    QUESTIONS_CNTR.with_label_values(&["deleted"]).inc();
    tracing::info!("Deleted question {id}");
    Ok(Json(Deleted {
        success: true,
        deleted: id,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    AppJson(body): AppJson<SearchBody>,
) -> ApiResponse<SearchResults> {
    let term = body.search_term.ok_or(ApiError::Unprocessable)?;
    let questions = questions::search_questions(&pool, &term).await?;
    Ok(Json(SearchResults {
        success: true,
        total_questions: questions.len() as i64,
        questions,
        current_category: None,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/questions",
            get(list_questions)
                .post(create_question)
                .fallback(method_not_allowed),
        )
        .route(
            "/questions/{id}",
            delete(delete_question).fallback(method_not_allowed),
        )
        .route(
            "/search",
            post(search_questions).fallback(method_not_allowed),
        )
        .with_state(state)
}
