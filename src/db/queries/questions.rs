use serde::{Deserialize, Serialize};
use sqlx::{types::Json, SqlitePool};

use crate::db::{DbError, DbResult, Page, Paginated, QUESTIONS_PER_PAGE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// Question fields as submitted by a client, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: i64,
    pub difficulty: i64,
}

// whitespace only counts as missing, but the stored text is kept as sent
fn required<'a>(field: &str, value: &'a Option<String>) -> DbResult<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DbError::Validation(format!("{field} is missing"))),
    }
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> DbResult<Question> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_questions_page(pool: &SqlitePool, page: Page) -> sqlx::Result<Paginated<Question>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await?;
    let Some(offset) = page.offset() else {
        return Ok(Paginated {
            items: vec![],
            total,
        });
    };
    let items = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        ORDER BY id
        LIMIT ?1 OFFSET ?2
        "#,
    )
    .bind(QUESTIONS_PER_PAGE)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(Paginated { items, total })
}

pub async fn get_questions_page_for_category(
    pool: &SqlitePool,
    category: i64,
    page: Page,
) -> sqlx::Result<Paginated<Question>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE category = ?1")
        .bind(category)
        .fetch_one(pool)
        .await?;
    let Some(offset) = page.offset() else {
        return Ok(Paginated {
            items: vec![],
            total,
        });
    };
    let items = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE category = ?1
        ORDER BY id
        LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(category)
    .bind(QUESTIONS_PER_PAGE)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(Paginated { items, total })
}

/// Case-insensitive substring search over question text. Not paginated.
///
/// Matching happens here rather than in SQL because SQLite's `LIKE` only folds ASCII.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let term = term.to_lowercase();
    let questions = get_all_questions(pool).await?;
    Ok(questions
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&term))
        .collect())
}

pub async fn create_question(pool: &SqlitePool, new_question: &NewQuestion) -> DbResult<i64> {
    let question = required("question", &new_question.question)?;
    let answer = required("answer", &new_question.answer)?;

    let mut tx = pool.begin().await?;
    let category: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE id = ?1")
        .bind(new_question.category)
        .fetch_optional(&mut *tx)
        .await?;
    if category.is_none() {
        return Err(DbError::Validation(format!(
            "category {} does not exist",
            new_question.category
        )));
    }

    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question)
    .bind(answer)
    .bind(new_question.category)
    .bind(new_question.difficulty)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();
    tx.commit().await?;

    Ok(id)
}

pub async fn delete_question(pool: &SqlitePool, id: i64) -> DbResult<()> {
    let mut conn = pool.acquire().await?;

    let deleted = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?
    .rows_affected();
    if deleted == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Picks a random question outside `exclude`, optionally within one category.
pub async fn get_random_question(
    pool: &SqlitePool,
    category: Option<i64>,
    exclude: &[i64],
) -> sqlx::Result<Option<Question>> {
    // the exclusion list is bound once as a JSON array, whatever its length
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE (?1 IS NULL OR category = ?1)
          AND id NOT IN (SELECT value FROM json_each(?2))
        ORDER BY RANDOM()
        LIMIT 1
        "#,
    )
    .bind(category)
    .bind(Json(exclude))
    .fetch_optional(pool)
    .await
}

/// Inserts or overwrites questions by id in a single transaction.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}
