use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::types::*;

/// Whether `respondent_id` already answered the instance.
pub async fn exists_for_respondent(pool: &PgPool, instance_id: i64, respondent_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM survey_responses WHERE instance_id = $1 AND respondent_id = $2)",
    )
    .bind(instance_id)
    .bind(respondent_id)
    .fetch_one(pool)
    .await
}

/// Insert a response and all its answers atomically, returning the response id.
/// A second response from the same respondent fails on the
/// `survey_responses_one_per_respondent` index.
pub async fn create(
    pool: &PgPool,
    instance_id: i64,
    respondent_id: Option<i64>,
    submitted_at: DateTime<Utc>,
    answers: &[NewAnswer],
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let response_id: i64 = sqlx::query_scalar(
        "INSERT INTO survey_responses (instance_id, respondent_id, submitted_at) \
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(instance_id)
    .bind(respondent_id)
    .bind(submitted_at)
    .fetch_one(&mut *tx)
    .await?;

    for a in answers {
        sqlx::query(
            "INSERT INTO survey_answers \
                 (response_id, question_id, idx, question_text, answer_text, selected_options, scale_value, answer_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(response_id)
        .bind(a.question_id)
        .bind(a.idx)
        .bind(&a.question_text)
        .bind(&a.answer_text)
        .bind(&a.selected_options)
        .bind(a.scale_value)
        .bind(a.answer_date)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(response_id)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<ResponseRecord>, sqlx::Error> {
    sqlx::query_as::<_, ResponseRecord>(
        "SELECT id, instance_id, respondent_id, submitted_at FROM survey_responses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Answers of a response in question order.
pub async fn find_answers(pool: &PgPool, response_id: i64) -> Result<Vec<NewAnswer>, sqlx::Error> {
    sqlx::query_as::<_, NewAnswer>(
        "SELECT COALESCE(question_id, 0) AS question_id, idx, question_text, answer_text, \
                selected_options, scale_value, answer_date \
         FROM survey_answers WHERE response_id = $1 ORDER BY idx, id",
    )
    .bind(response_id)
    .fetch_all(pool)
    .await
}
