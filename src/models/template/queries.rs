use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;

use super::types::*;
use crate::models::question::{self, QuestionRow};

/// List every template with its question count and published records.
pub async fn find_all(pool: &PgPool) -> Result<Vec<TemplateSummary>, sqlx::Error> {
    #[derive(sqlx::FromRow)]
    struct Row {
        id: i64,
        title: String,
        description: String,
        question_count: i64,
    }

    let rows = sqlx::query_as::<_, Row>(
        "SELECT t.id, t.title, t.description, \
                (SELECT COUNT(*) FROM template_questions q WHERE q.template_id = t.id) AS question_count \
         FROM survey_templates t \
         ORDER BY t.created_at DESC, t.id DESC",
    )
    .fetch_all(pool)
    .await?;

    #[derive(sqlx::FromRow)]
    struct PublishedRow {
        template_id: i64,
        #[sqlx(flatten)]
        record: PublishedSurvey,
    }

    let published = sqlx::query_as::<_, PublishedRow>(
        "SELECT template_id, instance_id, link, published_at \
         FROM published_surveys ORDER BY published_at, id",
    )
    .fetch_all(pool)
    .await?;

    let mut by_template: HashMap<i64, Vec<PublishedSurvey>> = HashMap::new();
    for p in published {
        by_template.entry(p.template_id).or_default().push(p.record);
    }

    Ok(rows
        .into_iter()
        .map(|r| TemplateSummary {
            published: by_template.remove(&r.id).unwrap_or_default(),
            id: r.id,
            title: r.title,
            description: r.description,
            question_count: r.question_count,
        })
        .collect())
}

/// Find a template with its questions ordered by idx.
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<TemplateDetail>, sqlx::Error> {
    #[derive(sqlx::FromRow)]
    struct Row {
        id: i64,
        title: String,
        description: String,
        created_at: chrono::DateTime<chrono::Utc>,
    }

    let Some(row) = sqlx::query_as::<_, Row>(
        "SELECT id, title, description, created_at FROM survey_templates WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    let questions = find_questions(pool, id).await?;
    let published = find_published(pool, id).await?;

    Ok(Some(TemplateDetail {
        id: row.id,
        title: row.title,
        description: row.description,
        created_at: row.created_at,
        questions,
        published,
    }))
}

pub async fn find_questions(pool: &PgPool, template_id: i64) -> Result<Vec<question::Question>, sqlx::Error> {
    let rows = sqlx::query_as::<_, QuestionRow>(
        "SELECT id, idx, question_text, question_type, options, is_required \
         FROM template_questions WHERE template_id = $1 ORDER BY idx, id",
    )
    .bind(template_id)
    .fetch_all(pool)
    .await?;
    question::rows_to_questions(rows)
}

pub async fn find_published(pool: &PgPool, template_id: i64) -> Result<Vec<PublishedSurvey>, sqlx::Error> {
    sqlx::query_as::<_, PublishedSurvey>(
        "SELECT instance_id, link, published_at FROM published_surveys \
         WHERE template_id = $1 ORDER BY published_at, id",
    )
    .bind(template_id)
    .fetch_all(pool)
    .await
}

/// Title and description of a template, read inside an open transaction.
pub async fn find_header(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<(String, String)>, sqlx::Error> {
    sqlx::query_as::<_, (String, String)>(
        "SELECT title, description FROM survey_templates WHERE id = $1 FOR SHARE",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Insert a template and its questions in one transaction, returning the id.
/// Question idx follows list position, starting at 1.
pub async fn create(pool: &PgPool, new: &NewTemplate, created_by: Option<i64>) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let template_id: i64 = sqlx::query_scalar(
        "INSERT INTO survey_templates (title, description, created_by) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(new.title.trim())
    .bind(new.description.trim())
    .bind(created_by)
    .fetch_one(&mut *tx)
    .await?;

    for (pos, q) in new.questions.iter().enumerate() {
        sqlx::query(
            "INSERT INTO template_questions \
                 (template_id, idx, question_text, question_type, options, is_required) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(template_id)
        .bind(pos as i32 + 1)
        .bind(q.text.trim())
        .bind(q.question_type.as_str())
        .bind(question::join_list(&q.options))
        .bind(q.required)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(template_id)
}

/// Record that a template was published as `instance_id`.
pub async fn append_published(
    conn: &mut PgConnection,
    template_id: i64,
    instance_id: i64,
    link: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO published_surveys (template_id, instance_id, link) VALUES ($1, $2, $3)")
        .bind(template_id)
        .bind(instance_id)
        .bind(link)
        .execute(conn)
        .await?;
    Ok(())
}
