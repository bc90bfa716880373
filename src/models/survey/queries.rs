use sqlx::{PgConnection, PgPool};

use super::types::*;
use crate::models::question::{self, Question, QuestionRow};

const SELECT_SURVEY: &str = "SELECT id, template_id, title, description, is_anonymous, is_active, \
                                    start_at, end_at, slug \
                             FROM survey_instances";

/// Active surveys, newest first. Non-anonymous ones are left out unless
/// `include_non_anonymous` is set.
pub async fn find_active(pool: &PgPool, include_non_anonymous: bool) -> Result<Vec<SurveyListItem>, sqlx::Error> {
    sqlx::query_as::<_, SurveyListItem>(
        "SELECT id, title, is_anonymous FROM survey_instances \
         WHERE is_active AND ($1 OR is_anonymous) \
         ORDER BY created_at DESC, id DESC",
    )
    .bind(include_non_anonymous)
    .fetch_all(pool)
    .await
}

/// Every instance with its response count, newest first.
pub async fn find_all_with_counts(pool: &PgPool) -> Result<Vec<AdminSurveyItem>, sqlx::Error> {
    sqlx::query_as::<_, AdminSurveyItem>(
        "SELECT s.id, s.template_id, s.title, s.is_anonymous, s.is_active, s.start_at, s.end_at, s.slug, \
                (SELECT COUNT(*) FROM survey_responses r WHERE r.instance_id = s.id) AS response_count \
         FROM survey_instances s \
         ORDER BY s.created_at DESC, s.id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn find(pool: &PgPool, survey_ref: &SurveyRef) -> Result<Option<Survey>, sqlx::Error> {
    match survey_ref {
        SurveyRef::Id(id) => {
            sqlx::query_as::<_, Survey>(&format!("{SELECT_SURVEY} WHERE id = $1"))
                .bind(id)
                .fetch_optional(pool)
                .await
        }
        SurveyRef::Slug(slug) => {
            sqlx::query_as::<_, Survey>(&format!("{SELECT_SURVEY} WHERE slug = $1"))
                .bind(slug)
                .fetch_optional(pool)
                .await
        }
    }
}

/// Questions of an instance ordered by idx ascending.
pub async fn find_questions(pool: &PgPool, instance_id: i64) -> Result<Vec<Question>, sqlx::Error> {
    let rows = sqlx::query_as::<_, QuestionRow>(
        "SELECT id, idx, question_text, question_type, options, is_required \
         FROM instance_questions WHERE instance_id = $1 ORDER BY idx, id",
    )
    .bind(instance_id)
    .fetch_all(pool)
    .await?;
    question::rows_to_questions(rows)
}

/// Insert an instance and copy every question of its template verbatim.
/// Returns the new instance id and the number of questions copied.
/// Must run inside the publishing transaction.
pub async fn create_from_template(conn: &mut PgConnection, new: &NewInstance) -> Result<(i64, u64), sqlx::Error> {
    let instance_id: i64 = sqlx::query_scalar(
        "INSERT INTO survey_instances \
             (template_id, title, description, is_anonymous, is_active, start_at, end_at, slug, created_by) \
         VALUES ($1, $2, $3, $4, TRUE, $5, $6, $7, $8) \
         RETURNING id",
    )
    .bind(new.template_id)
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.is_anonymous)
    .bind(new.start_at)
    .bind(new.end_at)
    .bind(&new.slug)
    .bind(new.created_by)
    .fetch_one(&mut *conn)
    .await?;

    let copied = sqlx::query(
        "INSERT INTO instance_questions \
             (instance_id, idx, question_text, question_type, options, is_required) \
         SELECT $1, idx, question_text, question_type, options, is_required \
         FROM template_questions WHERE template_id = $2 \
         ORDER BY idx",
    )
    .bind(instance_id)
    .bind(new.template_id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    Ok((instance_id, copied))
}
