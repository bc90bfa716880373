use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use super::{reader, rules};
use crate::auth::session::Viewer;
use crate::errors::AppError;
use crate::models::response;
use crate::models::survey::{self, SurveyRef};

#[derive(Debug, Serialize)]
pub struct Submitted {
    pub success: bool,
    pub response_id: i64,
}

/// Validate and store one response.
///
/// The pre-check in `resolve_open` gives a clean AlreadySubmitted for the
/// common case; concurrent duplicates are stopped by the unique index and
/// surface as the same error.
pub async fn submit(
    pool: &PgPool,
    survey_ref: &SurveyRef,
    viewer: &Viewer,
    body: &Value,
    now: DateTime<Utc>,
) -> Result<Submitted, AppError> {
    let found = reader::resolve_open(pool, survey_ref, viewer, now).await?;
    let respondent = rules::effective_respondent(&found, viewer);

    let answers = rules::parse_answers(body)?;
    let questions = survey::find_questions(pool, found.id).await?;
    let prepared = rules::prepare_answers(&questions, answers)?;

    let response_id = response::create(pool, found.id, respondent, now, &prepared).await?;

    log::info!(
        "Stored response {} for survey {} ({} answers, respondent {:?})",
        response_id,
        found.id,
        prepared.len(),
        respondent
    );

    Ok(Submitted { success: true, response_id })
}
