use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::rules;
use crate::auth::session::Viewer;
use crate::errors::AppError;
use crate::models::response;
use crate::models::survey::{self, Survey, SurveyDetail, SurveyRef};

/// Resolve a survey the viewer may answer right now.
///
/// Checks run in order: existence, availability window, sign-in requirement
/// for non-anonymous surveys, then a prior response from the same user.
pub async fn resolve_open(
    pool: &PgPool,
    survey_ref: &SurveyRef,
    viewer: &Viewer,
    now: DateTime<Utc>,
) -> Result<Survey, AppError> {
    let found = survey::find(pool, survey_ref)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Survey {survey_ref}")))?;

    rules::check_availability(&found, now)?;
    rules::check_visibility(&found, viewer)?;

    if let Some(respondent) = rules::effective_respondent(&found, viewer) {
        if response::exists_for_respondent(pool, found.id, respondent).await? {
            return Err(AppError::AlreadySubmitted);
        }
    }

    Ok(found)
}

/// Survey metadata plus its questions ordered by idx.
pub async fn get(
    pool: &PgPool,
    survey_ref: &SurveyRef,
    viewer: &Viewer,
    now: DateTime<Utc>,
) -> Result<SurveyDetail, AppError> {
    let found = resolve_open(pool, survey_ref, viewer, now).await?;
    let questions = survey::find_questions(pool, found.id).await?;
    Ok(SurveyDetail::new(found, questions))
}
