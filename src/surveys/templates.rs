use sqlx::PgPool;

use super::rules;
use crate::auth::access::require_survey_admin;
use crate::auth::session::Viewer;
use crate::errors::AppError;
use crate::models::template::{self, NewTemplate, TemplateDetail, TemplateSummary};

pub async fn list(pool: &PgPool, viewer: &Viewer) -> Result<Vec<TemplateSummary>, AppError> {
    require_survey_admin(viewer, "survey_template", "read")?;
    Ok(template::find_all(pool).await?)
}

pub async fn get(pool: &PgPool, viewer: &Viewer, id: i64) -> Result<TemplateDetail, AppError> {
    require_survey_admin(viewer, "survey_template", "read")?;
    template::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Template #{id}")))
}

/// Validate and store a new template, returning its id.
pub async fn create(pool: &PgPool, viewer: &Viewer, new: &NewTemplate) -> Result<i64, AppError> {
    require_survey_admin(viewer, "survey_template", "create")?;
    rules::validate_new_template(new)?;

    let id = template::create(pool, new, viewer.user_id()).await?;
    log::info!(
        "Template {} '{}' created with {} questions",
        id,
        new.title.trim(),
        new.questions.len()
    );
    Ok(id)
}
