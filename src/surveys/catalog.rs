use sqlx::PgPool;

use crate::auth::access::require_survey_admin;
use crate::auth::session::Viewer;
use crate::errors::AppError;
use crate::models::survey::{self, AdminSurveyItem, SurveyListItem};

/// Active surveys visible to the viewer. Guests only get anonymous ones.
pub async fn list(pool: &PgPool, viewer: &Viewer) -> Result<Vec<SurveyListItem>, AppError> {
    Ok(survey::find_active(pool, !viewer.is_guest()).await?)
}

/// Every published instance, active or not, with response counts.
pub async fn list_all(pool: &PgPool, viewer: &Viewer) -> Result<Vec<AdminSurveyItem>, AppError> {
    require_survey_admin(viewer, "survey_instance", "read")?;
    Ok(survey::find_all_with_counts(pool).await?)
}
