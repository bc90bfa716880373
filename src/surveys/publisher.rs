use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::{rules, slug};
use crate::auth::access::require_survey_admin;
use crate::auth::session::Viewer;
use crate::config::build_survey_link;
use crate::errors::AppError;
use crate::models::survey::{self, NewInstance};
use crate::models::template;

/// Request body for publishing a template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishRequest {
    /// Falls back to the template title.
    #[serde(default)]
    pub title: Option<String>,
    /// Falls back to the template description.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "anonymous")]
    pub is_anonymous: bool,
}

#[derive(Debug, Serialize)]
pub struct Published {
    pub success: bool,
    pub link: String,
    pub slug: String,
    pub instance_id: i64,
    pub question_count: u64,
}

/// Publish a template as a new instance with a fresh slug.
///
/// The instance, its copied questions and the template's published record are
/// written in one transaction.
pub async fn publish(
    pool: &PgPool,
    viewer: &Viewer,
    template_id: i64,
    req: &PublishRequest,
    public_url: &str,
) -> Result<Published, AppError> {
    require_survey_admin(viewer, "survey_instance", "create")?;
    rules::check_window(req.start_at, req.end_at)?;
    if let Some(title) = &req.title {
        if let Some(err) = rules::check_title(title) {
            return Err(AppError::ValidationFailed(vec![err]));
        }
    }

    let mut tx = pool.begin().await?;

    let (template_title, template_description) = template::find_header(&mut tx, template_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Template #{template_id}")))?;

    let slug = slug::generate_slug();
    let link = build_survey_link(public_url, &slug);
    let new = NewInstance {
        template_id,
        title: req.title.as_deref().map(str::trim).unwrap_or(&template_title).to_string(),
        description: req
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or(&template_description)
            .to_string(),
        is_anonymous: req.is_anonymous,
        start_at: req.start_at,
        end_at: req.end_at,
        slug: slug.clone(),
        created_by: viewer.user_id(),
    };

    let (instance_id, question_count) = survey::create_from_template(&mut tx, &new).await?;
    template::append_published(&mut tx, template_id, instance_id, &link).await?;
    tx.commit().await?;

    log::info!(
        "Template {} published as survey {} ({} questions) by {}",
        template_id,
        instance_id,
        question_count,
        viewer.username().unwrap_or("unknown")
    );

    Ok(Published {
        success: true,
        link,
        slug,
        instance_id,
        question_count,
    })
}
