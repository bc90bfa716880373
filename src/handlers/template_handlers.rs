use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::session::Viewer;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::template::NewTemplate;
use crate::surveys::publisher::{self, PublishRequest};
use crate::surveys::templates;

/// GET /api/templates - Templates with question counts and published links.
pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let viewer = Viewer::from_session(&session)?;
    let items = templates::list(&pool, &viewer).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/templates/{id}
pub async fn read(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let viewer = Viewer::from_session(&session)?;
    let detail = templates::get(&pool, &viewer, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// POST /api/templates - Create a template with its questions.
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<NewTemplate>,
) -> Result<HttpResponse, AppError> {
    let viewer = Viewer::from_session(&session)?;
    let id = templates::create(&pool, &viewer, &body).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "id": id,
    })))
}

/// POST /api/templates/{id}/publish - Publish a template as a survey instance.
pub async fn publish(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<PublishRequest>,
) -> Result<HttpResponse, AppError> {
    let viewer = Viewer::from_session(&session)?;
    let published =
        publisher::publish(&pool, &viewer, path.into_inner(), &body, &config.public_url).await?;
    Ok(HttpResponse::Created().json(published))
}

/// GET /api/admin/surveys - Every published instance with response counts.
pub async fn list_surveys(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let viewer = Viewer::from_session(&session)?;
    let items = crate::surveys::catalog::list_all(&pool, &viewer).await?;
    Ok(HttpResponse::Ok().json(items))
}
