use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;

use crate::auth::session::Viewer;
use crate::errors::AppError;
use crate::models::survey::SurveyRef;
use crate::surveys::{catalog, collector, reader};

/// GET /api/surveys - Active surveys visible to the caller.
pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let viewer = Viewer::from_session(&session)?;
    let items = catalog::list(&pool, &viewer).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/surveys/{id} - Survey with ordered questions.
pub async fn read(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    read_ref(&pool, &session, SurveyRef::Id(path.into_inner())).await
}

/// GET /s/{slug} - Same as `read`, addressed by the public link.
pub async fn read_by_slug(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    read_ref(&pool, &session, SurveyRef::Slug(path.into_inner())).await
}

/// POST /api/surveys/{id}/responses - Submit answers.
pub async fn submit(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    submit_ref(&pool, &session, SurveyRef::Id(path.into_inner()), &body).await
}

/// POST /s/{slug}/responses - Submit answers through the public link.
pub async fn submit_by_slug(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    submit_ref(&pool, &session, SurveyRef::Slug(path.into_inner()), &body).await
}

async fn read_ref(pool: &PgPool, session: &Session, survey_ref: SurveyRef) -> Result<HttpResponse, AppError> {
    let viewer = Viewer::from_session(session)?;
    let detail = reader::get(pool, &survey_ref, &viewer, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "survey": detail,
    })))
}

async fn submit_ref(
    pool: &PgPool,
    session: &Session,
    survey_ref: SurveyRef,
    body: &Value,
) -> Result<HttpResponse, AppError> {
    let viewer = Viewer::from_session(session)?;
    let submitted = collector::submit(pool, &survey_ref, &viewer, body, Utc::now()).await?;
    Ok(HttpResponse::Created().json(submitted))
}
