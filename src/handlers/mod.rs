pub mod auth_handlers;
pub mod survey_handlers;
pub mod template_handlers;

use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

use crate::errors::{AppError, ErrorBody};

/// CSRF protection for mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests that don't carry `Content-Type: application/json`.
/// Browsers cannot send cross-origin JSON with cookies through a plain form post,
/// so the header check stands in for a token. GET requests pass through.
pub async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = ErrorBody {
                success: false,
                error: "invalid_payload",
                message: "Content-Type must be application/json for mutation requests".to_string(),
            };
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Malformed JSON bodies become structured InvalidPayload errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| AppError::InvalidPayload(err.to_string()).into())
}

/// Unparseable path segments (`/api/surveys/abc`) are reported as NotFound.
fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, req| AppError::NotFound(format!("{} ({err})", req.path())).into())
}

/// Register every route. Shared by `main` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    cfg.app_data(path_config());
    cfg.service(
        web::scope("/api")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("/login", web::post().to(auth_handlers::login))
            .route("/logout", web::post().to(auth_handlers::logout))
            .route("/me", web::get().to(auth_handlers::me))
            .route("/surveys", web::get().to(survey_handlers::list))
            .route("/surveys/{id}", web::get().to(survey_handlers::read))
            .route("/surveys/{id}/responses", web::post().to(survey_handlers::submit))
            .route("/templates", web::get().to(template_handlers::list))
            .route("/templates", web::post().to(template_handlers::create))
            .route("/templates/{id}", web::get().to(template_handlers::read))
            .route("/templates/{id}/publish", web::post().to(template_handlers::publish))
            .route("/admin/surveys", web::get().to(template_handlers::list_surveys)),
    );
    cfg.service(
        web::scope("/s")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("/{slug}", web::get().to(survey_handlers::read_by_slug))
            .route("/{slug}/responses", web::post().to(survey_handlers::submit_by_slug)),
    );
}
