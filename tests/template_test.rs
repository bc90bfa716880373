//! Template manager, publisher gates and the admin overview.

mod common;

use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::PgPool;

use common::*;
use eva_survey::auth::session::Viewer;
use eva_survey::errors::AppError;
use eva_survey::models::permission;
use eva_survey::models::question::QuestionType;
use eva_survey::models::survey::SurveyRef;
use eva_survey::models::template::NewTemplate;
use eva_survey::surveys::publisher::{self, PublishRequest};
use eva_survey::surveys::{catalog, collector, reader, templates};

#[sqlx::test(migrator = "eva_survey::db::MIGRATOR")]
async fn test_create_and_list_templates(pool: PgPool) {
    let admin = admin_viewer(&pool, "tpl_admin").await;

    let first = templates::create(&pool, &admin, &two_question_template("Onboarding")).await.unwrap();
    let second = templates::create(&pool, &admin, &two_question_template("Exit interview")).await.unwrap();
    assert!(second > first);

    let list = templates::list(&pool, &admin).await.unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|t| t.question_count == 2 && t.published.is_empty()));
    let titles: Vec<&str> = list.iter().map(|t| t.title.as_str()).collect();
    assert!(titles.contains(&"Onboarding"));
    assert!(titles.contains(&"Exit interview"));

    let detail = templates::get(&pool, &admin, first).await.unwrap();
    assert_eq!(detail.title, "Onboarding");
    assert_eq!(detail.questions.len(), 2);
    assert_eq!(detail.questions[0].idx, 1);
    assert!(detail.questions[0].required);
    assert_eq!(detail.questions[1].options, vec!["Red", "Green", "Blue"]);
}

#[sqlx::test(migrator = "eva_survey::db::MIGRATOR")]
async fn test_survey_manager_role_is_enough(pool: PgPool) {
    let id = create_user(&pool, "manager", &["survey_manager"]).await;
    let manager = viewer_for(&pool, id).await;

    let template_id = templates::create(&pool, &manager, &two_question_template("Managed")).await.unwrap();
    let published = publisher::publish(&pool, &manager, template_id, &PublishRequest::default(), PUBLIC_URL)
        .await
        .unwrap();
    assert!(published.success);
}

#[sqlx::test(migrator = "eva_survey::db::MIGRATOR")]
async fn test_non_admin_is_denied(pool: PgPool) {
    let admin = admin_viewer(&pool, "deny_admin").await;
    let template_id = templates::create(&pool, &admin, &two_question_template("Gated")).await.unwrap();

    let respondent = respondent_viewer(&pool, "deny_user").await;
    for viewer in [respondent, Viewer::guest()] {
        assert!(matches!(templates::list(&pool, &viewer).await, Err(AppError::PermissionDenied(_))));
        assert!(matches!(
            templates::get(&pool, &viewer, template_id).await,
            Err(AppError::PermissionDenied(_))
        ));
        assert!(matches!(
            templates::create(&pool, &viewer, &two_question_template("Nope")).await,
            Err(AppError::PermissionDenied(_))
        ));
        assert!(matches!(
            publisher::publish(&pool, &viewer, template_id, &PublishRequest::default(), PUBLIC_URL).await,
            Err(AppError::PermissionDenied(_))
        ));
        assert!(matches!(catalog::list_all(&pool, &viewer).await, Err(AppError::PermissionDenied(_))));
    }

    let instances: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM survey_instances")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(instances, 0);
}

#[sqlx::test(migrator = "eva_survey::db::MIGRATOR")]
async fn test_role_without_permission_is_denied(pool: PgPool) {
    sqlx::query("DELETE FROM role_permissions WHERE role_name = 'survey_manager' AND action = 'create'")
        .execute(&pool)
        .await
        .unwrap();
    let id = create_user(&pool, "reader_only", &["survey_manager"]).await;
    let manager = viewer_for(&pool, id).await;

    assert!(templates::list(&pool, &manager).await.is_ok());
    match templates::create(&pool, &manager, &two_question_template("No grant")).await {
        Err(AppError::PermissionDenied(code)) => assert_eq!(code, "survey_template.create"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[sqlx::test(migrator = "eva_survey::db::MIGRATOR")]
async fn test_invalid_template_is_rejected(pool: PgPool) {
    let admin = admin_viewer(&pool, "invalid_admin").await;

    let new = NewTemplate {
        title: "Choices".into(),
        description: String::new(),
        questions: vec![question("Pick", QuestionType::MultipleChoice, &[], true)],
    };
    assert!(matches!(
        templates::create(&pool, &admin, &new).await,
        Err(AppError::ValidationFailed(_))
    ));
    assert!(templates::list(&pool, &admin).await.unwrap().is_empty());
}

#[sqlx::test(migrator = "eva_survey::db::MIGRATOR")]
async fn test_publish_unknown_template_is_not_found(pool: PgPool) {
    let admin = admin_viewer(&pool, "nf_admin").await;

    let result = publisher::publish(&pool, &admin, 999_999, &PublishRequest::default(), PUBLIC_URL).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[sqlx::test(migrator = "eva_survey::db::MIGRATOR")]
async fn test_publish_rejects_inverted_window(pool: PgPool) {
    let admin = admin_viewer(&pool, "window_admin").await;
    let template_id = templates::create(&pool, &admin, &two_question_template("Window")).await.unwrap();

    let now = Utc::now();
    let req = PublishRequest {
        start_at: Some(now + Duration::days(2)),
        end_at: Some(now),
        ..PublishRequest::default()
    };
    let result = publisher::publish(&pool, &admin, template_id, &req, PUBLIC_URL).await;
    assert!(matches!(result, Err(AppError::ValidationFailed(_))));
    assert!(templates::get(&pool, &admin, template_id).await.unwrap().published.is_empty());
}

#[sqlx::test(migrator = "eva_survey::db::MIGRATOR")]
async fn test_each_publish_gets_its_own_slug_and_record(pool: PgPool) {
    let admin = admin_viewer(&pool, "multi_admin").await;
    let template_id = templates::create(&pool, &admin, &two_question_template("Quarterly")).await.unwrap();

    let q1 = publisher::publish(&pool, &admin, template_id, &PublishRequest::default(), PUBLIC_URL)
        .await
        .unwrap();
    let q2 = publisher::publish(&pool, &admin, template_id, &PublishRequest::default(), PUBLIC_URL)
        .await
        .unwrap();
    assert_ne!(q1.slug, q2.slug);
    assert_ne!(q1.instance_id, q2.instance_id);

    let summary = templates::list(&pool, &admin).await.unwrap();
    assert_eq!(summary[0].published.len(), 2);
}

#[sqlx::test(migrator = "eva_survey::db::MIGRATOR")]
async fn test_admin_overview_counts_responses(pool: PgPool) {
    let admin = admin_viewer(&pool, "overview_admin").await;
    let template_id = templates::create(&pool, &admin, &two_question_template("Counted")).await.unwrap();
    let req = PublishRequest { is_anonymous: true, ..PublishRequest::default() };
    let published = publisher::publish(&pool, &admin, template_id, &req, PUBLIC_URL).await.unwrap();

    let survey_ref = SurveyRef::Id(published.instance_id);
    let detail = reader::get(&pool, &survey_ref, &Viewer::guest(), Utc::now()).await.unwrap();
    let body = json!({"answers": [{"question": detail.questions[0].id, "answer_text": "hi"}]});
    for _ in 0..3 {
        collector::submit(&pool, &survey_ref, &Viewer::guest(), &body, Utc::now()).await.unwrap();
    }

    let overview = catalog::list_all(&pool, &admin).await.unwrap();
    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].response_count, 3);
    assert!(overview[0].is_active);
    assert_eq!(overview[0].template_id, Some(template_id));
}

#[sqlx::test(migrator = "eva_survey::db::MIGRATOR")]
async fn test_permission_without_admin_role_is_denied(pool: PgPool) {
    permission::grant(&pool, "respondent", "survey_template", "read").await.unwrap();
    let respondent = respondent_viewer(&pool, "granted_user").await;
    assert!(respondent.has_permission("survey_template.read"));

    assert!(matches!(templates::list(&pool, &respondent).await, Err(AppError::PermissionDenied(_))));
}

#[sqlx::test(migrator = "eva_survey::db::MIGRATOR")]
async fn test_publish_trims_title_and_description(pool: PgPool) {
    let admin = admin_viewer(&pool, "trim_admin").await;
    let template_id = templates::create(&pool, &admin, &two_question_template("Trimmed")).await.unwrap();
    let req = PublishRequest {
        title: Some("  Spring pulse  ".into()),
        description: Some("  Quarterly check-in \n".into()),
        is_anonymous: true,
        ..PublishRequest::default()
    };
    let published = publisher::publish(&pool, &admin, template_id, &req, PUBLIC_URL).await.unwrap();

    let detail = reader::get(&pool, &SurveyRef::Id(published.instance_id), &Viewer::guest(), Utc::now())
        .await
        .unwrap();
    assert_eq!(detail.title, "Spring pulse");
    assert_eq!(detail.description, "Quarterly check-in");
}

#[sqlx::test(migrator = "eva_survey::db::MIGRATOR")]
async fn test_option_with_line_break_is_rejected(pool: PgPool) {
    let admin = admin_viewer(&pool, "newline_admin").await;
    let new = NewTemplate {
        title: "Options".into(),
        description: String::new(),
        questions: vec![question("Pick", QuestionType::SingleChoice, &["Red\nBlue", "Green"], false)],
    };
    assert!(matches!(
        templates::create(&pool, &admin, &new).await,
        Err(AppError::ValidationFailed(_))
    ));
}
