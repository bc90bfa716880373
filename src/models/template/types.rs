use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::question::{NewQuestion, Question};

/// A published-survey record attached to a template.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PublishedSurvey {
    pub instance_id: i64,
    pub link: String,
    pub published_at: DateTime<Utc>,
}

/// Template as shown in the administrative list.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub question_count: i64,
    pub published: Vec<PublishedSurvey>,
}

/// Full template with ordered questions.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<Question>,
    pub published: Vec<PublishedSurvey>,
}

/// Request body for creating a template.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTemplate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<NewQuestion>,
}
