use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::models::question::Question;

/// How a caller addresses a published survey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyRef {
    Id(i64),
    Slug(String),
}

impl fmt::Display for SurveyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyRef::Id(id) => write!(f, "#{id}"),
            SurveyRef::Slug(slug) => write!(f, "'{slug}'"),
        }
    }
}

/// Catalog entry.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SurveyListItem {
    pub id: i64,
    pub title: String,
    pub is_anonymous: bool,
}

/// Published survey instance without its questions.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Survey {
    pub id: i64,
    pub template_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub is_anonymous: bool,
    pub is_active: bool,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub slug: String,
}

/// What a respondent receives when opening a survey.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_anonymous: bool,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub slug: String,
    pub questions: Vec<Question>,
}

impl SurveyDetail {
    pub fn new(survey: Survey, questions: Vec<Question>) -> Self {
        SurveyDetail {
            id: survey.id,
            title: survey.title,
            description: survey.description,
            is_anonymous: survey.is_anonymous,
            start_at: survey.start_at,
            end_at: survey.end_at,
            slug: survey.slug,
            questions,
        }
    }
}

/// Administrative overview row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminSurveyItem {
    pub id: i64,
    pub template_id: Option<i64>,
    pub title: String,
    pub is_anonymous: bool,
    pub is_active: bool,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub slug: String,
    pub response_count: i64,
}

/// Data for a new instance published from a template.
#[derive(Debug, Clone)]
pub struct NewInstance {
    pub template_id: i64,
    pub title: String,
    pub description: String,
    pub is_anonymous: bool,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub slug: String,
    pub created_by: Option<i64>,
}
