use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// `selected_options` as sent by clients: a list of labels, or one label.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SelectedOptions {
    Many(Vec<String>),
    One(String),
}

/// Value fields of one answer record in a submission payload.
/// The question reference is read separately so a missing one can be reported.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnswerValue {
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default)]
    pub selected_options: Option<SelectedOptions>,
    #[serde(default)]
    pub scale_value: Option<i32>,
    #[serde(default, alias = "date_value")]
    pub answer_date: Option<NaiveDate>,
}

/// One parsed answer record.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerInput {
    pub question_id: i64,
    pub value: AnswerValue,
}

/// Answer normalized for storage.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct NewAnswer {
    pub question_id: i64,
    pub idx: i32,
    pub question_text: String,
    pub answer_text: Option<String>,
    pub selected_options: Option<String>,
    pub scale_value: Option<i32>,
    pub answer_date: Option<NaiveDate>,
}

/// Stored response header.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ResponseRecord {
    pub id: i64,
    pub instance_id: i64,
    pub respondent_id: Option<i64>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}
