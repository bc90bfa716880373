use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator used when a list (choice options, selected options) is stored as one column.
pub const LIST_DELIMITER: &str = "\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "Text")]
    Text,
    #[serde(rename = "Single Choice")]
    SingleChoice,
    #[serde(rename = "Multiple Choice")]
    MultipleChoice,
    #[serde(rename = "Scale")]
    Scale,
    #[serde(rename = "Date")]
    Date,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Text => "Text",
            QuestionType::SingleChoice => "Single Choice",
            QuestionType::MultipleChoice => "Multiple Choice",
            QuestionType::Scale => "Scale",
            QuestionType::Date => "Date",
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::MultipleChoice)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Text" => Ok(QuestionType::Text),
            "Single Choice" => Ok(QuestionType::SingleChoice),
            "Multiple Choice" => Ok(QuestionType::MultipleChoice),
            "Scale" => Ok(QuestionType::Scale),
            "Date" => Ok(QuestionType::Date),
            other => Err(format!("unknown question type '{other}'")),
        }
    }
}

/// A question owned by a template or by a published instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: i64,
    pub idx: i32,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub required: bool,
}

/// Raw question row; both question tables share these columns.
#[derive(sqlx::FromRow)]
pub(crate) struct QuestionRow {
    pub id: i64,
    pub idx: i32,
    pub question_text: String,
    pub question_type: String,
    pub options: String,
    pub is_required: bool,
}

impl TryFrom<QuestionRow> for Question {
    type Error = sqlx::Error;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let question_type = row
            .question_type
            .parse::<QuestionType>()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;
        Ok(Question {
            id: row.id,
            idx: row.idx,
            text: row.question_text,
            question_type,
            options: split_list(&row.options),
            required: row.is_required,
        })
    }
}

pub(crate) fn rows_to_questions(rows: Vec<QuestionRow>) -> Result<Vec<Question>, sqlx::Error> {
    rows.into_iter().map(Question::try_from).collect()
}

/// Question definition supplied when creating a template.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(LIST_DELIMITER)
}

pub fn split_list(stored: &str) -> Vec<String> {
    stored
        .split(LIST_DELIMITER)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_wire_names() {
        let t: QuestionType = serde_json::from_str("\"Multiple Choice\"").unwrap();
        assert_eq!(t, QuestionType::MultipleChoice);
        assert_eq!(serde_json::to_string(&QuestionType::SingleChoice).unwrap(), "\"Single Choice\"");
        assert_eq!("Scale".parse::<QuestionType>().unwrap(), QuestionType::Scale);
        assert!("Essay".parse::<QuestionType>().is_err());
    }

    #[test]
    fn list_storage_drops_blank_entries() {
        let stored = join_list(&["Red", "  ", " Green ", "Blue"]);
        assert_eq!(stored, "Red\nGreen\nBlue");
        assert_eq!(split_list(&stored), vec!["Red", "Green", "Blue"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn row_conversion_rejects_unknown_type() {
        let row = QuestionRow {
            id: 1,
            idx: 1,
            question_text: "Q".into(),
            question_type: "Essay".into(),
            options: String::new(),
            is_required: false,
        };
        assert!(Question::try_from(row).is_err());
    }
}
