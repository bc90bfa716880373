//! Pure checks shared by the reader, the collector and the template manager.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use crate::auth::session::Viewer;
use crate::errors::AppError;
use crate::models::question::{self, Question, QuestionType};
use crate::models::response::{AnswerInput, AnswerValue, NewAnswer, SelectedOptions};
use crate::models::survey::Survey;
use crate::models::template::NewTemplate;

const MAX_TITLE_LEN: usize = 200;

/// Inclusive bounds of a Scale answer.
pub const SCALE_MIN: i32 = 1;
pub const SCALE_MAX: i32 = 5;

/// Unavailable when the survey is inactive or `now` falls outside its window.
pub fn check_availability(survey: &Survey, now: DateTime<Utc>) -> Result<(), AppError> {
    if !survey.is_active {
        return Err(AppError::Unavailable(format!(
            "Survey '{}' is closed or inactive",
            survey.title
        )));
    }
    if let Some(start) = survey.start_at {
        if now < start {
            return Err(AppError::Unavailable(format!(
                "Survey '{}' opens at {}",
                survey.title,
                start.to_rfc3339()
            )));
        }
    }
    if let Some(end) = survey.end_at {
        if now > end {
            return Err(AppError::Unavailable(format!(
                "Survey '{}' closed at {}",
                survey.title,
                end.to_rfc3339()
            )));
        }
    }
    Ok(())
}

/// Guests may only see and answer anonymous surveys.
pub fn check_visibility(survey: &Survey, viewer: &Viewer) -> Result<(), AppError> {
    if !survey.is_anonymous && viewer.is_guest() {
        return Err(AppError::AuthenticationRequired(
            "Please sign in to take this survey".to_string(),
        ));
    }
    Ok(())
}

/// Identity recorded on a response: none for anonymous surveys.
pub fn effective_respondent(survey: &Survey, viewer: &Viewer) -> Option<i64> {
    if survey.is_anonymous {
        None
    } else {
        viewer.user_id()
    }
}

/// Parse the `answers` field of a submission body.
///
/// `answers` is either a JSON array or a string holding one. Every record must
/// be an object carrying a question reference under `question` (or
/// `question_link`), as a number or a numeric string.
pub fn parse_answers(body: &Value) -> Result<Vec<AnswerInput>, AppError> {
    let raw = body
        .get("answers")
        .ok_or_else(|| AppError::InvalidPayload("missing 'answers'".to_string()))?;

    let decoded;
    let list = match raw {
        Value::String(s) => {
            decoded = serde_json::from_str::<Value>(s)
                .map_err(|e| AppError::InvalidPayload(format!("answers is not valid JSON: {e}")))?;
            &decoded
        }
        other => other,
    };

    let records = match list {
        Value::Array(items) if !items.is_empty() => items,
        _ => {
            return Err(AppError::InvalidPayload(
                "answers must be a non-empty list".to_string(),
            ));
        }
    };

    records
        .iter()
        .enumerate()
        .map(|(pos, record)| parse_record(pos + 1, record))
        .collect()
}

fn parse_record(pos: usize, record: &Value) -> Result<AnswerInput, AppError> {
    let obj = record
        .as_object()
        .ok_or_else(|| AppError::InvalidPayload(format!("answer #{pos} is not an object")))?;

    let reference = obj
        .get("question")
        .or_else(|| obj.get("question_link"))
        .filter(|v| !v.is_null())
        .ok_or_else(|| AppError::InvalidPayload(format!("answer #{pos} has no question")))?;

    let question_id = match reference {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| AppError::InvalidPayload(format!("answer #{pos} has an invalid question reference")))?;

    let value: AnswerValue = serde_json::from_value(record.clone())
        .map_err(|e| AppError::InvalidPayload(format!("answer #{pos}: {e}")))?;

    Ok(AnswerInput { question_id, value })
}

/// Match answers to the survey's questions, check each value against the
/// question's declared type, enforce required questions and normalize values
/// for storage.
///
/// ValidationFailed when an answer points at a question outside the survey,
/// carries a value of the wrong kind, or a required question has no answer.
/// InvalidPayload when a question is answered twice.
pub fn prepare_answers(questions: &[Question], answers: Vec<AnswerInput>) -> Result<Vec<NewAnswer>, AppError> {
    let by_id: HashMap<i64, &Question> = questions.iter().map(|q| (q.id, q)).collect();

    let mut seen = HashSet::new();
    // Questions with a usable value, or one already reported as invalid.
    let mut settled = HashSet::new();
    let mut errors = Vec::new();
    let mut prepared = Vec::with_capacity(answers.len());

    for answer in answers {
        if !seen.insert(answer.question_id) {
            return Err(AppError::InvalidPayload(format!(
                "question {} is answered more than once",
                answer.question_id
            )));
        }
        let Some(q) = by_id.get(&answer.question_id) else {
            errors.push(format!("Question {} does not belong to this survey", answer.question_id));
            continue;
        };
        match normalize(q, answer.value) {
            Ok(normalized) => {
                if has_value(&normalized) {
                    settled.insert(q.id);
                }
                prepared.push(normalized);
            }
            Err(err) => {
                settled.insert(q.id);
                errors.push(err);
            }
        }
    }

    for q in questions.iter().filter(|q| q.required) {
        if !settled.contains(&q.id) {
            errors.push(format!("Question '{}' is required", q.text));
        }
    }

    if !errors.is_empty() {
        return Err(AppError::ValidationFailed(errors));
    }

    prepared.sort_by_key(|a| a.idx);
    Ok(prepared)
}

/// Payload field that carries the value for a question type.
fn value_field(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::Text => "answer_text",
        QuestionType::SingleChoice | QuestionType::MultipleChoice => "selected_options",
        QuestionType::Scale => "scale_value",
        QuestionType::Date => "answer_date",
    }
}

fn normalize(q: &Question, value: AnswerValue) -> Result<NewAnswer, String> {
    let AnswerValue {
        answer_text,
        selected_options,
        scale_value,
        answer_date,
    } = value;

    let expected = value_field(q.question_type);
    let present = [
        ("answer_text", answer_text.is_some()),
        ("selected_options", selected_options.is_some()),
        ("scale_value", scale_value.is_some()),
        ("answer_date", answer_date.is_some()),
    ];
    if let Some((field, _)) = present.iter().find(|(field, set)| *set && *field != expected) {
        return Err(format!(
            "Question '{}' ({}) is answered with {expected}, not {field}",
            q.text, q.question_type
        ));
    }

    let mut answer = NewAnswer {
        question_id: q.id,
        idx: q.idx,
        question_text: q.text.clone(),
        answer_text: None,
        selected_options: None,
        scale_value: None,
        answer_date: None,
    };

    match q.question_type {
        QuestionType::Text => {
            answer.answer_text = answer_text.filter(|t| !t.trim().is_empty());
        }
        QuestionType::SingleChoice | QuestionType::MultipleChoice => {
            let labels = match selected_options {
                Some(selected) => selected_labels(q, selected)?,
                None => Vec::new(),
            };
            if !labels.is_empty() {
                answer.selected_options = Some(question::join_list(&labels));
            }
        }
        QuestionType::Scale => {
            if let Some(v) = scale_value {
                if !(SCALE_MIN..=SCALE_MAX).contains(&v) {
                    return Err(format!(
                        "Question '{}' takes a value from {SCALE_MIN} to {SCALE_MAX}, got {v}",
                        q.text
                    ));
                }
            }
            answer.scale_value = scale_value;
        }
        QuestionType::Date => answer.answer_date = answer_date,
    }
    Ok(answer)
}

/// Selected labels, trimmed and de-duplicated. Every label must be one of the
/// question's options; Single Choice takes at most one.
pub fn selected_labels(q: &Question, selected: SelectedOptions) -> Result<Vec<String>, String> {
    let raw = match selected {
        SelectedOptions::Many(labels) => labels,
        SelectedOptions::One(label) => vec![label],
    };

    let mut labels: Vec<String> = Vec::new();
    for label in &raw {
        let label = label.trim();
        if label.is_empty() || labels.iter().any(|l| l == label) {
            continue;
        }
        if !q.options.iter().any(|o| o == label) {
            return Err(format!("'{label}' is not an option of question '{}'", q.text));
        }
        labels.push(label.to_string());
    }

    if q.question_type == QuestionType::SingleChoice && labels.len() > 1 {
        return Err(format!("Question '{}' accepts a single option", q.text));
    }
    Ok(labels)
}

fn has_value(answer: &NewAnswer) -> bool {
    answer.answer_text.is_some()
        || answer.selected_options.is_some()
        || answer.scale_value.is_some()
        || answer.answer_date.is_some()
}

/// start must not be after end when both are given.
pub fn check_window(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<(), AppError> {
    match (start, end) {
        (Some(s), Some(e)) if s > e => Err(AppError::ValidationFailed(vec![
            "Start must not be after end".to_string(),
        ])),
        _ => Ok(()),
    }
}

pub fn check_title(title: &str) -> Option<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Some("Title is required".to_string());
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Some(format!("Title must be at most {MAX_TITLE_LEN} characters"));
    }
    None
}

/// Validate a template definition before it is stored.
pub fn validate_new_template(new: &NewTemplate) -> Result<(), AppError> {
    let mut errors = Vec::new();
    errors.extend(check_title(&new.title));
    if new.questions.is_empty() {
        errors.push("At least one question is required".to_string());
    }
    for (pos, q) in new.questions.iter().enumerate() {
        let n = pos + 1;
        if q.text.trim().is_empty() {
            errors.push(format!("Question {n} has no text"));
        }
        if q.question_type.is_choice() && q.options.iter().all(|o| o.trim().is_empty()) {
            errors.push(format!("Question {n} ({}) needs at least one option", q.question_type));
        }
        if q.options.iter().any(|o| o.contains(question::LIST_DELIMITER)) {
            errors.push(format!("Question {n} has an option containing a line break"));
        }
        if q.question_type == QuestionType::Scale && !q.options.is_empty() {
            errors.push(format!("Question {n} (Scale) takes no options"));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationFailed(errors))
    }
}
