use std::fmt;

use serde_json::{Map, Value};

use crate::ReviewStatus;

const HOMEWORKS: &str = "homeworks";
const HOMEWORK_NAME: &str = "homework_name";
const STATUS: &str = "status";
const CURRENT_DATE: &str = "current_date";

/// One submission entry that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRecord {
    pub name: String,
    pub status: ReviewStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDefect {
    NotAnObject,
    Missing,
    NotAString,
    UnknownStatus(String),
}

impl fmt::Display for RecordDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordDefect::NotAnObject => write!(f, "record is not an object"),
            RecordDefect::Missing => write!(f, "missing"),
            RecordDefect::NotAString => write!(f, "not a string"),
            RecordDefect::UnknownStatus(code) => write!(f, "unknown status {code:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("response is not a JSON object, got {0}")]
    MalformedResponse(&'static str),
    #[error("response has no {0:?} key")]
    MissingField(&'static str),
    #[error("{field:?} is not an {expected}, got {actual}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("homeworks list is empty")]
    EmptyResult,
    #[error("homework #{index} field {field:?}: {defect}")]
    InvalidRecord {
        index: usize,
        field: &'static str,
        defect: RecordDefect,
    },
}

/// Validate a raw status response and pull out its homework records.
///
/// Checks run in a fixed order and stop at the first violation; a failure
/// never carries the records that were valid before it.
pub fn extract_records(raw: &Value) -> Result<Vec<HomeworkRecord>, ValidationError> {
    let object = raw
        .as_object()
        .ok_or(ValidationError::MalformedResponse(json_kind(raw)))?;
    let homeworks = object
        .get(HOMEWORKS)
        .ok_or(ValidationError::MissingField(HOMEWORKS))?;
    let items = homeworks.as_array().ok_or(ValidationError::WrongType {
        field: HOMEWORKS,
        expected: "array",
        actual: json_kind(homeworks),
    })?;
    if items.is_empty() {
        return Err(ValidationError::EmptyResult);
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_record(index, item))
        .collect()
}

/// Server-reported cursor for the next fetch, if the response carries one.
pub fn current_date(raw: &Value) -> Option<i64> {
    raw.get(CURRENT_DATE).and_then(Value::as_i64)
}

fn parse_record(index: usize, item: &Value) -> Result<HomeworkRecord, ValidationError> {
    let fields = item.as_object().ok_or(ValidationError::InvalidRecord {
        index,
        field: HOMEWORKS,
        defect: RecordDefect::NotAnObject,
    })?;

    let name = string_field(index, fields, HOMEWORK_NAME)?;
    let code = string_field(index, fields, STATUS)?;
    let status =
        ReviewStatus::from_code(code).map_err(|unknown| ValidationError::InvalidRecord {
            index,
            field: STATUS,
            defect: RecordDefect::UnknownStatus(unknown.0),
        })?;

    Ok(HomeworkRecord {
        name: name.to_string(),
        status,
    })
}

fn string_field<'a>(
    index: usize,
    fields: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    let defect = match fields.get(field) {
        Some(Value::String(text)) => return Ok(text),
        Some(_) => RecordDefect::NotAString,
        None => RecordDefect::Missing,
    };
    Err(ValidationError::InvalidRecord {
        index,
        field,
        defect,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
