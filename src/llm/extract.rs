//! Best-effort extraction of JSON objects from completion text.
//!
//! Completions often wrap the object in prose or a Markdown code fence. These
//! functions are pure so they can be exercised with literal fixtures.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::{NewSurvey, Question};

/// Title used when the completion omits one.
pub const DEFAULT_SURVEY_TITLE: &str = "AI Survey";

static FENCED_OBJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```json\s*(\{.*\})\s*```").expect("fenced JSON pattern is valid")
});

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no JSON object found in completion")]
    NoJsonObject,
    #[error("completion contains malformed JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("completion has no \"questions\" list")]
    MissingQuestions,
    #[error("completion does not describe a survey: {0}")]
    InvalidStructure(String),
}

impl ParseError {
    /// Convert into a collaborator error carrying the offending completion.
    pub fn into_app_error(self, raw: &str) -> AppError {
        AppError::collaborator(self.to_string(), Some(raw.to_string()))
    }
}

/// Survey shape produced by the generation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParsedSurvey {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

impl ParsedSurvey {
    pub fn into_new_survey(self, prompt: &str) -> NewSurvey {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SURVEY_TITLE.to_string());
        NewSurvey {
            title,
            description: self.description.unwrap_or_default(),
            questions: self.questions,
            prompt: prompt.to_string(),
        }
    }
}

/// Pull the first JSON object out of free text.
///
/// A fenced ```` ```json ```` block wins; otherwise everything between the
/// first `{` and the last `}` is tried.
pub fn extract_json(text: &str) -> Result<Map<String, Value>, ParseError> {
    if let Some(captures) = FENCED_OBJECT.captures(text) {
        if let Ok(Value::Object(object)) = serde_json::from_str(&captures[1]) {
            return Ok(object);
        }
    }

    let start = text.find('{').ok_or(ParseError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(ParseError::NoJsonObject)?;
    if end < start {
        return Err(ParseError::NoJsonObject);
    }

    let value: Value = serde_json::from_str(&text[start..=end]).map_err(ParseError::InvalidJson)?;
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(ParseError::NoJsonObject),
    }
}

/// Parse a generated survey out of completion text.
pub fn parse_survey(text: &str) -> Result<ParsedSurvey, ParseError> {
    let object = extract_json(text)?;
    if !object.contains_key("questions") {
        return Err(ParseError::MissingQuestions);
    }
    serde_json::from_value(Value::Object(object))
        .map_err(|e| ParseError::InvalidStructure(e.to_string()))
}

/// Parse an analysis payload; any JSON object is accepted as-is.
pub fn parse_analysis(text: &str) -> Result<Value, ParseError> {
    extract_json(text).map(Value::Object)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SURVEY_JSON: &str = r#"{"title": "Pulse Check", "description": "Mood", "questions": [{"question": "How satisfied are you?", "options": ["Low", "Medium", "High"]}]}"#;

    #[test]
    fn test_plain_object() {
        let object = extract_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(Value::Object(object), json!({"a": 1}));
    }

    #[test]
    fn test_fenced_block_with_prose() {
        let text = format!(
            "Sure! Here is your survey:\n```json\n{}\n```\nLet me know if you need changes.",
            SURVEY_JSON
        );
        let survey = parse_survey(&text).unwrap();
        assert_eq!(survey.title.as_deref(), Some("Pulse Check"));
        assert_eq!(survey.questions[0].text, "How satisfied are you?");
    }

    #[test]
    fn test_unlabelled_fence_falls_back_to_braces() {
        let text = format!("```\n{}\n```", SURVEY_JSON);
        assert!(parse_survey(&text).is_ok());
    }

    #[test]
    fn test_malformed_fence_and_braces_is_invalid_json() {
        let text = "```json\n{\"a\": 1,}\n``` and also {\"b\": 2}";
        let err = extract_json(text).unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
    }

    #[test]
    fn test_object_inside_prose() {
        let object = extract_json("intro {\"b\": {\"c\": 2}} outro").unwrap();
        assert_eq!(object["b"]["c"], 2);
    }

    #[test]
    fn test_no_object() {
        assert!(matches!(
            extract_json("I cannot help with that."),
            Err(ParseError::NoJsonObject)
        ));
        assert!(matches!(extract_json("} backwards {"), Err(ParseError::NoJsonObject)));
    }

    #[test]
    fn test_missing_questions() {
        assert!(matches!(
            parse_survey(r#"{"title": "Empty"}"#),
            Err(ParseError::MissingQuestions)
        ));
    }

    #[test]
    fn test_malformed_question() {
        assert!(matches!(
            parse_survey(r#"{"questions": [{"options": ["a", "b"]}]}"#),
            Err(ParseError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_defaults_applied() {
        let parsed = parse_survey(r#"{"questions": [{"text": "Q?", "options": ["a", "b"]}]}"#)
            .unwrap()
            .into_new_survey("a prompt");
        assert_eq!(parsed.title, DEFAULT_SURVEY_TITLE);
        assert_eq!(parsed.description, "");
        assert_eq!(parsed.prompt, "a prompt");
    }

    #[test]
    fn test_parse_analysis_keeps_payload() {
        let value = parse_analysis(
            "Analysis: {\"sentiment\": \"positive\", \"themes\": [\"speed\"]}",
        )
        .unwrap();
        assert_eq!(value, json!({"sentiment": "positive", "themes": ["speed"]}));
    }

    #[test]
    fn test_into_app_error_preserves_raw_text() {
        let err = ParseError::NoJsonObject.into_app_error("nope");
        match err {
            AppError::Collaborator { raw, .. } => assert_eq!(raw.as_deref(), Some("nope")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
