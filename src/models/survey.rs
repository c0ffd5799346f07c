//! Survey and question models.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A multiple-choice question embedded in a survey.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    /// Question text; also the key respondents answer under.
    #[serde(alias = "question")]
    pub text: String,
    pub options: Vec<String>,
}

/// A generated questionnaire as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Survey {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    /// Prompt the survey was generated from
    pub prompt: String,
    /// Unix seconds
    pub created_at: i64,
    pub public_url: String,
}

/// Attributes for a survey that has not been stored yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSurvey {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub prompt: String,
}

impl NewSurvey {
    /// Check the structural rules a survey must satisfy before it is stored.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Survey title is required".to_string()));
        }
        if self.questions.is_empty() {
            return Err(AppError::Validation(
                "Survey must contain at least one question".to_string(),
            ));
        }

        let mut seen_questions = HashSet::new();
        for (index, question) in self.questions.iter().enumerate() {
            let number = index + 1;
            if question.text.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "Question {} has no text",
                    number
                )));
            }
            if !seen_questions.insert(question.text.as_str()) {
                return Err(AppError::Validation(format!(
                    "Question text {:?} appears more than once",
                    question.text
                )));
            }
            if question.options.len() < 2 {
                return Err(AppError::Validation(format!(
                    "Question {} needs at least two options, got {}",
                    number,
                    question.options.len()
                )));
            }
            let distinct: HashSet<&str> = question.options.iter().map(String::as_str).collect();
            if distinct.len() != question.options.len() {
                return Err(AppError::Validation(format!(
                    "Question {} has duplicate options",
                    number
                )));
            }
        }

        Ok(())
    }
}

/// Request body for generating a survey from a prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSurveyRequest {
    #[serde(default)]
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, options: &[&str]) -> Question {
        Question {
            text: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    fn pulse_check() -> NewSurvey {
        NewSurvey {
            title: "Pulse Check".to_string(),
            description: String::new(),
            questions: vec![question(
                "How satisfied are you?",
                &["Low", "Medium", "High"],
            )],
            prompt: "team mood".to_string(),
        }
    }

    #[test]
    fn test_valid_survey_passes() {
        assert!(pulse_check().validate().is_ok());
    }

    #[test]
    fn test_empty_questions_rejected() {
        let mut survey = pulse_check();
        survey.questions.clear();
        assert!(matches!(survey.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut survey = pulse_check();
        survey.title = "   ".to_string();
        assert!(matches!(survey.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_single_option_rejected() {
        let mut survey = pulse_check();
        survey.questions.push(question("Anything else?", &["No"]));
        let err = survey.validate().unwrap_err();
        assert!(err.to_string().contains("Question 2"));
    }

    #[test]
    fn test_duplicate_options_rejected() {
        let mut survey = pulse_check();
        survey.questions[0].options = vec!["Yes".into(), "Yes".into()];
        assert!(matches!(survey.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_duplicate_question_text_rejected() {
        let mut survey = pulse_check();
        survey
            .questions
            .push(question("How satisfied are you?", &["Yes", "No"]));
        assert!(matches!(survey.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_question_accepts_either_text_key() {
        let a: Question = serde_json::from_str(r#"{"text": "Q?", "options": ["a", "b"]}"#).unwrap();
        let b: Question =
            serde_json::from_str(r#"{"question": "Q?", "options": ["a", "b"]}"#).unwrap();
        assert_eq!(a, b);
    }
}
