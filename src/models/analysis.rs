//! Analysis models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Answers;

/// A standalone analysis of one free-text input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndividualAnalysis {
    pub id: String,
    pub text: String,
    /// Opaque payload from the analysis collaborator
    pub analysis: Value,
    /// Unix seconds
    pub created_at: i64,
}

/// Request body for analysing a single free-text response.
#[derive(Debug, Clone, Deserialize)]
pub struct IndividualAnalysisRequest {
    #[serde(default)]
    pub response: String,
}

/// Aggregated analysis over all responses of a survey; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyAnalysis {
    pub survey_id: String,
    pub analysis: Value,
    pub raw_responses: Vec<Answers>,
}
