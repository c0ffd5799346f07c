//! Survey response models.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Question text mapped to the selected option, in submission order.
pub type Answers = IndexMap<String, String>;

/// One respondent's submission to one survey.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SurveyResponse {
    pub id: String,
    pub survey_id: String,
    pub answers: Answers,
    /// Unix seconds
    pub submitted_at: i64,
}

/// Request body for submitting a response.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponseRequest {
    #[serde(default)]
    pub responses: Answers,
}

/// Responses recorded under one survey identity.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseList {
    pub survey_id: String,
    pub responses: Vec<SurveyResponse>,
}
