//! Survey store: keyed storage and filtered retrieval for surveys, responses
//! and individual analyses.
//!
//! Records are write-once. Every write is a single INSERT, so a reader never
//! observes a partially written record.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Answers, IndividualAnalysis, NewSurvey, Question, Survey, SurveyResponse};

/// Survey body as persisted in the `document` column.
#[derive(Serialize, Deserialize)]
struct SurveyDocument {
    title: String,
    description: String,
    questions: Vec<Question>,
}

/// Survey filter map as persisted in the `metadata` column.
#[derive(Serialize, Deserialize)]
struct SurveyMetadata {
    survey_id: String,
    title: String,
    prompt: String,
    public_url: String,
    created_at: i64,
}

#[derive(Serialize, Deserialize)]
struct ResponseMetadata {
    survey_id: String,
    timestamp: i64,
}

#[derive(Serialize, Deserialize)]
struct AnalysisMetadata {
    timestamp: i64,
    analysis: Value,
}

/// Store handle shared by all request handlers.
#[derive(Clone)]
pub struct SurveyStore {
    pool: SqlitePool,
    public_url: String,
}

impl SurveyStore {
    /// `public_url` is the base every survey's public link is built from.
    pub fn new(pool: SqlitePool, public_url: impl Into<String>) -> Self {
        Self {
            pool,
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Public link for a survey identity.
    pub fn public_url_for(&self, survey_id: &str) -> String {
        format!("{}/survey/{}", self.public_url, survey_id)
    }

    // ==================== SURVEY OPERATIONS ====================

    /// Validate and persist a new survey.
    pub async fn create_survey(&self, new: &NewSurvey) -> Result<Survey, AppError> {
        new.validate()?;

        let id = uuid::Uuid::new_v4().to_string();
        let created_at = Utc::now().timestamp();
        let public_url = self.public_url_for(&id);

        let document = serde_json::to_string(&SurveyDocument {
            title: new.title.clone(),
            description: new.description.clone(),
            questions: new.questions.clone(),
        })?;
        let metadata = serde_json::to_string(&SurveyMetadata {
            survey_id: id.clone(),
            title: new.title.clone(),
            prompt: new.prompt.clone(),
            public_url: public_url.clone(),
            created_at,
        })?;

        sqlx::query("INSERT INTO surveys (id, document, metadata, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&document)
            .bind(&metadata)
            .bind(created_at)
            .execute(&self.pool)
            .await?;

        tracing::info!(survey_id = %id, questions = new.questions.len(), "Survey created");

        Ok(Survey {
            id,
            title: new.title.clone(),
            description: new.description.clone(),
            questions: new.questions.clone(),
            prompt: new.prompt.clone(),
            created_at,
            public_url,
        })
    }

    /// Get a survey by ID.
    pub async fn get_survey(&self, id: &str) -> Result<Option<Survey>, AppError> {
        let row = sqlx::query("SELECT id, document, metadata FROM surveys WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(survey_from_row).transpose()
    }

    /// List all surveys, newest first; equal timestamps are ordered by ID.
    pub async fn list_surveys(&self) -> Result<Vec<Survey>, AppError> {
        let rows = sqlx::query(
            "SELECT id, document, metadata FROM surveys ORDER BY created_at DESC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(survey_from_row).collect()
    }

    // ==================== RESPONSE OPERATIONS ====================

    /// Record a response.
    ///
    /// The survey ID is not checked against the survey table; callers that
    /// care about existence look the survey up first.
    pub async fn add_response(
        &self,
        survey_id: &str,
        answers: &Answers,
    ) -> Result<SurveyResponse, AppError> {
        if answers.is_empty() {
            return Err(AppError::Validation("No responses provided".to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let submitted_at = Utc::now().timestamp();
        let document = serde_json::to_string(answers)?;
        let metadata = serde_json::to_string(&ResponseMetadata {
            survey_id: survey_id.to_string(),
            timestamp: submitted_at,
        })?;

        sqlx::query(
            "INSERT INTO responses (id, survey_id, document, metadata, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(survey_id)
        .bind(&document)
        .bind(&metadata)
        .bind(submitted_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(survey_id, response_id = %id, "Response recorded");

        Ok(SurveyResponse {
            id,
            survey_id: survey_id.to_string(),
            answers: answers.clone(),
            submitted_at,
        })
    }

    /// List responses recorded under a survey ID, oldest first.
    pub async fn list_responses(&self, survey_id: &str) -> Result<Vec<SurveyResponse>, AppError> {
        let rows = sqlx::query(
            "SELECT id, survey_id, document, created_at FROM responses WHERE survey_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(survey_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(response_from_row).collect()
    }

    /// Count responses recorded under a survey ID.
    pub async fn count_responses(&self, survey_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM responses WHERE survey_id = ?")
            .bind(survey_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("total"))
    }

    // ==================== INDIVIDUAL ANALYSIS OPERATIONS ====================

    /// Persist an analysis payload next to the text it was derived from.
    pub async fn add_individual_analysis(
        &self,
        text: &str,
        analysis: &Value,
    ) -> Result<IndividualAnalysis, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(
                "No response text provided".to_string(),
            ));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let created_at = Utc::now().timestamp();
        let metadata = serde_json::to_string(&AnalysisMetadata {
            timestamp: created_at,
            analysis: analysis.clone(),
        })?;

        sqlx::query(
            "INSERT INTO individual_analyses (id, document, metadata, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(text)
        .bind(&metadata)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(IndividualAnalysis {
            id,
            text: text.to_string(),
            analysis: analysis.clone(),
            created_at,
        })
    }

    /// List individual analyses, newest first.
    pub async fn list_individual_analyses(&self) -> Result<Vec<IndividualAnalysis>, AppError> {
        let rows = sqlx::query(
            "SELECT id, document, metadata FROM individual_analyses ORDER BY created_at DESC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(analysis_from_row).collect()
    }
}

// Helper functions for row conversion. A document that no longer decodes is
// reported as a storage failure.

fn survey_from_row(row: &SqliteRow) -> Result<Survey, AppError> {
    let document: SurveyDocument = serde_json::from_str(row.get("document"))?;
    let metadata: SurveyMetadata = serde_json::from_str(row.get("metadata"))?;
    Ok(Survey {
        id: row.get("id"),
        title: document.title,
        description: document.description,
        questions: document.questions,
        prompt: metadata.prompt,
        created_at: metadata.created_at,
        public_url: metadata.public_url,
    })
}

fn response_from_row(row: &SqliteRow) -> Result<SurveyResponse, AppError> {
    let answers: Answers = serde_json::from_str(row.get("document"))?;
    Ok(SurveyResponse {
        id: row.get("id"),
        survey_id: row.get("survey_id"),
        answers,
        submitted_at: row.get("created_at"),
    })
}

fn analysis_from_row(row: &SqliteRow) -> Result<IndividualAnalysis, AppError> {
    let metadata: AnalysisMetadata = serde_json::from_str(row.get("metadata"))?;
    Ok(IndividualAnalysis {
        id: row.get("id"),
        text: row.get("document"),
        analysis: metadata.analysis,
        created_at: metadata.timestamp,
    })
}
