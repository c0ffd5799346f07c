//! Survey API endpoints.

use axum::extract::{Path, State};
use chrono::Utc;

use super::{success, ApiJson, ApiResult};
use crate::errors::AppError;
use crate::events::SurveyEvent;
use crate::llm::{extract, prompts};
use crate::models::{CreateSurveyRequest, Survey};
use crate::summary::SurveySummary;
use crate::AppState;

/// POST /api/surveys - Generate a survey from a prompt and store it.
pub async fn create_survey(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateSurveyRequest>,
) -> ApiResult<Survey> {
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::Validation("Prompt cannot be empty".to_string()));
    }

    let completion = state.llm.complete(&prompts::survey_creation(prompt)).await?;
    let parsed = extract::parse_survey(&completion).map_err(|e| e.into_app_error(&completion))?;
    let new_survey = parsed.into_new_survey(prompt);

    // A completion that parses but breaks the survey rules is still the
    // collaborator's fault, not the caller's.
    if let Err(e) = new_survey.validate() {
        return Err(AppError::collaborator(
            format!("Generated survey is invalid: {}", e),
            Some(completion),
        ));
    }

    let survey = state.store.create_survey(&new_survey).await?;

    state.events.publish(SurveyEvent::NewSurvey {
        survey_id: survey.id.clone(),
        title: survey.title.clone(),
        public_url: survey.public_url.clone(),
    });

    success(survey)
}

/// GET /api/surveys - List all surveys, newest first.
pub async fn list_surveys(State(state): State<AppState>) -> ApiResult<Vec<Survey>> {
    success(state.store.list_surveys().await?)
}

/// GET /api/surveys/:id - Get a single survey.
pub async fn get_survey(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Survey> {
    match state.store.get_survey(&id).await? {
        Some(survey) => success(survey),
        None => Err(AppError::NotFound(format!("Survey {} not found", id))),
    }
}

/// GET /api/surveys/:id/summary - Option tallies and response metrics.
pub async fn get_survey_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SurveySummary> {
    let survey = state
        .store
        .get_survey(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Survey {} not found", id)))?;
    let responses = state.store.list_responses(&id).await?;

    success(SurveySummary::build(
        &survey,
        &responses,
        Utc::now().timestamp(),
    ))
}
