//! Analysis API endpoints.

use axum::extract::{Path, State};

use super::{success, ApiJson, ApiResult};
use crate::errors::AppError;
use crate::llm::{extract, prompts};
use crate::models::{IndividualAnalysis, IndividualAnalysisRequest, SurveyAnalysis};
use crate::summary;
use crate::AppState;

/// POST /api/surveys/:id/analysis - Analyse all responses of a survey.
///
/// The result is returned to the caller only; it is not stored.
pub async fn analyze_survey(
    State(state): State<AppState>,
    Path(survey_id): Path<String>,
) -> ApiResult<SurveyAnalysis> {
    if state.store.count_responses(&survey_id).await? == 0 {
        return Err(AppError::NotFound(format!(
            "No responses found for survey {}",
            survey_id
        )));
    }

    let responses = state.store.list_responses(&survey_id).await?;

    let prompt = prompts::survey_analysis(&summary::aggregate_text(&responses));
    let completion = state.llm.complete(&prompt).await?;
    let analysis =
        extract::parse_analysis(&completion).map_err(|e| e.into_app_error(&completion))?;

    tracing::info!(%survey_id, responses = responses.len(), "Survey analysed");

    success(SurveyAnalysis {
        survey_id,
        analysis,
        raw_responses: responses.into_iter().map(|r| r.answers).collect(),
    })
}

/// POST /api/analyses - Analyse one free-text response and store the result.
pub async fn create_individual_analysis(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<IndividualAnalysisRequest>,
) -> ApiResult<IndividualAnalysis> {
    let text = request.response.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "No response text provided".to_string(),
        ));
    }

    let completion = state.llm.complete(&prompts::individual_analysis(text)).await?;
    let analysis =
        extract::parse_analysis(&completion).map_err(|e| e.into_app_error(&completion))?;

    success(state.store.add_individual_analysis(text, &analysis).await?)
}

/// GET /api/analyses - List stored individual analyses, newest first.
pub async fn list_individual_analyses(
    State(state): State<AppState>,
) -> ApiResult<Vec<IndividualAnalysis>> {
    success(state.store.list_individual_analyses().await?)
}
