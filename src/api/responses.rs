//! Response API endpoints.

use axum::extract::{Path, State};

use super::{success, ApiJson, ApiResult};
use crate::events::SurveyEvent;
use crate::models::{ResponseList, SubmitResponseRequest, SurveyResponse};
use crate::AppState;

/// POST /api/surveys/:id/responses - Record a response.
///
/// The survey is not looked up first; unknown IDs are accepted.
pub async fn submit_response(
    State(state): State<AppState>,
    Path(survey_id): Path<String>,
    ApiJson(request): ApiJson<SubmitResponseRequest>,
) -> ApiResult<SurveyResponse> {
    let response = state
        .store
        .add_response(&survey_id, &request.responses)
        .await?;

    state.events.publish(SurveyEvent::NewResponse {
        survey_id: survey_id.clone(),
        response_id: response.id.clone(),
    });

    success(response)
}

/// GET /api/surveys/:id/responses - List responses for a survey.
pub async fn list_responses(
    State(state): State<AppState>,
    Path(survey_id): Path<String>,
) -> ApiResult<ResponseList> {
    let responses = state.store.list_responses(&survey_id).await?;
    success(ResponseList {
        survey_id,
        responses,
    })
}
