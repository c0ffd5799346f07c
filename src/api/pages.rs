//! Public pages: service status, response form and QR code.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::render;
use crate::AppState;

/// GET / - Service status.
pub async fn service_status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "SAGE Backend Running",
        "version": env!("CARGO_PKG_VERSION"),
        "llm_model": state.config.llm.model,
        "llm_configured": state.config.llm.api_key.is_some(),
        "subscribers": state.events.subscriber_count(),
    }))
}

/// GET /survey/:id - Response form, or a 404 page for unknown surveys.
pub async fn display_survey(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.get_survey(&id).await {
        Ok(Some(survey)) => Html(render::survey_form(&survey)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Html(render::not_found_page())).into_response(),
        Err(e) => {
            tracing::error!("Display survey {} failed: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>500: Error loading survey</h1>".to_string()),
            )
                .into_response()
        }
    }
}

/// GET /survey/:id/qr - SVG QR code for the survey's public link.
///
/// Built from the identity alone, like the link itself.
pub async fn survey_qr(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match render::qr_svg(&state.store.public_url_for(&id)) {
        Ok(svg) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        Err(e) => e.into_response(),
    }
}
