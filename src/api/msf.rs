//! Multi-step form API endpoints
//!
//! Demo wizard collecting personal, professional, and order details over
//! three submissions:
//! - POST /api/v1/msf - Start a wizard
//! - GET /api/v1/msf/{token} - Current state
//! - PUT /api/v1/msf/{token} - Submit the current step
//!
//! No authentication: this is a public demo surface, state is held
//! server-side under an opaque token.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{
    OrderDetails, PersonalDetails, ProfessionalDetails, WizardState, WizardStepData,
};
use crate::services::wizard::SubmitOutcome;
use crate::services::WizardServiceError;

/// Wizard state as returned to clients
#[derive(Debug, Serialize)]
pub struct WizardStateResponse {
    pub token: String,
    pub step: String,
    pub personal: Option<PersonalDetails>,
    pub professional: Option<ProfessionalDetails>,
}

impl From<WizardState> for WizardStateResponse {
    fn from(state: WizardState) -> Self {
        Self {
            token: state.token,
            step: state.current_step.to_string(),
            personal: state.personal,
            professional: state.professional,
        }
    }
}

/// Response after the final step: the collected data, in step order
#[derive(Debug, Serialize)]
pub struct CompletedResponse {
    pub form_data: (PersonalDetails, ProfessionalDetails, OrderDetails),
}

/// Response after an intermediate step
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SubmitResponse {
    Advanced(WizardStateResponse),
    Completed(CompletedResponse),
}

/// Build the multi-step form router (public)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_wizard))
        .route("/{token}", get(get_wizard).put(submit_step))
}

/// POST /api/v1/msf - Start a wizard
async fn start_wizard(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let wizard = state
        .wizard_service
        .start()
        .await
        .map_err(map_wizard_error)?;

    Ok((
        StatusCode::CREATED,
        Json(WizardStateResponse::from(wizard)),
    ))
}

/// GET /api/v1/msf/{token} - Current wizard state
async fn get_wizard(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<WizardStateResponse>, ApiError> {
    let wizard = state
        .wizard_service
        .get(&token)
        .await
        .map_err(map_wizard_error)?;

    Ok(Json(wizard.into()))
}

/// PUT /api/v1/msf/{token} - Submit the current step
async fn submit_step(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(body): Json<WizardStepData>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let outcome = state
        .wizard_service
        .submit(&token, body)
        .await
        .map_err(map_wizard_error)?;

    let response = match outcome {
        SubmitOutcome::Advanced(wizard) => SubmitResponse::Advanced(wizard.into()),
        SubmitOutcome::Completed(completed) => SubmitResponse::Completed(CompletedResponse {
            form_data: completed.form_data,
        }),
    };

    Ok(Json(response))
}

fn map_wizard_error(e: WizardServiceError) -> ApiError {
    match e {
        WizardServiceError::NotFound => ApiError::not_found("Wizard not found"),
        WizardServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        WizardServiceError::InternalError(e) => {
            tracing::error!("Wizard service error: {:#}", e);
            ApiError::internal_error("Internal server error")
        }
    }
}
