//! Model alias endpoints.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use nova_types::intent::ModelAlias;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SwitchModelRequest {
    pub alias: String,
}

#[derive(Debug, Serialize)]
pub struct SwitchModelResponse {
    pub message: String,
    pub active_model: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub active_model: String,
    pub remote_model: Option<String>,
    pub aliases: Vec<ModelAlias>,
}

/// POST /api/v1/model -- switch the local model by alias.
pub async fn switch_model(
    State(state): State<AppState>,
    Json(body): Json<SwitchModelRequest>,
) -> Result<Json<SwitchModelResponse>, AppError> {
    let alias = body.alias.trim().to_lowercase();
    if alias.is_empty() {
        return Err(AppError::Validation("alias must not be empty".to_string()));
    }

    let message = state.dispatcher.switch_model(&alias).await?;
    Ok(Json(SwitchModelResponse {
        message,
        active_model: state.dispatcher.active_model().await,
    }))
}

/// GET /api/v1/models -- alias table and the active model.
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let dispatcher = &state.dispatcher;
    Json(ModelsResponse {
        active_model: dispatcher.active_model().await,
        remote_model: dispatcher.brain().remote_model().map(str::to_string),
        aliases: dispatcher.aliases().entries().to_vec(),
    })
}
