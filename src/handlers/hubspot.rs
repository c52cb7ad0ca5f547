//! Endpoints HTTP da integração HubSpot
//!
//! Mesmos caminhos que o frontend já chama em `/integrations/hubspot/*`.

use axum::{
    extract::{Query, State},
    response::{Html, Json},
};
use serde_json::Value;
use std::sync::Arc;
use tokio::time::Instant;

use super::form::FormFields;
use crate::integrations::{IntegrationItem, OAuthCallbackParams};
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

/// POST /integrations/hubspot/authorize
///
/// Form: `user_id`, `org_id`. Retorna a URL de autorização como string JSON.
pub async fn authorize_hubspot(
    State(state): State<Arc<AppState>>,
    fields: FormFields,
) -> AppResult<Json<String>> {
    log_request_received("/integrations/hubspot/authorize", "POST");

    let user_id = fields.require("user_id")?;
    let org_id = fields.require("org_id")?;

    let auth_url = state.hubspot.authorize(user_id, org_id).await?;
    Ok(Json(auth_url))
}

/// GET /integrations/hubspot/oauth2callback?code=XXX&state=YYY
///
/// Chamado pelo redirect do HubSpot dentro do popup.
pub async fn oauth2callback_hubspot(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OAuthCallbackParams>,
) -> AppResult<Html<&'static str>> {
    let start_time = Instant::now();
    log_request_received("/integrations/hubspot/oauth2callback", "GET");

    let page = state.hubspot.oauth2callback(params).await?;

    log_request_processed(
        "/integrations/hubspot/oauth2callback",
        200,
        start_time.elapsed().as_millis() as u64,
    );
    Ok(page)
}

/// POST /integrations/hubspot/credentials
///
/// Form: `user_id`, `org_id`. Só funciona uma vez por autorização.
pub async fn get_hubspot_credentials(
    State(state): State<Arc<AppState>>,
    fields: FormFields,
) -> AppResult<Json<Value>> {
    log_request_received("/integrations/hubspot/credentials", "POST");

    let user_id = fields.require("user_id")?;
    let org_id = fields.require("org_id")?;

    let credentials = state.hubspot.get_credentials(user_id, org_id).await?;
    Ok(Json(credentials))
}

/// POST /integrations/hubspot/load
///
/// Form: `credentials` com o JSON recebido de `/credentials` (como string).
pub async fn load_hubspot_items(
    State(state): State<Arc<AppState>>,
    fields: FormFields,
) -> AppResult<Json<Vec<IntegrationItem>>> {
    let start_time = Instant::now();
    log_request_received("/integrations/hubspot/load", "POST");

    let credentials: Value = serde_json::from_str(fields.require("credentials")?)
        .map_err(|e| AppError::ValidationError(format!("credentials is not valid JSON: {}", e)))?;

    let items = state.hubspot.get_items(&credentials).await?;

    log_request_processed(
        "/integrations/hubspot/load",
        200,
        start_time.elapsed().as_millis() as u64,
    );
    Ok(Json(items))
}
