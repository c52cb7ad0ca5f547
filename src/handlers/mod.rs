// Handlers HTTP e montagem do router
pub mod form;
pub mod health;
pub mod hubspot;

pub use self::form::FormFields;
pub use self::health::*;
pub use self::hubspot::*;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsSettings;
use crate::utils::logging::*;
use crate::AppState;

/// Router completo: health + rotas `/integrations/hubspot/*`
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = cors_layer(&app_state.settings.cors);

    let hubspot_routes = Router::new()
        .route("/authorize", post(authorize_hubspot))
        .route("/oauth2callback", get(oauth2callback_hubspot))
        .route("/credentials", post(get_hubspot_credentials))
        .route("/load", post(load_hubspot_items));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .nest("/integrations/hubspot", hubspot_routes)
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS para o frontend; origens inválidas são ignoradas com warning
fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                log_warning(&format!("⚠️ [CORS] Origem inválida ignorada: {}", origin));
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
