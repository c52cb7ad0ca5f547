//! # Integrações
//!
//! ## Estrutura:
//! - `state.rs`: state anti-CSRF e chaves do store
//! - `item.rs`: `IntegrationItem`, formato comum entre provedores
//! - `hubspot_integration.rs`: fluxo OAuth2 + contatos do HubSpot

pub mod hubspot_integration;
pub mod item;
pub mod state;

pub use hubspot_integration::{HubSpotIntegration, OAuthCallbackParams, CLOSE_WINDOW_PAGE};
pub use item::IntegrationItem;
pub use state::{credentials_key, state_key, PendingAuthState};
