//! # HubSpot Rust Crate
//!
//! Cliente mínimo para o fluxo OAuth2 e a API CRM v3 do HubSpot.
//!
//! ## Features
//!
//! - Montagem da URL de autorização (client_id, redirect_uri, scope, state)
//! - Troca de authorization code por token (form-encoded)
//! - Listagem de contatos com bearer token
//!
//! A configuração é sempre explícita: nada de credenciais em variáveis globais.
//!
//! ## Exemplo
//!
//! ```no_run
//! use hubspot::{HubSpotClient, HubSpotConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HubSpotConfig::new("client-id", "client-secret", "http://localhost:8000/callback");
//!     let client = HubSpotClient::new(config)?;
//!     println!("{}", client.authorization_url("opaque-state"));
//!     Ok(())
//! }
//! ```

/// Cliente HTTP
pub mod client;

/// Configuração do app OAuth
pub mod config;

/// Tratamento de erros
pub mod error;

/// Tipos da API CRM
pub mod types;

pub use client::HubSpotClient;
pub use config::HubSpotConfig;
pub use error::{HubSpotError, Result};
pub use types::{Contact, ContactProperties, ContactsPage};
