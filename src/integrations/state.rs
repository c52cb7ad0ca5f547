//! State anti-CSRF do fluxo OAuth
//!
//! O mesmo `{state, user_id, org_id}` vai em JSON puro para o store e em
//! base64url (JSON) no parâmetro `state` da URL de autorização.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::utils::{AppError, AppResult};

/// Bytes aleatórios do token (mesma entropia de `token_urlsafe(32)`)
const STATE_TOKEN_BYTES: usize = 32;

/// Decodifica com ou sem `=` no final
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuthState {
    pub state: String,
    pub user_id: String,
    pub org_id: String,
}

impl PendingAuthState {
    /// Novo state com token aleatório do RNG do sistema operacional
    pub fn new(user_id: impl Into<String>, org_id: impl Into<String>) -> Self {
        Self {
            state: random_state_token(),
            user_id: user_id.into(),
            org_id: org_id.into(),
        }
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| AppError::InvalidState(format!("stored state is not valid JSON: {}", e)))
    }

    /// Forma que trafega pela URL do provedor
    pub fn encode(&self) -> AppResult<String> {
        Ok(URL_SAFE.encode(self.to_json()?))
    }

    pub fn decode(encoded: &str) -> AppResult<Self> {
        let bytes = URL_SAFE_LENIENT
            .decode(encoded.trim())
            .map_err(|e| AppError::InvalidState(format!("state is not base64url: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| AppError::InvalidState(format!("state is not valid JSON: {}", e)))
    }

    /// Chave do state pendente deste usuário/organização
    pub fn store_key(&self) -> String {
        state_key(&self.user_id, &self.org_id)
    }
}

pub fn random_state_token() -> String {
    let mut bytes = [0u8; STATE_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// IDs vazios ou com `:` são recusados: o `:` separa org e usuário na chave
pub fn validate_ids(user_id: &str, org_id: &str) -> AppResult<()> {
    for (field, value) in [("user_id", user_id), ("org_id", org_id)] {
        if value.is_empty() {
            return Err(AppError::BadRequest(format!("{} must not be empty", field)));
        }
        if value.contains(':') {
            return Err(AppError::BadRequest(format!("{} must not contain ':'", field)));
        }
    }
    Ok(())
}

pub fn state_key(user_id: &str, org_id: &str) -> String {
    format!("hubspot_state:{}:{}", org_id, user_id)
}

pub fn credentials_key(user_id: &str, org_id: &str) -> String {
    format!("hubspot_credentials:{}:{}", org_id, user_id)
}
