//! Fluxo OAuth2 do HubSpot + leitura de contatos
//!
//! Quatro etapas independentes, sem memória entre chamadas. Todo estado
//! cruzado (state pendente, credenciais) mora no `KeyValueStore` com TTL:
//!
//! 1. `authorize`: gera o state, guarda e devolve a URL de consentimento
//! 2. `oauth2callback`: valida o state, troca o code e guarda as credenciais
//! 3. `get_credentials`: entrega as credenciais uma única vez
//! 4. `get_items`: lista contatos e normaliza em `IntegrationItem`

use axum::response::Html;
use hubspot::{HubSpotClient, HubSpotError};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::item::IntegrationItem;
use super::state::{credentials_key, validate_ids, PendingAuthState};
use crate::store::SharedStore;
use crate::utils::logging::*;
use crate::utils::{mask_secret, AppError, AppResult};

/// Página do popup: só fecha a janela, o frontend percebe e busca as credenciais
pub const CLOSE_WINDOW_PAGE: &str = r#"<html>
    <script>
        window.close();
    </script>
</html>
"#;

/// Parâmetros do redirect do HubSpot
#[derive(Debug, Default, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

pub struct HubSpotIntegration {
    client: HubSpotClient,
    store: SharedStore,
    ttl: Duration,
}

impl HubSpotIntegration {
    pub fn new(client: HubSpotClient, store: SharedStore, ttl: Duration) -> Self {
        Self { client, store, ttl }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Gera a URL de autorização e guarda o state pendente
    ///
    /// # Retorno
    /// - `Ok(String)`: URL para abrir no navegador do usuário
    /// - `Err(AppError)`: IDs inválidos ou falha ao gravar no store
    pub async fn authorize(&self, user_id: &str, org_id: &str) -> AppResult<String> {
        validate_ids(user_id, org_id)?;

        let pending = PendingAuthState::new(user_id, org_id);
        let auth_url = self.client.authorization_url(&pending.encode()?);

        self.store
            .set(&pending.store_key(), &pending.to_json()?, self.ttl)
            .await?;

        log_info(&format!(
            "🚀 [HubSpot] Autorização iniciada para org={} user={} (state: {})",
            org_id,
            user_id,
            mask_secret(&pending.state, 6)
        ));

        Ok(auth_url)
    }

    /// Recebe o redirect do HubSpot
    ///
    /// O state é conferido contra o store antes de qualquer troca de token.
    /// A troca e a remoção do state pendente rodam juntas.
    pub async fn oauth2callback(&self, params: OAuthCallbackParams) -> AppResult<Html<&'static str>> {
        // `error=` vazio conta como ausente
        if let Some(error) = params.error.filter(|e| !e.is_empty()) {
            log_error(&format!(
                "❌ [HubSpot] Erro na autorização: {} ({})",
                error,
                params.error_description.as_deref().unwrap_or("-")
            ));
            return Err(AppError::BadRequest(error));
        }

        let encoded_state = params
            .state
            .as_deref()
            .ok_or_else(|| AppError::InvalidState("missing state parameter".to_string()))?;
        let received = PendingAuthState::decode(encoded_state)?;
        validate_ids(&received.user_id, &received.org_id)
            .map_err(|e| AppError::InvalidState(e.to_string()))?;

        let state_key = received.store_key();
        let saved = self.store.get(&state_key).await?;

        let state_matches = saved
            .as_deref()
            .and_then(|raw| PendingAuthState::from_json(raw).ok())
            .is_some_and(|saved| saved.state == received.state);

        if !state_matches {
            log_warning(&format!(
                "🚨 [HubSpot] State não confere para org={} user={}",
                received.org_id, received.user_id
            ));
            return Err(AppError::BadRequest("State does not match.".to_string()));
        }

        let code = params.code.filter(|c| !c.is_empty()).ok_or_else(|| {
            log_error("❌ [HubSpot] Code não recebido no callback");
            AppError::BadRequest("Missing code parameter".to_string())
        })?;

        log_info(&format!("🔑 [HubSpot] Code recebido: {}", mask_secret(&code, 6)));

        let (token, state_deleted) = tokio::join!(
            self.client.exchange_code(&code),
            self.store.delete(&state_key)
        );

        let token = token.map_err(|e| {
            log_hubspot_api_error("exchange_code", e.status(), &e.to_string());
            AppError::from(e)
        })?;
        state_deleted?;

        self.store
            .set(
                &credentials_key(&received.user_id, &received.org_id),
                &serde_json::to_string(&token)?,
                self.ttl,
            )
            .await?;

        log_info(&format!(
            "✅ [HubSpot] Credenciais guardadas para org={} user={}",
            received.org_id, received.user_id
        ));

        Ok(Html(CLOSE_WINDOW_PAGE))
    }

    /// Entrega as credenciais guardadas pelo callback e as remove (uso único)
    pub async fn get_credentials(&self, user_id: &str, org_id: &str) -> AppResult<Value> {
        validate_ids(user_id, org_id)?;

        let key = credentials_key(user_id, org_id);
        let raw = self
            .store
            .get(&key)
            .await?
            .ok_or_else(|| AppError::BadRequest("No credentials found.".to_string()))?;

        let credentials: Value = serde_json::from_str(&raw)?;
        self.store.delete(&key).await?;

        log_info(&format!(
            "📤 [HubSpot] Credenciais entregues para org={} user={}",
            org_id, user_id
        ));

        Ok(credentials)
    }

    /// Lista contatos e converte em `IntegrationItem`
    ///
    /// Resposta diferente de 200 vira lista vazia, não erro. Falha de rede
    /// ou corpo ilegível continuam sendo erro.
    pub async fn get_items(&self, credentials: &Value) -> AppResult<Vec<IntegrationItem>> {
        let access_token = credentials
            .get("access_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                log_validation_error("credentials", "access_token ausente");
                AppError::ValidationError("credentials without access_token".to_string())
            })?;

        match self.client.list_contacts(access_token).await {
            Ok(page) => {
                let items: Vec<IntegrationItem> =
                    page.results.iter().map(IntegrationItem::from_contact).collect();
                log_info(&format!("📋 [HubSpot] {} contatos normalizados", items.len()));
                Ok(items)
            }
            Err(HubSpotError::ApiError { status, message }) => {
                log_warning(&format!(
                    "⚠️ [HubSpot] Contatos indisponíveis (status {}), retornando lista vazia: {}",
                    status, message
                ));
                Ok(Vec::new())
            }
            Err(e) => {
                log_hubspot_api_error("list_contacts", e.status(), &e.to_string());
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::state::state_key;
    use crate::store::{InMemoryStore, KeyValueStore};
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    const TTL: Duration = Duration::from_secs(600);

    fn integration(server: &MockServer) -> (HubSpotIntegration, InMemoryStore) {
        integration_at(&server.base_url())
    }

    /// Sem servidor mock: para testes que não devem chegar ao HubSpot
    fn offline_integration() -> (HubSpotIntegration, InMemoryStore) {
        integration_at("http://127.0.0.1:9")
    }

    fn integration_at(base_url: &str) -> (HubSpotIntegration, InMemoryStore) {
        let config = hubspot::HubSpotConfig::new("cid", "csecret", "http://localhost:8000/cb")
            .with_base_url(base_url);
        let store = InMemoryStore::new();
        let integration = HubSpotIntegration::new(
            HubSpotClient::new(config).unwrap(),
            Arc::new(store.clone()),
            TTL,
        );
        (integration, store)
    }

    /// Extrai o `state` (já decodificado de percent-encoding) da URL
    fn state_param(url: &str) -> String {
        let raw = url
            .split('?')
            .nth(1)
            .and_then(|query| query.split('&').find_map(|pair| pair.strip_prefix("state=")))
            .unwrap();
        raw.replace("%3D", "=")
    }

    fn callback(code: &str, state: &str) -> OAuthCallbackParams {
        OAuthCallbackParams {
            code: Some(code.to_string()),
            state: Some(state.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_authorize_builds_url_and_stores_state() {
        let (integration, store) = offline_integration();

        let url = integration.authorize("u1", "o1").await.unwrap();

        assert!(url.contains("client_id=cid"));
        assert!(url.contains("scope=crm.objects.contacts.read%20oauth"));

        let decoded = PendingAuthState::decode(&state_param(&url)).unwrap();
        assert_eq!(decoded.user_id, "u1");
        assert_eq!(decoded.org_id, "o1");

        let stored = store.get("hubspot_state:o1:u1").await.unwrap().unwrap();
        assert_eq!(PendingAuthState::from_json(&stored).unwrap(), decoded);
    }

    #[tokio::test]
    async fn test_authorize_rejects_empty_ids() {
        let (integration, store) = offline_integration();

        assert!(matches!(
            integration.authorize("", "o1").await,
            Err(AppError::BadRequest(_))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_provider_error_fails_without_touching_store() {
        let (integration, store) = offline_integration();

        let params = OAuthCallbackParams {
            error: Some("access_denied".to_string()),
            ..Default::default()
        };
        let err = integration.oauth2callback(params).await.unwrap_err();

        assert!(matches!(&err, AppError::BadRequest(msg) if msg == "access_denied"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_error_param_is_ignored() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth/v1/token");
                then.status(200).json_body(json!({"access_token": "at"}));
            })
            .await;
        let (integration, _store) = integration(&server);

        let url = integration.authorize("u1", "o1").await.unwrap();
        let params = OAuthCallbackParams {
            error: Some(String::new()),
            ..callback("the-code", &state_param(&url))
        };

        assert!(integration.oauth2callback(params).await.is_ok());
        token_mock.assert_async().await;
        let credentials = integration.get_credentials("u1", "o1").await.unwrap();
        assert_eq!(credentials["access_token"], "at");
    }

    #[tokio::test]
    async fn test_full_flow_stores_and_consumes_credentials_once() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/oauth/v1/token")
                    .x_www_form_urlencoded_tuple("code", "the-code");
                then.status(200)
                    .json_body(json!({"access_token": "at", "refresh_token": "rt", "expires_in": 1800}));
            })
            .await;
        let (integration, store) = integration(&server);

        let url = integration.authorize("u1", "o1").await.unwrap();
        let page = integration
            .oauth2callback(callback("the-code", &state_param(&url)))
            .await
            .unwrap();

        token_mock.assert_async().await;
        assert!(page.0.contains("window.close()"));
        assert!(store.get(&state_key("u1", "o1")).await.unwrap().is_none());

        let credentials = integration.get_credentials("u1", "o1").await.unwrap();
        assert_eq!(credentials["access_token"], "at");
        assert_eq!(credentials["refresh_token"], "rt");

        let second = integration.get_credentials("u1", "o1").await.unwrap_err();
        assert!(matches!(&second, AppError::BadRequest(msg) if msg == "No credentials found."));
    }

    #[tokio::test]
    async fn test_tampered_state_is_rejected_before_exchange() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth/v1/token");
                then.status(200).json_body(json!({"access_token": "at"}));
            })
            .await;
        let (integration, store) = integration(&server);

        let url = integration.authorize("u1", "o1").await.unwrap();
        let mut forged = PendingAuthState::decode(&state_param(&url)).unwrap();
        forged.state = "guessed".to_string();

        let err = integration
            .oauth2callback(callback("the-code", &forged.encode().unwrap()))
            .await
            .unwrap_err();

        assert!(matches!(&err, AppError::BadRequest(msg) if msg == "State does not match."));
        token_mock.assert_hits_async(0).await;
        // state pendente original continua lá
        assert!(store.get(&state_key("u1", "o1")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_state_for_other_tenant_is_rejected() {
        let (integration, _store) = offline_integration();

        let url = integration.authorize("u1", "o1").await.unwrap();
        let mut other = PendingAuthState::decode(&state_param(&url)).unwrap();
        other.org_id = "o2".to_string();

        let err = integration
            .oauth2callback(callback("c", &other.encode().unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_malformed_state_is_decoding_error() {
        let (integration, _store) = offline_integration();

        let err = integration
            .oauth2callback(callback("c", "%%%not-base64%%%"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let missing = OAuthCallbackParams {
            code: Some("c".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            integration.oauth2callback(missing).await,
            Err(AppError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_token_exchange_failure_is_upstream_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth/v1/token");
                then.status(400).body(r#"{"status":"BAD_AUTH_CODE"}"#);
            })
            .await;
        let (integration, store) = integration(&server);

        let url = integration.authorize("u1", "o1").await.unwrap();
        let err = integration
            .oauth2callback(callback("stale", &state_param(&url)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
        // a remoção do state rodou junto com a troca
        assert!(store.get(&state_key("u1", "o1")).await.unwrap().is_none());
        assert!(store.get("hubspot_credentials:o1:u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_code_after_valid_state() {
        let (integration, _store) = offline_integration();

        let url = integration.authorize("u1", "o1").await.unwrap();
        let params = OAuthCallbackParams {
            state: Some(state_param(&url)),
            ..Default::default()
        };
        let err = integration.oauth2callback(params).await.unwrap_err();
        assert!(matches!(&err, AppError::BadRequest(msg) if msg == "Missing code parameter"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_after_state_ttl_does_not_match() {
        let (integration, store) = offline_integration();

        let url = integration.authorize("u1", "o1").await.unwrap();
        tokio::time::advance(TTL).await;

        let err = integration
            .oauth2callback(callback("the-code", &state_param(&url)))
            .await
            .unwrap_err();

        assert!(matches!(&err, AppError::BadRequest(msg) if msg == "State does not match."));
        assert!(store.get("hubspot_credentials:o1:u1").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_credentials_expire_after_ttl() {
        let (integration, store) = offline_integration();

        store
            .set("hubspot_credentials:o1:u1", r#"{"access_token":"at"}"#, TTL)
            .await
            .unwrap();
        tokio::time::advance(TTL).await;

        assert!(matches!(
            integration.get_credentials("u1", "o1").await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_get_items_maps_contacts() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/crm/v3/objects/contacts")
                    .header("authorization", "Bearer at");
                then.status(200).json_body(json!({
                    "results": [{
                        "id": 42,
                        "properties": {"firstname": "A", "lastname": "B"},
                        "createdAt": "t1",
                        "updatedAt": "t2"
                    }]
                }));
            })
            .await;
        let (integration, _store) = integration(&server);

        let items = integration.get_items(&json!({"access_token": "at"})).await.unwrap();

        assert_eq!(
            items,
            vec![IntegrationItem {
                id: "42".to_string(),
                name: "A B".to_string(),
                item_type: "Contact".to_string(),
                creation_time: Some(json!("t1")),
                last_modified_time: Some(json!("t2")),
            }]
        );
    }

    #[tokio::test]
    async fn test_get_items_non_200_is_empty_list() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/crm/v3/objects/contacts");
                then.status(403).json_body(json!({"message": "forbidden"}));
            })
            .await;
        let (integration, _store) = integration(&server);

        let items = integration.get_items(&json!({"access_token": "at"})).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_get_items_requires_access_token() {
        let (integration, _store) = offline_integration();

        assert!(matches!(
            integration.get_items(&json!({"refresh_token": "rt"})).await,
            Err(AppError::ValidationError(_))
        ));
    }
}
