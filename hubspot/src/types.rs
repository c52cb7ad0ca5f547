//! Tipos da API CRM v3 (apenas o que a listagem de contatos usa)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Página de `GET /crm/v3/objects/contacts`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactsPage {
    #[serde(default)]
    pub results: Vec<Contact>,

    /// Cursor da próxima página (não seguido)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    /// O HubSpot envia string, mas aceitamos número também
    #[serde(default)]
    pub id: Value,

    #[serde(default)]
    pub properties: Option<ContactProperties>,

    /// Repassados como vieram (string ISO-8601 na prática)
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<Value>,

    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<Value>,

    #[serde(default)]
    pub archived: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactProperties {
    #[serde(default)]
    pub firstname: Option<String>,

    #[serde(default)]
    pub lastname: Option<String>,

    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

impl Contact {
    /// Id como texto: string sem aspas, número em decimal, ausente/null vazio
    pub fn id_text(&self) -> String {
        match &self.id {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn first_name(&self) -> &str {
        self.properties
            .as_ref()
            .and_then(|p| p.firstname.as_deref())
            .unwrap_or("")
    }

    pub fn last_name(&self) -> &str {
        self.properties
            .as_ref()
            .and_then(|p| p.lastname.as_deref())
            .unwrap_or("")
    }
}
