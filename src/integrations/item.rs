use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Registro de terceiro normalizado, independente do provedor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub creation_time: Option<Value>,
    pub last_modified_time: Option<Value>,
}

impl IntegrationItem {
    /// Contato do HubSpot: nome é `"{firstname} {lastname}"` sem trim
    pub fn from_contact(contact: &hubspot::Contact) -> Self {
        Self {
            id: contact.id_text(),
            name: format!("{} {}", contact.first_name(), contact.last_name()),
            item_type: "Contact".to_string(),
            creation_time: contact.created_at.clone(),
            last_modified_time: contact.updated_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn contact(value: serde_json::Value) -> hubspot::Contact {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_contact_mapping() {
        let item = IntegrationItem::from_contact(&contact(json!({
            "id": 42,
            "properties": {"firstname": "A", "lastname": "B"},
            "createdAt": "t1",
            "updatedAt": "t2"
        })));

        assert_eq!(
            item,
            IntegrationItem {
                id: "42".to_string(),
                name: "A B".to_string(),
                item_type: "Contact".to_string(),
                creation_time: Some(json!("t1")),
                last_modified_time: Some(json!("t2")),
            }
        );
    }

    #[test]
    fn test_contact_without_names() {
        let item = IntegrationItem::from_contact(&contact(json!({"id": "7", "properties": {}})));
        assert_eq!(item.name, " ");
        assert_eq!(item.id, "7");
        assert_eq!(item.creation_time, None);
    }

    #[test]
    fn test_timestamps_pass_through_verbatim() {
        let item = IntegrationItem::from_contact(&contact(json!({
            "id": "9",
            "createdAt": 1704067200000u64,
            "updatedAt": "2024-02-01T00:00:00Z"
        })));

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["creation_time"], json!(1704067200000u64));
        assert_eq!(value["last_modified_time"], "2024-02-01T00:00:00Z");
    }

    #[test]
    fn test_serializes_type_key() {
        let item = IntegrationItem::from_contact(&contact(json!({"id": "1"})));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "Contact");
        assert!(value.get("item_type").is_none());
        assert_eq!(value["creation_time"], serde_json::Value::Null);
    }
}
