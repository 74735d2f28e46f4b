use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Business organisation owning ledgers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub address_1: Option<String>,
    #[serde(default)]
    pub address_2: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub depth: Option<i32>,
    #[serde(default)]
    pub admin: Option<i64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub accrual_method: bool,
    #[serde(default = "default_fy_start_month")]
    pub fy_start_month: u8,
    #[serde(default)]
    pub last_closing_date: Option<NaiveDate>,
    #[serde(default)]
    pub meta: serde_json::Value,
    #[serde(default)]
    pub managers: Vec<serde_json::Value>,
}

fn default_fy_start_month() -> u8 {
    1
}

impl Entity {
    /// "City, State, Country" with empty parts left out.
    pub fn location(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Payload of `POST /create-entity/`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewEntity {
    pub name: String,
    pub address_1: String,
    pub address_2: String,
    pub path: String,
    pub depth: i32,
    pub admin: i64,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub email: String,
    pub website: String,
    pub phone: String,
    pub hidden: bool,
    pub accrual_method: bool,
    pub fy_start_month: u8,
    pub last_closing_date: NaiveDate,
    pub meta: serde_json::Map<String, serde_json::Value>,
    pub managers: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sparse_entity() {
        let entity: Entity = serde_json::from_str(
            r#"{"uuid":"E1","name":"Acme","city":"Austin","state":null,"country":"US"}"#,
        )
        .unwrap();

        assert_eq!(entity.name, "Acme");
        assert_eq!(entity.fy_start_month, 1);
        assert!(!entity.hidden);
        assert_eq!(entity.location().as_deref(), Some("Austin, US"));
    }

    #[test]
    fn location_is_none_when_blank() {
        let entity: Entity =
            serde_json::from_str(r#"{"uuid":"E1","name":"Acme","city":"  "}"#).unwrap();
        assert_eq!(entity.location(), None);
    }
}
