use serde::{Deserialize, Serialize};

/// Bookkeeping record set belonging to one entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    pub uuid: String,
    pub ledger_name: String,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub posted: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub additional_info: serde_json::Value,
}

/// Payload of `POST /entity/{entity}/create-ledger/`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewLedger {
    pub ledger_name: String,
    pub posted: bool,
    pub locked: bool,
    pub hidden: bool,
    pub additional_info: serde_json::Map<String, serde_json::Value>,
}
