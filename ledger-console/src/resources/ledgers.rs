use console_core::error::ApiError;
use serde_json::Value;

use super::{Remote, Resource, Snapshot};
use crate::models::{Ledger, NewLedger};

/// Ledgers of one entity.
pub struct Ledgers {
    remote: Remote,
    resource: Resource<String, Vec<Ledger>>,
}

impl Ledgers {
    pub fn new(remote: Remote) -> Self {
        Self {
            remote,
            resource: Resource::new(),
        }
    }

    pub async fn load(&self, entity: Option<&str>) {
        let remote = self.remote.clone();
        self.resource
            .sync(entity.map(str::to_string), move |entity| async move {
                remote
                    .api
                    .list_ledgers(&entity, remote.token.as_deref())
                    .await
            })
            .await;
    }

    pub async fn add(&self, entity: Option<&str>, ledger: &NewLedger) -> Result<Ledger, ApiError> {
        let entity = require_entity(entity)?;
        self.resource
            .create(
                self.remote
                    .api
                    .create_ledger(entity, ledger, self.remote.token.as_deref()),
            )
            .await
    }

    /// Ask the API to populate the default chart of accounts for a ledger.
    pub async fn generate_chart_of_accounts(
        &self,
        entity: Option<&str>,
        ledger_name: &str,
    ) -> Result<Value, ApiError> {
        let entity = require_entity(entity)?;
        self.remote
            .api
            .create_chart_of_accounts(entity, ledger_name, self.remote.token.as_deref())
            .await
    }

    pub fn snapshot(&self) -> Snapshot<Vec<Ledger>> {
        self.resource.snapshot()
    }
}

fn require_entity(entity: Option<&str>) -> Result<&str, ApiError> {
    entity.ok_or(ApiError::MissingSelection("No entity selected"))
}
