use console_core::error::ApiError;

use super::{Remote, Resource, Snapshot};
use crate::models::{LedgerScope, NewTransaction, Transaction, TransactionSummary};

pub struct Transactions {
    remote: Remote,
    resource: Resource<LedgerScope, Vec<Transaction>>,
}

impl Transactions {
    pub fn new(remote: Remote) -> Self {
        Self {
            remote,
            resource: Resource::new(),
        }
    }

    pub async fn load(&self, scope: Option<LedgerScope>) {
        let remote = self.remote.clone();
        self.resource
            .sync(scope, move |scope| async move {
                remote
                    .api
                    .list_transactions(&scope, remote.token.as_deref())
                    .await
            })
            .await;
    }

    pub async fn add(
        &self,
        scope: Option<&LedgerScope>,
        transaction: &NewTransaction,
    ) -> Result<Transaction, ApiError> {
        let scope =
            scope.ok_or(ApiError::MissingSelection("Select an entity and ledger first"))?;
        self.resource
            .create(self.remote.api.create_transaction(
                scope,
                transaction,
                self.remote.token.as_deref(),
            ))
            .await
    }

    pub fn summary(&self) -> TransactionSummary {
        TransactionSummary::of(&self.resource.value())
    }

    pub fn snapshot(&self) -> Snapshot<Vec<Transaction>> {
        self.resource.snapshot()
    }
}
