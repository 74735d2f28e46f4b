use super::{Remote, Resource, Snapshot};
use crate::models::{Account, AccountBalances, LedgerScope};

/// Accounts of a ledger as returned by `.../accounts/`.
pub struct Accounts {
    remote: Remote,
    resource: Resource<LedgerScope, Vec<Account>>,
}

impl Accounts {
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
                    .ledger_accounts(&scope, remote.token.as_deref())
                    .await
            })
            .await;
    }

    pub fn snapshot(&self) -> Snapshot<Vec<Account>> {
        self.resource.snapshot()
    }
}

pub struct ChartOfAccounts {
    remote: Remote,
    resource: Resource<LedgerScope, Vec<Account>>,
}

impl ChartOfAccounts {
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
                    .chart_of_accounts(&scope, remote.token.as_deref())
                    .await
            })
            .await;
    }

    pub fn snapshot(&self) -> Snapshot<Vec<Account>> {
        self.resource.snapshot()
    }
}

/// Accounts across every entity and ledger.
pub struct AllAccounts {
    remote: Remote,
    resource: Resource<(), Vec<Account>>,
}

impl AllAccounts {
    pub fn new(remote: Remote) -> Self {
        Self {
            remote,
            resource: Resource::new(),
        }
    }

    pub async fn load(&self) {
        let remote = self.remote.clone();
        self.resource
            .sync(Some(()), move |_| async move {
                remote.api.all_accounts(remote.token.as_deref()).await
            })
            .await;
    }

    pub fn snapshot(&self) -> Snapshot<Vec<Account>> {
        self.resource.snapshot()
    }
}

/// Per-category balances; `None` until the first successful load.
pub struct AccountBalancesResource {
    remote: Remote,
    resource: Resource<LedgerScope, Option<AccountBalances>>,
}

impl AccountBalancesResource {
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
                    .account_balances(&scope, remote.token.as_deref())
                    .await
                    .map(Some)
            })
            .await;
    }

    pub fn snapshot(&self) -> Snapshot<Option<AccountBalances>> {
        self.resource.snapshot()
    }
}
