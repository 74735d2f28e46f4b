use super::{Remote, Resource, Snapshot};
use crate::models::{BalanceSheet, CashFlowStatement, IncomeStatement, LedgerScope, StatementKind};

/// The three statements of a ledger, each fetched only when asked for.
pub struct Statements {
    remote: Remote,
    balance_sheet: Resource<LedgerScope, Option<BalanceSheet>>,
    income_statement: Resource<LedgerScope, Option<IncomeStatement>>,
    cash_flow: Resource<LedgerScope, Option<CashFlowStatement>>,
}

impl Statements {
    pub fn new(remote: Remote) -> Self {
        Self {
            remote,
            balance_sheet: Resource::new(),
            income_statement: Resource::new(),
            cash_flow: Resource::new(),
        }
    }

    pub async fn load(&self, kind: StatementKind, scope: Option<LedgerScope>) {
        let remote = self.remote.clone();
        match kind {
            StatementKind::BalanceSheet => {
                self.balance_sheet
                    .sync(scope, move |scope| async move {
                        remote
                            .api
                            .balance_sheet(&scope, remote.token.as_deref())
                            .await
                            .map(Some)
                    })
                    .await
            }
            StatementKind::IncomeStatement => {
                self.income_statement
                    .sync(scope, move |scope| async move {
                        remote
                            .api
                            .income_statement(&scope, remote.token.as_deref())
                            .await
                            .map(Some)
                    })
                    .await
            }
            StatementKind::CashFlow => {
                self.cash_flow
                    .sync(scope, move |scope| async move {
                        remote
                            .api
                            .cash_flow_statement(&scope, remote.token.as_deref())
                            .await
                            .map(Some)
                    })
                    .await
            }
        }
    }

    pub fn balance_sheet(&self) -> Snapshot<Option<BalanceSheet>> {
        self.balance_sheet.snapshot()
    }

    pub fn income_statement(&self) -> Snapshot<Option<IncomeStatement>> {
        self.income_statement.snapshot()
    }

    pub fn cash_flow(&self) -> Snapshot<Option<CashFlowStatement>> {
        self.cash_flow.snapshot()
    }
}
