//! Typed access to the accounting API's entity, ledger, account, transaction
//! and statement endpoints.

use async_trait::async_trait;
use console_core::error::ApiError;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::{
    Account, AccountBalances, BalanceSheet, CashFlowStatement, Entity, IncomeStatement, Ledger,
    LedgerScope, NewEntity, NewLedger, NewTransaction, Transaction,
};
use crate::services::api_client::ApiClient;

#[async_trait]
pub trait AccountingApi: Send + Sync {
    async fn list_entities(&self, token: Option<&str>) -> Result<Vec<Entity>, ApiError>;
    async fn get_entity(&self, uuid: &str, token: Option<&str>) -> Result<Entity, ApiError>;
    async fn create_entity(&self, entity: &NewEntity, token: Option<&str>)
        -> Result<Entity, ApiError>;

    async fn list_ledgers(&self, entity: &str, token: Option<&str>)
        -> Result<Vec<Ledger>, ApiError>;
    async fn create_ledger(
        &self,
        entity: &str,
        ledger: &NewLedger,
        token: Option<&str>,
    ) -> Result<Ledger, ApiError>;
    async fn create_chart_of_accounts(
        &self,
        entity: &str,
        ledger_name: &str,
        token: Option<&str>,
    ) -> Result<Value, ApiError>;

    async fn chart_of_accounts(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<Vec<Account>, ApiError>;
    async fn ledger_accounts(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<Vec<Account>, ApiError>;
    async fn all_accounts(&self, token: Option<&str>) -> Result<Vec<Account>, ApiError>;
    async fn account_balances(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<AccountBalances, ApiError>;

    async fn list_transactions(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<Vec<Transaction>, ApiError>;
    async fn create_transaction(
        &self,
        scope: &LedgerScope,
        transaction: &NewTransaction,
        token: Option<&str>,
    ) -> Result<Transaction, ApiError>;

    async fn balance_sheet(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<BalanceSheet, ApiError>;
    async fn income_statement(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<IncomeStatement, ApiError>;
    async fn cash_flow_statement(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<CashFlowStatement, ApiError>;
}

#[derive(Deserialize)]
struct TransactionList {
    #[serde(default)]
    transactions: Option<Vec<Transaction>>,
}

fn entity_path(entity: &str, rest: &str) -> String {
    format!("/entity/{}/{}", urlencoding::encode(entity), rest)
}

fn ledger_path(scope: &LedgerScope, rest: &str) -> String {
    format!(
        "/entity/{}/ledgers/{}/{}",
        urlencoding::encode(&scope.entity),
        urlencoding::encode(&scope.ledger),
        rest
    )
}

#[async_trait]
impl AccountingApi for ApiClient {
    async fn list_entities(&self, token: Option<&str>) -> Result<Vec<Entity>, ApiError> {
        self.get("/list-entities/", token).await
    }

    async fn get_entity(&self, uuid: &str, token: Option<&str>) -> Result<Entity, ApiError> {
        self.get(&format!("/entities/{}/", urlencoding::encode(uuid)), token)
            .await
    }

    async fn create_entity(
        &self,
        entity: &NewEntity,
        token: Option<&str>,
    ) -> Result<Entity, ApiError> {
        self.post("/create-entity/", entity, token).await
    }

    async fn list_ledgers(
        &self,
        entity: &str,
        token: Option<&str>,
    ) -> Result<Vec<Ledger>, ApiError> {
        self.get(&entity_path(entity, "ledgers/"), token).await
    }

    async fn create_ledger(
        &self,
        entity: &str,
        ledger: &NewLedger,
        token: Option<&str>,
    ) -> Result<Ledger, ApiError> {
        self.post(&entity_path(entity, "create-ledger/"), ledger, token)
            .await
    }

    async fn create_chart_of_accounts(
        &self,
        entity: &str,
        ledger_name: &str,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.post(
            &entity_path(entity, "create-chart-of-accounts/"),
            &json!({ "ledger_name": ledger_name }),
            token,
        )
        .await
    }

    async fn chart_of_accounts(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<Vec<Account>, ApiError> {
        self.get(&ledger_path(scope, "chart-of-accounts/"), token)
            .await
    }

    async fn ledger_accounts(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<Vec<Account>, ApiError> {
        self.get(&ledger_path(scope, "accounts/"), token).await
    }

    async fn all_accounts(&self, token: Option<&str>) -> Result<Vec<Account>, ApiError> {
        self.get("/all-accounts/", token).await
    }

    async fn account_balances(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<AccountBalances, ApiError> {
        self.get(&ledger_path(scope, "balance-for-accounts/"), token)
            .await
    }

    async fn list_transactions(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<Vec<Transaction>, ApiError> {
        let list: TransactionList = self.get(&ledger_path(scope, "transactions/"), token).await?;
        Ok(list.transactions.unwrap_or_default())
    }

    async fn create_transaction(
        &self,
        scope: &LedgerScope,
        transaction: &NewTransaction,
        token: Option<&str>,
    ) -> Result<Transaction, ApiError> {
        self.post(&ledger_path(scope, "create-transaction/"), transaction, token)
            .await
    }

    async fn balance_sheet(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<BalanceSheet, ApiError> {
        self.get(&ledger_path(scope, "balance-sheet/"), token).await
    }

    async fn income_statement(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<IncomeStatement, ApiError> {
        self.get(&ledger_path(scope, "income-statement/"), token)
            .await
    }

    async fn cash_flow_statement(
        &self,
        scope: &LedgerScope,
        token: Option<&str>,
    ) -> Result<CashFlowStatement, ApiError> {
        self.get(&ledger_path(scope, "cash-flow-statement/"), token)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_names_are_percent_encoded() {
        let scope = LedgerScope::new("E1", "Main Book/2024");
        assert_eq!(
            ledger_path(&scope, "accounts/"),
            "/entity/E1/ledgers/Main%20Book%2F2024/accounts/"
        );
        assert_eq!(entity_path("E 1", "ledgers/"), "/entity/E%201/ledgers/");
    }

    #[test]
    fn transaction_list_tolerates_missing_field() {
        let list: TransactionList = serde_json::from_str("{}").unwrap();
        assert!(list.transactions.is_none());
        let list: TransactionList = serde_json::from_str(r#"{"transactions": null}"#).unwrap();
        assert!(list.transactions.is_none());
    }
}
