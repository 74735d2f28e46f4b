pub mod account;
pub mod entity;
pub mod ledger;
pub mod statement;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountBalance, AccountBalances, AccountType};
pub use entity::{Entity, NewEntity};
pub use ledger::{Ledger, NewLedger};
pub use statement::{
    BalanceSheet, CashFlowLine, CashFlowStatement, IncomeStatement, StatementKind, StatementLine,
};
pub use transaction::{NewTransaction, Transaction, TransactionSummary, TxType};
pub use user::{AuthResponse, ProfileUpdate, Registration, User};

use serde::{Deserialize, Deserializer};

/// An entity together with one of its ledgers; the unit most API calls are scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LedgerScope {
    pub entity: String,
    pub ledger: String,
}

impl LedgerScope {
    pub fn new(entity: impl Into<String>, ledger: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ledger: ledger.into(),
        }
    }
}

/// Identifiers arrive as strings from most endpoints but as integers from some.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}
