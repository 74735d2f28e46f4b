//! Chart-of-accounts models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account categories as named by the accounting API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
    #[serde(rename = "COGS")]
    Cogs,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Equity => "Equity",
            Self::Revenue => "Revenue",
            Self::Expense => "Expense",
            Self::Cogs => "COGS",
        }
    }

    /// Badge style used by the account tables.
    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Asset => "badge badge-asset",
            Self::Liability => "badge badge-liability",
            Self::Equity => "badge badge-equity",
            Self::Revenue => "badge badge-revenue",
            Self::Expense | Self::Cogs => "badge badge-expense",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account in a ledger's chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub uuid: String,
    pub account_name: String,
    pub account_code: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub ledger: Option<String>,
    #[serde(default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub initial_balance: Decimal,
    #[serde(default)]
    pub current_balance: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_account: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub meta: serde_json::Value,
}

impl Account {
    /// "1000 - Cash", as shown in account pickers.
    pub fn label(&self) -> String {
        format!("{} - {}", self.account_code, self.account_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountBalance {
    pub uuid: String,
    pub code: String,
    pub name: String,
    pub balance: Decimal,
}

/// Per-category balances of a ledger, computed by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccountBalances {
    #[serde(default)]
    pub assets: Vec<AccountBalance>,
    #[serde(default)]
    pub liabilities: Vec<AccountBalance>,
    #[serde(default)]
    pub equity: Vec<AccountBalance>,
    #[serde(default)]
    pub revenues: Vec<AccountBalance>,
    #[serde(default)]
    pub cogs: Vec<AccountBalance>,
    #[serde(default)]
    pub expenses: Vec<AccountBalance>,
}

impl AccountBalances {
    /// Categories in display order with their headings.
    pub fn sections(&self) -> [(&'static str, &[AccountBalance]); 6] {
        [
            ("Assets", self.assets.as_slice()),
            ("Liabilities", self.liabilities.as_slice()),
            ("Equity", self.equity.as_slice()),
            ("Revenues", self.revenues.as_slice()),
            ("Cost of Goods Sold", self.cogs.as_slice()),
            ("Expenses", self.expenses.as_slice()),
        ]
    }
}
