//! Read-only financial statements. Totals come from the API and are never recomputed here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatementKind {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

impl StatementKind {
    pub const ALL: [StatementKind; 3] = [
        StatementKind::BalanceSheet,
        StatementKind::IncomeStatement,
        StatementKind::CashFlow,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance-sheet",
            Self::IncomeStatement => "income-statement",
            Self::CashFlow => "cash-flow",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "Balance Sheet",
            Self::IncomeStatement => "Income Statement",
            Self::CashFlow => "Cash Flow Statement",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementLine {
    pub code: String,
    pub name: String,
    pub balance: Decimal,
    pub uuid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceSheet {
    #[serde(default)]
    pub assets: Vec<StatementLine>,
    pub total_assets: Decimal,
    #[serde(default)]
    pub liabilities: Vec<StatementLine>,
    pub total_liabilities: Decimal,
    #[serde(default)]
    pub equity: Vec<StatementLine>,
    pub total_equity: Decimal,
    pub total_liabilities_and_equity: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomeStatement {
    #[serde(default)]
    pub revenues: Vec<StatementLine>,
    pub total_revenues: Decimal,
    #[serde(default)]
    pub cogs: Vec<StatementLine>,
    pub total_cogs: Decimal,
    pub gross_profit: Decimal,
    #[serde(default)]
    pub expenses: Vec<StatementLine>,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowLine {
    pub item: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowStatement {
    pub cash_from_operating_activities: Decimal,
    pub cash_from_investing_activities: Decimal,
    pub cash_from_financing_activities: Decimal,
    pub net_increase_in_cash: Decimal,
    pub beginning_cash_balance: Decimal,
    pub ending_cash_balance: Decimal,
    #[serde(default)]
    pub operating_activities_details: Vec<CashFlowLine>,
    #[serde(default)]
    pub investing_activities_details: Vec<CashFlowLine>,
    #[serde(default)]
    pub financing_activities_details: Vec<CashFlowLine>,
}
