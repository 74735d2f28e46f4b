use askama::Template;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use super::{badge, Layout};
use crate::format::{format_currency, PLACEHOLDER};
use crate::middleware::session::CurrentUser;
use crate::models::{Account, AccountBalance, AccountBalances};
use crate::resources::accounts::{AccountBalancesResource, AllAccounts, ChartOfAccounts};
use crate::table::{CellValue, Column, DataTable, EmptyState, Markup, TableQuery, TableView};
use crate::AppState;

/// Accounts listed per summary card before collapsing into "+N more".
const SUMMARY_ROWS: usize = 3;

pub struct BalanceRow {
    pub name: String,
    pub amount: String,
}

pub struct BalanceCard {
    pub title: &'static str,
    pub count: usize,
    pub rows: Vec<BalanceRow>,
    pub more: usize,
}

impl BalanceCard {
    fn new(title: &'static str, accounts: &[AccountBalance]) -> Self {
        Self {
            title,
            count: accounts.len(),
            rows: accounts
                .iter()
                .take(SUMMARY_ROWS)
                .map(|a| BalanceRow {
                    name: a.name.clone(),
                    amount: format_currency(a.balance),
                })
                .collect(),
            more: accounts.len().saturating_sub(SUMMARY_ROWS),
        }
    }
}

/// Assets, liabilities and equity summary shown above the chart.
pub fn balance_cards(balances: &AccountBalances) -> Vec<BalanceCard> {
    vec![
        BalanceCard::new("Assets", &balances.assets),
        BalanceCard::new("Liabilities", &balances.liabilities),
        BalanceCard::new("Equity", &balances.equity),
    ]
}

#[derive(Template)]
#[template(path = "accounts.html")]
pub struct AccountsTemplate {
    pub layout: Layout,
    pub has_ledger: bool,
    pub cards: Vec<BalanceCard>,
    pub table: TableView,
    pub error: Option<String>,
}

fn money(value: &CellValue, class: &str) -> Markup {
    let amount = match value {
        CellValue::Number(amount) => format_currency(*amount),
        _ => PLACEHOLDER.to_string(),
    };
    Markup::raw(format!(r#"<span class="{}">{}</span>"#, class, amount))
}

pub fn account_table(title: &str, description: &str) -> DataTable<Account> {
    DataTable::new(vec![
        Column::new("account_code", "Code", |a: &Account| CellValue::from(&a.account_code))
            .sortable()
            .searchable()
            .render(|value, _| badge(&value.to_string(), "badge-outline mono")),
        Column::new("account_name", "Account Name", |a: &Account| {
            CellValue::from(&a.account_name)
        })
        .sortable()
        .searchable(),
        Column::new("account_type", "Type", |a: &Account| {
            CellValue::from(a.account_type.as_str())
        })
        .sortable()
        .render(|_, a| {
            Markup::raw(format!(
                r#"<span class="{}">{}</span>"#,
                a.account_type.badge_class(),
                a.account_type
            ))
        }),
        Column::new("current_balance", "Current Balance", |a: &Account| {
            CellValue::from(a.current_balance)
        })
        .sortable()
        .render(|value, _| money(value, "mono")),
        Column::new("initial_balance", "Initial Balance", |a: &Account| {
            CellValue::from(a.initial_balance)
        })
        .sortable()
        .render(|value, _| money(value, "mono muted")),
        Column::new("description", "Description", |a: &Account| {
            CellValue::from(a.description.clone())
        })
        .searchable(),
        Column::new("status", "Status", |a: &Account| CellValue::from(a.status.clone())).render(
            |_, a| {
                let status = a.status.as_deref().filter(|s| !s.is_empty());
                let class = if status.map_or(true, |s| s == "active") {
                    "badge-default"
                } else {
                    "badge-secondary"
                };
                badge(status.unwrap_or("Active"), class)
            },
        ),
    ])
    .title(title)
    .description(description)
    .search_placeholder("Search accounts...")
    .empty_state(
        EmptyState::new(
            "No accounts found",
            "Accounts will appear here once they are created for this ledger",
        )
        .icon("credit-card"),
    )
    .row_key(|a| a.uuid.clone())
}

/// Chart of accounts and balance summary for the selected ledger.
///
/// Without a ledger the page lists accounts across every entity instead.
pub async fn accounts_page(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Query(query): Query<TableQuery>,
) -> Response {
    let mut storage = state.storage(jar);
    let layout = Layout::new(&current, "/accounts", &mut storage);
    let remote = state.remote(Some(current.token.clone()));

    let page = match layout.selection.ledger_scope() {
        Some(scope) => {
            let chart = ChartOfAccounts::new(remote.clone());
            let balances = AccountBalancesResource::new(remote);
            tokio::join!(chart.load(Some(scope.clone())), balances.load(Some(scope)));

            let chart = chart.snapshot();
            let balances = balances.snapshot();
            let cards = balances
                .value
                .as_ref()
                .map(balance_cards)
                .unwrap_or_default();
            let table = account_table("Chart of Accounts", "Complete list of accounts in the ledger")
                .view(&chart.value, &query, chart.is_loading());

            AccountsTemplate {
                layout,
                has_ledger: true,
                cards,
                table,
                error: chart.error.or(balances.error),
            }
        }
        None => {
            let all = AllAccounts::new(remote);
            all.load().await;
            let all = all.snapshot();
            let table = account_table("All Accounts", "Accounts across every entity and ledger")
                .view(&all.value, &query, all.is_loading());

            AccountsTemplate {
                layout,
                has_ledger: false,
                cards: Vec::new(),
                table,
                error: all.error,
            }
        }
    };

    (storage.into_jar(), page).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn balance(name: &str, amount: i64) -> AccountBalance {
        AccountBalance {
            uuid: name.to_lowercase(),
            code: "1000".into(),
            name: name.into(),
            balance: Decimal::from(amount),
        }
    }

    #[test]
    fn summary_cards_show_three_accounts_then_a_count() {
        let balances = AccountBalances {
            assets: vec![
                balance("Cash", 1200),
                balance("Bank", 300),
                balance("Inventory", 50),
                balance("Receivables", 10),
                balance("Prepaid", 5),
            ],
            ..Default::default()
        };

        let cards = balance_cards(&balances);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].count, 5);
        assert_eq!(cards[0].rows.len(), 3);
        assert_eq!(cards[0].rows[0].amount, "$1,200.00");
        assert_eq!(cards[0].more, 2);
        assert_eq!(cards[1].count, 0);
        assert_eq!(cards[1].more, 0);
    }
}
