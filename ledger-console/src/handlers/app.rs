use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use super::Layout;
use crate::format::{format_currency, PLACEHOLDER};
use crate::middleware::session::CurrentUser;
use crate::models::StatementKind;
use crate::resources::{
    accounts::Accounts, entities::Entities, ledgers::Ledgers, statements::Statements,
};
use crate::AppState;

pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub description: String,
    pub tone: &'static str,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub cards: Vec<StatCard>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
) -> Response {
    let mut storage = state.storage(jar);
    let layout = Layout::new(&current, "/", &mut storage);
    let selection = layout.selection.clone();
    let scope = selection.ledger_scope();

    let remote = state.remote(Some(current.token.clone()));
    let entities = Entities::new(remote.clone());
    let ledgers = Ledgers::new(remote.clone());
    let accounts = Accounts::new(remote.clone());
    let statements = Statements::new(remote);

    tokio::join!(
        entities.load(),
        ledgers.load(selection.entity.as_deref()),
        accounts.load(scope.clone()),
        statements.load(StatementKind::IncomeStatement, scope.clone()),
    );

    let entity_count = entities.snapshot().value.len();
    let active_ledgers = ledgers
        .snapshot()
        .value
        .iter()
        .filter(|ledger| !ledger.hidden)
        .count();
    let account_count = accounts.snapshot().value.len();
    let net_income = statements
        .income_statement()
        .value
        .map(|statement| statement.net_income)
        .filter(|income| !income.is_zero());

    let cards = vec![
        StatCard {
            title: "Total Entities",
            value: entity_count.to_string(),
            description: format!("{} entities created", entity_count),
            tone: "blue",
        },
        StatCard {
            title: "Active Ledgers",
            value: active_ledgers.to_string(),
            description: if selection.entity.is_some() {
                "For selected entity".to_string()
            } else {
                "Select entity to view".to_string()
            },
            tone: "green",
        },
        StatCard {
            title: "Total Accounts",
            value: account_count.to_string(),
            description: if selection.ledger.is_some() {
                "In selected ledger".to_string()
            } else {
                "Select ledger to view".to_string()
            },
            tone: "purple",
        },
        StatCard {
            title: "Net Income",
            value: net_income
                .map(format_currency)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            description: if scope.is_some() {
                "Current period".to_string()
            } else {
                "Select entity & ledger".to_string()
            },
            tone: "pink",
        },
    ];

    (storage.into_jar(), DashboardTemplate { layout, cards }).into_response()
}

pub async fn health_check() -> &'static str {
    "OK"
}
