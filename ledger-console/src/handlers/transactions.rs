use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use std::collections::HashMap;

use super::{badge, see_other, Layout};
use crate::format::{format_currency, format_datetime, short_id};
use crate::forms::{FormErrors, TransactionForm};
use crate::middleware::session::CurrentUser;
use crate::models::{Account, Transaction, TransactionSummary, TxType};
use crate::resources::{accounts::ChartOfAccounts, transactions::Transactions};
use crate::selection::SelectionContext;
use crate::storage::{CookieStorage, Flash};
use crate::table::{
    AddAction, CellValue, Column, DataTable, EmptyState, Markup, TableQuery, TableView,
};
use crate::AppState;

pub struct AccountOption {
    pub uuid: String,
    pub label: String,
    pub selected: bool,
}

pub struct TxTypeOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub struct SummaryView {
    pub count: usize,
    pub total_debits: String,
    pub total_credits: String,
}

impl From<TransactionSummary> for SummaryView {
    fn from(summary: TransactionSummary) -> Self {
        Self {
            count: summary.count,
            total_debits: format_currency(summary.total_debits),
            total_credits: format_currency(summary.total_credits),
        }
    }
}

/// Form state and the choices it offers.
pub struct TransactionFormView {
    pub form: TransactionForm,
    pub errors: FormErrors,
    pub accounts: Vec<AccountOption>,
    pub corresponding: Vec<AccountOption>,
    pub tx_types: Vec<TxTypeOption>,
    pub open: bool,
}

impl TransactionFormView {
    fn new(form: TransactionForm, errors: FormErrors, chart: &[Account]) -> Self {
        let options = |selected: &str| -> Vec<AccountOption> {
            chart
                .iter()
                .map(|account| AccountOption {
                    uuid: account.uuid.clone(),
                    label: account.label(),
                    selected: account.uuid == selected,
                })
                .collect()
        };
        let tx_types = [TxType::Dr, TxType::Cr]
            .into_iter()
            .map(|tx_type| TxTypeOption {
                value: tx_type.as_str(),
                label: tx_type.label(),
                selected: tx_type.as_str() == form.tx_type,
            })
            .collect();

        Self {
            accounts: options(&form.account_uuid),
            corresponding: options(&form.corresponding_account_uuid),
            tx_types,
            open: !errors.is_empty(),
            form,
            errors,
        }
    }
}

#[derive(Template)]
#[template(path = "transactions.html")]
pub struct TransactionsTemplate {
    pub layout: Layout,
    /// `None` until both an entity and a ledger are selected.
    pub ledger: Option<LedgerView>,
}

pub struct LedgerView {
    pub summary: SummaryView,
    pub table: TableView,
    pub error: Option<String>,
    pub new: TransactionFormView,
}

/// Account column: the chart label when known, else the shortened id.
fn account_cell(labels: &HashMap<String, String>, uuid: &str) -> Markup {
    let text = labels
        .get(uuid)
        .cloned()
        .unwrap_or_else(|| short_id(uuid));
    Markup::raw(format!(
        r#"<span class="mono muted" title="{}">{}</span>"#,
        Markup::text(uuid),
        Markup::text(&text)
    ))
}

pub fn transaction_table(chart: &[Account]) -> DataTable<Transaction> {
    let labels: HashMap<String, String> = chart
        .iter()
        .map(|account| (account.uuid.clone(), account.label()))
        .collect();
    let corresponding_labels = labels.clone();

    DataTable::new(vec![
        Column::new("timestamp", "Date", |t: &Transaction| CellValue::from(t.timestamp))
            .sortable()
            .render(|_, t| {
                Markup::raw(format!(
                    r#"<span class="mono">{}</span>"#,
                    format_datetime(&t.timestamp)
                ))
            }),
        Column::new("description", "Description", |t: &Transaction| {
            CellValue::from(&t.description)
        })
        .searchable(),
        Column::new("tx_type", "Type", |t: &Transaction| CellValue::from(t.tx_type.as_str()))
            .render(|_, t| match t.tx_type {
                TxType::Dr => badge(TxType::Dr.label(), "badge-destructive"),
                TxType::Cr => badge(TxType::Cr.label(), "badge-default"),
            }),
        Column::new("amount", "Amount", |t: &Transaction| CellValue::from(t.amount))
            .sortable()
            .render(|_, t| {
                let (sign, class) = match t.tx_type {
                    TxType::Dr => ("-", "amount-debit"),
                    TxType::Cr => ("+", "amount-credit"),
                };
                Markup::raw(format!(
                    r#"<span class="mono {}">{}{}</span>"#,
                    class,
                    sign,
                    format_currency(t.amount)
                ))
            }),
        Column::new("account_uuid", "Account", |t: &Transaction| {
            CellValue::from(&t.account_uuid)
        })
        .render(move |_, t| account_cell(&labels, &t.account_uuid)),
        Column::new(
            "corresponding_account_uuid",
            "Corresponding Account",
            |t: &Transaction| CellValue::from(&t.corresponding_account_uuid),
        )
        .render(move |_, t| account_cell(&corresponding_labels, &t.corresponding_account_uuid)),
        Column::new("entity_unit_uuid", "Entity Unit", |t: &Transaction| {
            CellValue::from(&t.entity_unit_uuid)
        })
        .render(|_, t| {
            Markup::raw(format!(
                r#"<span class="mono muted">{}</span>"#,
                Markup::text(&short_id(&t.entity_unit_uuid))
            ))
        }),
    ])
    .title("Transactions")
    .description("All transactions for the selected ledger")
    .search_placeholder("Search transactions...")
    .add_action(AddAction::new("Create Transaction", "#new-transaction"))
    .empty_state(
        EmptyState::new(
            "No transactions found",
            "Create your first transaction to start recording financial activity",
        )
        .icon("receipt"),
    )
    .row_key(|t| t.uuid.clone())
}

pub async fn transactions_page(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Query(query): Query<TableQuery>,
) -> Response {
    let storage = state.storage(jar);
    render(
        &state,
        &current,
        storage,
        &query,
        TransactionForm::default(),
        FormErrors::new(),
    )
    .await
}

pub async fn create_transaction_handler(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Form(form): Form<TransactionForm>,
) -> Response {
    let mut storage = state.storage(jar);
    let scope = SelectionContext::hydrate(&mut storage).ledger_scope();

    let (scope, transaction) = match form.clone().into_new_transaction(scope.as_ref()) {
        Ok(valid) => valid,
        Err(errors) => {
            return render(&state, &current, storage, &TableQuery::default(), form, errors).await
        }
    };

    let transactions = Transactions::new(state.remote(Some(current.token.clone())));
    match transactions.add(Some(&scope), &transaction).await {
        Ok(created) => {
            tracing::info!(transaction_id = %created.uuid, "Transaction created");
            Flash::Success("Transaction created successfully".into()).store(&mut storage);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create transaction");
            Flash::Error("Failed to create transaction".into()).store(&mut storage);
        }
    }
    see_other(storage, "/transactions")
}

async fn render(
    state: &AppState,
    current: &CurrentUser,
    mut storage: CookieStorage,
    query: &TableQuery,
    form: TransactionForm,
    errors: FormErrors,
) -> Response {
    let layout = Layout::new(current, "/transactions", &mut storage);
    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    let ledger = match layout.selection.ledger_scope() {
        Some(scope) => {
            let remote = state.remote(Some(current.token.clone()));
            let transactions = Transactions::new(remote.clone());
            let chart = ChartOfAccounts::new(remote);
            tokio::join!(
                transactions.load(Some(scope.clone())),
                chart.load(Some(scope))
            );

            let listed = transactions.snapshot();
            let chart = chart.snapshot();
            Some(LedgerView {
                summary: transactions.summary().into(),
                table: transaction_table(&chart.value).view(
                    &listed.value,
                    query,
                    listed.is_loading(),
                ),
                error: listed.error,
                new: TransactionFormView::new(form, errors, &chart.value),
            })
        }
        None => None,
    };

    (storage.into_jar(), (status, TransactionsTemplate { layout, ledger })).into_response()
}
