use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use console_core::error::AppError;

use super::{see_other, Layout};
use crate::export::{export_file_name, json_attachment, pdf, pdf_attachment};
use crate::format::{format_currency, format_date};
use crate::middleware::session::CurrentUser;
use crate::models::{
    BalanceSheet, CashFlowLine, CashFlowStatement, IncomeStatement, LedgerScope, StatementKind,
    StatementLine,
};
use crate::resources::statements::Statements;
use crate::selection::SelectionContext;
use crate::storage::{CookieStorage, Flash};
use crate::AppState;

pub struct Figure {
    pub label: String,
    pub amount: String,
}

impl Figure {
    fn new(label: impl Into<String>, amount: rust_decimal::Decimal) -> Self {
        Self {
            label: label.into(),
            amount: format_currency(amount),
        }
    }
}

pub struct LineView {
    pub code: String,
    pub name: String,
    pub amount: String,
}

pub struct SectionView {
    pub title: &'static str,
    pub tone: &'static str,
    pub lines: Vec<LineView>,
    pub total: Figure,
    /// Subtotals shown right after the section, e.g. gross profit.
    pub after: Vec<Figure>,
}

impl SectionView {
    fn new(
        title: &'static str,
        tone: &'static str,
        lines: &[StatementLine],
        total_label: &str,
        total: rust_decimal::Decimal,
    ) -> Self {
        Self {
            title,
            tone,
            lines: lines
                .iter()
                .map(|line| LineView {
                    code: line.code.clone(),
                    name: line.name.clone(),
                    amount: format_currency(line.balance),
                })
                .collect(),
            total: Figure::new(total_label, total),
            after: Vec::new(),
        }
    }

    fn activities(
        title: &'static str,
        tone: &'static str,
        details: &[CashFlowLine],
        total: rust_decimal::Decimal,
    ) -> Self {
        Self {
            title,
            tone,
            lines: details
                .iter()
                .map(|line| LineView {
                    code: String::new(),
                    name: line.item.clone(),
                    amount: format_currency(line.amount),
                })
                .collect(),
            total: Figure::new(format!("Net cash from {}", title.to_lowercase()), total),
            after: Vec::new(),
        }
    }

    fn followed_by(mut self, figure: Figure) -> Self {
        self.after.push(figure);
        self
    }
}

/// One statement laid out for the page and the print window alike.
#[derive(Template)]
#[template(path = "partials/statement.html")]
pub struct StatementView {
    pub kind: StatementKind,
    pub description: &'static str,
    pub highlights: Vec<Figure>,
    pub sections: Vec<SectionView>,
    pub summary: Vec<Figure>,
    pub grand_total: Figure,
}

impl From<&BalanceSheet> for StatementView {
    fn from(sheet: &BalanceSheet) -> Self {
        Self {
            kind: StatementKind::BalanceSheet,
            description: "Assets, Liabilities, and Equity",
            highlights: Vec::new(),
            sections: vec![
                SectionView::new(
                    "Assets",
                    "green",
                    &sheet.assets,
                    "Total Assets",
                    sheet.total_assets,
                ),
                SectionView::new(
                    "Liabilities",
                    "red",
                    &sheet.liabilities,
                    "Total Liabilities",
                    sheet.total_liabilities,
                ),
                SectionView::new(
                    "Equity",
                    "blue",
                    &sheet.equity,
                    "Total Equity",
                    sheet.total_equity,
                ),
            ],
            summary: Vec::new(),
            grand_total: Figure::new(
                "Total Liabilities and Equity",
                sheet.total_liabilities_and_equity,
            ),
        }
    }
}

impl From<&IncomeStatement> for StatementView {
    fn from(statement: &IncomeStatement) -> Self {
        Self {
            kind: StatementKind::IncomeStatement,
            description: "Revenue, Expenses, and Net Income",
            highlights: Vec::new(),
            sections: vec![
                SectionView::new(
                    "Revenue",
                    "green",
                    &statement.revenues,
                    "Total Revenue",
                    statement.total_revenues,
                ),
                SectionView::new(
                    "Cost of Goods Sold",
                    "yellow",
                    &statement.cogs,
                    "Total COGS",
                    statement.total_cogs,
                )
                .followed_by(Figure::new("Gross Profit", statement.gross_profit)),
                SectionView::new(
                    "Expenses",
                    "red",
                    &statement.expenses,
                    "Total Expenses",
                    statement.total_expenses,
                ),
            ],
            summary: Vec::new(),
            grand_total: Figure::new("Net Income", statement.net_income),
        }
    }
}

impl From<&CashFlowStatement> for StatementView {
    fn from(statement: &CashFlowStatement) -> Self {
        Self {
            kind: StatementKind::CashFlow,
            description: "Operating, Investing, and Financing Activities",
            highlights: vec![
                Figure::new(
                    "Operating Activities",
                    statement.cash_from_operating_activities,
                ),
                Figure::new(
                    "Investing Activities",
                    statement.cash_from_investing_activities,
                ),
                Figure::new(
                    "Financing Activities",
                    statement.cash_from_financing_activities,
                ),
            ],
            sections: vec![
                SectionView::activities(
                    "Operating Activities",
                    "green",
                    &statement.operating_activities_details,
                    statement.cash_from_operating_activities,
                ),
                SectionView::activities(
                    "Investing Activities",
                    "blue",
                    &statement.investing_activities_details,
                    statement.cash_from_investing_activities,
                ),
                SectionView::activities(
                    "Financing Activities",
                    "purple",
                    &statement.financing_activities_details,
                    statement.cash_from_financing_activities,
                ),
            ]
            .into_iter()
            .filter(|section| !section.lines.is_empty())
            .collect(),
            summary: vec![
                Figure::new("Net Increase in Cash", statement.net_increase_in_cash),
                Figure::new("Beginning Cash Balance", statement.beginning_cash_balance),
            ],
            grand_total: Figure::new("Ending Cash Balance", statement.ending_cash_balance),
        }
    }
}

pub struct Tab {
    pub href: String,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Template)]
#[template(path = "statements.html")]
pub struct StatementsTemplate {
    pub layout: Layout,
    pub kind: StatementKind,
    pub tabs: Vec<Tab>,
    pub has_selection: bool,
    pub statement: Option<StatementView>,
    pub error: Option<String>,
}

impl StatementsTemplate {
    pub fn empty_title(&self) -> String {
        format!("No {} data", self.kind.title().to_lowercase())
    }
}

#[derive(Template)]
#[template(path = "print.html")]
pub struct PrintTemplate {
    pub title: &'static str,
    pub ledger: String,
    pub generated: String,
    pub statement: StatementView,
}

/// Date stamp printed under the title of exported statements.
fn generated_today() -> String {
    format_date(&chrono::Utc::now())
}

fn tabs(active: StatementKind) -> Vec<Tab> {
    StatementKind::ALL
        .iter()
        .map(|kind| Tab {
            href: format!("/statements/{}", kind.slug()),
            label: match kind {
                StatementKind::CashFlow => "Cash Flow",
                other => other.title(),
            },
            active: *kind == active,
        })
        .collect()
}

/// Load one statement for `scope`, returning the resources and any load error.
async fn fetch(
    state: &AppState,
    current: &CurrentUser,
    kind: StatementKind,
    scope: LedgerScope,
) -> (Statements, Option<String>) {
    let statements = Statements::new(state.remote(Some(current.token.clone())));
    statements.load(kind, Some(scope)).await;
    let error = match kind {
        StatementKind::BalanceSheet => statements.balance_sheet().error,
        StatementKind::IncomeStatement => statements.income_statement().error,
        StatementKind::CashFlow => statements.cash_flow().error,
    };
    (statements, error)
}

fn view_of(statements: &Statements, kind: StatementKind) -> Option<StatementView> {
    match kind {
        StatementKind::BalanceSheet => statements
            .balance_sheet()
            .value
            .as_ref()
            .map(StatementView::from),
        StatementKind::IncomeStatement => statements
            .income_statement()
            .value
            .as_ref()
            .map(StatementView::from),
        StatementKind::CashFlow => statements
            .cash_flow()
            .value
            .as_ref()
            .map(StatementView::from),
    }
}

pub async fn statements_index() -> Redirect {
    Redirect::to("/statements/balance-sheet")
}

pub async fn statement_page(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Path(kind): Path<StatementKind>,
) -> Response {
    let mut storage = state.storage(jar);
    let layout = Layout::new(&current, "/statements", &mut storage);

    let (statement, error) = match layout.selection.ledger_scope() {
        Some(scope) => {
            let (statements, error) = fetch(&state, &current, kind, scope).await;
            (view_of(&statements, kind), error)
        }
        None => (None, None),
    };

    let page = StatementsTemplate {
        has_selection: layout.selection.ledger_scope().is_some(),
        layout,
        kind,
        tabs: tabs(kind),
        statement,
        error,
    };
    (storage.into_jar(), page).into_response()
}

/// Download the statement as pretty-printed JSON.
pub async fn export_statement(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Path(kind): Path<StatementKind>,
) -> Result<Response, AppError> {
    let mut storage = state.storage(jar);
    let Some(scope) = SelectionContext::hydrate(&mut storage).ledger_scope() else {
        return Ok(nothing_to(storage, kind, "export"));
    };

    let (statements, _) = fetch(&state, &current, kind, scope.clone()).await;
    let file_name = export_file_name(kind, &scope.ledger, "json");
    let response = match kind {
        StatementKind::BalanceSheet => statements
            .balance_sheet()
            .value
            .map(|statement| json_attachment(&file_name, &statement)),
        StatementKind::IncomeStatement => statements
            .income_statement()
            .value
            .map(|statement| json_attachment(&file_name, &statement)),
        StatementKind::CashFlow => statements
            .cash_flow()
            .value
            .map(|statement| json_attachment(&file_name, &statement)),
    };

    match response {
        Some(response) => {
            tracing::info!(statement = kind.slug(), ledger = %scope.ledger, "Statement exported");
            response
        }
        None => Ok(nothing_to(storage, kind, "export")),
    }
}

/// Standalone page holding only the statement; it opens the print dialog on load.
pub async fn print_statement(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Path(kind): Path<StatementKind>,
) -> Response {
    let mut storage = state.storage(jar);
    let Some(scope) = SelectionContext::hydrate(&mut storage).ledger_scope() else {
        return nothing_to(storage, kind, "print");
    };

    let (statements, _) = fetch(&state, &current, kind, scope.clone()).await;
    match view_of(&statements, kind) {
        Some(statement) => PrintTemplate {
            title: kind.title(),
            ledger: scope.ledger,
            generated: generated_today(),
            statement,
        }
        .into_response(),
        None => nothing_to(storage, kind, "print"),
    }
}

/// Download the statement as an A4 PDF.
pub async fn pdf_statement(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Path(kind): Path<StatementKind>,
) -> Result<Response, AppError> {
    let mut storage = state.storage(jar);
    let Some(scope) = SelectionContext::hydrate(&mut storage).ledger_scope() else {
        return Ok(nothing_to(storage, kind, "export"));
    };

    let (statements, _) = fetch(&state, &current, kind, scope.clone()).await;
    let Some(statement) = view_of(&statements, kind) else {
        return Ok(nothing_to(storage, kind, "export"));
    };

    let bytes = pdf::render_statement(&statement, &scope.ledger, &generated_today())?;
    tracing::info!(
        statement = kind.slug(),
        ledger = %scope.ledger,
        size = bytes.len(),
        "Statement PDF exported"
    );
    Ok(pdf_attachment(
        &export_file_name(kind, &scope.ledger, "pdf"),
        bytes,
    ))
}

fn nothing_to(mut storage: CookieStorage, kind: StatementKind, action: &str) -> Response {
    Flash::Error(format!("No {} data to {}", kind.title(), action)).store(&mut storage);
    see_other(storage, &format!("/statements/{}", kind.slug()))
}
