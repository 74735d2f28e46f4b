use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::{badge, post_button, see_other, Layout};
use crate::forms::{FormErrors, LedgerForm};
use crate::middleware::session::CurrentUser;
use crate::models::Ledger;
use crate::resources::ledgers::Ledgers;
use crate::selection::SelectionContext;
use crate::storage::{CookieStorage, Flash};
use crate::table::{
    AddAction, CellValue, Column, DataTable, EmptyState, Markup, TableQuery, TableView,
};
use crate::AppState;

#[derive(Template)]
#[template(path = "ledgers.html")]
pub struct LedgersTemplate {
    pub layout: Layout,
    /// `None` until an entity is selected.
    pub table: Option<TableView>,
    pub error: Option<String>,
    pub form: LedgerForm,
    pub errors: FormErrors,
    pub form_open: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChartRequest {
    pub ledger_name: String,
}

pub fn ledger_table(selected: Option<String>) -> DataTable<Ledger> {
    DataTable::new(vec![
        Column::new("ledger_name", "Ledger Name", |l: &Ledger| {
            CellValue::from(&l.ledger_name)
        })
        .sortable()
        .searchable()
        .render(|value, _| {
            Markup::raw(format!(
                r#"<span class="strong">{}</span>"#,
                Markup::text(&value.to_string())
            ))
        }),
        Column::new("posted", "Posted", |l: &Ledger| CellValue::from(l.posted)).render(|_, l| {
            if l.posted {
                badge("Posted", "badge-default")
            } else {
                badge("Draft", "badge-secondary")
            }
        }),
        Column::new("locked", "Locked", |l: &Ledger| CellValue::from(l.locked)).render(|_, l| {
            if l.locked {
                Markup::raw(r#"<span class="icon icon-lock" aria-hidden="true"></span> Yes"#)
            } else {
                Markup::raw(r#"<span class="muted">No</span>"#)
            }
        }),
        Column::new("hidden", "Visibility", |l: &Ledger| CellValue::from(l.hidden)).render(
            |_, l| {
                if l.hidden {
                    Markup::raw("Hidden")
                } else {
                    Markup::raw("Visible")
                }
            },
        ),
        Column::actions("Actions", move |l: &Ledger| {
            let select = if selected.as_deref() == Some(l.ledger_name.as_str()) {
                badge("Selected", "badge-selected")
            } else {
                post_button(
                    "/selection/ledger",
                    "ledger",
                    &l.ledger_name,
                    "/ledgers",
                    "Select Ledger",
                )
            };
            let chart = post_button(
                "/ledgers/chart-of-accounts",
                "ledger_name",
                &l.ledger_name,
                "/ledgers",
                "Generate Chart",
            );
            Markup::raw(format!(r#"<div class="row-actions">{}{}</div>"#, select, chart))
        }),
    ])
    .title("Ledgers")
    .description("Manage ledgers for the selected entity")
    .search_placeholder("Search ledgers...")
    .add_action(AddAction::new("Create Ledger", "#new-ledger"))
    .empty_state(
        EmptyState::new(
            "No ledgers found",
            "Create your first ledger to start recording transactions",
        )
        .icon("book-open"),
    )
    .row_key(|l| l.uuid.clone())
}

pub async fn ledgers_page(
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
        LedgerForm::default(),
        FormErrors::new(),
    )
    .await
}

pub async fn create_ledger_handler(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Form(form): Form<LedgerForm>,
) -> Response {
    let mut storage = state.storage(jar);
    let ledger = match form.clone().into_new_ledger() {
        Ok(ledger) => ledger,
        Err(errors) => {
            return render(&state, &current, storage, &TableQuery::default(), form, errors).await
        }
    };

    let entity = SelectionContext::hydrate(&mut storage).current().entity.clone();
    let ledgers = Ledgers::new(state.remote(Some(current.token.clone())));
    match ledgers.add(entity.as_deref(), &ledger).await {
        Ok(created) => {
            tracing::info!(ledger = %created.ledger_name, "Ledger created");
            Flash::Success("Ledger created successfully".into()).store(&mut storage);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create ledger");
            Flash::Error("Failed to create ledger".into()).store(&mut storage);
        }
    }
    see_other(storage, "/ledgers")
}

pub async fn chart_of_accounts_handler(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Form(request): Form<ChartRequest>,
) -> Response {
    let mut storage = state.storage(jar);
    let entity = SelectionContext::hydrate(&mut storage).current().entity.clone();

    let ledgers = Ledgers::new(state.remote(Some(current.token.clone())));
    match ledgers
        .generate_chart_of_accounts(entity.as_deref(), &request.ledger_name)
        .await
    {
        Ok(_) => {
            tracing::info!(ledger = %request.ledger_name, "Chart of accounts generated");
            Flash::Success("Chart of accounts created successfully".into()).store(&mut storage);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create chart of accounts");
            Flash::Error("Failed to create chart of accounts".into()).store(&mut storage);
        }
    }
    see_other(storage, "/ledgers")
}

async fn render(
    state: &AppState,
    current: &CurrentUser,
    mut storage: CookieStorage,
    query: &TableQuery,
    form: LedgerForm,
    errors: FormErrors,
) -> Response {
    let layout = Layout::new(current, "/ledgers", &mut storage);
    let entity = layout.selection.entity.clone();

    let ledgers = Ledgers::new(state.remote(Some(current.token.clone())));
    ledgers.load(entity.as_deref()).await;
    let snapshot = ledgers.snapshot();

    let table = entity.as_ref().map(|_| {
        ledger_table(layout.selection.ledger.clone()).view(
            &snapshot.value,
            query,
            snapshot.is_loading(),
        )
    });
    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    let page = LedgersTemplate {
        layout,
        table,
        error: snapshot.error,
        form_open: !errors.is_empty(),
        form,
        errors,
    };
    (storage.into_jar(), (status, page)).into_response()
}
