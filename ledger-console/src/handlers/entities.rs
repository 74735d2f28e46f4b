use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::CookieJar;

use super::{badge, post_button, see_other, Layout};
use crate::forms::{EntityForm, FormErrors};
use crate::middleware::session::CurrentUser;
use crate::models::Entity;
use crate::resources::entities::Entities;
use crate::storage::{CookieStorage, Flash};
use crate::table::{AddAction, CellValue, Column, DataTable, EmptyState, TableQuery, TableView};
use crate::AppState;

#[derive(Template)]
#[template(path = "entities.html")]
pub struct EntitiesTemplate {
    pub layout: Layout,
    pub table: TableView,
    pub error: Option<String>,
    pub form: EntityForm,
    pub errors: FormErrors,
    pub form_open: bool,
}

pub struct MonthOption {
    pub value: u8,
    pub name: &'static str,
    pub selected: bool,
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl EntitiesTemplate {
    /// Options for the fiscal-year start picker.
    pub fn months(&self) -> Vec<MonthOption> {
        (1..=12u8)
            .zip(MONTHS)
            .map(|(value, name)| MonthOption {
                value,
                name,
                selected: value == self.form.fy_start_month,
            })
            .collect()
    }
}

pub fn entity_table(selected: Option<String>) -> DataTable<Entity> {
    DataTable::new(vec![
        Column::new("name", "Name", |e: &Entity| CellValue::from(&e.name))
            .sortable()
            .searchable(),
        Column::new("email", "Email", |e: &Entity| CellValue::from(e.email.clone()))
            .sortable()
            .searchable(),
        Column::new("phone", "Phone", |e: &Entity| CellValue::from(e.phone.clone())).searchable(),
        Column::new("location", "Location", |e: &Entity| CellValue::from(e.location()))
            .sortable()
            .searchable(),
        Column::new("accrual_method", "Method", |e: &Entity| CellValue::from(e.accrual_method))
            .sortable()
            .render(|_, e| {
                if e.accrual_method {
                    badge("Accrual", "badge-default")
                } else {
                    badge("Cash", "badge-secondary")
                }
            }),
        Column::new("hidden", "Status", |e: &Entity| CellValue::from(e.hidden))
            .sortable()
            .render(|_, e| {
                if e.hidden {
                    badge("Hidden", "badge-secondary")
                } else {
                    badge("Active", "badge-default")
                }
            }),
        Column::actions("Actions", move |e: &Entity| {
            if selected.as_deref() == Some(e.uuid.as_str()) {
                badge("Selected", "badge-selected")
            } else {
                post_button("/selection/entity", "entity", &e.uuid, "/entities", "Select")
            }
        }),
    ])
    .title("Entities")
    .description("Manage your business entities and organizations")
    .search_placeholder("Search entities...")
    .add_action(AddAction::new("Create Entity", "#new-entity"))
    .empty_state(
        EmptyState::new("No entities found", "Get started by creating your first entity")
            .icon("building"),
    )
    .row_key(|e| e.uuid.clone())
}

pub async fn entities_page(
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
        EntityForm::default(),
        FormErrors::new(),
    )
    .await
}

pub async fn create_entity_handler(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Form(form): Form<EntityForm>,
) -> Response {
    let mut storage = state.storage(jar);
    let entity = match form.clone().into_new_entity() {
        Ok(entity) => entity,
        Err(errors) => {
            return render(&state, &current, storage, &TableQuery::default(), form, errors).await
        }
    };

    let entities = Entities::new(state.remote(Some(current.token.clone())));
    match entities.add(&entity).await {
        Ok(created) => {
            tracing::info!(entity_id = %created.uuid, "Entity created");
            Flash::Success("Entity created successfully".into()).store(&mut storage);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create entity");
            Flash::Error("Failed to create entity".into()).store(&mut storage);
        }
    }
    see_other(storage, "/entities")
}

async fn render(
    state: &AppState,
    current: &CurrentUser,
    mut storage: CookieStorage,
    query: &TableQuery,
    form: EntityForm,
    errors: FormErrors,
) -> Response {
    let layout = Layout::new(current, "/entities", &mut storage);
    let entities = Entities::new(state.remote(Some(current.token.clone())));
    entities.load().await;
    let snapshot = entities.snapshot();

    let table = entity_table(layout.selection.entity.clone()).view(
        &snapshot.value,
        query,
        snapshot.is_loading(),
    );
    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    let page = EntitiesTemplate {
        layout,
        table,
        error: snapshot.error,
        form_open: !errors.is_empty(),
        form,
        errors,
    };
    (storage.into_jar(), (status, page)).into_response()
}
