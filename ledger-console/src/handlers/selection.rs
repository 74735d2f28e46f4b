use axum::{extract::State, response::Response, Form};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::{local_path, see_other};
use crate::middleware::session::CurrentUser;
use crate::selection::SelectionContext;
use crate::storage::Flash;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectEntity {
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectLedger {
    #[serde(default)]
    pub ledger: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Choosing an entity always drops the ledger choice.
pub async fn select_entity(
    State(state): State<AppState>,
    _current: CurrentUser,
    jar: CookieJar,
    Form(form): Form<SelectEntity>,
) -> Response {
    let mut selection = SelectionContext::hydrate(state.storage(jar));
    selection.set_entity(form.entity.clone());

    let mut storage = selection.into_storage();
    if form.entity.as_deref().is_some_and(|e| !e.trim().is_empty()) {
        Flash::Success("You can now manage ledgers for this entity".into()).store(&mut storage);
    }
    see_other(storage, &local_path(form.next.as_deref(), "/entities"))
}

pub async fn select_ledger(
    State(state): State<AppState>,
    _current: CurrentUser,
    jar: CookieJar,
    Form(form): Form<SelectLedger>,
) -> Response {
    let mut selection = SelectionContext::hydrate(state.storage(jar));
    selection.set_ledger(form.ledger.clone());

    let mut storage = selection.into_storage();
    if form.ledger.as_deref().is_some_and(|l| !l.trim().is_empty()) {
        Flash::Success("You can now manage accounts and transactions for this ledger".into())
            .store(&mut storage);
    }
    see_other(storage, &local_path(form.next.as_deref(), "/ledgers"))
}
