pub mod accounts;
pub mod app;
pub mod auth;
pub mod entities;
pub mod ledgers;
pub mod metrics;
pub mod profile;
pub mod selection;
pub mod statements;
pub mod transactions;

use axum::response::{IntoResponse, Redirect, Response};

use crate::format::short_id;
use crate::middleware::session::CurrentUser;
use crate::models::User;
use crate::selection::{Selection, SelectionContext};
use crate::storage::{CookieStorage, Flash};
use crate::table::Markup;

pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
}

pub const NAVIGATION: [NavItem; 6] = [
    NavItem { path: "/", label: "Dashboard" },
    NavItem { path: "/entities", label: "Entities" },
    NavItem { path: "/ledgers", label: "Ledgers" },
    NavItem { path: "/accounts", label: "Accounts" },
    NavItem { path: "/transactions", label: "Transactions" },
    NavItem { path: "/statements", label: "Financial Statements" },
];

pub struct NavLink {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Chrome shared by every signed-in page: navigation, user menu, selection and toast.
pub struct Layout {
    pub user: User,
    pub active: &'static str,
    pub flash: Option<Flash>,
    pub selection: Selection,
}

impl Layout {
    /// Consumes the pending flash notice from `storage`.
    pub fn new(current: &CurrentUser, active: &'static str, storage: &mut CookieStorage) -> Self {
        let flash = Flash::take(storage);
        let selection = SelectionContext::hydrate(&mut *storage).current().clone();
        Self {
            user: current.user.clone(),
            active,
            flash,
            selection,
        }
    }

    pub fn nav(&self) -> Vec<NavLink> {
        NAVIGATION
            .iter()
            .map(|item| NavLink {
                path: item.path,
                label: item.label,
                active: item.path == self.active,
            })
            .collect()
    }

    pub fn entity_label(&self) -> String {
        self.selection
            .entity
            .as_deref()
            .map(short_id)
            .unwrap_or_else(|| "No entity".to_string())
    }

    pub fn ledger_label(&self) -> &str {
        self.selection.ledger.as_deref().unwrap_or("No ledger")
    }
}

/// Small pill used for statuses and account types.
pub fn badge(label: &str, class: &str) -> Markup {
    Markup::raw(format!(
        r#"<span class="badge {}">{}</span>"#,
        class,
        Markup::text(label)
    ))
}

/// Inline form posting one hidden value; used for row actions.
pub fn post_button(action: &str, field: &str, value: &str, next: &str, label: &str) -> Markup {
    Markup::raw(format!(
        r#"<form class="inline-form" method="post" action="{action}"><input type="hidden" name="{field}" value="{value}"><input type="hidden" name="next" value="{next}"><button type="submit" class="button button-small">{label}</button></form>"#,
        action = action,
        field = field,
        value = Markup::text(value),
        next = Markup::text(next),
        label = Markup::text(label),
    ))
}

/// Post/redirect/get: send the browser to `to`, carrying cookie changes.
pub fn see_other(storage: CookieStorage, to: &str) -> Response {
    (storage.into_jar(), Redirect::to(to)).into_response()
}

/// Redirect targets posted by forms must stay on this site.
///
/// Browsers read `/\` like `//`, so a backslash anywhere is refused as well.
pub fn local_path(next: Option<&str>, fallback: &'static str) -> String {
    match next {
        Some(path) if is_local(path) => path.to_string(),
        _ => fallback.to_string(),
    }
}

fn is_local(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_local_redirects_are_followed() {
        assert_eq!(local_path(Some("/ledgers?q=a"), "/"), "/ledgers?q=a");
        assert_eq!(local_path(Some("//evil.example"), "/"), "/");
        assert_eq!(local_path(Some("https://evil.example"), "/entities"), "/entities");
        assert_eq!(local_path(None, "/entities"), "/entities");
    }

    #[test]
    fn backslash_redirects_are_refused() {
        assert_eq!(local_path(Some("/\\evil.example"), "/entities"), "/entities");
        assert_eq!(local_path(Some("/ledgers\\..\\x"), "/ledgers"), "/ledgers");
        assert_eq!(local_path(Some("/\tevil"), "/"), "/");
    }
}
