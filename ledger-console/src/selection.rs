//! The entity and ledger currently in focus, persisted across page loads.

use crate::models::LedgerScope;
use crate::storage::{Expiry, Storage, SELECTED_ENTITY_KEY, SELECTED_LEDGER_KEY};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub entity: Option<String>,
    pub ledger: Option<String>,
}

impl Selection {
    pub fn ledger_scope(&self) -> Option<LedgerScope> {
        match (&self.entity, &self.ledger) {
            (Some(entity), Some(ledger)) => Some(LedgerScope::new(entity.clone(), ledger.clone())),
            _ => None,
        }
    }
}

/// Selection state mirrored into a [`Storage`] on every change.
///
/// A ledger only means something under its entity, so any entity change
/// (including re-selecting the same one, or clearing it) drops the ledger.
pub struct SelectionContext<S> {
    storage: S,
    current: Selection,
}

impl<S: Storage> SelectionContext<S> {
    /// Restore the selection saved by an earlier page load.
    pub fn hydrate(storage: S) -> Self {
        let current = Selection {
            entity: non_empty(storage.get(SELECTED_ENTITY_KEY)),
            ledger: non_empty(storage.get(SELECTED_LEDGER_KEY)),
        };
        Self { storage, current }
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    pub fn ledger_scope(&self) -> Option<LedgerScope> {
        self.current.ledger_scope()
    }

    pub fn set_entity(&mut self, entity: Option<String>) {
        self.current.entity = non_empty(entity);
        self.current.ledger = None;
        tracing::debug!(entity = ?self.current.entity, "Entity selection changed");
        self.persist();
    }

    pub fn set_ledger(&mut self, ledger: Option<String>) {
        self.current.ledger = non_empty(ledger);
        tracing::debug!(ledger = ?self.current.ledger, "Ledger selection changed");
        self.persist();
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        write_slot(&mut self.storage, SELECTED_ENTITY_KEY, &self.current.entity);
        write_slot(&mut self.storage, SELECTED_LEDGER_KEY, &self.current.ledger);
    }
}

fn write_slot<S: Storage>(storage: &mut S, key: &str, value: &Option<String>) {
    match value {
        Some(v) => storage.set(key, v, Expiry::Session),
        None => storage.delete(key),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
