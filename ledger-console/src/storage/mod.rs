//! Key/value persistence port for session and UI state.
//!
//! The web layer backs it with cookies; tests use [`MemoryStorage`].

pub mod cookie;
pub mod memory;

pub use cookie::CookieStorage;
pub use memory::MemoryStorage;

/// Session token issued by the auth endpoints.
pub const TOKEN_KEY: &str = "auth_token";
/// Identifier of the selected entity.
pub const SELECTED_ENTITY_KEY: &str = "selectedEntity";
/// Name of the selected ledger.
pub const SELECTED_LEDGER_KEY: &str = "selectedLedger";
/// One-shot notice shown on the next rendered page.
pub const FLASH_KEY: &str = "flash";

/// How long a stored value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Until the browser session ends.
    Session,
    After(chrono::Duration),
}

pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str, expiry: Expiry);
    fn delete(&mut self, key: &str);
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str, expiry: Expiry) {
        (**self).set(key, value, expiry)
    }

    fn delete(&mut self, key: &str) {
        (**self).delete(key)
    }
}

/// Flash notices carry a severity prefix so the page can style them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Error(String),
}

impl Flash {
    pub fn message(&self) -> &str {
        match self {
            Flash::Success(m) | Flash::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Flash::Error(_))
    }

    pub fn store<S: Storage>(&self, storage: &mut S) {
        let encoded = match self {
            Flash::Success(m) => format!("success:{}", m),
            Flash::Error(m) => format!("error:{}", m),
        };
        storage.set(FLASH_KEY, &encoded, Expiry::Session);
    }

    /// Read and clear the pending notice.
    pub fn take<S: Storage>(storage: &mut S) -> Option<Flash> {
        let raw = storage.get(FLASH_KEY)?;
        storage.delete(FLASH_KEY);
        match raw.split_once(':') {
            Some(("error", message)) => Some(Flash::Error(message.to_string())),
            Some(("success", message)) => Some(Flash::Success(message.to_string())),
            _ => Some(Flash::Success(raw)),
        }
    }
}
