//! Fetch-on-demand wrappers binding a domain collection to the accounting API.
//!
//! Every wrapper shares the [`Resource`] lifecycle: a value that starts at its
//! default, a [`LoadStatus`], the last user-facing error, and the scope the
//! value was fetched for.

pub mod accounts;
pub mod entities;
pub mod ledgers;
pub mod statements;
pub mod transactions;

pub use accounts::{AccountBalancesResource, Accounts, AllAccounts, ChartOfAccounts};
pub use entities::Entities;
pub use ledgers::Ledgers;
pub use statements::Statements;
pub use transactions::Transactions;

use console_core::error::ApiError;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::services::accounting::AccountingApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }
}

/// Owned copy of a resource's state, for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub value: T,
    pub status: LoadStatus,
    pub error: Option<String>,
}

impl<T> Snapshot<T> {
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }
}

#[derive(Debug)]
struct State<K, T> {
    value: T,
    status: LoadStatus,
    error: Option<String>,
    scope: Option<K>,
    epoch: u64,
}

/// A remotely loaded value keyed by the scope it was fetched for.
///
/// Each fetch takes a fresh epoch; a response arriving after a newer fetch has
/// started is dropped, so a slow reply for an old scope can never overwrite
/// the value for the current one.
#[derive(Debug)]
pub struct Resource<K, T> {
    state: Arc<Mutex<State<K, T>>>,
}

impl<K, T> Clone for Resource<K, T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<K, T: Default> Default for Resource<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T: Default> Resource<K, T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                value: T::default(),
                status: LoadStatus::Idle,
                error: None,
                scope: None,
                epoch: 0,
            })),
        }
    }
}

impl<K, T> Resource<K, T>
where
    K: Clone + PartialEq,
    T: Clone,
{
    /// Fetch for `scope` unless it is absent or already fetched.
    pub async fn sync<F, Fut>(&self, scope: Option<K>, fetch: F)
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let Some(scope) = scope else {
            return;
        };
        if self.lock().scope.as_ref() == Some(&scope) {
            return;
        }
        self.run(scope, fetch).await;
    }

    /// Fetch again for the scope recorded by the last [`sync`](Self::sync).
    pub async fn reload<F, Fut>(&self, fetch: F)
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let scope = self.lock().scope.clone();
        if let Some(scope) = scope {
            self.run(scope, fetch).await;
        }
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        let state = self.lock();
        Snapshot {
            value: state.value.clone(),
            status: state.status,
            error: state.error.clone(),
        }
    }

    pub fn value(&self) -> T {
        self.lock().value.clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.lock().status
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn scope(&self) -> Option<K> {
        self.lock().scope.clone()
    }

    async fn run<F, Fut>(&self, scope: K, fetch: F)
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let epoch = {
            let mut state = self.lock();
            state.epoch += 1;
            state.scope = Some(scope.clone());
            state.status = LoadStatus::Loading;
            state.error = None;
            state.epoch
        };

        let result = fetch(scope).await;

        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!(epoch, latest = state.epoch, "Discarding stale response");
            return;
        }
        match result {
            Ok(value) => {
                state.value = value;
                state.status = LoadStatus::Success;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load resource");
                state.status = LoadStatus::Error;
                state.error = Some(e.user_message());
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<K, T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, R> Resource<K, Vec<R>>
where
    K: Clone + PartialEq,
    R: Clone,
{
    /// Run a create call and append its result.
    ///
    /// The collection is not re-fetched. A failure is returned to the caller
    /// and leaves the collection as it was.
    pub async fn create<Fut>(&self, create: Fut) -> Result<R, ApiError>
    where
        Fut: Future<Output = Result<R, ApiError>>,
    {
        let created = create.await?;
        self.lock().value.push(created.clone());
        Ok(created)
    }
}

/// API handle plus the caller's session token, shared by the per-type wrappers.
#[derive(Clone)]
pub struct Remote {
    pub api: Arc<dyn AccountingApi>,
    pub token: Option<String>,
}

impl Remote {
    pub fn new(api: Arc<dyn AccountingApi>, token: Option<String>) -> Self {
        Self { api, token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    fn not_found() -> ApiError {
        ApiError::Http {
            status: 404,
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn starts_idle_and_empty() {
        let resource: Resource<String, Vec<u32>> = Resource::new();
        let snapshot = resource.snapshot();
        assert_eq!(snapshot.status, LoadStatus::Idle);
        assert!(snapshot.value.is_empty());
        assert_eq!(snapshot.error, None);
    }

    #[tokio::test]
    async fn absent_scope_is_a_no_op() {
        let resource: Resource<String, Vec<u32>> = Resource::new();
        let mut called = false;
        resource
            .sync(None, |_| {
                called = true;
                async { Ok(vec![1]) }
            })
            .await;

        assert!(!called);
        assert_eq!(resource.status(), LoadStatus::Idle);
    }

    #[tokio::test]
    async fn fetches_once_per_scope_value() {
        let resource: Resource<String, Vec<u32>> = Resource::new();
        let mut calls = 0;

        for scope in ["E1", "E1", "E2"] {
            resource
                .sync(Some(scope.to_string()), |s| {
                    calls += 1;
                    let n = if s == "E1" { 1 } else { 2 };
                    async move { Ok(vec![n]) }
                })
                .await;
        }

        assert_eq!(calls, 2);
        assert_eq!(resource.value(), vec![2]);
        assert_eq!(resource.status(), LoadStatus::Success);
        assert_eq!(resource.scope().as_deref(), Some("E2"));
    }

    #[tokio::test]
    async fn failure_keeps_previous_value() {
        let resource: Resource<String, Vec<u32>> = Resource::new();
        resource
            .sync(Some("E1".into()), |_| async { Ok(vec![1, 2]) })
            .await;

        resource.reload(|_| async { Err(not_found()) }).await;

        let snapshot = resource.snapshot();
        assert_eq!(snapshot.status, LoadStatus::Error);
        assert_eq!(snapshot.error.as_deref(), Some("Resource not found."));
        assert_eq!(snapshot.value, vec![1, 2]);
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let resource: Resource<String, Vec<&'static str>> = Resource::new();
        let (slow_tx, slow_rx) = oneshot::channel::<Vec<&'static str>>();

        let slow = {
            let resource = resource.clone();
            tokio::spawn(async move {
                resource
                    .sync(Some("E1".to_string()), |_| async move {
                        Ok(slow_rx.await.unwrap_or_default())
                    })
                    .await;
            })
        };
        tokio::task::yield_now().await;
        while resource.status() != LoadStatus::Loading {
            tokio::task::yield_now().await;
        }

        resource
            .sync(Some("E2".to_string()), |_| async { Ok(vec!["globex"]) })
            .await;
        slow_tx.send(vec!["acme"]).unwrap();
        slow.await.unwrap();

        assert_eq!(resource.value(), vec!["globex"]);
        assert_eq!(resource.scope().as_deref(), Some("E2"));
        assert_eq!(resource.status(), LoadStatus::Success);
    }

    #[tokio::test]
    async fn create_appends_exactly_once() {
        let resource: Resource<(), Vec<u32>> = Resource::new();
        resource.sync(Some(()), |_| async { Ok(vec![1]) }).await;

        let created = resource.create(async { Ok(2) }).await.unwrap();

        assert_eq!(created, 2);
        assert_eq!(resource.value(), vec![1, 2]);
    }

    #[tokio::test]
    async fn failed_create_propagates_and_leaves_collection() {
        let resource: Resource<(), Vec<u32>> = Resource::new();
        resource.sync(Some(()), |_| async { Ok(vec![1]) }).await;

        let duplicate = ApiError::Http {
            status: 400,
            body: "duplicate".into(),
        };
        let err = resource.create(async { Err(duplicate) }).await.unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(resource.value(), vec![1]);
        assert_eq!(resource.status(), LoadStatus::Success);
    }
}
