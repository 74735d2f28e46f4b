//! Session lifecycle: restore, login, registration, logout, profile and password changes.

use async_trait::async_trait;
use console_core::error::ApiError;
use std::sync::Arc;

use crate::models::{AuthResponse, ProfileUpdate, Registration, User};
use crate::storage::{Expiry, Storage, TOKEN_KEY};

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Resolve the user a token belongs to; fails when the token is rejected.
    async fn profile(&self, token: &str) -> Result<User, ApiError>;
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError>;
    async fn change_password(
        &self,
        token: Option<&str>,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError>;
    async fn update_profile(
        &self,
        token: Option<&str>,
        update: &ProfileUpdate,
    ) -> Result<User, ApiError>;
}

/// Signed-in user and token, backed by a [`Storage`] for the token.
pub struct AuthContext<S> {
    api: Arc<dyn AuthApi>,
    storage: S,
    token_ttl: chrono::Duration,
    user: Option<User>,
    token: Option<String>,
}

impl<S: Storage> AuthContext<S> {
    pub fn new(api: Arc<dyn AuthApi>, storage: S, token_ttl: chrono::Duration) -> Self {
        Self {
            api,
            storage,
            token_ttl,
            user: None,
            token: None,
        }
    }

    /// Context for a session already verified earlier in the request.
    pub fn resume(
        api: Arc<dyn AuthApi>,
        storage: S,
        token_ttl: chrono::Duration,
        user: User,
        token: String,
    ) -> Self {
        Self {
            api,
            storage,
            token_ttl,
            user: Some(user),
            token: Some(token),
        }
    }

    /// Verify a stored token against the API.
    ///
    /// Never fails: a rejected token (or an unreachable API) is removed from
    /// storage and the context stays signed out.
    pub async fn restore(&mut self) {
        let Some(token) = self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty()) else {
            return;
        };

        match self.api.profile(&token).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "Session restored");
                self.user = Some(user);
                self.token = Some(token);
            }
            Err(e) => {
                tracing::info!(error = %e, "Token verification failed, signing out");
                self.storage.delete(TOKEN_KEY);
                self.user = None;
                self.token = None;
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, ApiError> {
        let response = self.api.login(email, password).await?;
        tracing::info!(user_id = %response.user.id, "User logged in");
        Ok(self.establish(response))
    }

    pub async fn register(&mut self, registration: &Registration) -> Result<&User, ApiError> {
        let response = self.api.register(registration).await?;
        tracing::info!(user_id = %response.user.id, "User registered");
        Ok(self.establish(response))
    }

    /// Drop the session locally. No network call is made.
    pub fn logout(&mut self) {
        self.storage.delete(TOKEN_KEY);
        self.user = None;
        self.token = None;
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        self.api
            .change_password(self.token.as_deref(), current_password, new_password)
            .await
    }

    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<&User, ApiError> {
        let user = self
            .api
            .update_profile(self.token.as_deref(), update)
            .await?;
        let user: &User = self.user.insert(user);
        Ok(user)
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn establish(&mut self, response: AuthResponse) -> &User {
        self.storage
            .set(TOKEN_KEY, &response.token, Expiry::After(self.token_ttl));
        self.token = Some(response.token);
        self.user.insert(response.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeAuth {
        valid_token: Option<String>,
        calls: Mutex<Vec<String>>,
    }

    fn ada() -> User {
        User {
            id: "7".into(),
            email: "ada@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        }
    }

    fn unauthorized() -> ApiError {
        ApiError::Http {
            status: 401,
            body: "invalid token".into(),
        }
    }

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn profile(&self, token: &str) -> Result<User, ApiError> {
            self.calls.lock().unwrap().push(format!("profile {}", token));
            match &self.valid_token {
                Some(valid) if valid == token => Ok(ada()),
                _ => Err(unauthorized()),
            }
        }

        async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
            self.calls.lock().unwrap().push(format!("login {}", email));
            if password == "Secret1" {
                Ok(AuthResponse {
                    token: "tok-1".into(),
                    user: ada(),
                })
            } else {
                Err(unauthorized())
            }
        }

        async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
            Ok(AuthResponse {
                token: "tok-new".into(),
                user: User {
                    id: "8".into(),
                    email: registration.email.clone(),
                    first_name: registration.first_name.clone(),
                    last_name: registration.last_name.clone(),
                },
            })
        }

        async fn change_password(
            &self,
            token: Option<&str>,
            current_password: &str,
            _new_password: &str,
        ) -> Result<(), ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("change-password {:?}", token));
            if current_password == "Secret1" {
                Ok(())
            } else {
                Err(ApiError::Http {
                    status: 400,
                    body: "wrong password".into(),
                })
            }
        }

        async fn update_profile(
            &self,
            _token: Option<&str>,
            update: &ProfileUpdate,
        ) -> Result<User, ApiError> {
            Ok(User {
                first_name: update.first_name.clone(),
                last_name: update.last_name.clone(),
                ..ada()
            })
        }
    }

    fn context(api: FakeAuth, storage: MemoryStorage) -> AuthContext<MemoryStorage> {
        AuthContext::new(Arc::new(api), storage, chrono::Duration::days(7))
    }

    #[tokio::test]
    async fn restore_without_token_stays_signed_out_without_calling_api() {
        let api = Arc::new(FakeAuth::default());
        let mut auth = AuthContext::new(
            api.clone() as Arc<dyn AuthApi>,
            MemoryStorage::new(),
            chrono::Duration::days(7),
        );

        auth.restore().await;

        assert!(!auth.is_signed_in());
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_token_signs_out_and_is_removed() {
        let mut storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "expired", Expiry::Session);
        let mut auth = context(
            FakeAuth {
                valid_token: Some("fresh".into()),
                ..Default::default()
            },
            storage,
        );

        auth.restore().await;

        assert_eq!(auth.user(), None);
        assert_eq!(auth.token(), None);
        assert_eq!(auth.into_storage().get(TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn valid_token_restores_the_user() {
        let mut storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "fresh", Expiry::Session);
        let mut auth = context(
            FakeAuth {
                valid_token: Some("fresh".into()),
                ..Default::default()
            },
            storage,
        );

        auth.restore().await;

        assert_eq!(auth.user().map(|u| u.email.as_str()), Some("ada@example.com"));
        assert_eq!(auth.token(), Some("fresh"));
    }

    #[tokio::test]
    async fn login_stores_token_with_expiry() {
        let mut auth = context(FakeAuth::default(), MemoryStorage::new());

        let user = auth.login("ada@example.com", "Secret1").await.unwrap();
        assert_eq!(user.first_name, "Ada");

        let storage = auth.into_storage();
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok-1"));
        let expires = storage.expires_at(TOKEN_KEY).unwrap();
        assert!(expires > chrono::Utc::now() + chrono::Duration::days(6));
    }

    #[tokio::test]
    async fn failed_login_propagates_and_stores_nothing() {
        let mut auth = context(FakeAuth::default(), MemoryStorage::new());

        let err = auth.login("ada@example.com", "nope").await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(!auth.is_signed_in());
        assert_eq!(auth.into_storage().get(TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn register_signs_in() {
        let mut auth = context(FakeAuth::default(), MemoryStorage::new());
        let registration = Registration {
            email: "grace@example.com".into(),
            password: "Secret1".into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
        };

        auth.register(&registration).await.unwrap();

        assert_eq!(auth.user().map(|u| u.id.as_str()), Some("8"));
        assert_eq!(auth.token(), Some("tok-new"));
    }

    #[tokio::test]
    async fn logout_clears_everything() {
        let mut auth = context(FakeAuth::default(), MemoryStorage::new());
        auth.login("ada@example.com", "Secret1").await.unwrap();

        auth.logout();

        assert!(!auth.is_signed_in());
        assert_eq!(auth.token(), None);
        assert_eq!(auth.into_storage().get(TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn profile_update_replaces_user_and_password_errors_propagate() {
        let mut auth = context(FakeAuth::default(), MemoryStorage::new());
        auth.login("ada@example.com", "Secret1").await.unwrap();

        let updated = auth
            .update_profile(&ProfileUpdate {
                first_name: "Augusta".into(),
                last_name: "King".into(),
            })
            .await
            .unwrap();
        assert_eq!(updated.full_name(), "Augusta King");
        assert_eq!(auth.user().map(|u| u.first_name.as_str()), Some("Augusta"));

        let err = auth.change_password("wrong", "Newpass1").await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid request. Please check your input.");
        assert!(auth.change_password("Secret1", "Newpass1").await.is_ok());
    }
}
