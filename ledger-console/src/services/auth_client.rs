use async_trait::async_trait;
use console_core::error::ApiError;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::AuthApi;
use crate::models::{AuthResponse, ProfileUpdate, Registration, User};
use crate::services::api_client::ApiClient;

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn profile(&self, token: &str) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.get("/auth/profile", Some(token)).await?;
        Ok(envelope.user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.post("/auth/login", &Credentials { email, password }, None)
            .await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        self.post("/auth/register", registration, None).await
    }

    async fn change_password(
        &self,
        token: Option<&str>,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let body = json!({
            "currentPassword": current_password,
            "newPassword": new_password,
        });
        self.send(Method::POST, "/auth/change-password", Some(&body), token)
            .await
    }

    async fn update_profile(
        &self,
        token: Option<&str>,
        update: &ProfileUpdate,
    ) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.put("/auth/profile", update, token).await?;
        Ok(envelope.user)
    }
}
