use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::auth::AuthContext;
use crate::models::User;
use crate::storage::TOKEN_KEY;
use crate::AppState;

/// Outcome of session restoration, stored in request extensions.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

/// Restore the session from the token cookie before the handler runs.
///
/// A rejected token is dropped from the browser on the way out.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let mut auth = AuthContext::new(
        state.auth.clone(),
        state.storage(jar),
        state.session.token_ttl(),
    );
    auth.restore().await;

    let session = Session {
        user: auth.user().cloned(),
        token: auth.token().map(str::to_string),
    };
    request.extensions_mut().insert(session);
    let jar = auth.into_storage().into_jar();

    let response = next.run(request).await;
    if sets_cookie(&response, TOKEN_KEY) {
        // The handler signed someone in or out; its token cookie wins.
        return response;
    }
    (jar, response).into_response()
}

fn sets_cookie(response: &Response, name: &str) -> bool {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| {
            value
                .split_once('=')
                .is_some_and(|(key, _)| key.trim() == name)
        })
}

/// Signed-in user; extraction redirects to `/login` otherwise.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>() {
            Some(Session {
                user: Some(user),
                token: Some(token),
            }) => Ok(CurrentUser {
                user: user.clone(),
                token: token.clone(),
            }),
            _ => Err(Redirect::to("/login")),
        }
    }
}
