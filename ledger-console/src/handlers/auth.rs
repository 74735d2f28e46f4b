use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::CookieJar;

use super::see_other;
use crate::auth::AuthContext;
use crate::forms::{FormErrors, LoginForm, RegisterForm, FORM_LEVEL};
use crate::middleware::session::Session;
use crate::storage::Flash;
use crate::AppState;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub form: LoginForm,
    pub errors: FormErrors,
    pub flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub form: RegisterForm,
    pub errors: FormErrors,
}

pub async fn login_page(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
) -> Response {
    if session.user.is_some() {
        return Redirect::to("/").into_response();
    }
    let mut storage = state.storage(jar);
    let flash = Flash::take(&mut storage);
    let page = LoginTemplate {
        form: LoginForm::default(),
        errors: FormErrors::new(),
        flash,
    };
    (storage.into_jar(), page).into_response()
}

pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(mut form): Form<LoginForm>,
) -> Response {
    if let Err(errors) = form.check() {
        form.password.clear();
        return rejected_login(form, errors);
    }

    let mut auth = AuthContext::new(
        state.auth.clone(),
        state.storage(jar),
        state.session.token_ttl(),
    );
    match auth.login(form.email.trim(), &form.password).await {
        Ok(_) => {
            let mut storage = auth.into_storage();
            Flash::Success("You have been successfully signed in.".into()).store(&mut storage);
            see_other(storage, "/")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sign in failed");
            let mut errors = FormErrors::new();
            errors.insert(FORM_LEVEL, e.user_message());
            form.password.clear();
            rejected_login(form, errors)
        }
    }
}

fn rejected_login(form: LoginForm, errors: FormErrors) -> Response {
    let page = LoginTemplate {
        form,
        errors,
        flash: None,
    };
    (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
}

pub async fn register_page(Extension(session): Extension<Session>) -> Response {
    if session.user.is_some() {
        return Redirect::to("/").into_response();
    }
    RegisterTemplate {
        form: RegisterForm::default(),
        errors: FormErrors::new(),
    }
    .into_response()
}

pub async fn register_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let mut shown = form.clone();
    shown.password.clear();
    shown.confirm_password.clear();

    let registration = match form.into_registration() {
        Ok(registration) => registration,
        Err(errors) => return rejected_registration(shown, errors),
    };

    let mut auth = AuthContext::new(
        state.auth.clone(),
        state.storage(jar),
        state.session.token_ttl(),
    );
    match auth.register(&registration).await {
        Ok(_) => {
            let mut storage = auth.into_storage();
            Flash::Success("Account created successfully!".into()).store(&mut storage);
            see_other(storage, "/")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            let mut errors = FormErrors::new();
            errors.insert(FORM_LEVEL, e.user_message());
            rejected_registration(shown, errors)
        }
    }
}

fn rejected_registration(form: RegisterForm, errors: FormErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        RegisterTemplate { form, errors },
    )
        .into_response()
}

/// Sign out locally; the API is not told.
pub async fn logout_handler(State(state): State<AppState>, jar: CookieJar) -> Response {
    let mut auth = AuthContext::new(
        state.auth.clone(),
        state.storage(jar),
        state.session.token_ttl(),
    );
    auth.logout();
    let mut storage = auth.into_storage();
    Flash::Success("You have been successfully logged out".into()).store(&mut storage);
    see_other(storage, "/login")
}
