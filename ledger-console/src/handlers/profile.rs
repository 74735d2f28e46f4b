use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::CookieJar;

use super::{see_other, Layout};
use crate::auth::AuthContext;
use crate::forms::{FormErrors, PasswordForm, ProfileForm, FORM_LEVEL};
use crate::middleware::session::CurrentUser;
use crate::storage::{CookieStorage, Flash};
use crate::AppState;

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub profile: ProfileForm,
    pub profile_errors: FormErrors,
    pub password_errors: FormErrors,
}

pub async fn profile_page(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
) -> Response {
    let mut storage = state.storage(jar);
    let layout = Layout::new(&current, "/profile", &mut storage);
    let profile = ProfileForm {
        first_name: current.user.first_name.clone(),
        last_name: current.user.last_name.clone(),
    };
    let page = ProfileTemplate {
        layout,
        profile,
        profile_errors: FormErrors::new(),
        password_errors: FormErrors::new(),
    };
    (storage.into_jar(), page).into_response()
}

pub async fn update_profile_handler(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Form(form): Form<ProfileForm>,
) -> Response {
    let mut storage = state.storage(jar);
    let update = match form.clone().into_update() {
        Ok(update) => update,
        Err(errors) => return rejected(&current, storage, form, errors, FormErrors::new()),
    };

    let mut auth = resume(&state, &current, &mut storage);
    let outcome = auth.update_profile(&update).await.map(|_| ());
    drop(auth);

    match outcome {
        Ok(()) => {
            Flash::Success("Profile updated successfully".into()).store(&mut storage);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to update profile");
            Flash::Error("Failed to update profile".into()).store(&mut storage);
        }
    }
    see_other(storage, "/profile")
}

pub async fn change_password_handler(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Form(form): Form<PasswordForm>,
) -> Response {
    let mut storage = state.storage(jar);
    let profile = ProfileForm {
        first_name: current.user.first_name.clone(),
        last_name: current.user.last_name.clone(),
    };
    if let Err(errors) = form.check() {
        return rejected(&current, storage, profile, FormErrors::new(), errors);
    }

    let auth = resume(&state, &current, &mut storage);
    let outcome = auth
        .change_password(&form.current_password, &form.new_password)
        .await;
    drop(auth);

    match outcome {
        Ok(()) => {
            Flash::Success("Password changed successfully".into()).store(&mut storage);
            see_other(storage, "/profile")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to change password");
            let mut errors = FormErrors::new();
            errors.insert(
                FORM_LEVEL,
                "Failed to change password. Please check your current password.",
            );
            rejected(&current, storage, profile, FormErrors::new(), errors)
        }
    }
}

fn resume<'a>(
    state: &AppState,
    current: &CurrentUser,
    storage: &'a mut CookieStorage,
) -> AuthContext<&'a mut CookieStorage> {
    AuthContext::resume(
        state.auth.clone(),
        storage,
        state.session.token_ttl(),
        current.user.clone(),
        current.token.clone(),
    )
}

fn rejected(
    current: &CurrentUser,
    mut storage: CookieStorage,
    profile: ProfileForm,
    profile_errors: FormErrors,
    password_errors: FormErrors,
) -> Response {
    let layout = Layout::new(current, "/profile", &mut storage);
    let page = ProfileTemplate {
        layout,
        profile,
        profile_errors,
        password_errors,
    };
    (storage.into_jar(), (StatusCode::UNPROCESSABLE_ENTITY, page)).into_response()
}
