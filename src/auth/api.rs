use leptos::prelude::*;

use crate::forms::{FormOutcome, LoginData, PasswordChangeData, RegisterData};
use crate::models::users::SessionUser;

#[cfg(feature = "ssr")]
mod ssr_helpers {
    use leptos::prelude::*;

    use super::super::server::jwt;
    use super::super::types::to_server_error;
    use crate::media::MediaConfig;
    use crate::models::users::{Profile, SessionUser, User};

    pub fn session_view(user: &User, profile: &Profile, media: &MediaConfig) -> SessionUser {
        SessionUser {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            is_staff: user.is_staff,
            avatar_url: media.url_for(&profile.avatar),
        }
    }

    /// Mints a session token for the user and attaches it to the response.
    pub fn issue_session(user_id: i32, version: i32) -> Result<(), ServerFnError> {
        let token = jwt::generate_token(user_id, version).map_err(to_server_error)?;
        set_cookie_header(&jwt::create_session_cookie(&token))
    }

    pub fn drop_session() -> Result<(), ServerFnError> {
        set_cookie_header(&jwt::clear_session_cookie())
    }

    fn set_cookie_header(cookie: &axum_extra::extract::cookie::Cookie<'_>) -> Result<(), ServerFnError> {
        let response = expect_context::<leptos_axum::ResponseOptions>();
        let value = http::HeaderValue::from_str(&cookie.to_string())
            .map_err(|e| ServerFnError::new(format!("Cookie encoding error: {e}")))?;
        response.insert_header(http::header::SET_COOKIE, value);
        Ok(())
    }
}

/// Creates the account plus its empty profile and signs the new user in.
/// Validation failures come back as `FormOutcome::Invalid` rather than an
/// error response, so the form can render them field by field.
#[server(RegisterFn, "/api")]
pub async fn register(data: RegisterData) -> Result<FormOutcome<SessionUser>, ServerFnError> {
    use super::server::password;
    use super::to_server_error;
    use crate::forms::FieldErrors;
    use crate::models::users::{DuplicateField, NewUser, User, UserWriteError};
    use crate::state::{db_conn, media_config};
    use self::ssr_helpers::{issue_session, session_view};

    let mut errors = data.validate();
    let mut conn = db_conn().await?;

    if !errors.has("username")
        && User::username_taken(&data.username, &mut conn)
            .await
            .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?
    {
        errors.add("username", "A user with that username already exists.");
    }
    if !errors.has("email")
        && User::email_taken(&data.normalized_email(), None, &mut conn)
            .await
            .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?
    {
        errors.add("email", "A user with that email already exists.");
    }
    if !errors.is_empty() {
        return Ok(FormOutcome::Invalid(errors));
    }

    let new_user = NewUser {
        username: data.username.clone(),
        email: data.normalized_email(),
        password_hash: password::hash_password(&data.password1).map_err(to_server_error)?,
        first_name: data.first_name.clone(),
    };

    // The pre-checks race with concurrent registrations; the unique indexes
    // have the final word.
    let (user, profile) = match User::create_with_profile(new_user, &mut conn).await {
        Ok(pair) => pair,
        Err(UserWriteError::Duplicate(field)) => {
            let mut errors = FieldErrors::new();
            match field {
                DuplicateField::Username => {
                    errors.add("username", "A user with that username already exists.")
                }
                DuplicateField::Email => {
                    errors.add("email", "A user with that email already exists.")
                }
            }
            return Ok(FormOutcome::Invalid(errors));
        }
        Err(UserWriteError::Database(e)) => {
            log::error!("registration failed: {e}");
            return Err(ServerFnError::new("Database error"));
        }
    };

    log::info!("registered user {}", user.username);
    issue_session(user.id, user.token_version)?;

    let media = media_config()?;
    Ok(FormOutcome::Success(session_view(&user, &profile, &media)))
}

/// Credential check and session issue. Bad credentials are a form-level
/// message, never a field-specific hint.
#[server(LoginFn, "/api")]
pub async fn login(data: LoginData) -> Result<FormOutcome<SessionUser>, ServerFnError> {
    use super::server::password;
    use super::to_server_error;
    use crate::forms::FieldErrors;
    use crate::models::users::{Profile, User};
    use crate::state::{db_conn, media_config};
    use self::ssr_helpers::{issue_session, session_view};

    let errors = data.validate();
    if !errors.is_empty() {
        return Ok(FormOutcome::Invalid(errors));
    }

    let mut conn = db_conn().await?;

    let rejected = || {
        let mut errors = FieldErrors::new();
        errors.add_form("Invalid username or password.");
        Ok(FormOutcome::Invalid(errors))
    };

    let Some(user) = User::find_by_username(&data.username, &mut conn)
        .await
        .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?
    else {
        return rejected();
    };

    if !password::verify_password(&data.password, &user.password_hash).map_err(to_server_error)? {
        return rejected();
    }

    let profile = Profile::for_user(user.id, &mut conn)
        .await
        .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?
        .ok_or_else(|| ServerFnError::new("Account has no profile"))?;

    issue_session(user.id, user.token_version)?;
    log::info!("user {} signed in", user.username);

    let media = media_config()?;
    Ok(FormOutcome::Success(session_view(&user, &profile, &media)))
}

#[server(LogoutFn, "/api")]
pub async fn logout() -> Result<(), ServerFnError> {
    ssr_helpers::drop_session()
}

/// Resolves the current session, if any. Expired and superseded sessions
/// are indistinguishable from being signed out.
#[server(CurrentUserFn, "/api")]
pub async fn current_user() -> Result<Option<SessionUser>, ServerFnError> {
    use super::server::session;
    use crate::models::users::Profile;
    use crate::state::{db_conn, media_config};
    use self::ssr_helpers::session_view;

    let mut conn = db_conn().await?;
    let Some(user) = session::authenticate(&mut conn).await? else {
        return Ok(None);
    };

    let profile = Profile::for_user(user.id, &mut conn)
        .await
        .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?
        .ok_or_else(|| ServerFnError::new("Account has no profile"))?;

    let media = media_config()?;
    Ok(Some(session_view(&user, &profile, &media)))
}

/// Verifies the old password, stores the new hash, and rotates the token
/// version so every other session for this account goes stale. The current
/// browser gets a replacement cookie carrying the new version.
#[server(ChangePasswordFn, "/api")]
pub async fn change_password(
    data: PasswordChangeData,
) -> Result<FormOutcome<()>, ServerFnError> {
    use super::server::{password, session};
    use super::to_server_error;
    use crate::models::users::User;
    use crate::state::db_conn;
    use self::ssr_helpers::issue_session;

    let mut conn = db_conn().await?;
    let user = session::require_user(&mut conn).await?;

    let mut errors = data.validate();
    if !errors.has("old_password")
        && !password::verify_password(&data.old_password, &user.password_hash)
            .map_err(to_server_error)?
    {
        errors.add("old_password", "Your old password was entered incorrectly.");
    }
    if !errors.is_empty() {
        return Ok(FormOutcome::Invalid(errors));
    }

    let new_hash = password::hash_password(&data.new_password1).map_err(to_server_error)?;
    let new_version = User::change_password(user.id, new_hash, &mut conn)
        .await
        .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?;

    issue_session(user.id, new_version)?;
    log::info!("user {} changed password", user.username);

    Ok(FormOutcome::Success(()))
}
