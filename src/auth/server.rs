pub mod jwt {
    use super::super::types::{AuthError, SESSION_COOKIE_NAME};
    use axum_extra::extract::cookie::{Cookie, SameSite};
    use cookie::time;
    use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
    use serde::{Deserialize, Serialize};
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Sessions live two weeks, like the framework default the site ran on
    /// before.
    pub const SESSION_LIFETIME_SECS: usize = 14 * 24 * 3600;

    #[derive(Debug, Serialize, Deserialize)]
    struct Claims {
        sub: String,
        ver: i32,
        exp: usize,
        iat: usize,
    }

    /// The verified content of a session token. `version` is compared
    /// against the account's current `token_version`; a mismatch means the
    /// password changed after this token was issued.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SessionClaims {
        pub user_id: i32,
        pub version: i32,
    }

    fn secret() -> Result<String, AuthError> {
        std::env::var("SESSION_SECRET")
            .map_err(|_| AuthError::MissingEnvironmentVar("SESSION_SECRET".to_string()))
    }

    pub fn generate_token(user_id: i32, version: i32) -> Result<String, AuthError> {
        let secret = secret()?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))?
            .as_secs() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            ver: version,
            exp: now + SESSION_LIFETIME_SECS,
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// `Ok(None)` is the quiet failure path: an expired, tampered, or
    /// malformed token just means there is no session.
    pub fn verify_token(token: &str) -> Result<Option<SessionClaims>, AuthError> {
        let secret = secret()?;

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(data) => match data.claims.sub.parse::<i32>() {
                Ok(user_id) => Ok(Some(SessionClaims {
                    user_id,
                    version: data.claims.ver,
                })),
                Err(_) => Ok(None),
            },
            Err(_) => Ok(None),
        }
    }

    pub fn create_session_cookie(token: &str) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, token.to_owned()))
            .path("/")
            .secure(true)
            .http_only(true)
            .same_site(SameSite::Strict)
            .expires(
                time::OffsetDateTime::now_utc()
                    + time::Duration::seconds(SESSION_LIFETIME_SECS as i64),
            )
            .build()
    }

    pub fn clear_session_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, ""))
            .path("/")
            .secure(true)
            .http_only(true)
            .same_site(SameSite::Strict)
            .expires(time::OffsetDateTime::UNIX_EPOCH)
            .build()
    }
}

pub mod password {
    use super::super::types::AuthError;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
    use argon2::Argon2;

    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let parsed =
            PasswordHash::new(stored_hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

pub mod session {
    use axum_extra::extract::cookie::CookieJar;
    use diesel_async::AsyncPgConnection;
    use leptos::prelude::*;

    use super::super::types::{to_server_error, AuthError, SESSION_COOKIE_NAME};
    use super::jwt;
    use crate::models::users::User;

    /// Resolves the request's session cookie to a live account, enforcing
    /// the token-version check. Absent, invalid, or superseded sessions all
    /// come back as `None`.
    pub async fn authenticate(
        conn: &mut AsyncPgConnection,
    ) -> Result<Option<User>, ServerFnError> {
        let jar: CookieJar = leptos_axum::extract().await?;
        let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
            return Ok(None);
        };

        let Some(claims) = jwt::verify_token(cookie.value()).map_err(to_server_error)? else {
            return Ok(None);
        };

        let Some(user) = User::find(claims.user_id, conn)
            .await
            .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?
        else {
            return Ok(None);
        };

        if user.token_version != claims.version {
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Like `authenticate`, but the caller requires a signed-in user.
    pub async fn require_user(conn: &mut AsyncPgConnection) -> Result<User, ServerFnError> {
        authenticate(conn)
            .await?
            .ok_or_else(|| to_server_error(AuthError::NotAuthenticated))
    }

    /// Back-office gate: signed in and `is_staff`.
    pub async fn require_staff(conn: &mut AsyncPgConnection) -> Result<User, ServerFnError> {
        let user = require_user(conn).await?;
        if !user.is_staff {
            return Err(to_server_error(AuthError::NotStaff));
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::env;
    use std::sync::Once;
    use tokio::sync::Mutex;

    // global mutex for environment variable operations
    static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
    static INIT: Once = Once::new();

    fn initialize() {
        INIT.call_once(|| {
            env::set_var("SESSION_SECRET", "test_secret_for_testing_only");
        });
    }

    mod jwt_tests {
        use super::*;

        #[tokio::test]
        async fn test_token_round_trip() {
            let _lock = ENV_MUTEX.lock().await;
            initialize();

            let token = jwt::generate_token(42, 3).expect("token generation should succeed");
            assert!(!token.is_empty());

            let claims = jwt::verify_token(&token)
                .expect("verification should not error")
                .expect("fresh token should be valid");
            assert_eq!(claims.user_id, 42);
            assert_eq!(claims.version, 3);
        }

        #[tokio::test]
        async fn test_garbage_token_is_just_no_session() {
            let _lock = ENV_MUTEX.lock().await;
            initialize();

            let result = jwt::verify_token("not.a.token");
            assert!(matches!(result, Ok(None)));
        }

        #[tokio::test]
        async fn test_tampered_token_rejected() {
            let _lock = ENV_MUTEX.lock().await;
            initialize();

            let token = jwt::generate_token(7, 0).expect("token generation should succeed");
            let mut tampered = token.clone();
            tampered.pop();
            tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

            let result = jwt::verify_token(&tampered).expect("verification should not error");
            assert!(result.is_none());
        }

        #[tokio::test]
        async fn test_session_cookie_attributes() {
            let _lock = ENV_MUTEX.lock().await;
            initialize();

            let cookie = jwt::create_session_cookie("abc");
            let rendered = cookie.to_string();
            assert!(rendered.contains("HttpOnly"));
            assert!(rendered.contains("SameSite=Strict"));
            assert!(rendered.contains("Secure"));

            let cleared = jwt::clear_session_cookie();
            assert_eq!(cleared.value(), "");
        }
    }

    mod error_tests {
        use crate::auth::{to_server_error, AuthError};
        use leptos::prelude::ServerFnError;

        #[test]
        fn test_auth_errors_keep_their_message() {
            let err = to_server_error(AuthError::NotStaff);
            assert!(matches!(err, ServerFnError::ServerError(msg) if msg == "Staff access required"));

            let err = to_server_error(AuthError::NotAuthenticated);
            assert!(matches!(err, ServerFnError::ServerError(msg) if msg == "Not signed in"));
        }
    }

    mod password_tests {
        use super::*;

        #[test]
        fn test_hash_and_verify() {
            let hash = password::hash_password("s3cret_pass").expect("hashing should succeed");
            assert_ne!(hash, "s3cret_pass");

            assert!(password::verify_password("s3cret_pass", &hash).unwrap());
            assert!(!password::verify_password("wrong_pass", &hash).unwrap());
        }

        #[test]
        fn test_hashes_are_salted() {
            let a = password::hash_password("same_input").unwrap();
            let b = password::hash_password("same_input").unwrap();
            assert_ne!(a, b);
        }

        #[test]
        fn test_corrupt_stored_hash_errors() {
            let result = password::verify_password("whatever", "not-a-phc-string");
            assert!(result.is_err());
        }
    }
}
