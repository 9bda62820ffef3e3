use leptos::prelude::*;
use std::fmt;

pub const SESSION_COOKIE_NAME: &str = "dd_session";

#[derive(Debug)]
pub enum AuthError {
    TokenCreation(String),
    NotAuthenticated,
    NotStaff,
    MissingEnvironmentVar(String),
    PasswordHash(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::TokenCreation(e) => write!(f, "Failed to create token: {}", e),
            AuthError::NotAuthenticated => write!(f, "Not signed in"),
            AuthError::NotStaff => write!(f, "Staff access required"),
            AuthError::MissingEnvironmentVar(var) => {
                write!(f, "Missing environment variable: {}", var)
            }
            AuthError::PasswordHash(e) => write!(f, "Password hashing error: {}", e),
        }
    }
}

pub fn to_server_error(e: AuthError) -> ServerFnError {
    ServerFnError::ServerError(e.to_string())
}
