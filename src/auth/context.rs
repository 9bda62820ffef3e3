use leptos::prelude::*;

use super::api::current_user;
use crate::models::users::SessionUser;

/// Session state shared through the component tree. The resource loads once
/// on navigation and is refetched after any server call that changes the
/// session (login, logout, registration, password change).
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub user: Resource<Option<SessionUser>>,
}

impl AuthContext {
    pub fn provide() {
        let user = Resource::new(
            || (),
            |_| async move { current_user().await.ok().flatten() },
        );
        provide_context(AuthContext { user });
    }

    pub fn expect() -> Self {
        expect_context::<AuthContext>()
    }

    pub fn refresh(&self) {
        self.user.refetch();
    }
}
