use cfg_if::cfg_if;
use serde::{Deserialize, Serialize};

/// The authenticated user as the UI needs it: enough to render the navbar
/// and gate the console, nothing sensitive.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub is_staff: bool,
    pub avatar_url: String,
}

/// Everything the profile page renders: account identity plus the optional
/// personal fields, with empty strings standing in for unset values so the
/// form inputs can bind directly.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ProfileView {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub city: String,
    pub phone: String,
    pub telegram: String,
    pub birthday: String,
    pub avatar: String,
    pub avatar_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserAdminView {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
}

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use chrono::{NaiveDate, NaiveDateTime};
        use diesel::prelude::*;
        use diesel::result::{DatabaseErrorKind, Error as DieselError};
        use diesel_async::scoped_futures::ScopedFutureExt;
        use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

        use crate::schema::{profiles, users};

        diesel::define_sql_function! { fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text }

        #[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Selectable)]
        #[diesel(table_name = users)]
        pub struct User {
            pub id: i32,
            pub username: String,
            pub email: String,
            pub password_hash: String,
            pub first_name: String,
            pub last_name: String,
            pub is_staff: bool,
            pub token_version: i32,
            pub created_at: NaiveDateTime,
        }

        #[derive(Debug, Insertable)]
        #[diesel(table_name = users)]
        pub struct NewUser {
            pub username: String,
            pub email: String,
            pub password_hash: String,
            pub first_name: String,
        }

        #[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Selectable, Associations)]
        #[diesel(belongs_to(User, foreign_key = user_id))]
        #[diesel(table_name = profiles)]
        pub struct Profile {
            pub id: i32,
            pub user_id: i32,
            pub gender: Option<String>,
            pub city: Option<String>,
            pub phone: Option<String>,
            pub telegram: Option<String>,
            pub birthday: Option<NaiveDate>,
            pub avatar: String,
        }

        #[derive(Debug, Insertable)]
        #[diesel(table_name = profiles)]
        pub struct NewProfile {
            pub user_id: i32,
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum DuplicateField {
            Username,
            Email,
        }

        /// Failures writing account rows. `Duplicate` covers the race where a
        /// concurrent request wins the unique index after our application
        /// check passed; callers turn it back into a field-scoped validation
        /// error rather than a 5xx.
        #[derive(Debug, thiserror::Error)]
        pub enum UserWriteError {
            #[error("A user with this value already exists")]
            Duplicate(DuplicateField),
            #[error("Database error: {0}")]
            Database(#[from] DieselError),
        }

        fn classify_unique_violation(e: DieselError) -> UserWriteError {
            if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) = e {
                match info.constraint_name() {
                    Some("users_username_key") | Some("users_username_lower_idx") => {
                        return UserWriteError::Duplicate(DuplicateField::Username);
                    }
                    Some("users_email_key") => {
                        return UserWriteError::Duplicate(DuplicateField::Email);
                    }
                    _ => {}
                }
            }
            UserWriteError::Database(e)
        }

        impl User {
            pub async fn find(id: i32, conn: &mut AsyncPgConnection) -> QueryResult<Option<User>> {
                users::table.find(id).first(conn).await.optional()
            }

            pub async fn find_by_username(
                username: &str,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<Option<User>> {
                users::table
                    .filter(users::username.eq(username))
                    .first(conn)
                    .await
                    .optional()
            }

            /// Usernames collide regardless of case.
            pub async fn username_taken(
                username: &str,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<bool> {
                let count: i64 = users::table
                    .filter(lower(users::username).eq(username.to_lowercase()))
                    .count()
                    .get_result(conn)
                    .await?;
                Ok(count > 0)
            }

            /// Email uniqueness check; `exclude` lets a user keep their own
            /// unchanged address on profile edit.
            pub async fn email_taken(
                email: &str,
                exclude: Option<i32>,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<bool> {
                let count: i64 = match exclude {
                    Some(user_id) => {
                        users::table
                            .filter(users::email.eq(email))
                            .filter(users::id.ne(user_id))
                            .count()
                            .get_result(conn)
                            .await?
                    }
                    None => {
                        users::table
                            .filter(users::email.eq(email))
                            .count()
                            .get_result(conn)
                            .await?
                    }
                };
                Ok(count > 0)
            }

            /// Registration writes the account and its empty profile in one
            /// transaction: a profile exists exactly when its user does.
            pub async fn create_with_profile(
                new_user: NewUser,
                conn: &mut AsyncPgConnection,
            ) -> Result<(User, Profile), UserWriteError> {
                conn.transaction::<_, UserWriteError, _>(|conn| {
                    async move {
                        let user: User = diesel::insert_into(users::table)
                            .values(&new_user)
                            .returning(User::as_returning())
                            .get_result(conn)
                            .await
                            .map_err(classify_unique_violation)?;

                        let profile: Profile = diesel::insert_into(profiles::table)
                            .values(&NewProfile { user_id: user.id })
                            .returning(Profile::as_returning())
                            .get_result(conn)
                            .await?;

                        Ok((user, profile))
                    }
                    .scope_boxed()
                })
                .await
            }

            /// Identity and personal fields save as a pair: both updates in
            /// one transaction, so a failure on either leaves both untouched.
            #[allow(clippy::too_many_arguments)]
            pub async fn save_profile(
                user_id: i32,
                first_name: String,
                last_name: String,
                email: String,
                gender: Option<String>,
                city: Option<String>,
                phone: Option<String>,
                telegram: Option<String>,
                birthday: Option<NaiveDate>,
                conn: &mut AsyncPgConnection,
            ) -> Result<(User, Profile), UserWriteError> {
                conn.transaction::<_, UserWriteError, _>(|conn| {
                    async move {
                        let user: User = diesel::update(users::table.find(user_id))
                            .set((
                                users::first_name.eq(first_name),
                                users::last_name.eq(last_name),
                                users::email.eq(email),
                            ))
                            .returning(User::as_returning())
                            .get_result(conn)
                            .await
                            .map_err(classify_unique_violation)?;

                        let profile: Profile = diesel::update(
                            profiles::table.filter(profiles::user_id.eq(user_id)),
                        )
                        .set((
                            profiles::gender.eq(gender),
                            profiles::city.eq(city),
                            profiles::phone.eq(phone),
                            profiles::telegram.eq(telegram),
                            profiles::birthday.eq(birthday),
                        ))
                        .returning(Profile::as_returning())
                        .get_result(conn)
                        .await?;

                        Ok((user, profile))
                    }
                    .scope_boxed()
                })
                .await
            }

            /// Swaps the credential and bumps `token_version` atomically, so
            /// every session token issued before the change stops verifying.
            /// Returns the new version for the replacement cookie.
            pub async fn change_password(
                user_id: i32,
                new_hash: String,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<i32> {
                diesel::update(users::table.find(user_id))
                    .set((
                        users::password_hash.eq(new_hash),
                        users::token_version.eq(users::token_version + 1),
                    ))
                    .returning(users::token_version)
                    .get_result(conn)
                    .await
            }

            pub async fn admin_search(
                query: &str,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<Vec<User>> {
                let pattern = format!("%{query}%");
                users::table
                    .filter(
                        users::username
                            .ilike(pattern.clone())
                            .or(users::email.ilike(pattern)),
                    )
                    .order_by(users::username.asc())
                    .load(conn)
                    .await
            }
        }

        impl Profile {
            pub async fn for_user(
                user_id: i32,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<Option<Profile>> {
                profiles::table
                    .filter(profiles::user_id.eq(user_id))
                    .first(conn)
                    .await
                    .optional()
            }

            pub async fn set_avatar(
                user_id: i32,
                avatar: &str,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<usize> {
                diesel::update(profiles::table.filter(profiles::user_id.eq(user_id)))
                    .set(profiles::avatar.eq(avatar))
                    .execute(conn)
                    .await
            }
        }

        impl From<User> for UserAdminView {
            fn from(user: User) -> Self {
                UserAdminView {
                    id: user.id,
                    username: user.username,
                    email: user.email,
                    is_staff: user.is_staff,
                }
            }
        }
    }
}

#[cfg(all(test, feature = "ssr"))]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

    struct ConstraintInfo(&'static str);

    impl DatabaseErrorInformation for ConstraintInfo {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("users")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some(self.0)
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn unique_violation(constraint: &'static str) -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(ConstraintInfo(constraint)),
        )
    }

    #[test]
    fn username_constraints_map_to_the_username_field() {
        for constraint in ["users_username_key", "users_username_lower_idx"] {
            let err = classify_unique_violation(unique_violation(constraint));
            assert!(
                matches!(err, UserWriteError::Duplicate(DuplicateField::Username)),
                "{constraint} should report a duplicate username"
            );
        }
    }

    #[test]
    fn email_constraint_maps_to_the_email_field() {
        let err = classify_unique_violation(unique_violation("users_email_key"));
        assert!(matches!(err, UserWriteError::Duplicate(DuplicateField::Email)));
    }

    #[test]
    fn unrelated_errors_pass_through() {
        let err = classify_unique_violation(DieselError::NotFound);
        assert!(matches!(err, UserWriteError::Database(DieselError::NotFound)));

        let err = classify_unique_violation(unique_violation("profiles_user_id_key"));
        assert!(matches!(err, UserWriteError::Database(_)));

        let err = classify_unique_violation(DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new(ConstraintInfo("users_email_key")),
        ));
        assert!(matches!(err, UserWriteError::Database(_)));
    }
}
