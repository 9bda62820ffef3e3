pub mod cities;
pub mod games;
pub mod masters;
pub mod rooms;
pub mod systems;
pub mod users;

pub use cities::*;
pub use games::*;
pub use masters::*;
pub use rooms::*;
pub use systems::*;
pub use users::*;

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        /// Deleting a referenced row is refused, never cascaded; Postgres
        /// raises the foreign-key violation and we surface it as `InUse`.
        #[derive(Debug, thiserror::Error)]
        pub enum DeleteError {
            #[error("Record not found")]
            NotFound,
            #[error("Cannot delete: other records still reference it")]
            InUse,
            #[error("Database error: {0}")]
            Database(DieselError),
        }

        impl From<DieselError> for DeleteError {
            fn from(e: DieselError) -> Self {
                match e {
                    DieselError::NotFound => DeleteError::NotFound,
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        DeleteError::InUse
                    }
                    other => DeleteError::Database(other),
                }
            }
        }
    }
}
