use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use crate::models::DeleteError;
        use crate::schema::game_systems;
        use serde::{Deserialize, Serialize};
        use diesel::prelude::*;
        use diesel_async::{AsyncPgConnection, RunQueryDsl};

        #[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Selectable)]
        #[diesel(table_name = game_systems)]
        pub struct GameSystem {
            pub id: i32,
            pub name: String,
            pub description: String,
            pub image: String,
            pub icon: Option<String>,
            pub difficulty: i16,
        }

        #[derive(Debug, Insertable)]
        #[diesel(table_name = game_systems)]
        pub struct NewGameSystem {
            pub name: String,
            pub description: String,
            pub image: String,
            pub icon: Option<String>,
            pub difficulty: i16,
        }

        impl GameSystem {
            pub async fn all(conn: &mut AsyncPgConnection) -> QueryResult<Vec<GameSystem>> {
                game_systems::table
                    .order_by(game_systems::name.asc())
                    .load(conn)
                    .await
            }

            pub async fn search(
                query: &str,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<Vec<GameSystem>> {
                let pattern = format!("%{query}%");
                game_systems::table
                    .filter(game_systems::name.ilike(pattern))
                    .order_by(game_systems::name.asc())
                    .load(conn)
                    .await
            }

            pub async fn create(
                new_system: NewGameSystem,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<GameSystem> {
                diesel::insert_into(game_systems::table)
                    .values(&new_system)
                    .returning(GameSystem::as_returning())
                    .get_result(conn)
                    .await
            }

            /// Inline difficulty edit from the console list view.
            pub async fn set_difficulty(
                id: i32,
                difficulty: i16,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<usize> {
                diesel::update(game_systems::table.find(id))
                    .set(game_systems::difficulty.eq(difficulty))
                    .execute(conn)
                    .await
            }

            pub async fn delete(id: i32, conn: &mut AsyncPgConnection) -> Result<(), DeleteError> {
                let deleted = diesel::delete(game_systems::table.find(id))
                    .execute(conn)
                    .await
                    .map_err(DeleteError::from)?;
                if deleted == 0 {
                    Err(DeleteError::NotFound)
                } else {
                    Ok(())
                }
            }
        }
    }
}
