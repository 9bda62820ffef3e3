use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use crate::models::DeleteError;
        use crate::schema::{cities, masters};
        use serde::{Deserialize, Serialize};
        use diesel::prelude::*;
        use diesel_async::{AsyncPgConnection, RunQueryDsl};

        #[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Selectable)]
        #[diesel(table_name = masters)]
        pub struct Master {
            pub id: i32,
            pub first_name: String,
            pub last_name: String,
            pub description: String,
            pub photo: String,
            pub city_id: i32,
            pub on_holiday: bool,
            pub fired: bool,
        }

        #[derive(Debug, Insertable)]
        #[diesel(table_name = masters)]
        pub struct NewMaster {
            pub first_name: String,
            pub last_name: String,
            pub description: String,
            pub photo: String,
            pub city_id: i32,
            pub on_holiday: bool,
            pub fired: bool,
        }

        impl Master {
            pub async fn all(conn: &mut AsyncPgConnection) -> QueryResult<Vec<Master>> {
                masters::table
                    .order_by((masters::first_name.asc(), masters::last_name.asc()))
                    .load(conn)
                    .await
            }

            pub async fn search_with_city(
                query: &str,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<Vec<(Master, String)>> {
                let pattern = format!("%{query}%");
                masters::table
                    .inner_join(cities::table)
                    .filter(
                        masters::first_name
                            .ilike(pattern.clone())
                            .or(masters::last_name.ilike(pattern.clone()))
                            .or(cities::name.ilike(pattern)),
                    )
                    .order_by((masters::first_name.asc(), masters::last_name.asc()))
                    .select((Master::as_select(), cities::name))
                    .load(conn)
                    .await
            }

            pub async fn create(
                new_master: NewMaster,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<Master> {
                diesel::insert_into(masters::table)
                    .values(&new_master)
                    .returning(Master::as_returning())
                    .get_result(conn)
                    .await
            }

            /// Soft employment flags; precedence when displaying is handled by
            /// `EmploymentState`.
            pub async fn set_flags(
                id: i32,
                on_holiday: bool,
                fired: bool,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<usize> {
                diesel::update(masters::table.find(id))
                    .set((masters::on_holiday.eq(on_holiday), masters::fired.eq(fired)))
                    .execute(conn)
                    .await
            }

            pub async fn delete(id: i32, conn: &mut AsyncPgConnection) -> Result<(), DeleteError> {
                let deleted = diesel::delete(masters::table.find(id))
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
