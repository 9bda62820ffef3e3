use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use crate::models::DeleteError;
        use crate::schema::{addresses, cities, rooms};
        use serde::{Deserialize, Serialize};
        use diesel::prelude::*;
        use diesel_async::{AsyncPgConnection, RunQueryDsl};

        #[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Selectable)]
        #[diesel(table_name = rooms)]
        pub struct Room {
            pub id: i32,
            pub name: String,
            pub city_id: i32,
            pub address_id: i32,
            pub photo: String,
            pub icon: Option<String>,
            pub closed: bool,
        }

        #[derive(Debug, Insertable)]
        #[diesel(table_name = rooms)]
        pub struct NewRoom {
            pub name: String,
            pub city_id: i32,
            pub address_id: i32,
            pub photo: String,
            pub icon: Option<String>,
            pub closed: bool,
        }

        impl Room {
            /// Console listing with the composite "City, street" address
            /// shown next to each room.
            pub async fn search_with_address(
                query: &str,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<Vec<(Room, String, String)>> {
                let pattern = format!("%{query}%");
                rooms::table
                    .inner_join(cities::table)
                    .inner_join(addresses::table)
                    .filter(
                        rooms::name
                            .ilike(pattern.clone())
                            .or(cities::name.ilike(pattern.clone()))
                            .or(addresses::street.ilike(pattern)),
                    )
                    .order_by((cities::name.asc(), addresses::street.asc(), rooms::name.asc()))
                    .select((Room::as_select(), cities::name, addresses::street))
                    .load(conn)
                    .await
            }

            pub async fn create(new_room: NewRoom, conn: &mut AsyncPgConnection) -> QueryResult<Room> {
                diesel::insert_into(rooms::table)
                    .values(&new_room)
                    .returning(Room::as_returning())
                    .get_result(conn)
                    .await
            }

            pub async fn set_closed(
                id: i32,
                closed: bool,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<usize> {
                diesel::update(rooms::table.find(id))
                    .set(rooms::closed.eq(closed))
                    .execute(conn)
                    .await
            }

            pub async fn delete(id: i32, conn: &mut AsyncPgConnection) -> Result<(), DeleteError> {
                let deleted = diesel::delete(rooms::table.find(id))
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
