use cfg_if::cfg_if;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CityView {
    pub id: i32,
    pub name: String,
    pub closed: bool,
}

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use crate::models::DeleteError;
        use crate::schema::{addresses, cities};
        use diesel::prelude::*;
        use diesel_async::{AsyncPgConnection, RunQueryDsl};

        #[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Selectable)]
        #[diesel(table_name = cities)]
        pub struct City {
            pub id: i32,
            pub name: String,
            pub closed: bool,
        }

        #[derive(Debug, Insertable)]
        #[diesel(table_name = cities)]
        pub struct NewCity {
            pub name: String,
            pub closed: bool,
        }

        #[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Selectable, Associations)]
        #[diesel(belongs_to(City, foreign_key = city_id))]
        #[diesel(table_name = addresses)]
        pub struct Address {
            pub id: i32,
            pub city_id: i32,
            pub street: String,
            pub closed: bool,
        }

        #[derive(Debug, Insertable)]
        #[diesel(table_name = addresses)]
        pub struct NewAddress {
            pub city_id: i32,
            pub street: String,
            pub closed: bool,
        }

        impl City {
            pub async fn find(id: i32, conn: &mut AsyncPgConnection) -> QueryResult<Option<City>> {
                cities::table.find(id).first(conn).await.optional()
            }

            /// Cities offered in the public city picker: not closed, name order.
            pub async fn active(conn: &mut AsyncPgConnection) -> QueryResult<Vec<City>> {
                cities::table
                    .filter(cities::closed.eq(false))
                    .order_by(cities::name.asc())
                    .load(conn)
                    .await
            }

            /// Fallback when no valid city cookie is present: the first active
            /// city by identifier.
            pub async fn default_city(conn: &mut AsyncPgConnection) -> QueryResult<Option<City>> {
                cities::table
                    .filter(cities::closed.eq(false))
                    .order_by(cities::id.asc())
                    .first(conn)
                    .await
                    .optional()
            }

            /// Console listing; `closed` narrows to one state when set.
            pub async fn search(
                query: &str,
                closed: Option<bool>,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<Vec<City>> {
                let pattern = format!("%{query}%");
                let mut q = cities::table
                    .filter(cities::name.ilike(pattern))
                    .into_boxed();
                if let Some(closed) = closed {
                    q = q.filter(cities::closed.eq(closed));
                }
                q.order_by(cities::name.asc()).load(conn).await
            }

            pub async fn create(new_city: NewCity, conn: &mut AsyncPgConnection) -> QueryResult<City> {
                diesel::insert_into(cities::table)
                    .values(&new_city)
                    .returning(City::as_returning())
                    .get_result(conn)
                    .await
            }

            pub async fn set_closed(
                id: i32,
                closed: bool,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<usize> {
                diesel::update(cities::table.find(id))
                    .set(cities::closed.eq(closed))
                    .execute(conn)
                    .await
            }

            pub async fn delete(id: i32, conn: &mut AsyncPgConnection) -> Result<(), DeleteError> {
                let deleted = diesel::delete(cities::table.find(id))
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

        impl Address {
            /// Console listing: every address with its city name, ordered by
            /// city then street. The optional filters narrow to one city or
            /// one open/closed state.
            pub async fn search_with_city(
                query: &str,
                city_id: Option<i32>,
                closed: Option<bool>,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<Vec<(Address, String)>> {
                let pattern = format!("%{query}%");
                let mut q = addresses::table
                    .inner_join(cities::table)
                    .filter(
                        addresses::street
                            .ilike(pattern.clone())
                            .or(cities::name.ilike(pattern)),
                    )
                    .into_boxed();
                if let Some(city_id) = city_id {
                    q = q.filter(addresses::city_id.eq(city_id));
                }
                if let Some(closed) = closed {
                    q = q.filter(addresses::closed.eq(closed));
                }
                q.order_by((cities::name.asc(), addresses::street.asc()))
                    .select((Address::as_select(), cities::name))
                    .load(conn)
                    .await
            }

            pub async fn create(
                new_address: NewAddress,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<Address> {
                diesel::insert_into(addresses::table)
                    .values(&new_address)
                    .returning(Address::as_returning())
                    .get_result(conn)
                    .await
            }

            pub async fn set_closed(
                id: i32,
                closed: bool,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<usize> {
                diesel::update(addresses::table.find(id))
                    .set(addresses::closed.eq(closed))
                    .execute(conn)
                    .await
            }

            pub async fn delete(id: i32, conn: &mut AsyncPgConnection) -> Result<(), DeleteError> {
                let deleted = diesel::delete(addresses::table.find(id))
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

        impl From<City> for CityView {
            fn from(city: City) -> Self {
                CityView {
                    id: city.id,
                    name: city.name,
                    closed: city.closed,
                }
            }
        }

    }
}
