use cfg_if::cfg_if;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One catalogue entry: a scheduled session joined with its system, master,
/// room, and street for display and search.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GameCard {
    pub id: i32,
    pub name: String,
    pub session_type: String,
    pub description: String,
    pub image: String,
    pub price: i32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub total_seats: i32,
    pub filled_seats: i32,
    pub system_name: String,
    pub difficulty: i16,
    pub master_name: String,
    pub room_name: String,
    pub street: String,
}

/// Distinct upcoming game-name count per date, for the calendar summary.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: i64,
}

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use crate::admin::filters::{BucketRange, DateBucket};
        use crate::models::DeleteError;
        use crate::schema::{addresses, game_systems, games, masters, rooms};
        use diesel::dsl::count_distinct;
        use diesel::prelude::*;
        use diesel_async::{AsyncPgConnection, RunQueryDsl};

        #[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Selectable)]
        #[diesel(table_name = games)]
        pub struct Game {
            pub id: i32,
            pub name: String,
            pub system_id: i32,
            pub session_type: String,
            pub description: String,
            pub image: String,
            pub price: i32,
            pub master_id: i32,
            pub room_id: i32,
            pub date: NaiveDate,
            pub time: NaiveTime,
            pub total_seats: i32,
            pub filled_seats: i32,
            pub canceled: bool,
        }

        #[derive(Debug, Insertable)]
        #[diesel(table_name = games)]
        pub struct NewGame {
            pub name: String,
            pub system_id: i32,
            pub session_type: String,
            pub description: String,
            pub image: String,
            pub price: i32,
            pub master_id: i32,
            pub room_id: i32,
            pub date: NaiveDate,
            pub time: NaiveTime,
            pub total_seats: i32,
            pub filled_seats: i32,
            pub canceled: bool,
        }

        /// A console row before display mapping: the game plus the joined
        /// names the list columns need.
        pub type AdminGameRow = (Game, String, String, String, String);

        impl Game {
            /// Public catalogue query: non-canceled games in the selected
            /// city, matched case-insensitively against any of the search
            /// fields (OR), ordered by date, time, room. An empty query
            /// degenerates to a match-all pattern.
            pub async fn catalogue(
                city_id: i32,
                query: &str,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<Vec<GameCard>> {
                let pattern = format!("%{query}%");
                let rows: Vec<(Game, String, i16, String, String, String, String)> = games::table
                    .inner_join(game_systems::table)
                    .inner_join(masters::table)
                    .inner_join(rooms::table)
                    .inner_join(addresses::table.on(rooms::address_id.eq(addresses::id)))
                    .filter(rooms::city_id.eq(city_id))
                    .filter(games::canceled.eq(false))
                    .filter(
                        games::name
                            .ilike(pattern.clone())
                            .or(games::description.ilike(pattern.clone()))
                            .or(game_systems::name.ilike(pattern.clone()))
                            .or(games::session_type.ilike(pattern.clone()))
                            .or(masters::first_name.ilike(pattern.clone()))
                            .or(masters::last_name.ilike(pattern.clone()))
                            .or(rooms::name.ilike(pattern.clone()))
                            .or(addresses::street.ilike(pattern)),
                    )
                    .order_by((games::date.asc(), games::time.asc(), games::room_id.asc()))
                    .select((
                        Game::as_select(),
                        game_systems::name,
                        game_systems::difficulty,
                        masters::first_name,
                        masters::last_name,
                        rooms::name,
                        addresses::street,
                    ))
                    .load(conn)
                    .await?;

                Ok(rows
                    .into_iter()
                    .map(
                        |(game, system_name, difficulty, first, last, room_name, street)| GameCard {
                            id: game.id,
                            name: game.name,
                            session_type: game.session_type,
                            description: game.description,
                            image: game.image,
                            price: game.price,
                            date: game.date,
                            time: game.time,
                            total_seats: game.total_seats,
                            filled_seats: game.filled_seats,
                            system_name,
                            difficulty,
                            master_name: format!("{first} {last}"),
                            room_name,
                            street,
                        },
                    )
                    .collect())
            }

            /// Upcoming games per date for the same city/search scope:
            /// distinct names, non-canceled, `date >= today`.
            pub async fn upcoming_day_counts(
                city_id: i32,
                query: &str,
                today: NaiveDate,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<Vec<DayCount>> {
                let pattern = format!("%{query}%");
                let rows: Vec<(NaiveDate, i64)> = games::table
                    .inner_join(game_systems::table)
                    .inner_join(masters::table)
                    .inner_join(rooms::table)
                    .inner_join(addresses::table.on(rooms::address_id.eq(addresses::id)))
                    .filter(rooms::city_id.eq(city_id))
                    .filter(games::canceled.eq(false))
                    .filter(games::date.ge(today))
                    .filter(
                        games::name
                            .ilike(pattern.clone())
                            .or(games::description.ilike(pattern.clone()))
                            .or(game_systems::name.ilike(pattern.clone()))
                            .or(games::session_type.ilike(pattern.clone()))
                            .or(masters::first_name.ilike(pattern.clone()))
                            .or(masters::last_name.ilike(pattern.clone()))
                            .or(rooms::name.ilike(pattern.clone()))
                            .or(addresses::street.ilike(pattern)),
                    )
                    .group_by(games::date)
                    .order_by(games::date.asc())
                    .select((games::date, count_distinct(games::name)))
                    .load(conn)
                    .await?;

                Ok(rows
                    .into_iter()
                    .map(|(date, count)| DayCount { date, count })
                    .collect())
            }

            /// Console listing with text search and the optional archive
            /// bucket; `None` leaves the set unfiltered.
            pub async fn admin_search(
                query: &str,
                bucket: Option<DateBucket>,
                today: NaiveDate,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<Vec<AdminGameRow>> {
                let pattern = format!("%{query}%");
                let mut q = games::table
                    .inner_join(game_systems::table)
                    .inner_join(masters::table)
                    .inner_join(rooms::table)
                    .inner_join(addresses::table.on(rooms::address_id.eq(addresses::id)))
                    .filter(
                        games::name
                            .ilike(pattern.clone())
                            .or(games::session_type.ilike(pattern.clone()))
                            .or(game_systems::name.ilike(pattern.clone()))
                            .or(masters::first_name.ilike(pattern.clone()))
                            .or(masters::last_name.ilike(pattern.clone()))
                            .or(rooms::name.ilike(pattern.clone()))
                            .or(addresses::street.ilike(pattern)),
                    )
                    .into_boxed();

                if let Some(bucket) = bucket {
                    q = match bucket.range(today) {
                        BucketRange::Between(start, end) => {
                            q.filter(games::date.between(start, end))
                        }
                        BucketRange::On(day) => q.filter(games::date.eq(day)),
                        BucketRange::From(start) => q.filter(games::date.ge(start)),
                    };
                }

                q.order_by((games::date.asc(), games::time.asc(), games::room_id.asc()))
                    .select((
                        Game::as_select(),
                        game_systems::name,
                        masters::first_name,
                        masters::last_name,
                        rooms::name,
                    ))
                    .load(conn)
                    .await
            }

            pub async fn create(new_game: NewGame, conn: &mut AsyncPgConnection) -> QueryResult<Game> {
                diesel::insert_into(games::table)
                    .values(&new_game)
                    .returning(Game::as_returning())
                    .get_result(conn)
                    .await
            }

            /// Inline seat-count edit from the console list. The counter is
            /// deliberately not capped at `total_seats`; staff own it.
            pub async fn set_filled_seats(
                id: i32,
                filled_seats: i32,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<usize> {
                diesel::update(games::table.find(id))
                    .set(games::filled_seats.eq(filled_seats))
                    .execute(conn)
                    .await
            }

            pub async fn set_canceled(
                id: i32,
                canceled: bool,
                conn: &mut AsyncPgConnection,
            ) -> QueryResult<usize> {
                diesel::update(games::table.find(id))
                    .set(games::canceled.eq(canceled))
                    .execute(conn)
                    .await
            }

            pub async fn delete(id: i32, conn: &mut AsyncPgConnection) -> Result<(), DeleteError> {
                let deleted = diesel::delete(games::table.find(id))
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
