use chrono::{NaiveDate, NaiveTime};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use super::filters::DateBucket;
use crate::models::users::UserAdminView;

/// Console list rows carry their computed state labels from the server, so
/// the client renders text instead of re-deriving business rules.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CityRow {
    pub id: i32,
    pub name: String,
    pub closed: bool,
    pub state: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AddressRow {
    pub id: i32,
    pub city_name: String,
    pub street: String,
    pub closed: bool,
    pub state: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RoomRow {
    pub id: i32,
    pub name: String,
    pub city_name: String,
    pub street: String,
    pub closed: bool,
    pub state: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SystemRow {
    pub id: i32,
    pub name: String,
    pub difficulty: i16,
    pub difficulty_label: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MasterRow {
    pub id: i32,
    pub full_name: String,
    pub city_name: String,
    pub on_holiday: bool,
    pub fired: bool,
    pub state: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GameRow {
    pub id: i32,
    pub name: String,
    pub session_type: String,
    pub system_name: String,
    pub master_name: String,
    pub room_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub price: i32,
    pub total_seats: i32,
    pub filled_seats: i32,
    pub canceled: bool,
    pub state: String,
}

/// Dropdown choices for the create forms, loaded in one round trip.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct AdminRefs {
    pub cities: Vec<RefOption>,
    pub addresses: Vec<RefOption>,
    pub systems: Vec<RefOption>,
    pub masters: Vec<RefOption>,
    pub rooms: Vec<RefOption>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RefOption {
    pub id: i32,
    pub label: String,
}

/// Create-form payload for a scheduled game.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GameInput {
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
}

#[cfg(feature = "ssr")]
mod ssr_helpers {
    use leptos::prelude::*;

    use crate::auth::server::session;
    use crate::models::DeleteError;
    use crate::state::db_conn;

    /// Every console call starts here: a pooled connection plus the staff
    /// gate.
    pub async fn staff_conn() -> Result<crate::database::DbConn, ServerFnError> {
        let mut conn = db_conn().await?;
        session::require_staff(&mut conn).await?;
        Ok(conn)
    }

    /// Addresses are venues: their state column reads "Open"/"Closed", not
    /// the city branch wording.
    pub fn address_row(address: crate::models::cities::Address, city_name: String) -> super::AddressRow {
        use crate::admin::filters::venue_state_label;

        super::AddressRow {
            id: address.id,
            city_name,
            street: address.street,
            closed: address.closed,
            state: venue_state_label(address.closed).to_string(),
        }
    }

    pub fn db_error(e: diesel::result::Error) -> ServerFnError {
        log::error!("console query failed: {e}");
        ServerFnError::new(format!("Database error: {e}"))
    }

    pub fn delete_error(e: DeleteError) -> ServerFnError {
        match e {
            DeleteError::NotFound => ServerFnError::new("Record not found"),
            DeleteError::InUse => {
                ServerFnError::new("Cannot delete: other records still reference it")
            }
            DeleteError::Database(_) => {
                log::error!("console delete failed: {e}");
                ServerFnError::new("Database error")
            }
        }
    }
}

// ---- cities ----

#[server(AdminListCities, "/api")]
pub async fn admin_list_cities(
    query: String,
    closed: Option<bool>,
) -> Result<Vec<CityRow>, ServerFnError> {
    use super::filters::city_state_label;
    use crate::forms::clean_search_query;
    use crate::models::cities::City;
    use self::ssr_helpers::{db_error, staff_conn};

    let mut conn = staff_conn().await?;
    let rows = City::search(&clean_search_query(&query), closed, &mut conn)
        .await
        .map_err(db_error)?;
    Ok(rows
        .into_iter()
        .map(|city| CityRow {
            id: city.id,
            name: city.name,
            closed: city.closed,
            state: city_state_label(city.closed).to_string(),
        })
        .collect())
}

#[server(AdminCreateCity, "/api")]
pub async fn admin_create_city(name: String) -> Result<(), ServerFnError> {
    use crate::models::cities::{City, NewCity};
    use self::ssr_helpers::{db_error, staff_conn};

    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(ServerFnError::new("City name must not be empty"));
    }

    let mut conn = staff_conn().await?;
    City::create(NewCity { name, closed: false }, &mut conn)
        .await
        .map_err(db_error)?;
    Ok(())
}

#[server(AdminSetCityClosed, "/api")]
pub async fn admin_set_city_closed(id: i32, closed: bool) -> Result<(), ServerFnError> {
    use crate::models::cities::City;
    use self::ssr_helpers::{db_error, staff_conn};

    let mut conn = staff_conn().await?;
    City::set_closed(id, closed, &mut conn).await.map_err(db_error)?;
    Ok(())
}

#[server(AdminDeleteCity, "/api")]
pub async fn admin_delete_city(id: i32) -> Result<(), ServerFnError> {
    use crate::models::cities::City;
    use self::ssr_helpers::{delete_error, staff_conn};

    let mut conn = staff_conn().await?;
    City::delete(id, &mut conn).await.map_err(delete_error)
}

// ---- addresses ----

#[server(AdminListAddresses, "/api")]
pub async fn admin_list_addresses(
    query: String,
    city_id: Option<i32>,
    closed: Option<bool>,
) -> Result<Vec<AddressRow>, ServerFnError> {
    use crate::forms::clean_search_query;
    use crate::models::cities::Address;
    use self::ssr_helpers::{address_row, db_error, staff_conn};

    let mut conn = staff_conn().await?;
    let rows = Address::search_with_city(&clean_search_query(&query), city_id, closed, &mut conn)
        .await
        .map_err(db_error)?;
    Ok(rows
        .into_iter()
        .map(|(address, city_name)| address_row(address, city_name))
        .collect())
}

#[server(AdminCreateAddress, "/api")]
pub async fn admin_create_address(city_id: i32, street: String) -> Result<(), ServerFnError> {
    use crate::models::cities::{Address, NewAddress};
    use self::ssr_helpers::{db_error, staff_conn};

    let street = street.trim().to_string();
    if street.is_empty() {
        return Err(ServerFnError::new("Street must not be empty"));
    }

    let mut conn = staff_conn().await?;
    Address::create(
        NewAddress {
            city_id,
            street,
            closed: false,
        },
        &mut conn,
    )
    .await
    .map_err(db_error)?;
    Ok(())
}

#[server(AdminSetAddressClosed, "/api")]
pub async fn admin_set_address_closed(id: i32, closed: bool) -> Result<(), ServerFnError> {
    use crate::models::cities::Address;
    use self::ssr_helpers::{db_error, staff_conn};

    let mut conn = staff_conn().await?;
    Address::set_closed(id, closed, &mut conn)
        .await
        .map_err(db_error)?;
    Ok(())
}

#[server(AdminDeleteAddress, "/api")]
pub async fn admin_delete_address(id: i32) -> Result<(), ServerFnError> {
    use crate::models::cities::Address;
    use self::ssr_helpers::{delete_error, staff_conn};

    let mut conn = staff_conn().await?;
    Address::delete(id, &mut conn).await.map_err(delete_error)
}

// ---- rooms ----

#[server(AdminListRooms, "/api")]
pub async fn admin_list_rooms(query: String) -> Result<Vec<RoomRow>, ServerFnError> {
    use super::filters::venue_state_label;
    use crate::forms::clean_search_query;
    use crate::models::rooms::Room;
    use self::ssr_helpers::{db_error, staff_conn};

    let mut conn = staff_conn().await?;
    let rows = Room::search_with_address(&clean_search_query(&query), &mut conn)
        .await
        .map_err(db_error)?;
    Ok(rows
        .into_iter()
        .map(|(room, city_name, street)| RoomRow {
            id: room.id,
            name: room.name,
            city_name,
            street,
            closed: room.closed,
            state: venue_state_label(room.closed).to_string(),
        })
        .collect())
}

#[server(AdminCreateRoom, "/api")]
pub async fn admin_create_room(
    name: String,
    city_id: i32,
    address_id: i32,
    photo: String,
) -> Result<(), ServerFnError> {
    use crate::models::rooms::{NewRoom, Room};
    use self::ssr_helpers::{db_error, staff_conn};

    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(ServerFnError::new("Room name must not be empty"));
    }

    let mut conn = staff_conn().await?;
    Room::create(
        NewRoom {
            name,
            city_id,
            address_id,
            photo,
            icon: None,
            closed: false,
        },
        &mut conn,
    )
    .await
    .map_err(db_error)?;
    Ok(())
}

#[server(AdminSetRoomClosed, "/api")]
pub async fn admin_set_room_closed(id: i32, closed: bool) -> Result<(), ServerFnError> {
    use crate::models::rooms::Room;
    use self::ssr_helpers::{db_error, staff_conn};

    let mut conn = staff_conn().await?;
    Room::set_closed(id, closed, &mut conn).await.map_err(db_error)?;
    Ok(())
}

#[server(AdminDeleteRoom, "/api")]
pub async fn admin_delete_room(id: i32) -> Result<(), ServerFnError> {
    use crate::models::rooms::Room;
    use self::ssr_helpers::{delete_error, staff_conn};

    let mut conn = staff_conn().await?;
    Room::delete(id, &mut conn).await.map_err(delete_error)
}

// ---- game systems ----

#[server(AdminListSystems, "/api")]
pub async fn admin_list_systems(query: String) -> Result<Vec<SystemRow>, ServerFnError> {
    use super::filters::difficulty_label;
    use crate::forms::clean_search_query;
    use crate::models::systems::GameSystem;
    use self::ssr_helpers::{db_error, staff_conn};

    let mut conn = staff_conn().await?;
    let rows = GameSystem::search(&clean_search_query(&query), &mut conn)
        .await
        .map_err(db_error)?;
    Ok(rows
        .into_iter()
        .map(|system| SystemRow {
            id: system.id,
            name: system.name,
            difficulty: system.difficulty,
            difficulty_label: difficulty_label(system.difficulty).to_string(),
        })
        .collect())
}

#[server(AdminCreateSystem, "/api")]
pub async fn admin_create_system(
    name: String,
    description: String,
    image: String,
    difficulty: i16,
) -> Result<(), ServerFnError> {
    use crate::models::systems::{GameSystem, NewGameSystem};
    use self::ssr_helpers::{db_error, staff_conn};

    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(ServerFnError::new("System name must not be empty"));
    }
    if !(1..=5).contains(&difficulty) {
        return Err(ServerFnError::new("Difficulty must be between 1 and 5"));
    }

    let mut conn = staff_conn().await?;
    GameSystem::create(
        NewGameSystem {
            name,
            description,
            image,
            icon: None,
            difficulty,
        },
        &mut conn,
    )
    .await
    .map_err(db_error)?;
    Ok(())
}

/// Inline difficulty edit from the system list.
#[server(AdminSetSystemDifficulty, "/api")]
pub async fn admin_set_system_difficulty(id: i32, difficulty: i16) -> Result<(), ServerFnError> {
    use crate::models::systems::GameSystem;
    use self::ssr_helpers::{db_error, staff_conn};

    if !(1..=5).contains(&difficulty) {
        return Err(ServerFnError::new("Difficulty must be between 1 and 5"));
    }

    let mut conn = staff_conn().await?;
    GameSystem::set_difficulty(id, difficulty, &mut conn)
        .await
        .map_err(db_error)?;
    Ok(())
}

#[server(AdminDeleteSystem, "/api")]
pub async fn admin_delete_system(id: i32) -> Result<(), ServerFnError> {
    use crate::models::systems::GameSystem;
    use self::ssr_helpers::{delete_error, staff_conn};

    let mut conn = staff_conn().await?;
    GameSystem::delete(id, &mut conn).await.map_err(delete_error)
}

// ---- masters ----

#[server(AdminListMasters, "/api")]
pub async fn admin_list_masters(query: String) -> Result<Vec<MasterRow>, ServerFnError> {
    use super::filters::EmploymentState;
    use crate::forms::clean_search_query;
    use crate::models::masters::Master;
    use self::ssr_helpers::{db_error, staff_conn};

    let mut conn = staff_conn().await?;
    let rows = Master::search_with_city(&clean_search_query(&query), &mut conn)
        .await
        .map_err(db_error)?;
    Ok(rows
        .into_iter()
        .map(|(master, city_name)| MasterRow {
            id: master.id,
            full_name: format!("{} {}", master.first_name, master.last_name),
            city_name,
            on_holiday: master.on_holiday,
            fired: master.fired,
            state: EmploymentState::derive(master.fired, master.on_holiday)
                .label()
                .to_string(),
        })
        .collect())
}

#[server(AdminCreateMaster, "/api")]
pub async fn admin_create_master(
    first_name: String,
    last_name: String,
    description: String,
    photo: String,
    city_id: i32,
) -> Result<(), ServerFnError> {
    use crate::models::masters::{Master, NewMaster};
    use self::ssr_helpers::{db_error, staff_conn};

    let first_name = first_name.trim().to_string();
    let last_name = last_name.trim().to_string();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(ServerFnError::new("Master name must not be empty"));
    }

    let mut conn = staff_conn().await?;
    Master::create(
        NewMaster {
            first_name,
            last_name,
            description,
            photo,
            city_id,
            on_holiday: false,
            fired: false,
        },
        &mut conn,
    )
    .await
    .map_err(db_error)?;
    Ok(())
}

#[server(AdminSetMasterFlags, "/api")]
pub async fn admin_set_master_flags(
    id: i32,
    on_holiday: bool,
    fired: bool,
) -> Result<(), ServerFnError> {
    use crate::models::masters::Master;
    use self::ssr_helpers::{db_error, staff_conn};

    let mut conn = staff_conn().await?;
    Master::set_flags(id, on_holiday, fired, &mut conn)
        .await
        .map_err(db_error)?;
    Ok(())
}

#[server(AdminDeleteMaster, "/api")]
pub async fn admin_delete_master(id: i32) -> Result<(), ServerFnError> {
    use crate::models::masters::Master;
    use self::ssr_helpers::{delete_error, staff_conn};

    let mut conn = staff_conn().await?;
    Master::delete(id, &mut conn).await.map_err(delete_error)
}

// ---- games ----

#[server(AdminListGames, "/api")]
pub async fn admin_list_games(
    query: String,
    bucket: Option<DateBucket>,
) -> Result<Vec<GameRow>, ServerFnError> {
    use super::filters::GameState;
    use crate::forms::clean_search_query;
    use crate::models::games::Game;
    use self::ssr_helpers::{db_error, staff_conn};

    let today = chrono::Local::now().date_naive();
    let mut conn = staff_conn().await?;
    let rows = Game::admin_search(&clean_search_query(&query), bucket, today, &mut conn)
        .await
        .map_err(db_error)?;
    Ok(rows
        .into_iter()
        .map(|(game, system_name, first, last, room_name)| GameRow {
            id: game.id,
            name: game.name,
            session_type: game.session_type,
            system_name,
            master_name: format!("{first} {last}"),
            room_name,
            date: game.date,
            time: game.time,
            price: game.price,
            total_seats: game.total_seats,
            filled_seats: game.filled_seats,
            canceled: game.canceled,
            state: GameState::derive(game.canceled, game.date, today)
                .label()
                .to_string(),
        })
        .collect())
}

#[server(AdminCreateGame, "/api")]
pub async fn admin_create_game(input: GameInput) -> Result<(), ServerFnError> {
    use crate::models::games::{Game, NewGame};
    use self::ssr_helpers::{db_error, staff_conn};

    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(ServerFnError::new("Game name must not be empty"));
    }
    if input.total_seats < 1 {
        return Err(ServerFnError::new("Total seats must be at least 1"));
    }

    let mut conn = staff_conn().await?;
    Game::create(
        NewGame {
            name,
            system_id: input.system_id,
            session_type: input.session_type,
            description: input.description,
            image: input.image,
            price: input.price,
            master_id: input.master_id,
            room_id: input.room_id,
            date: input.date,
            time: input.time,
            total_seats: input.total_seats,
            filled_seats: 0,
            canceled: false,
        },
        &mut conn,
    )
    .await
    .map_err(db_error)?;
    Ok(())
}

/// Inline seat-count edit. Negative counts are refused; overbooking past
/// `total_seats` is allowed and left to staff judgement.
#[server(AdminSetGameSeats, "/api")]
pub async fn admin_set_game_seats(id: i32, filled_seats: i32) -> Result<(), ServerFnError> {
    use crate::models::games::Game;
    use self::ssr_helpers::{db_error, staff_conn};

    if filled_seats < 0 {
        return Err(ServerFnError::new("Seat count must not be negative"));
    }

    let mut conn = staff_conn().await?;
    Game::set_filled_seats(id, filled_seats, &mut conn)
        .await
        .map_err(db_error)?;
    Ok(())
}

#[server(AdminSetGameCanceled, "/api")]
pub async fn admin_set_game_canceled(id: i32, canceled: bool) -> Result<(), ServerFnError> {
    use crate::models::games::Game;
    use self::ssr_helpers::{db_error, staff_conn};

    let mut conn = staff_conn().await?;
    Game::set_canceled(id, canceled, &mut conn)
        .await
        .map_err(db_error)?;
    Ok(())
}

#[server(AdminDeleteGame, "/api")]
pub async fn admin_delete_game(id: i32) -> Result<(), ServerFnError> {
    use crate::models::games::Game;
    use self::ssr_helpers::{delete_error, staff_conn};

    let mut conn = staff_conn().await?;
    Game::delete(id, &mut conn).await.map_err(delete_error)
}

// ---- users ----

#[server(AdminListUsers, "/api")]
pub async fn admin_list_users(query: String) -> Result<Vec<UserAdminView>, ServerFnError> {
    use crate::forms::clean_search_query;
    use crate::models::users::User;
    use self::ssr_helpers::{db_error, staff_conn};

    let mut conn = staff_conn().await?;
    let rows = User::admin_search(&clean_search_query(&query), &mut conn)
        .await
        .map_err(db_error)?;
    Ok(rows.into_iter().map(UserAdminView::from).collect())
}

// ---- reference data ----

/// Everything the create forms need to populate their dropdowns.
#[server(AdminLoadRefs, "/api")]
pub async fn admin_load_refs() -> Result<AdminRefs, ServerFnError> {
    use crate::models::cities::{Address, City};
    use crate::models::masters::Master;
    use crate::models::rooms::Room;
    use crate::models::systems::GameSystem;
    use self::ssr_helpers::{db_error, staff_conn};

    let mut conn = staff_conn().await?;

    let cities = City::search("", None, &mut conn).await.map_err(db_error)?;
    let addresses = Address::search_with_city("", None, None, &mut conn)
        .await
        .map_err(db_error)?;
    let systems = GameSystem::all(&mut conn).await.map_err(db_error)?;
    let masters = Master::all(&mut conn).await.map_err(db_error)?;
    let rooms = Room::search_with_address("", &mut conn)
        .await
        .map_err(db_error)?;

    Ok(AdminRefs {
        cities: cities
            .into_iter()
            .map(|c| RefOption {
                id: c.id,
                label: c.name,
            })
            .collect(),
        addresses: addresses
            .into_iter()
            .map(|(a, city_name)| RefOption {
                id: a.id,
                label: format!("{city_name}, {}", a.street),
            })
            .collect(),
        systems: systems
            .into_iter()
            .map(|s| RefOption {
                id: s.id,
                label: s.name,
            })
            .collect(),
        masters: masters
            .into_iter()
            .map(|m| RefOption {
                id: m.id,
                label: format!("{} {}", m.first_name, m.last_name),
            })
            .collect(),
        rooms: rooms
            .into_iter()
            .map(|(r, city_name, street)| RefOption {
                id: r.id,
                label: format!("{} ({city_name}, {street})", r.name),
            })
            .collect(),
    })
}

#[cfg(all(test, feature = "ssr"))]
mod tests {
    use super::ssr_helpers::address_row;
    use crate::models::cities::Address;

    #[test]
    fn address_rows_carry_the_open_closed_label() {
        let open = address_row(
            Address {
                id: 1,
                city_id: 1,
                street: "Тверская 7".into(),
                closed: false,
            },
            "Москва".into(),
        );
        assert_eq!(open.state, "Open");

        let closed = address_row(
            Address {
                id: 2,
                city_id: 1,
                street: "Невский 20".into(),
                closed: true,
            },
            "Санкт-Петербург".into(),
        );
        assert_eq!(closed.state, "Closed");
        assert_eq!(closed.city_name, "Санкт-Петербург");
    }
}
