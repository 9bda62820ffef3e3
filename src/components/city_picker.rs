use leptos::prelude::*;

use crate::models::cities::CityView;

/// Cookie remembering which branch city the visitor browses. Read by the
/// catalogue on every load; a stale value (closed or deleted city) falls
/// back to the first active city.
pub const CITY_COOKIE_NAME: &str = "selected_city";

#[cfg(feature = "ssr")]
pub mod ssr {
    use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
    use diesel_async::AsyncPgConnection;
    use leptos::prelude::*;

    use super::CITY_COOKIE_NAME;
    use crate::models::cities::City;

    /// The visitor's current city: the cookie if it still names an active
    /// city, otherwise the first active city. `None` only when no city is
    /// open at all.
    pub async fn resolve_city(
        conn: &mut AsyncPgConnection,
    ) -> Result<Option<City>, ServerFnError> {
        let jar: CookieJar = leptos_axum::extract().await?;

        if let Some(cookie) = jar.get(CITY_COOKIE_NAME) {
            if let Ok(city_id) = cookie.value().parse::<i32>() {
                if let Some(city) = City::find(city_id, conn)
                    .await
                    .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?
                {
                    if !city.closed {
                        return Ok(Some(city));
                    }
                }
            }
        }

        City::default_city(conn)
            .await
            .map_err(|e| ServerFnError::new(format!("Database error: {e}")))
    }

    pub fn city_cookie(city_id: i32) -> Cookie<'static> {
        Cookie::build((CITY_COOKIE_NAME, city_id.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .expires(cookie::time::OffsetDateTime::now_utc() + cookie::time::Duration::days(365))
            .build()
    }
}

#[server(GetCities, "/api")]
pub async fn get_cities() -> Result<Vec<CityView>, ServerFnError> {
    use crate::models::cities::City;
    use crate::state::db_conn;

    let mut conn = db_conn().await?;
    let cities = City::active(&mut conn)
        .await
        .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?;
    Ok(cities.into_iter().map(CityView::from).collect())
}

/// Stores the choice in a year-long cookie and echoes the city back.
#[server(SelectCity, "/api")]
pub async fn select_city(city_id: i32) -> Result<CityView, ServerFnError> {
    use crate::models::cities::City;
    use crate::state::db_conn;

    let mut conn = db_conn().await?;
    let city = City::find(city_id, &mut conn)
        .await
        .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?
        .filter(|city| !city.closed)
        .ok_or_else(|| ServerFnError::new("Unknown city"))?;

    let response = expect_context::<leptos_axum::ResponseOptions>();
    let value = http::HeaderValue::from_str(&ssr::city_cookie(city.id).to_string())
        .map_err(|e| ServerFnError::new(format!("Cookie encoding error: {e}")))?;
    response.insert_header(http::header::SET_COOKIE, value);

    Ok(CityView::from(city))
}

/// Branch selector in the navbar. Selecting a city sets the cookie and
/// notifies the caller so city-scoped views can refetch.
#[component]
pub fn CityPicker(
    #[prop(into)] selected: Signal<Option<CityView>>,
    #[prop(into)] on_select: Callback<CityView>,
) -> impl IntoView {
    let cities = Resource::new(|| (), |_| async move { get_cities().await });
    let select_action = ServerAction::<SelectCity>::new();

    Effect::new(move |_| {
        if let Some(Ok(city)) = select_action.value().get() {
            on_select.run(city);
        }
    });

    view! {
        <Suspense fallback=|| view! { <span class="city-picker-loading"></span> }>
            {move || {
                cities
                    .get()
                    .map(|result| match result {
                        Ok(cities) => {
                            view! {
                                <select
                                    class="city-picker"
                                    on:change=move |ev| {
                                        if let Ok(city_id) = event_target_value(&ev).parse::<i32>() {
                                            select_action
                                                .dispatch(SelectCity {
                                                    city_id,
                                                });
                                        }
                                    }
                                >
                                    {move || {
                                        let current = selected.get().map(|city| city.id);
                                        cities
                                            .iter()
                                            .map(|city| {
                                                view! {
                                                    <option
                                                        value=city.id.to_string()
                                                        selected=current == Some(city.id)
                                                    >
                                                        {city.name.clone()}
                                                    </option>
                                                }
                                            })
                                            .collect_view()
                                    }}
                                </select>
                            }
                                .into_any()
                        }
                        Err(_) => {
                            view! { <span class="city-picker-error">"No cities"</span> }.into_any()
                        }
                    })
            }}
        </Suspense>
    }
}
