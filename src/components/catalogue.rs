use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::search::SearchBox;
use crate::models::cities::CityView;
use crate::models::games::{DayCount, GameCard};

/// One catalogue load: the resolved city plus everything rendered under the
/// search box.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CataloguePage {
    pub city: Option<CityView>,
    pub games: Vec<GameCard>,
    pub day_counts: Vec<DayCount>,
}

/// City-scoped game listing. The city comes from the visitor's cookie with
/// a fallback to the first active city; the query matches any of the card's
/// text fields.
#[server(GetCatalogue, "/api")]
pub async fn get_catalogue(query: String) -> Result<CataloguePage, ServerFnError> {
    use crate::components::city_picker::ssr::resolve_city;
    use crate::forms::clean_search_query;
    use crate::models::games::Game;
    use crate::state::db_conn;

    let mut conn = db_conn().await?;

    let Some(city) = resolve_city(&mut conn).await? else {
        // no open branches at all
        return Ok(CataloguePage {
            city: None,
            games: Vec::new(),
            day_counts: Vec::new(),
        });
    };

    let query = clean_search_query(&query);
    let today = chrono::Local::now().date_naive();

    let games = Game::catalogue(city.id, &query, &mut conn)
        .await
        .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?;
    let day_counts = Game::upcoming_day_counts(city.id, &query, today, &mut conn)
        .await
        .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?;

    Ok(CataloguePage {
        city: Some(CityView::from(city)),
        games,
        day_counts,
    })
}

/// Shared selected-city signal, provided at the app root. The navbar picker
/// writes it; the catalogue refetches when it changes.
#[derive(Clone, Copy)]
pub struct SelectedCity(pub RwSignal<Option<CityView>>);

#[component]
pub fn Catalogue() -> impl IntoView {
    let (search_query, set_search_query) = signal(String::new());
    let selected = expect_context::<SelectedCity>().0;

    let page = Resource::new(
        move || (search_query.get(), selected.get().map(|city| city.id)),
        |(query, _)| async move { get_catalogue(query).await },
    );

    view! {
        <div class="catalogue">
            <SearchBox
                on_search=Callback::new(move |query| set_search_query.set(query))
                placeholder="Search games, systems, masters..."
            />

            <Suspense fallback=|| {
                view! { <p class="catalogue-loading">"Loading games..."</p> }
            }>
                {move || {
                    page.get()
                        .map(|result| match result {
                            Ok(page) => {
                                match page.city {
                                    Some(city) => {
                                        view! {
                                            <div>
                                                <h1 class="catalogue-title">
                                                    "Games in " {city.name.clone()}
                                                </h1>
                                                <DaySummary day_counts=page.day_counts.clone() />
                                                <GameList games=page.games.clone() />
                                            </div>
                                        }
                                            .into_any()
                                    }
                                    None => {
                                        view! {
                                            <p class="catalogue-empty">
                                                "No branches are open right now."
                                            </p>
                                        }
                                            .into_any()
                                    }
                                }
                            }
                            Err(_) => {
                                view! {
                                    <p class="catalogue-error">"Failed to load the catalogue."</p>
                                }
                                    .into_any()
                            }
                        })
                }}
            </Suspense>
        </div>
    }
}

/// Strip of upcoming dates with how many distinct games run on each.
#[component]
fn DaySummary(day_counts: Vec<DayCount>) -> impl IntoView {
    view! {
        <div class="day-summary">
            {day_counts
                .into_iter()
                .map(|day| {
                    view! {
                        <span class="day-summary-entry">
                            {day.date.format("%d.%m").to_string()} " — " {day.count.to_string()}
                            " games"
                        </span>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn GameList(games: Vec<GameCard>) -> impl IntoView {
    if games.is_empty() {
        return view! { <p class="catalogue-empty">"No games found."</p> }.into_any();
    }

    view! {
        <div class="game-grid">
            <For
                each=move || games.clone()
                key=|game| game.id
                children=move |game| view! { <GameCardView game=game /> }
            />
        </div>
    }
    .into_any()
}

#[component]
pub fn GameCardView(game: GameCard) -> impl IntoView {
    use crate::admin::filters::difficulty_label;

    let seats = format!("{}/{}", game.filled_seats, game.total_seats);
    let when = format!(
        "{} {}",
        game.date.format("%d.%m.%Y"),
        game.time.format("%H:%M")
    );

    view! {
        <article class="game-card">
            <img src=game.image.clone() alt=game.name.clone() class="game-card-image" />
            <div class="game-card-body">
                <h2 class="game-card-name">{game.name.clone()}</h2>
                <p class="game-card-system">
                    {game.system_name.clone()} " · " {difficulty_label(game.difficulty)}
                </p>
                <p class="game-card-type">{game.session_type.clone()}</p>
                <p class="game-card-description">{game.description.clone()}</p>
                <dl class="game-card-details">
                    <dt>"When"</dt>
                    <dd>{when}</dd>
                    <dt>"Where"</dt>
                    <dd>{format!("{}, {}", game.room_name, game.street)}</dd>
                    <dt>"Master"</dt>
                    <dd>{game.master_name.clone()}</dd>
                    <dt>"Seats"</dt>
                    <dd>{seats}</dd>
                    <dt>"Price"</dt>
                    <dd>{game.price.to_string()} " ₽"</dd>
                </dl>
            </div>
        </article>
    }
}
