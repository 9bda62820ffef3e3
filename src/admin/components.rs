use leptos::prelude::*;

use super::api::*;
use super::filters::DateBucket;
use crate::auth::AuthContext;
use crate::components::search::SearchBox;

/// Back-office console: one page, one section per entity, alphabetical.
/// Every list refetches after a mutation; state columns arrive precomputed
/// from the server.
#[component]
pub fn AdminConsole() -> impl IntoView {
    let auth = AuthContext::expect();

    let refs = Resource::new(|| (), |_| async move { admin_load_refs().await });
    let ref_data = Signal::derive(move || {
        refs.get()
            .and_then(|result| result.ok())
            .unwrap_or_default()
    });

    view! {
        <Suspense fallback=|| view! { <p class="console-loading">"Loading..."</p> }>
            {move || {
                auth.user
                    .get()
                    .map(|user| match user {
                        Some(user) if user.is_staff => {
                            view! {
                                <div class="console">
                                    <h1>"Console"</h1>
                                    <AddressesSection refs=ref_data />
                                    <CitiesSection />
                                    <GamesSection refs=ref_data />
                                    <MastersSection refs=ref_data />
                                    <RoomsSection refs=ref_data />
                                    <SystemsSection />
                                    <UsersSection />
                                </div>
                            }
                                .into_any()
                        }
                        _ => {
                            view! {
                                <p class="console-denied">"Staff access required."</p>
                            }
                                .into_any()
                        }
                    })
            }}
        </Suspense>
    }
}

#[component]
fn SectionError(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        {move || {
            message
                .get()
                .map(|message| view! { <p class="console-error">{message}</p> })
        }}
    }
}

fn error_text<T>(result: &Result<T, ServerFnError>) -> Option<String> {
    match result {
        Ok(_) => None,
        Err(e) => Some(e.to_string()),
    }
}

#[component]
fn RefSelect(
    #[prop(into)] label: String,
    #[prop(into)] options: Signal<Vec<RefOption>>,
    #[prop(into)] on_change: Callback<i32>,
) -> impl IntoView {
    view! {
        <label>
            {label}
            <select on:change=move |ev| {
                if let Ok(id) = event_target_value(&ev).parse::<i32>() {
                    on_change.run(id);
                }
            }>
                <option value="">"—"</option>
                {move || {
                    options
                        .get()
                        .into_iter()
                        .map(|option| {
                            view! {
                                <option value=option.id.to_string()>{option.label.clone()}</option>
                            }
                        })
                        .collect_view()
                }}
            </select>
        </label>
    }
}

// ---- addresses ----

#[component]
fn AddressesSection(#[prop(into)] refs: Signal<AdminRefs>) -> impl IntoView {
    let (query, set_query) = signal(String::new());
    let (city_filter, set_city_filter) = signal(None::<i32>);
    let (closed_filter, set_closed_filter) = signal(None::<bool>);
    let (version, set_version) = signal(0u32);
    let (error, set_error) = signal(None::<String>);

    let rows = Resource::new(
        move || (query.get(), city_filter.get(), closed_filter.get(), version.get()),
        |(query, city_id, closed, _)| async move {
            admin_list_addresses(query, city_id, closed).await
        },
    );

    let (new_city_id, set_new_city_id) = signal(None::<i32>);
    let (new_street, set_new_street) = signal(String::new());

    let create_action = ServerAction::<AdminCreateAddress>::new();
    let toggle_action = ServerAction::<AdminSetAddressClosed>::new();
    let delete_action = ServerAction::<AdminDeleteAddress>::new();

    Effect::new(move |_| {
        if let Some(result) = create_action.value().get() {
            set_error.set(error_text(&result));
            if result.is_ok() {
                set_new_street.set(String::new());
                set_version.update(|v| *v += 1);
            }
        }
    });
    Effect::new(move |_| {
        if let Some(result) = toggle_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });
    Effect::new(move |_| {
        if let Some(result) = delete_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });

    view! {
        <section class="console-section">
            <h2>"Addresses"</h2>
            <SearchBox
                on_search=Callback::new(move |q| set_query.set(q))
                placeholder="Search addresses..."
            />
            <div class="console-filters">
                <select on:change=move |ev| {
                    set_city_filter.set(event_target_value(&ev).parse().ok());
                }>
                    <option value="">"All cities"</option>
                    {move || {
                        refs.get()
                            .cities
                            .into_iter()
                            .map(|opt| {
                                view! { <option value=opt.id.to_string()>{opt.label}</option> }
                            })
                            .collect_view()
                    }}
                </select>
                <select on:change=move |ev| {
                    set_closed_filter.set(
                        match event_target_value(&ev).as_str() {
                            "open" => Some(false),
                            "closed" => Some(true),
                            _ => None,
                        },
                    );
                }>
                    <option value="">"Any state"</option>
                    <option value="open">"Open"</option>
                    <option value="closed">"Closed"</option>
                </select>
            </div>
            <SectionError message=error />

            <form
                class="console-create"
                on:submit=move |ev: leptos::ev::SubmitEvent| {
                    ev.prevent_default();
                    if let Some(city_id) = new_city_id.get() {
                        create_action
                            .dispatch(AdminCreateAddress {
                                city_id,
                                street: new_street.get(),
                            });
                    }
                }
            >
                <RefSelect
                    label="City"
                    options=Signal::derive(move || refs.get().cities)
                    on_change=Callback::new(move |id| set_new_city_id.set(Some(id)))
                />
                <input
                    type="text"
                    placeholder="Street"
                    prop:value=new_street
                    on:input=move |ev| set_new_street.set(event_target_value(&ev))
                />
                <button type="submit">"Add address"</button>
            </form>

            <Suspense fallback=|| view! { <p>"Loading..."</p> }>
                {move || {
                    rows.get()
                        .map(|result| match result {
                            Ok(rows) => {
                                view! {
                                    <table class="console-table">
                                        <thead>
                                            <tr>
                                                <th>"City"</th>
                                                <th>"Street"</th>
                                                <th>"State"</th>
                                                <th></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {rows
                                                .into_iter()
                                                .map(|row| {
                                                    let id = row.id;
                                                    let closed = row.closed;
                                                    view! {
                                                        <tr>
                                                            <td>{row.city_name.clone()}</td>
                                                            <td>{row.street.clone()}</td>
                                                            <td>{row.state.clone()}</td>
                                                            <td>
                                                                <button on:click=move |_| {
                                                                    toggle_action
                                                                        .dispatch(AdminSetAddressClosed {
                                                                            id,
                                                                            closed: !closed,
                                                                        });
                                                                }>
                                                                    {if closed { "Reopen" } else { "Close" }}
                                                                </button>
                                                                <button on:click=move |_| {
                                                                    delete_action.dispatch(AdminDeleteAddress { id });
                                                                }>"Delete"</button>
                                                            </td>
                                                        </tr>
                                                    }
                                                })
                                                .collect_view()}
                                        </tbody>
                                    </table>
                                }
                                    .into_any()
                            }
                            Err(e) => {
                                view! { <p class="console-error">{e.to_string()}</p> }.into_any()
                            }
                        })
                }}
            </Suspense>
        </section>
    }
}

// ---- cities ----

#[component]
fn CitiesSection() -> impl IntoView {
    let (query, set_query) = signal(String::new());
    let (closed_filter, set_closed_filter) = signal(None::<bool>);
    let (version, set_version) = signal(0u32);
    let (error, set_error) = signal(None::<String>);

    let rows = Resource::new(
        move || (query.get(), closed_filter.get(), version.get()),
        |(query, closed, _)| async move { admin_list_cities(query, closed).await },
    );

    let (new_name, set_new_name) = signal(String::new());

    let create_action = ServerAction::<AdminCreateCity>::new();
    let toggle_action = ServerAction::<AdminSetCityClosed>::new();
    let delete_action = ServerAction::<AdminDeleteCity>::new();

    Effect::new(move |_| {
        if let Some(result) = create_action.value().get() {
            set_error.set(error_text(&result));
            if result.is_ok() {
                set_new_name.set(String::new());
                set_version.update(|v| *v += 1);
            }
        }
    });
    Effect::new(move |_| {
        if let Some(result) = toggle_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });
    Effect::new(move |_| {
        if let Some(result) = delete_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });

    view! {
        <section class="console-section">
            <h2>"Cities"</h2>
            <SearchBox
                on_search=Callback::new(move |q| set_query.set(q))
                placeholder="Search cities..."
            />
            <div class="console-filters">
                <select on:change=move |ev| {
                    set_closed_filter.set(
                        match event_target_value(&ev).as_str() {
                            "open" => Some(false),
                            "closed" => Some(true),
                            _ => None,
                        },
                    );
                }>
                    <option value="">"Any state"</option>
                    <option value="open">"Open"</option>
                    <option value="closed">"Closed"</option>
                </select>
            </div>
            <SectionError message=error />

            <form
                class="console-create"
                on:submit=move |ev: leptos::ev::SubmitEvent| {
                    ev.prevent_default();
                    create_action
                        .dispatch(AdminCreateCity {
                            name: new_name.get(),
                        });
                }
            >
                <input
                    type="text"
                    placeholder="City name"
                    prop:value=new_name
                    on:input=move |ev| set_new_name.set(event_target_value(&ev))
                />
                <button type="submit">"Add city"</button>
            </form>

            <Suspense fallback=|| view! { <p>"Loading..."</p> }>
                {move || {
                    rows.get()
                        .map(|result| match result {
                            Ok(rows) => {
                                view! {
                                    <table class="console-table">
                                        <thead>
                                            <tr>
                                                <th>"Name"</th>
                                                <th>"State"</th>
                                                <th></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {rows
                                                .into_iter()
                                                .map(|row| {
                                                    let id = row.id;
                                                    let closed = row.closed;
                                                    view! {
                                                        <tr>
                                                            <td>{row.name.clone()}</td>
                                                            <td>{row.state.clone()}</td>
                                                            <td>
                                                                <button on:click=move |_| {
                                                                    toggle_action
                                                                        .dispatch(AdminSetCityClosed {
                                                                            id,
                                                                            closed: !closed,
                                                                        });
                                                                }>
                                                                    {if closed { "Reopen" } else { "Close" }}
                                                                </button>
                                                                <button on:click=move |_| {
                                                                    delete_action.dispatch(AdminDeleteCity { id });
                                                                }>"Delete"</button>
                                                            </td>
                                                        </tr>
                                                    }
                                                })
                                                .collect_view()}
                                        </tbody>
                                    </table>
                                }
                                    .into_any()
                            }
                            Err(e) => {
                                view! { <p class="console-error">{e.to_string()}</p> }.into_any()
                            }
                        })
                }}
            </Suspense>
        </section>
    }
}

// ---- games ----

#[component]
fn GamesSection(#[prop(into)] refs: Signal<AdminRefs>) -> impl IntoView {
    let (query, set_query) = signal(String::new());
    let (bucket, set_bucket) = signal(None::<DateBucket>);
    let (version, set_version) = signal(0u32);
    let (error, set_error) = signal(None::<String>);

    let rows = Resource::new(
        move || (query.get(), bucket.get(), version.get()),
        |(query, bucket, _)| async move { admin_list_games(query, bucket).await },
    );

    let create_action = ServerAction::<AdminCreateGame>::new();
    let seats_action = ServerAction::<AdminSetGameSeats>::new();
    let cancel_action = ServerAction::<AdminSetGameCanceled>::new();
    let delete_action = ServerAction::<AdminDeleteGame>::new();

    Effect::new(move |_| {
        if let Some(result) = create_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });
    Effect::new(move |_| {
        if let Some(result) = seats_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });
    Effect::new(move |_| {
        if let Some(result) = cancel_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });
    Effect::new(move |_| {
        if let Some(result) = delete_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });

    view! {
        <section class="console-section">
            <h2>"Games"</h2>
            <SearchBox
                on_search=Callback::new(move |q| set_query.set(q))
                placeholder="Search games..."
            />

            <div class="console-buckets">
                <button
                    class:active=move || bucket.get().is_none()
                    on:click=move |_| set_bucket.set(None)
                >
                    "All"
                </button>
                {DateBucket::ALL
                    .into_iter()
                    .map(|choice| {
                        view! {
                            <button
                                class:active=move || bucket.get() == Some(choice)
                                on:click=move |_| set_bucket.set(Some(choice))
                            >
                                {choice.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <SectionError message=error />
            <GameCreateForm refs=refs action=create_action />

            <Suspense fallback=|| view! { <p>"Loading..."</p> }>
                {move || {
                    rows.get()
                        .map(|result| match result {
                            Ok(rows) => {
                                view! {
                                    <table class="console-table">
                                        <thead>
                                            <tr>
                                                <th>"Name"</th>
                                                <th>"Type"</th>
                                                <th>"System"</th>
                                                <th>"Master"</th>
                                                <th>"Room"</th>
                                                <th>"Date"</th>
                                                <th>"Time"</th>
                                                <th>"Price"</th>
                                                <th>"Seats"</th>
                                                <th>"State"</th>
                                                <th></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {rows
                                                .into_iter()
                                                .map(|row| {
                                                    let id = row.id;
                                                    let canceled = row.canceled;
                                                    view! {
                                                        <tr>
                                                            <td>{row.name.clone()}</td>
                                                            <td>{row.session_type.clone()}</td>
                                                            <td>{row.system_name.clone()}</td>
                                                            <td>{row.master_name.clone()}</td>
                                                            <td>{row.room_name.clone()}</td>
                                                            <td>{row.date.format("%d.%m.%Y").to_string()}</td>
                                                            <td>{row.time.format("%H:%M").to_string()}</td>
                                                            <td>{row.price.to_string()}</td>
                                                            <td>
                                                                <SeatEditor
                                                                    id=id
                                                                    filled=row.filled_seats
                                                                    total=row.total_seats
                                                                    action=seats_action
                                                                />
                                                            </td>
                                                            <td>{row.state.clone()}</td>
                                                            <td>
                                                                <button on:click=move |_| {
                                                                    cancel_action
                                                                        .dispatch(AdminSetGameCanceled {
                                                                            id,
                                                                            canceled: !canceled,
                                                                        });
                                                                }>
                                                                    {if canceled { "Restore" } else { "Cancel" }}
                                                                </button>
                                                                <button on:click=move |_| {
                                                                    delete_action.dispatch(AdminDeleteGame { id });
                                                                }>"Delete"</button>
                                                            </td>
                                                        </tr>
                                                    }
                                                })
                                                .collect_view()}
                                        </tbody>
                                    </table>
                                }
                                    .into_any()
                            }
                            Err(e) => {
                                view! { <p class="console-error">{e.to_string()}</p> }.into_any()
                            }
                        })
                }}
            </Suspense>
        </section>
    }
}

/// Inline editor for the filled-seat counter.
#[component]
fn SeatEditor(
    id: i32,
    filled: i32,
    total: i32,
    action: ServerAction<AdminSetGameSeats>,
) -> impl IntoView {
    let (value, set_value) = signal(filled.to_string());

    view! {
        <span class="seat-editor">
            <input
                type="number"
                min="0"
                prop:value=value
                on:input=move |ev| set_value.set(event_target_value(&ev))
            />
            " / " {total.to_string()}
            <button on:click=move |_| {
                if let Ok(filled_seats) = value.get().parse::<i32>() {
                    action
                        .dispatch(AdminSetGameSeats {
                            id,
                            filled_seats,
                        });
                }
            }>"Save"</button>
        </span>
    }
}

#[component]
fn GameCreateForm(
    #[prop(into)] refs: Signal<AdminRefs>,
    action: ServerAction<AdminCreateGame>,
) -> impl IntoView {
    let (name, set_name) = signal(String::new());
    let (session_type, set_session_type) = signal("one-shot".to_string());
    let (description, set_description) = signal(String::new());
    let (image, set_image) = signal(String::new());
    let (price, set_price) = signal("5000".to_string());
    let (system_id, set_system_id) = signal(None::<i32>);
    let (master_id, set_master_id) = signal(None::<i32>);
    let (room_id, set_room_id) = signal(None::<i32>);
    let (date, set_date) = signal(String::new());
    let (time, set_time) = signal(String::new());
    let (seats, set_seats) = signal("6".to_string());
    let (form_error, set_form_error) = signal(None::<String>);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let (Some(system_id), Some(master_id), Some(room_id)) =
            (system_id.get(), master_id.get(), room_id.get())
        else {
            set_form_error.set(Some("Pick a system, master, and room.".to_string()));
            return;
        };
        let Ok(date) = chrono::NaiveDate::parse_from_str(&date.get(), "%Y-%m-%d") else {
            set_form_error.set(Some("Enter a valid date.".to_string()));
            return;
        };
        let Ok(time) = chrono::NaiveTime::parse_from_str(&time.get(), "%H:%M") else {
            set_form_error.set(Some("Enter a valid time.".to_string()));
            return;
        };
        let price = price.get().parse::<i32>().unwrap_or(0);
        let total_seats = seats.get().parse::<i32>().unwrap_or(0);

        set_form_error.set(None);
        action.dispatch(AdminCreateGame {
            input: GameInput {
                name: name.get(),
                system_id,
                session_type: session_type.get(),
                description: description.get(),
                image: image.get(),
                price,
                master_id,
                room_id,
                date,
                time,
                total_seats,
            },
        });
    };

    view! {
        <details class="console-create-game">
            <summary>"Add game"</summary>
            <form class="console-create" on:submit=submit>
                <SectionError message=form_error />

                <input
                    type="text"
                    placeholder="Name"
                    prop:value=name
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <select on:change=move |ev| set_session_type.set(event_target_value(&ev))>
                    <option value="one-shot">"one-shot"</option>
                    <option value="campaign">"campaign"</option>
                </select>
                <textarea
                    placeholder="Description"
                    prop:value=description
                    on:input=move |ev| set_description.set(event_target_value(&ev))
                ></textarea>
                <input
                    type="text"
                    placeholder="Image path"
                    prop:value=image
                    on:input=move |ev| set_image.set(event_target_value(&ev))
                />
                <RefSelect
                    label="System"
                    options=Signal::derive(move || refs.get().systems)
                    on_change=Callback::new(move |id| set_system_id.set(Some(id)))
                />
                <RefSelect
                    label="Master"
                    options=Signal::derive(move || refs.get().masters)
                    on_change=Callback::new(move |id| set_master_id.set(Some(id)))
                />
                <RefSelect
                    label="Room"
                    options=Signal::derive(move || refs.get().rooms)
                    on_change=Callback::new(move |id| set_room_id.set(Some(id)))
                />
                <input
                    type="date"
                    prop:value=date
                    on:input=move |ev| set_date.set(event_target_value(&ev))
                />
                <input
                    type="time"
                    prop:value=time
                    on:input=move |ev| set_time.set(event_target_value(&ev))
                />
                <input
                    type="number"
                    min="0"
                    placeholder="Price"
                    prop:value=price
                    on:input=move |ev| set_price.set(event_target_value(&ev))
                />
                <input
                    type="number"
                    min="1"
                    placeholder="Seats"
                    prop:value=seats
                    on:input=move |ev| set_seats.set(event_target_value(&ev))
                />
                <button type="submit">"Add game"</button>
            </form>
        </details>
    }
}

// ---- masters ----

#[component]
fn MastersSection(#[prop(into)] refs: Signal<AdminRefs>) -> impl IntoView {
    let (query, set_query) = signal(String::new());
    let (version, set_version) = signal(0u32);
    let (error, set_error) = signal(None::<String>);

    let rows = Resource::new(
        move || (query.get(), version.get()),
        |(query, _)| async move { admin_list_masters(query).await },
    );

    let (first_name, set_first_name) = signal(String::new());
    let (last_name, set_last_name) = signal(String::new());
    let (city_id, set_city_id) = signal(None::<i32>);

    let create_action = ServerAction::<AdminCreateMaster>::new();
    let flags_action = ServerAction::<AdminSetMasterFlags>::new();
    let delete_action = ServerAction::<AdminDeleteMaster>::new();

    Effect::new(move |_| {
        if let Some(result) = create_action.value().get() {
            set_error.set(error_text(&result));
            if result.is_ok() {
                set_first_name.set(String::new());
                set_last_name.set(String::new());
                set_version.update(|v| *v += 1);
            }
        }
    });
    Effect::new(move |_| {
        if let Some(result) = flags_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });
    Effect::new(move |_| {
        if let Some(result) = delete_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });

    view! {
        <section class="console-section">
            <h2>"Masters"</h2>
            <SearchBox
                on_search=Callback::new(move |q| set_query.set(q))
                placeholder="Search masters..."
            />
            <SectionError message=error />

            <form
                class="console-create"
                on:submit=move |ev: leptos::ev::SubmitEvent| {
                    ev.prevent_default();
                    if let Some(city_id) = city_id.get() {
                        create_action
                            .dispatch(AdminCreateMaster {
                                first_name: first_name.get(),
                                last_name: last_name.get(),
                                description: String::new(),
                                photo: String::new(),
                                city_id,
                            });
                    }
                }
            >
                <input
                    type="text"
                    placeholder="First name"
                    prop:value=first_name
                    on:input=move |ev| set_first_name.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="Last name"
                    prop:value=last_name
                    on:input=move |ev| set_last_name.set(event_target_value(&ev))
                />
                <RefSelect
                    label="City"
                    options=Signal::derive(move || refs.get().cities)
                    on_change=Callback::new(move |id| set_city_id.set(Some(id)))
                />
                <button type="submit">"Add master"</button>
            </form>

            <Suspense fallback=|| view! { <p>"Loading..."</p> }>
                {move || {
                    rows.get()
                        .map(|result| match result {
                            Ok(rows) => {
                                view! {
                                    <table class="console-table">
                                        <thead>
                                            <tr>
                                                <th>"Name"</th>
                                                <th>"City"</th>
                                                <th>"State"</th>
                                                <th></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {rows
                                                .into_iter()
                                                .map(|row| {
                                                    let id = row.id;
                                                    let on_holiday = row.on_holiday;
                                                    let fired = row.fired;
                                                    view! {
                                                        <tr>
                                                            <td>{row.full_name.clone()}</td>
                                                            <td>{row.city_name.clone()}</td>
                                                            <td>{row.state.clone()}</td>
                                                            <td>
                                                                <button on:click=move |_| {
                                                                    flags_action
                                                                        .dispatch(AdminSetMasterFlags {
                                                                            id,
                                                                            on_holiday: !on_holiday,
                                                                            fired,
                                                                        });
                                                                }>
                                                                    {if on_holiday { "End holiday" } else { "Holiday" }}
                                                                </button>
                                                                <button on:click=move |_| {
                                                                    flags_action
                                                                        .dispatch(AdminSetMasterFlags {
                                                                            id,
                                                                            on_holiday,
                                                                            fired: !fired,
                                                                        });
                                                                }>
                                                                    {if fired { "Rehire" } else { "Fire" }}
                                                                </button>
                                                                <button on:click=move |_| {
                                                                    delete_action.dispatch(AdminDeleteMaster { id });
                                                                }>"Delete"</button>
                                                            </td>
                                                        </tr>
                                                    }
                                                })
                                                .collect_view()}
                                        </tbody>
                                    </table>
                                }
                                    .into_any()
                            }
                            Err(e) => {
                                view! { <p class="console-error">{e.to_string()}</p> }.into_any()
                            }
                        })
                }}
            </Suspense>
        </section>
    }
}

// ---- rooms ----

#[component]
fn RoomsSection(#[prop(into)] refs: Signal<AdminRefs>) -> impl IntoView {
    let (query, set_query) = signal(String::new());
    let (version, set_version) = signal(0u32);
    let (error, set_error) = signal(None::<String>);

    let rows = Resource::new(
        move || (query.get(), version.get()),
        |(query, _)| async move { admin_list_rooms(query).await },
    );

    let (name, set_name) = signal(String::new());
    let (city_id, set_city_id) = signal(None::<i32>);
    let (address_id, set_address_id) = signal(None::<i32>);

    let create_action = ServerAction::<AdminCreateRoom>::new();
    let toggle_action = ServerAction::<AdminSetRoomClosed>::new();
    let delete_action = ServerAction::<AdminDeleteRoom>::new();

    Effect::new(move |_| {
        if let Some(result) = create_action.value().get() {
            set_error.set(error_text(&result));
            if result.is_ok() {
                set_name.set(String::new());
                set_version.update(|v| *v += 1);
            }
        }
    });
    Effect::new(move |_| {
        if let Some(result) = toggle_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });
    Effect::new(move |_| {
        if let Some(result) = delete_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });

    view! {
        <section class="console-section">
            <h2>"Rooms"</h2>
            <SearchBox
                on_search=Callback::new(move |q| set_query.set(q))
                placeholder="Search rooms..."
            />
            <SectionError message=error />

            <form
                class="console-create"
                on:submit=move |ev: leptos::ev::SubmitEvent| {
                    ev.prevent_default();
                    if let (Some(city_id), Some(address_id)) = (city_id.get(), address_id.get()) {
                        create_action
                            .dispatch(AdminCreateRoom {
                                name: name.get(),
                                city_id,
                                address_id,
                                photo: String::new(),
                            });
                    }
                }
            >
                <input
                    type="text"
                    placeholder="Room name"
                    prop:value=name
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <RefSelect
                    label="City"
                    options=Signal::derive(move || refs.get().cities)
                    on_change=Callback::new(move |id| set_city_id.set(Some(id)))
                />
                <RefSelect
                    label="Address"
                    options=Signal::derive(move || refs.get().addresses)
                    on_change=Callback::new(move |id| set_address_id.set(Some(id)))
                />
                <button type="submit">"Add room"</button>
            </form>

            <Suspense fallback=|| view! { <p>"Loading..."</p> }>
                {move || {
                    rows.get()
                        .map(|result| match result {
                            Ok(rows) => {
                                view! {
                                    <table class="console-table">
                                        <thead>
                                            <tr>
                                                <th>"Name"</th>
                                                <th>"City"</th>
                                                <th>"Street"</th>
                                                <th>"State"</th>
                                                <th></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {rows
                                                .into_iter()
                                                .map(|row| {
                                                    let id = row.id;
                                                    let closed = row.closed;
                                                    view! {
                                                        <tr>
                                                            <td>{row.name.clone()}</td>
                                                            <td>{row.city_name.clone()}</td>
                                                            <td>{row.street.clone()}</td>
                                                            <td>{row.state.clone()}</td>
                                                            <td>
                                                                <button on:click=move |_| {
                                                                    toggle_action
                                                                        .dispatch(AdminSetRoomClosed {
                                                                            id,
                                                                            closed: !closed,
                                                                        });
                                                                }>
                                                                    {if closed { "Reopen" } else { "Close" }}
                                                                </button>
                                                                <button on:click=move |_| {
                                                                    delete_action.dispatch(AdminDeleteRoom { id });
                                                                }>"Delete"</button>
                                                            </td>
                                                        </tr>
                                                    }
                                                })
                                                .collect_view()}
                                        </tbody>
                                    </table>
                                }
                                    .into_any()
                            }
                            Err(e) => {
                                view! { <p class="console-error">{e.to_string()}</p> }.into_any()
                            }
                        })
                }}
            </Suspense>
        </section>
    }
}

// ---- game systems ----

#[component]
fn SystemsSection() -> impl IntoView {
    let (query, set_query) = signal(String::new());
    let (version, set_version) = signal(0u32);
    let (error, set_error) = signal(None::<String>);

    let rows = Resource::new(
        move || (query.get(), version.get()),
        |(query, _)| async move { admin_list_systems(query).await },
    );

    let (name, set_name) = signal(String::new());
    let (difficulty, set_difficulty) = signal("3".to_string());

    let create_action = ServerAction::<AdminCreateSystem>::new();
    let difficulty_action = ServerAction::<AdminSetSystemDifficulty>::new();
    let delete_action = ServerAction::<AdminDeleteSystem>::new();

    Effect::new(move |_| {
        if let Some(result) = create_action.value().get() {
            set_error.set(error_text(&result));
            if result.is_ok() {
                set_name.set(String::new());
                set_version.update(|v| *v += 1);
            }
        }
    });
    Effect::new(move |_| {
        if let Some(result) = difficulty_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });
    Effect::new(move |_| {
        if let Some(result) = delete_action.value().get() {
            set_error.set(error_text(&result));
            set_version.update(|v| *v += 1);
        }
    });

    view! {
        <section class="console-section">
            <h2>"Systems"</h2>
            <SearchBox
                on_search=Callback::new(move |q| set_query.set(q))
                placeholder="Search systems..."
            />
            <SectionError message=error />

            <form
                class="console-create"
                on:submit=move |ev: leptos::ev::SubmitEvent| {
                    ev.prevent_default();
                    let difficulty = difficulty.get().parse::<i16>().unwrap_or(3);
                    create_action
                        .dispatch(AdminCreateSystem {
                            name: name.get(),
                            description: String::new(),
                            image: String::new(),
                            difficulty,
                        });
                }
            >
                <input
                    type="text"
                    placeholder="System name"
                    prop:value=name
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <select on:change=move |ev| set_difficulty.set(event_target_value(&ev))>
                    {(1..=5)
                        .map(|level| {
                            view! {
                                <option value=level.to_string() selected=level == 3>
                                    {level.to_string()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <button type="submit">"Add system"</button>
            </form>

            <Suspense fallback=|| view! { <p>"Loading..."</p> }>
                {move || {
                    rows.get()
                        .map(|result| match result {
                            Ok(rows) => {
                                view! {
                                    <table class="console-table">
                                        <thead>
                                            <tr>
                                                <th>"Name"</th>
                                                <th>"Difficulty"</th>
                                                <th></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {rows
                                                .into_iter()
                                                .map(|row| {
                                                    let id = row.id;
                                                    let current = row.difficulty;
                                                    view! {
                                                        <tr>
                                                            <td>{row.name.clone()}</td>
                                                            <td>
                                                                <select on:change=move |ev| {
                                                                    if let Ok(difficulty) = event_target_value(&ev)
                                                                        .parse::<i16>()
                                                                    {
                                                                        difficulty_action
                                                                            .dispatch(AdminSetSystemDifficulty {
                                                                                id,
                                                                                difficulty,
                                                                            });
                                                                    }
                                                                }>
                                                                    {(1..=5)
                                                                        .map(|level| {
                                                                            view! {
                                                                                <option
                                                                                    value=level.to_string()
                                                                                    selected=level == current
                                                                                >
                                                                                    {level.to_string()}
                                                                                </option>
                                                                            }
                                                                        })
                                                                        .collect_view()}
                                                                </select>
                                                                " " {row.difficulty_label.clone()}
                                                            </td>
                                                            <td>
                                                                <button on:click=move |_| {
                                                                    delete_action.dispatch(AdminDeleteSystem { id });
                                                                }>"Delete"</button>
                                                            </td>
                                                        </tr>
                                                    }
                                                })
                                                .collect_view()}
                                        </tbody>
                                    </table>
                                }
                                    .into_any()
                            }
                            Err(e) => {
                                view! { <p class="console-error">{e.to_string()}</p> }.into_any()
                            }
                        })
                }}
            </Suspense>
        </section>
    }
}

// ---- users ----

#[component]
fn UsersSection() -> impl IntoView {
    let (query, set_query) = signal(String::new());

    let rows = Resource::new(
        move || query.get(),
        |query| async move { admin_list_users(query).await },
    );

    view! {
        <section class="console-section">
            <h2>"Users"</h2>
            <SearchBox
                on_search=Callback::new(move |q| set_query.set(q))
                placeholder="Search users..."
            />

            <Suspense fallback=|| view! { <p>"Loading..."</p> }>
                {move || {
                    rows.get()
                        .map(|result| match result {
                            Ok(rows) => {
                                view! {
                                    <table class="console-table">
                                        <thead>
                                            <tr>
                                                <th>"Username"</th>
                                                <th>"Email"</th>
                                                <th>"Staff"</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {rows
                                                .into_iter()
                                                .map(|row| {
                                                    view! {
                                                        <tr>
                                                            <td>{row.username.clone()}</td>
                                                            <td>{row.email.clone()}</td>
                                                            <td>{if row.is_staff { "Yes" } else { "No" }}</td>
                                                        </tr>
                                                    }
                                                })
                                                .collect_view()}
                                        </tbody>
                                    </table>
                                }
                                    .into_any()
                            }
                            Err(e) => {
                                view! { <p class="console-error">{e.to_string()}</p> }.into_any()
                            }
                        })
                }}
            </Suspense>
        </section>
    }
}
