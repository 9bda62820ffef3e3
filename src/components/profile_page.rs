use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthContext, LogoutFn};
use crate::components::field_errors::{FieldMessages, FormMessages};
use crate::forms::{FieldErrors, FormOutcome, IdentityData, PersonalData};
use crate::models::users::ProfileView;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AvatarOption {
    /// Relative media path as stored on the profile.
    pub path: String,
    /// Public URL for the gallery image.
    pub url: String,
}

#[cfg(feature = "ssr")]
mod ssr_helpers {
    use crate::media::MediaConfig;
    use crate::models::users::{Profile, ProfileView, User};

    pub fn profile_view(user: &User, profile: &Profile, media: &MediaConfig) -> ProfileView {
        ProfileView {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            gender: profile.gender.clone().unwrap_or_default(),
            city: profile.city.clone().unwrap_or_default(),
            phone: profile.phone.clone().unwrap_or_default(),
            telegram: profile.telegram.clone().unwrap_or_default(),
            birthday: profile
                .birthday
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            avatar: profile.avatar.clone(),
            avatar_url: media.url_for(&profile.avatar),
        }
    }
}

#[server(GetProfile, "/api")]
pub async fn get_profile() -> Result<ProfileView, ServerFnError> {
    use crate::auth::server::session;
    use crate::models::users::Profile;
    use crate::state::{db_conn, media_config};
    use self::ssr_helpers::profile_view;

    let mut conn = db_conn().await?;
    let user = session::require_user(&mut conn).await?;
    let profile = Profile::for_user(user.id, &mut conn)
        .await
        .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?
        .ok_or_else(|| ServerFnError::new("Account has no profile"))?;

    let media = media_config()?;
    Ok(profile_view(&user, &profile, &media))
}

/// Saves the identity fields (name, email) and the personal fields in one
/// transaction; an invalid value anywhere means nothing is written.
#[server(UpdateProfileFn, "/api")]
pub async fn update_profile(
    identity: IdentityData,
    personal: PersonalData,
) -> Result<FormOutcome<ProfileView>, ServerFnError> {
    use crate::auth::server::session;
    use crate::models::users::{DuplicateField, User, UserWriteError};
    use crate::state::{db_conn, media_config};
    use self::ssr_helpers::profile_view;

    let mut conn = db_conn().await?;
    let user = session::require_user(&mut conn).await?;

    let mut errors = identity.validate();
    errors.merge(personal.validate());

    if !errors.has("email")
        && User::email_taken(&identity.normalized_email(), Some(user.id), &mut conn)
            .await
            .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?
    {
        errors.add("email", "A user with that email already exists.");
    }
    if !errors.is_empty() {
        return Ok(FormOutcome::Invalid(errors));
    }

    let to_option = |value: String| if value.is_empty() { None } else { Some(value) };

    let saved = User::save_profile(
        user.id,
        identity.first_name.clone(),
        identity.last_name.clone(),
        identity.normalized_email(),
        to_option(personal.gender.clone()),
        to_option(personal.city.clone()),
        to_option(personal.phone.clone()),
        to_option(personal.telegram.clone()),
        personal.birthday_date(),
        &mut conn,
    )
    .await;

    match saved {
        Ok((user, profile)) => {
            let media = media_config()?;
            Ok(FormOutcome::Success(profile_view(&user, &profile, &media)))
        }
        Err(UserWriteError::Duplicate(DuplicateField::Email)) => {
            let mut errors = FieldErrors::new();
            errors.add("email", "A user with that email already exists.");
            Ok(FormOutcome::Invalid(errors))
        }
        Err(UserWriteError::Duplicate(DuplicateField::Username)) => {
            // username is not editable here; treat as a generic failure
            Err(ServerFnError::new("Database error"))
        }
        Err(UserWriteError::Database(e)) => {
            log::error!("profile save failed: {e}");
            Err(ServerFnError::new("Database error"))
        }
    }
}

#[server(ListAvatars, "/api")]
pub async fn list_avatars() -> Result<Vec<AvatarOption>, ServerFnError> {
    use crate::auth::server::session;
    use crate::media::{AvatarStore, FsAvatarStore};
    use crate::state::{db_conn, media_config};

    let mut conn = db_conn().await?;
    session::require_user(&mut conn).await?;

    let media = media_config()?;
    let store = FsAvatarStore::new(&media);
    let paths = store
        .list()
        .map_err(|e| ServerFnError::new(format!("Avatar folder error: {e}")))?;

    Ok(paths
        .into_iter()
        .map(|path| AvatarOption {
            url: media.url_for(&path),
            path,
        })
        .collect())
}

/// Stores a gallery pick on the profile. The submitted value may be the
/// full image URL; it is normalized back to the stored relative path and
/// must name an image that actually exists in the gallery.
#[server(SaveAvatarFn, "/api")]
pub async fn save_avatar(selection: String) -> Result<String, ServerFnError> {
    use crate::auth::server::session;
    use crate::media::{normalize_avatar_selection, AvatarStore, FsAvatarStore};
    use crate::models::users::Profile;
    use crate::state::{db_conn, media_config};

    let mut conn = db_conn().await?;
    let user = session::require_user(&mut conn).await?;

    let media = media_config()?;
    let path = normalize_avatar_selection(&selection, &media.media_url);

    let store = FsAvatarStore::new(&media);
    let known = store
        .list()
        .map_err(|e| ServerFnError::new(format!("Avatar folder error: {e}")))?;
    if !known.contains(&path) {
        return Err(ServerFnError::new("Unknown avatar"));
    }

    Profile::set_avatar(user.id, &path, &mut conn)
        .await
        .map_err(|e| ServerFnError::new(format!("Database error: {e}")))?;

    Ok(media.url_for(&path))
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = AuthContext::expect();
    let navigate = use_navigate();

    let profile = Resource::new(|| (), |_| async move { get_profile().await });

    let logout_action = ServerAction::<LogoutFn>::new();
    Effect::new(move |_| {
        if let Some(Ok(())) = logout_action.value().get() {
            auth.refresh();
            navigate("/", Default::default());
        }
    });

    view! {
        <div class="profile-page">
            <Suspense fallback=|| view! { <p class="profile-loading">"Loading profile..."</p> }>
                {move || {
                    profile
                        .get()
                        .map(|result| match result {
                            Ok(view_data) => {
                                view! {
                                    <div>
                                        <header class="profile-header">
                                            <h1>{view_data.username.clone()}</h1>
                                            <button
                                                class="logout-button"
                                                on:click=move |_| {
                                                    logout_action.dispatch(LogoutFn {});
                                                }
                                            >
                                                "Sign out"
                                            </button>
                                        </header>
                                        <AvatarGallery
                                            current_url=view_data.avatar_url.clone()
                                            on_saved=Callback::new(move |_| {
                                                profile.refetch();
                                                auth.refresh();
                                            })
                                        />
                                        <ProfileForm
                                            initial=view_data
                                            on_saved=Callback::new(move |_| {
                                                profile.refetch();
                                                auth.refresh();
                                            })
                                        />
                                        <A href="/profile/change_password">"Change password"</A>
                                    </div>
                                }
                                    .into_any()
                            }
                            Err(_) => {
                                view! {
                                    <p class="profile-empty">
                                        "You need to " <A href="/auth">"sign in"</A>
                                        " to see your profile."
                                    </p>
                                }
                                    .into_any()
                            }
                        })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn AvatarGallery(
    #[prop(into)] current_url: String,
    #[prop(into)] on_saved: Callback<String>,
) -> impl IntoView {
    let avatars = Resource::new(|| (), |_| async move { list_avatars().await });
    let save_action = ServerAction::<SaveAvatarFn>::new();

    Effect::new(move |_| {
        if let Some(Ok(url)) = save_action.value().get() {
            on_saved.run(url);
        }
    });

    view! {
        <section class="avatar-gallery">
            <img src=current_url class="avatar-current" alt="Current avatar" />
            <Suspense fallback=|| view! { <span class="avatar-loading"></span> }>
                {move || {
                    avatars
                        .get()
                        .map(|result| match result {
                            Ok(options) => {
                                view! {
                                    <div class="avatar-options">
                                        {options
                                            .into_iter()
                                            .map(|option| {
                                                let url = option.url.clone();
                                                view! {
                                                    <button
                                                        class="avatar-option"
                                                        on:click=move |_| {
                                                            save_action
                                                                .dispatch(SaveAvatarFn {
                                                                    selection: url.clone(),
                                                                });
                                                        }
                                                    >
                                                        <img src=option.url.clone() alt=option.path.clone() />
                                                    </button>
                                                }
                                            })
                                            .collect_view()}
                                    </div>
                                }
                                    .into_any()
                            }
                            Err(_) => {
                                view! { <p class="avatar-error">"Avatars are unavailable."</p> }
                                    .into_any()
                            }
                        })
                }}
            </Suspense>
        </section>
    }
}

#[component]
fn ProfileForm(initial: ProfileView, #[prop(into)] on_saved: Callback<()>) -> impl IntoView {
    let (first_name, set_first_name) = signal(initial.first_name.clone());
    let (last_name, set_last_name) = signal(initial.last_name.clone());
    let (email, set_email) = signal(initial.email.clone());
    let (gender, set_gender) = signal(initial.gender.clone());
    let (city, set_city) = signal(initial.city.clone());
    let (phone, set_phone) = signal(initial.phone.clone());
    let (telegram, set_telegram) = signal(initial.telegram.clone());
    let (birthday, set_birthday) = signal(initial.birthday.clone());
    let (errors, set_errors) = signal(FieldErrors::new());
    let (saved, set_saved) = signal(false);

    let save_action = ServerAction::<UpdateProfileFn>::new();

    Effect::new(move |_| {
        if let Some(result) = save_action.value().get() {
            match result {
                Ok(FormOutcome::Success(_)) => {
                    set_errors.set(FieldErrors::new());
                    set_saved.set(true);
                    on_saved.run(());
                }
                Ok(FormOutcome::Invalid(field_errors)) => {
                    set_saved.set(false);
                    set_errors.set(field_errors);
                }
                Err(_) => {
                    set_saved.set(false);
                    let mut field_errors = FieldErrors::new();
                    field_errors.add_form("Something went wrong. Please try again.");
                    set_errors.set(field_errors);
                }
            }
        }
    });

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        save_action.dispatch(UpdateProfileFn {
            identity: IdentityData {
                first_name: first_name.get(),
                last_name: last_name.get(),
                email: email.get(),
            },
            personal: PersonalData {
                gender: gender.get(),
                city: city.get(),
                phone: phone.get(),
                telegram: telegram.get(),
                birthday: birthday.get(),
            },
        });
    };

    view! {
        <form class="profile-form" on:submit=submit>
            <FormMessages errors=errors />
            {move || saved.get().then(|| view! { <p class="profile-saved">"Profile saved."</p> })}

            <fieldset>
                <legend>"Account"</legend>

                <label>
                    "First name"
                    <input
                        type="text"
                        prop:value=first_name
                        on:input=move |ev| set_first_name.set(event_target_value(&ev))
                    />
                </label>
                <FieldMessages errors=errors field="first_name" />

                <label>
                    "Last name"
                    <input
                        type="text"
                        prop:value=last_name
                        on:input=move |ev| set_last_name.set(event_target_value(&ev))
                    />
                </label>
                <FieldMessages errors=errors field="last_name" />

                <label>
                    "Email"
                    <input
                        type="email"
                        prop:value=email
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </label>
                <FieldMessages errors=errors field="email" />
            </fieldset>

            <fieldset>
                <legend>"Personal"</legend>

                <label>
                    "Gender"
                    <select on:change=move |ev| set_gender.set(event_target_value(&ev))>
                        <option value="" selected=gender.get_untracked().is_empty()>
                            "Not set"
                        </option>
                        <option value="M" selected=gender.get_untracked() == "M">"Male"</option>
                        <option value="F" selected=gender.get_untracked() == "F">"Female"</option>
                    </select>
                </label>
                <FieldMessages errors=errors field="gender" />

                <label>
                    "City"
                    <input
                        type="text"
                        prop:value=city
                        on:input=move |ev| set_city.set(event_target_value(&ev))
                    />
                </label>
                <FieldMessages errors=errors field="city" />

                <label>
                    "Phone"
                    <input
                        type="tel"
                        prop:value=phone
                        on:input=move |ev| set_phone.set(event_target_value(&ev))
                    />
                </label>
                <FieldMessages errors=errors field="phone" />

                <label>
                    "Telegram"
                    <input
                        type="text"
                        prop:value=telegram
                        on:input=move |ev| set_telegram.set(event_target_value(&ev))
                    />
                </label>
                <FieldMessages errors=errors field="telegram" />

                <label>
                    "Birthday"
                    <input
                        type="date"
                        prop:value=birthday
                        on:input=move |ev| set_birthday.set(event_target_value(&ev))
                    />
                </label>
                <FieldMessages errors=errors field="birthday" />
            </fieldset>

            <button type="submit" disabled=move || save_action.pending().get()>
                "Save"
            </button>
        </form>
    }
}
