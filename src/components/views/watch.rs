use crate::api::{MediaKind, MetadataError, TmdbClient};
use crate::components::{
    browser_is_online, use_player_bridge, EpisodePanel, Icon, Notice, NoticeSignal,
    LegalFooter, NotFoundState, PlayerFrame, ProviderPicker, Route, SettingsLoaded,
};
use crate::db::{AppSettings, LocalListStore};
use crate::playback::{ListMembershipGate, PlaybackSession};
use dioxus::prelude::*;
use std::rc::Rc;

const QUICK_SEARCH_LIMIT: usize = 5;

/// The dropdown only queries once the text is longer than two characters.
fn wants_quick_results(query: &str) -> bool {
    query.trim().chars().count() > 2
}

/// Enter opens the full results page from two characters on.
fn can_submit_search(query: &str) -> bool {
    query.trim().chars().count() >= 2
}

#[component]
pub fn Watch(kind: MediaKind, id: u64) -> Element {
    let settings_loaded = use_context::<SettingsLoaded>().0;

    // The session is seeded from settings, so a cold deep link waits for the stored copy.
    if !settings_loaded() {
        return rsx! {
            div { class: "h-screen w-screen bg-black flex items-center justify-center",
                Icon { name: "loader".to_string(), class: "w-8 h-8 animate-spin text-gray-400".to_string() }
            }
        };
    }

    // A fresh page per title so session state never leaks between routes.
    rsx! {
        WatchPage { key: "{kind}-{id}", kind, id }
    }
}

fn initial_session(
    kind: MediaKind,
    id: u64,
    settings: &AppSettings,
    online: bool,
    favorited: bool,
) -> PlaybackSession {
    let mut session = PlaybackSession::new(kind, id, settings.preferred_provider_id(), online);
    session.set_auto_advance(settings.auto_advance);
    session.set_favorited(favorited);
    session
}

#[component]
fn WatchPage(kind: MediaKind, id: u64) -> Element {
    let app_settings = use_context::<Signal<AppSettings>>();
    let notice = use_context::<NoticeSignal>();
    let navigator = use_navigator();
    let gate = use_hook(|| Rc::new(ListMembershipGate::new(LocalListStore::default())));

    let mut session = {
        let gate = gate.clone();
        use_signal(move || {
            initial_session(
                kind,
                id,
                &app_settings.peek(),
                browser_is_online(),
                gate.is_favorited(id),
            )
        })
    };

    use_effect(move || {
        let enabled = app_settings().auto_advance;
        session.write().set_auto_advance(enabled);
    });

    let details = use_resource(move || {
        let client = TmdbClient::new(app_settings().tmdb_api_key);
        async move {
            client
                .get_title_details(kind, id)
                .await
                .inspect_err(|err| tracing::warn!(%kind, id, %err, "could not load title details"))
        }
    });

    use_effect(move || {
        if let Some(Err(MetadataError::NotFound)) = &*details.read() {
            notice.show(Notice::error("Content not found"));
        }
    });

    let season = use_memo(move || session.read().selection().season);

    let season_listing = use_resource(move || {
        let season = season();
        let client = TmdbClient::new(app_settings().tmdb_api_key);
        async move {
            if kind != MediaKind::Series {
                return (season, Vec::new());
            }
            match client.get_season_episodes(id, season).await {
                Ok(episodes) => (season, episodes),
                Err(err) => {
                    tracing::warn!(id, season, %err, "could not load season listing");
                    (season, Vec::new())
                }
            }
        }
    });

    use_effect(move || {
        if let Some((season, episodes)) = &*season_listing.read() {
            session.write().set_catalog(*season, episodes);
        }
    });

    use_player_bridge(session);

    let on_toggle_list = {
        let gate = gate.clone();
        move |_| {
            let gate = gate.clone();
            let currently_favorited = session.peek().selection().is_favorited;
            spawn(async move {
                let (membership, list_notice) = gate.toggle(id, kind, currently_favorited).await;
                if let Some(favorited) = membership {
                    session.write().set_favorited(favorited);
                }
                notice.show(list_notice);
            });
        }
    };

    if let Some(Err(MetadataError::NotFound)) = &*details.read() {
        return rsx! {
            NotFoundState { message: format!("No {} with id {id}", kind.label().to_lowercase()) }
        };
    }

    let title = match &*details.read() {
        Some(Ok(details)) => details.display_name().to_string(),
        _ => String::new(),
    };
    let season_count = match &*details.read() {
        Some(Ok(details)) => details.season_count(),
        _ => 1,
    };
    let (episodes, episodes_loading) = match &*season_listing.read() {
        Some((listed_season, episodes)) if *listed_season == season() => (episodes.clone(), false),
        _ => (Vec::new(), true),
    };
    let is_favorited = session.read().selection().is_favorited;
    let is_series = session.read().selection().is_series();
    let next_episode = session.read().next_episode();
    let panel_open = app_settings.peek().show_episode_panel;

    rsx! {
        div { class: "watch-page min-h-screen bg-black text-white flex flex-col",
            header { class: "sticky top-0 z-40 flex items-center gap-3 px-4 py-3 bg-black/70 backdrop-blur-xl border-b border-white/5",
                button {
                    class: "p-2 rounded-full hover:bg-white/10 transition-colors",
                    onclick: move |_| {
                        if navigator.can_go_back() {
                            navigator.go_back();
                        } else {
                            navigator.push(Route::Browse {});
                        }
                    },
                    Icon { name: "arrow-left".to_string(), class: "w-5 h-5".to_string() }
                }
                button {
                    class: "p-2 rounded-full hover:bg-white/10 transition-colors",
                    title: if is_favorited { "Remove from My List" } else { "Add to My List" },
                    onclick: on_toggle_list,
                    Icon {
                        name: if is_favorited { "check".to_string() } else { "plus".to_string() },
                        class: "w-5 h-5".to_string(),
                    }
                }
                h1 { class: "flex-1 min-w-0 text-base md:text-lg font-semibold truncate", "{title}" }
                if let Some(next) = next_episode {
                    button {
                        class: "hidden sm:flex items-center gap-1 px-3 py-1.5 rounded-full bg-white/10 hover:bg-white/20 text-sm transition-colors",
                        onclick: move |_| {
                            session.write().select_episode(next);
                        },
                        "Next Episode"
                    }
                }
                QuickSearch {}
            }

            main { class: "flex-1 w-full max-w-7xl mx-auto px-4 py-4 flex flex-col lg:flex-row gap-4",
                div { class: "flex-1 min-w-0",
                    PlayerFrame { session }
                    ProviderPicker { session }
                }
                if is_series {
                    div { class: "lg:w-96 flex-shrink-0",
                        EpisodePanel {
                            session,
                            season_count,
                            episodes,
                            loading: episodes_loading,
                            initially_open: panel_open,
                        }
                    }
                }
            }

            LegalFooter {}
        }
    }
}

/// Header search with a short dropdown of top hits.
#[component]
fn QuickSearch() -> Element {
    let app_settings = use_context::<Signal<AppSettings>>();
    let navigator = use_navigator();
    let mut query = use_signal(String::new);

    let hits = use_resource(move || {
        let query = query().trim().to_string();
        let client = TmdbClient::new(app_settings().tmdb_api_key);
        async move {
            if !wants_quick_results(&query) {
                return Vec::new();
            }
            match client.search(&query).await {
                Ok(mut results) => {
                    results.truncate(QUICK_SEARCH_LIMIT);
                    results
                }
                Err(err) => {
                    tracing::debug!(%err, "quick search failed");
                    Vec::new()
                }
            }
        }
    });

    let results = hits().unwrap_or_default();
    let current_query = query();

    rsx! {
        div { class: "relative w-48 sm:w-64",
            div { class: "flex items-center bg-white/5 rounded-full px-3 py-1.5",
                Icon { name: "search".to_string(), class: "w-4 h-4 text-gray-400".to_string() }
                input {
                    r#type: "text",
                    placeholder: "Search...",
                    class: "bg-transparent border-0 text-sm w-full px-2 focus:outline-none",
                    value: "{current_query}",
                    oninput: move |evt| query.set(evt.value()),
                    onkeydown: move |evt: KeyboardEvent| match evt.key() {
                        Key::Enter => {
                            let q = query().trim().to_string();
                            if can_submit_search(&q) {
                                query.set(String::new());
                                navigator.push(Route::SearchResults { q });
                            }
                        }
                        Key::Escape => query.set(String::new()),
                        _ => {}
                    },
                }
            }
            if wants_quick_results(&current_query) && !results.is_empty() {
                div { class: "absolute right-0 mt-2 w-72 rounded-xl bg-zinc-900 border border-white/10 shadow-2xl overflow-hidden z-50",
                    for result in results {
                        button {
                            key: "{result.id}",
                            class: "w-full flex items-center gap-3 px-3 py-2 text-left hover:bg-white/10",
                            onclick: {
                                let kind = result.media_kind();
                                let id = result.id;
                                move |_| {
                                    query.set(String::new());
                                    navigator.push(Route::Watch { kind, id });
                                }
                            },
                            if let Some(poster) = result.poster_path.as_deref() {
                                img {
                                    class: "w-8 h-12 object-cover rounded",
                                    src: crate::api::image_url(poster, "w92"),
                                }
                            }
                            div { class: "min-w-0",
                                p { class: "text-sm truncate", "{result.display_name()}" }
                                p { class: "text-xs text-gray-500", "{result.media_kind().label()}" }
                            }
                        }
                    }
                    button {
                        class: "w-full px-3 py-2 text-xs text-red-400 hover:bg-white/10",
                        onclick: move |_| {
                            let q = query().trim().to_string();
                            query.set(String::new());
                            navigator.push(Route::SearchResults { q });
                        },
                        "See all results"
                    }
                }
            }
        }
    }
}
