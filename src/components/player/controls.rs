use crate::api::{image_url, Episode};
use crate::components::Icon;
use crate::playback::{PlaybackSession, ProviderRegistry};
use dioxus::prelude::*;

/// Server list, promoted tiers first.
#[component]
pub fn ProviderPicker(session: Signal<PlaybackSession>) -> Element {
    let mut session = session;
    let active = session.read().selection().provider;
    let providers = ProviderRegistry.sorted_for_picker();

    rsx! {
        section { class: "provider-picker mt-4",
            p { class: "text-xs text-gray-400 mb-2",
                "If current server doesn't work, please try another server below"
            }
            div { class: "grid grid-cols-2 sm:grid-cols-3 md:grid-cols-4 gap-2",
                for provider in providers {
                    button {
                        key: "{provider.id}",
                        class: if provider.id == active {
                            "flex items-center justify-between gap-2 px-3 py-2 rounded-md text-sm bg-red-600 text-white"
                        } else {
                            "flex items-center justify-between gap-2 px-3 py-2 rounded-md text-sm bg-white/5 text-gray-300 hover:bg-white/10 transition-colors"
                        },
                        onclick: move |_| {
                            session.write().select_provider(provider.id);
                        },
                        span { class: "truncate", "{provider.name}" }
                        if let Some(badge) = provider.badge() {
                            span { class: "provider-badge text-[10px] font-semibold px-1.5 py-0.5 rounded bg-black/40",
                                "{badge.label()}"
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Season selector and episode list for series.
#[component]
pub fn EpisodePanel(
    session: Signal<PlaybackSession>,
    season_count: u32,
    episodes: Vec<Episode>,
    loading: bool,
    initially_open: bool,
) -> Element {
    let mut session = session;
    let mut open = use_signal(move || initially_open);
    let (season, current_episode) = {
        let current = session.read();
        (current.selection().season, current.selection().episode)
    };

    if !open() {
        return rsx! {
            button {
                class: "episode-panel-toggle flex items-center gap-2 px-3 py-2 rounded-md bg-white/5 hover:bg-white/10 text-sm",
                onclick: move |_| open.set(true),
                Icon { name: "list".to_string(), class: "w-4 h-4".to_string() }
                "Episodes"
            }
        };
    }

    rsx! {
        aside { class: "episode-panel flex flex-col gap-3 bg-white/5 rounded-xl p-3 max-h-[70vh]",
            div { class: "flex items-center justify-between gap-2",
                select {
                    class: "bg-black/60 border border-white/10 rounded-md px-2 py-1 text-sm",
                    value: "{season}",
                    onchange: move |evt| {
                        if let Ok(next) = evt.value().parse::<u32>() {
                            session.write().select_season(next);
                        }
                    },
                    for number in 1..=season_count {
                        option { key: "{number}", value: "{number}", "Season {number}" }
                    }
                }
                button {
                    class: "p-1 rounded hover:bg-white/10",
                    onclick: move |_| open.set(false),
                    Icon { name: "x".to_string(), class: "w-4 h-4".to_string() }
                }
            }

            if loading {
                div { class: "flex items-center justify-center py-6",
                    Icon { name: "loader".to_string(), class: "w-5 h-5 animate-spin text-gray-400".to_string() }
                }
            } else if episodes.is_empty() {
                p { class: "text-sm text-gray-500 py-4 text-center", "No episodes listed for this season." }
            } else {
                div { class: "flex flex-col gap-2 overflow-y-auto",
                    for episode in episodes.iter() {
                        EpisodeRow {
                            key: "{episode.id}",
                            episode: episode.clone(),
                            is_current: episode.episode_number == current_episode,
                            on_select: move |number: u32| {
                                session.write().select_episode(number);
                            },
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn EpisodeRow(episode: Episode, is_current: bool, on_select: EventHandler<u32>) -> Element {
    let number = episode.episode_number;
    let still = episode.still_path.as_deref().map(|path| image_url(path, "w300"));

    rsx! {
        button {
            class: if is_current {
                "flex gap-3 p-2 rounded-lg text-left bg-red-600/20 ring-1 ring-red-500"
            } else {
                "flex gap-3 p-2 rounded-lg text-left hover:bg-white/10 transition-colors"
            },
            onclick: move |_| on_select.call(number),
            div { class: "w-28 aspect-video flex-shrink-0 rounded overflow-hidden bg-black/50",
                if let Some(src) = still {
                    img { class: "w-full h-full object-cover", src: "{src}", loading: "lazy" }
                } else {
                    div { class: "w-full h-full flex items-center justify-center",
                        Icon { name: "film".to_string(), class: "w-5 h-5 text-gray-600".to_string() }
                    }
                }
            }
            div { class: "min-w-0",
                p { class: "text-sm font-medium truncate", "{number}. {episode.name}" }
                if let Some(air_date) = episode.air_date.as_deref() {
                    p { class: "text-xs text-gray-500", "{air_date}" }
                }
                p { class: "text-xs text-gray-400 line-clamp-2", "{episode.overview}" }
            }
        }
    }
}
