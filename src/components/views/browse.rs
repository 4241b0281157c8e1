use crate::api::{image_url, MediaKind, TitleDetails, TmdbClient};
use crate::components::{Icon, Notice, NoticeSignal, Route};
use crate::db::{AppSettings, LocalListStore};
use crate::playback::{ListEntry, ListMembershipGate, ListStore, ProviderRegistry};
use dioxus::prelude::*;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
struct ListCard {
    entry: ListEntry,
    details: Option<TitleDetails>,
}

#[component]
pub fn Browse() -> Element {
    let app_settings = use_context::<Signal<AppSettings>>();
    let notice = use_context::<NoticeSignal>();
    let gate = use_hook(|| Rc::new(ListMembershipGate::new(LocalListStore::default())));
    let mut list_version = use_signal(|| 0u32);

    let cards = {
        let gate = gate.clone();
        use_resource(move || {
            let _ = list_version();
            let mut entries = gate.store().entries();
            entries.sort_by(|a, b| b.date_added.cmp(&a.date_added));
            let client = TmdbClient::new(app_settings().tmdb_api_key);
            async move {
                let lookups = entries.iter().map(|entry| {
                    let client = client.clone();
                    async move { client.get_title_details(entry.media_kind, entry.id).await.ok() }
                });
                let details = futures_util::future::join_all(lookups).await;
                entries
                    .into_iter()
                    .zip(details)
                    .map(|(entry, details)| ListCard { entry, details })
                    .collect::<Vec<_>>()
            }
        })
    };

    let on_remove = move |(id, kind): (u64, MediaKind)| {
        let gate = gate.clone();
        spawn(async move {
            let (membership, list_notice) = gate.toggle(id, kind, true).await;
            if membership.is_some() {
                list_version.with_mut(|version| *version += 1);
            }
            notice.show(list_notice);
        });
    };

    rsx! {
        div { class: "space-y-10",
            section {
                h2 { class: "text-xl font-semibold mb-4", "My List" }
                match cards() {
                    None => rsx! {
                        div { class: "flex justify-center py-10",
                            Icon { name: "loader".to_string(), class: "w-6 h-6 animate-spin text-gray-400".to_string() }
                        }
                    },
                    Some(cards) if cards.is_empty() => rsx! {
                        p { class: "text-sm text-gray-500",
                            "Nothing saved yet. Search for a movie or show and add it to your list."
                        }
                    },
                    Some(cards) => rsx! {
                        div { class: "grid grid-cols-2 sm:grid-cols-3 md:grid-cols-5 gap-4",
                            for card in cards {
                                ListCardView {
                                    key: "{card.entry.id}",
                                    card,
                                    on_remove: on_remove.clone(),
                                }
                            }
                        }
                    },
                }
            }

            SettingsPanel {}
        }
    }
}

#[component]
fn ListCardView(card: ListCard, on_remove: EventHandler<(u64, MediaKind)>) -> Element {
    let navigator = use_navigator();
    let id = card.entry.id;
    let kind = card.entry.media_kind;
    let name = card
        .details
        .as_ref()
        .map(|details| details.display_name().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("{} #{id}", kind.label()));
    let poster = card
        .details
        .as_ref()
        .and_then(|details| details.poster_path.as_deref())
        .map(|path| image_url(path, "w342"));

    rsx! {
        div { class: "group relative rounded-xl overflow-hidden bg-white/5",
            button {
                class: "block w-full text-left",
                onclick: move |_| {
                    navigator.push(Route::Watch { kind, id });
                },
                div { class: "aspect-[2/3] bg-black/40",
                    if let Some(src) = poster {
                        img { class: "w-full h-full object-cover", src: "{src}", loading: "lazy" }
                    } else {
                        div { class: "w-full h-full flex items-center justify-center",
                            Icon { name: "film".to_string(), class: "w-8 h-8 text-gray-600".to_string() }
                        }
                    }
                }
                div { class: "p-2",
                    p { class: "text-sm font-medium truncate", "{name}" }
                    p { class: "text-xs text-gray-500", "{kind.label()}" }
                }
            }
            button {
                class: "absolute top-2 right-2 p-1.5 rounded-full bg-black/70 opacity-0 group-hover:opacity-100 transition-opacity",
                title: "Remove from My List",
                onclick: move |_| on_remove.call((id, kind)),
                Icon { name: "trash".to_string(), class: "w-4 h-4".to_string() }
            }
        }
    }
}

#[component]
fn SettingsPanel() -> Element {
    let mut app_settings = use_context::<Signal<AppSettings>>();
    let notice = use_context::<NoticeSignal>();
    let settings = app_settings();
    let preferred = settings.preferred_provider_id();
    let mut key_draft = use_signal(|| app_settings.peek().tmdb_api_key.clone());

    rsx! {
        section { class: "rounded-xl bg-white/5 p-4 space-y-4",
            h2 { class: "flex items-center gap-2 text-lg font-semibold",
                Icon { name: "settings".to_string(), class: "w-5 h-5".to_string() }
                "Settings"
            }

            label { class: "flex items-center justify-between gap-4 text-sm",
                span { "Default server" }
                select {
                    class: "bg-black/60 border border-white/10 rounded-md px-2 py-1",
                    value: "{preferred.key()}",
                    onchange: move |evt| {
                        let key = evt.value();
                        app_settings.with_mut(|s| s.preferred_provider = key);
                    },
                    for provider in ProviderRegistry.sorted_for_picker() {
                        option { key: "{provider.id}", value: "{provider.id.key()}", "{provider.name}" }
                    }
                }
            }

            label { class: "flex items-center justify-between gap-4 text-sm",
                span { "Play next episode automatically" }
                input {
                    r#type: "checkbox",
                    checked: settings.auto_advance,
                    onchange: move |evt| {
                        let enabled = evt.checked();
                        app_settings.with_mut(|s| s.auto_advance = enabled);
                    },
                }
            }

            label { class: "flex items-center justify-between gap-4 text-sm",
                span { "Open episode list on series" }
                input {
                    r#type: "checkbox",
                    checked: settings.show_episode_panel,
                    onchange: move |evt| {
                        let enabled = evt.checked();
                        app_settings.with_mut(|s| s.show_episode_panel = enabled);
                    },
                }
            }

            form {
                class: "flex items-center gap-2 text-sm",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    let key = key_draft().trim().to_string();
                    app_settings.with_mut(|s| s.tmdb_api_key = key);
                    notice.show(Notice::info("TMDB key saved"));
                },
                span { class: "whitespace-nowrap", "TMDB API key" }
                input {
                    r#type: "password",
                    class: "flex-1 bg-black/60 border border-white/10 rounded-md px-2 py-1",
                    value: "{key_draft}",
                    oninput: move |evt| key_draft.set(evt.value()),
                }
                button {
                    r#type: "submit",
                    class: "px-3 py-1 rounded-md bg-red-600 hover:bg-red-500",
                    "Save"
                }
            }
            if settings.tmdb_api_key.trim().is_empty() {
                p { class: "text-xs text-yellow-500",
                    "Titles, episodes and search need a TMDB API key."
                }
            }
        }
    }
}
