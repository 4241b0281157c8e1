use crate::api::MediaKind;
use crate::components::views::{Browse, Legal, SearchResults, Watch};
use crate::components::{Icon, Notice, NoticeSignal, NoticeToast};
use crate::db::{initialize_database, load_settings, save_settings, AppSettings};
use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq, Debug)]
#[rustfmt::skip]
pub enum Route {
    #[layout(AppRoot)]
        #[layout(BrowseShell)]
            #[route("/")]
            Browse {},
            #[route("/search?:q")]
            SearchResults { q: String },
            #[route("/legal")]
            Legal {},
        #[end_layout]
        #[route("/:kind/:id/watch")]
        Watch { kind: MediaKind, id: u64 },
        #[route("/:..segments")]
        PageNotFound { segments: Vec<String> },
}

/// Flips once the stored settings have replaced the defaults.
#[derive(Clone, Copy)]
pub struct SettingsLoaded(pub Signal<bool>);

/// Provides settings and the notice slot to every page, and persists settings edits.
#[component]
fn AppRoot() -> Element {
    let mut app_settings = use_signal(AppSettings::default);
    let mut settings_loaded = use_signal(|| false);
    let notice = use_signal(|| None::<Notice>);

    use_context_provider(|| app_settings);
    use_context_provider(|| SettingsLoaded(settings_loaded));
    use_context_provider(|| NoticeSignal(notice));

    use_effect(move || {
        spawn(async move {
            if let Err(err) = initialize_database().await {
                tracing::warn!(%err, "failed to initialize storage");
            }
            match load_settings().await {
                Ok(settings) => app_settings.set(settings),
                Err(err) => tracing::warn!(%err, "failed to load settings, using defaults"),
            }
            settings_loaded.set(true);
        });
    });

    // Auto-save settings once the stored copy has been read
    use_effect(move || {
        let settings = app_settings();
        if !settings_loaded() {
            return;
        }
        spawn(async move {
            if let Err(err) = save_settings(settings).await {
                tracing::warn!(%err, "failed to save settings");
            }
        });
    });

    rsx! {
        Outlet::<Route> {}
        NoticeToast {}
    }
}

#[component]
fn BrowseShell() -> Element {
    let navigator = use_navigator();
    let mut query = use_signal(String::new);

    rsx! {
        div { class: "app-container min-h-screen text-white",
            header { class: "border-b border-white/5 bg-black/60 backdrop-blur-xl sticky top-0 z-40",
                div { class: "flex items-center justify-between gap-4 px-4 py-3 max-w-6xl mx-auto",
                    Link {
                        to: Route::Browse {},
                        class: "flex items-center gap-2 text-lg font-semibold tracking-wide",
                        Icon { name: "film".to_string(), class: "w-5 h-5".to_string() }
                        "CinePlay"
                    }
                    form {
                        class: "flex items-center bg-white/5 rounded-full px-3 py-1.5 w-full max-w-sm",
                        onsubmit: move |evt: FormEvent| {
                            evt.prevent_default();
                            let q = query().trim().to_string();
                            if q.len() >= 2 {
                                navigator.push(Route::SearchResults { q });
                            }
                        },
                        Icon {
                            name: "search".to_string(),
                            class: "w-4 h-4 text-gray-400".to_string(),
                        }
                        input {
                            r#type: "text",
                            placeholder: "Search movies and shows...",
                            class: "bg-transparent border-0 text-sm w-full px-2 focus:outline-none",
                            value: "{query}",
                            oninput: move |evt| query.set(evt.value()),
                        }
                    }
                }
            }
            main { class: "max-w-6xl mx-auto px-4 py-6",
                Outlet::<Route> {}
            }
            LegalFooter {}
        }
    }
}

#[component]
pub fn LegalFooter() -> Element {
    rsx! {
        footer { class: "max-w-6xl mx-auto px-4 py-6 text-xs text-gray-500 text-center",
            "CinePlay does not host any files, it only links to 3rd party services. "
            Link { to: Route::Legal {}, class: "underline hover:text-gray-300", "Legal" }
        }
    }
}

#[component]
fn PageNotFound(segments: Vec<String>) -> Element {
    rsx! {
        NotFoundState { message: format!("Nothing lives at /{}", segments.join("/")) }
    }
}

/// Terminal state with a single way out.
#[component]
pub fn NotFoundState(message: String) -> Element {
    let navigator = use_navigator();

    rsx! {
        div { class: "h-screen w-screen bg-black flex flex-col items-center justify-center gap-4 text-white",
            h1 { class: "text-2xl", "Content Not Found" }
            p { class: "text-sm text-gray-500", "{message}" }
            button {
                class: "flex items-center gap-2 px-4 py-2 rounded-md border border-white/20 hover:bg-white/10 transition-colors",
                onclick: move |_| {
                    navigator.push(Route::Browse {});
                },
                Icon { name: "arrow-left".to_string(), class: "w-4 h-4".to_string() }
                "Back to Browse"
            }
        }
    }
}
