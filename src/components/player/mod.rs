use crate::components::Icon;
use crate::playback::{Phase, PlaybackSession};
use dioxus::prelude::*;

mod bridge;
mod controls;

pub use bridge::{browser_is_online, frame_element_id, use_player_bridge};
pub use controls::{EpisodePanel, ProviderPicker};

/// Embedded provider frame plus the loading/error overlays for the current mount.
#[component]
pub fn PlayerFrame(session: Signal<PlaybackSession>) -> Element {
    let mut session = session;
    let (generation, src, provider_name, phase) = {
        let current = session.read();
        (
            current.generation(),
            current.embed_url(),
            current.active_provider().name,
            current.lifecycle().phase(),
        )
    };

    rsx! {
        div { class: "player-stage relative w-full aspect-video bg-black rounded-xl overflow-hidden",
            // Keyed on the mount generation so every provider/season/episode change
            // replaces the element instead of patching its src.
            for mount in std::iter::once(generation) {
                iframe {
                    key: "{mount}",
                    id: frame_element_id(mount),
                    class: "absolute inset-0 w-full h-full border-0",
                    src: "{src}",
                    allowfullscreen: true,
                    allow: "autoplay; fullscreen; picture-in-picture",
                    "scrolling": "no",
                    onload: move |_| {
                        session.write().on_frame_loaded(mount);
                    },
                    onerror: move |_| {
                        session.write().on_frame_error(mount);
                    },
                }
            }

            match phase {
                Phase::Loading => rsx! {
                    div { class: "player-overlay absolute inset-0 flex flex-col items-center justify-center gap-3 bg-black/80",
                        Icon { name: "loader".to_string(), class: "w-8 h-8 animate-spin text-red-500".to_string() }
                        p { class: "text-sm text-gray-300", "Loading {provider_name}..." }
                    }
                },
                Phase::ProviderError => rsx! {
                    div { class: "player-overlay absolute inset-0 flex flex-col items-center justify-center gap-3 bg-black/90 px-6 text-center",
                        Icon { name: "alert".to_string(), class: "w-8 h-8 text-red-500".to_string() }
                        h3 { class: "text-lg font-semibold", "Playback Error" }
                        p { class: "text-sm text-gray-400",
                            "This server is not responding. Please try another server below."
                        }
                        button {
                            class: "flex items-center gap-2 px-4 py-2 rounded-md bg-white/10 hover:bg-white/20 transition-colors text-sm",
                            onclick: move |_| {
                                session.write().retry();
                            },
                            Icon { name: "refresh".to_string(), class: "w-4 h-4".to_string() }
                            "Try Again"
                        }
                    }
                },
                Phase::NetworkError => rsx! {
                    div { class: "player-overlay absolute inset-0 flex flex-col items-center justify-center gap-3 bg-black/90 px-6 text-center",
                        Icon { name: "alert".to_string(), class: "w-8 h-8 text-yellow-500".to_string() }
                        h3 { class: "text-lg font-semibold", "Network Error" }
                        p { class: "text-sm text-gray-400",
                            "Please check your internet connection and try again."
                        }
                        button {
                            class: "flex items-center gap-2 px-4 py-2 rounded-md bg-white/10 hover:bg-white/20 transition-colors text-sm",
                            onclick: move |_| {
                                let _ = document::eval("window.location.reload()");
                            },
                            Icon { name: "refresh".to_string(), class: "w-4 h-4".to_string() }
                            "Refresh Page"
                        }
                    }
                },
                Phase::Ready => rsx! {},
            }
        }
    }
}
