use crate::api::{image_url, MetadataError, TmdbClient};
use crate::components::{Icon, Route};
use crate::db::AppSettings;
use dioxus::prelude::*;

#[component]
pub fn SearchResults(q: String) -> Element {
    rsx! {
        SearchGrid { key: "{q}", q }
    }
}

#[component]
fn SearchGrid(q: String) -> Element {
    let app_settings = use_context::<Signal<AppSettings>>();
    let navigator = use_navigator();

    let results = {
        let query = q.clone();
        use_resource(move || {
            let query = query.clone();
            let client = TmdbClient::new(app_settings().tmdb_api_key);
            async move { client.search(&query).await }
        })
    };

    rsx! {
        div { class: "space-y-6",
            h2 { class: "text-xl font-semibold", "Results for \"{q}\"" }
            match &*results.read() {
                None => rsx! {
                    div { class: "flex justify-center py-10",
                        Icon { name: "loader".to_string(), class: "w-6 h-6 animate-spin text-gray-400".to_string() }
                    }
                },
                Some(Err(MetadataError::MissingApiKey)) => rsx! {
                    p { class: "text-sm text-yellow-500", "Add a TMDB API key in settings to search." }
                },
                Some(Err(err)) => rsx! {
                    p { class: "text-sm text-red-400", "Search failed: {err}" }
                },
                Some(Ok(items)) if items.is_empty() => rsx! {
                    p { class: "text-sm text-gray-500", "No results." }
                },
                Some(Ok(items)) => rsx! {
                    div { class: "grid grid-cols-2 sm:grid-cols-3 md:grid-cols-5 gap-4",
                        for item in items.iter() {
                            button {
                                key: "{item.id}-{item.media_kind()}",
                                class: "text-left rounded-xl overflow-hidden bg-white/5 hover:bg-white/10 transition-colors",
                                onclick: {
                                    let kind = item.media_kind();
                                    let id = item.id;
                                    move |_| {
                                        navigator.push(Route::Watch { kind, id });
                                    }
                                },
                                if let Some(poster) = item.poster_path.as_deref() {
                                    img {
                                        class: "w-full aspect-[2/3] object-cover",
                                        src: image_url(poster, "w342"),
                                        loading: "lazy",
                                    }
                                }
                                div { class: "p-2",
                                    p { class: "text-sm font-medium truncate", "{item.display_name()}" }
                                    p { class: "text-xs text-gray-500", "{item.media_kind().label()}" }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
