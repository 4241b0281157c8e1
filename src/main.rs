use dioxus::prelude::*;

mod api;
mod components;
mod db;
mod playback;

use components::Route;

const APP_CSS: Asset = asset!("/assets/styling/app.css");
const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "CinePlay" }
        document::Meta { name: "theme-color", content: "#000000" }
        document::Meta { name: "referrer", content: "origin" }

        document::Script { src: TAILWIND_CDN }
        document::Stylesheet { href: APP_CSS }

        Router::<Route> {}
    }
}
