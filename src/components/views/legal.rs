use dioxus::prelude::*;

#[component]
pub fn Legal() -> Element {
    rsx! {
        article { class: "max-w-2xl space-y-4 text-sm text-gray-300",
            h2 { class: "text-xl font-semibold text-white", "Legal" }
            p {
                "CinePlay does not host, upload or store any video files. Every stream is embedded from a third-party provider and played inside that provider's own player."
            }
            p {
                "Titles, artwork and episode data come from The Movie Database (TMDB). CinePlay is not endorsed or certified by TMDB."
            }
            p {
                "Copyright or other legal issues should be taken up with the file hosts and providers. CinePlay is not responsible for content served by third parties."
            }
            p {
                "Your list, settings and watch progress stay on this device and are never sent anywhere."
            }
        }
    }
}
