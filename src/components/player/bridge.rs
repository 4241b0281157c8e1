//! Browser-side event plumbing for the watch page.
//!
//! Installs `message`, `online`, `offline` and `error` listeners for as long as the
//! watch page is mounted and feeds them into the [`PlaybackSession`] signal.

use dioxus::prelude::*;

use crate::db::DbError;
use crate::playback::{MessageOutcome, MountGeneration, PlaybackSession};
#[cfg(target_arch = "wasm32")]
use crate::playback::InboundMessage;

#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};
#[cfg(target_arch = "wasm32")]
use web_sys::window;

/// DOM id of the frame element for one mount.
pub fn frame_element_id(generation: MountGeneration) -> String {
    format!("cineplay-frame-{generation}")
}

#[cfg(target_arch = "wasm32")]
pub fn browser_is_online() -> bool {
    window().map(|w| w.navigator().on_line()).unwrap_or(true)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn browser_is_online() -> bool {
    true
}

/// Matches the posting window against the frame of the current mount. Anything else is
/// left untagged and the session drops it.
#[cfg(target_arch = "wasm32")]
fn tag_generation(
    event: &web_sys::MessageEvent,
    current: MountGeneration,
) -> Option<MountGeneration> {
    let source = event.source()?;
    let frame = window()?
        .document()?
        .get_element_by_id(&frame_element_id(current))?
        .dyn_into::<web_sys::HtmlIFrameElement>()
        .ok()?;
    let frame_window = frame.content_window()?;
    js_sys::Object::is(&source, &frame_window).then_some(current)
}

#[cfg(target_arch = "wasm32")]
fn message_payload(data: &wasm_bindgen::JsValue) -> serde_json::Value {
    if let Some(text) = data.as_string() {
        return serde_json::Value::String(text);
    }
    js_sys::JSON::stringify(data)
        .ok()
        .and_then(|json| json.as_string())
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or(serde_json::Value::Null)
}

#[cfg(target_arch = "wasm32")]
fn is_fetch_failure(message: &str) -> bool {
    message.contains("NetworkError") || message.contains("fetch")
}

/// Runs inside raw browser callbacks where no component scope is active, so nothing
/// here may spawn tasks.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn handle_outcome(
    outcome: MessageOutcome,
    persist_progress: impl FnOnce(&serde_json::Value) -> Result<(), DbError>,
) {
    match outcome {
        MessageOutcome::Advanced { episode, generation } => {
            tracing::info!(episode, %generation, "advanced to next episode");
        }
        MessageOutcome::Progress(progress) => {
            if let Err(err) = persist_progress(&progress) {
                tracing::warn!(%err, "failed to store watch progress");
            }
        }
        MessageOutcome::Ignored => {}
    }
}

#[cfg(target_arch = "wasm32")]
struct Listener {
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

#[cfg(target_arch = "wasm32")]
#[derive(Default)]
struct Listeners(RefCell<Vec<Listener>>);

#[cfg(target_arch = "wasm32")]
impl Listeners {
    fn add(&self, event: &'static str, callback: Closure<dyn FnMut(web_sys::Event)>) {
        let Some(win) = window() else {
            return;
        };
        let _ = win.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
        self.0.borrow_mut().push(Listener { event, callback });
    }

    fn remove_all(&self) {
        let Some(win) = window() else {
            return;
        };
        for listener in self.0.borrow_mut().drain(..) {
            let _ = win.remove_event_listener_with_callback(
                listener.event,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn use_player_bridge(session: Signal<PlaybackSession>) {
    let listeners = use_hook(|| std::rc::Rc::new(Listeners::default()));

    {
        let listeners = listeners.clone();
        use_effect(move || {
            if !listeners.0.borrow().is_empty() {
                return;
            }
            let runtime = Runtime::current();

            let message_cb = {
                let runtime = runtime.clone();
                let mut session = session;
                Closure::wrap(Box::new(move |event: web_sys::Event| {
                    let _guard = RuntimeGuard::new(runtime.clone());
                    let Ok(event) = event.dyn_into::<web_sys::MessageEvent>() else {
                        return;
                    };
                    let current = session.peek().generation();
                    let message = InboundMessage {
                        origin: event.origin(),
                        generation: tag_generation(&event, current),
                        payload: message_payload(&event.data()),
                    };
                    let outcome = session.write().on_player_message(&message);
                    handle_outcome(outcome, crate::db::save_watch_progress);
                }) as Box<dyn FnMut(web_sys::Event)>)
            };

            let error_cb = {
                let runtime = runtime.clone();
                let mut session = session;
                Closure::wrap(Box::new(move |event: web_sys::Event| {
                    let _guard = RuntimeGuard::new(runtime.clone());
                    let Ok(event) = event.dyn_into::<web_sys::ErrorEvent>() else {
                        return;
                    };
                    if is_fetch_failure(&event.message()) {
                        session.write().on_network_failure();
                    }
                }) as Box<dyn FnMut(web_sys::Event)>)
            };

            listeners.add("message", message_cb);
            listeners.add("error", error_cb);

            for event_name in ["online", "offline"] {
                let runtime = runtime.clone();
                let mut session = session;
                let connectivity_cb = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                    let _guard = RuntimeGuard::new(runtime.clone());
                    session.write().on_connectivity(browser_is_online());
                }) as Box<dyn FnMut(web_sys::Event)>);
                listeners.add(event_name, connectivity_cb);
            }
        });
    }

    use_drop(move || listeners.remove_all());
}

/// Desktop webviews do not surface cross-origin frame messages; the lifecycle is driven by
/// load/error callbacks alone.
#[cfg(not(target_arch = "wasm32"))]
pub fn use_player_bridge(_session: Signal<PlaybackSession>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[test]
    fn progress_is_persisted_without_a_runtime() {
        let stored = RefCell::new(Vec::new());
        handle_outcome(
            MessageOutcome::Progress(json!({ "1399": { "progress": 42 } })),
            |progress| {
                stored.borrow_mut().push(progress.clone());
                Ok(())
            },
        );
        assert_eq!(stored.into_inner(), vec![json!({ "1399": { "progress": 42 } })]);
    }

    #[test]
    fn storage_failure_is_swallowed() {
        handle_outcome(MessageOutcome::Progress(json!({})), |_| {
            Err(DbError::Storage("quota exceeded".into()))
        });
    }

    #[test]
    fn other_outcomes_store_nothing() {
        let calls = RefCell::new(0);
        let count = |_: &serde_json::Value| {
            *calls.borrow_mut() += 1;
            Ok(())
        };
        handle_outcome(MessageOutcome::Ignored, count);
        handle_outcome(
            MessageOutcome::Advanced {
                episode: 2,
                generation: MountGeneration(3),
            },
            |_| {
                *calls.borrow_mut() += 1;
                Ok(())
            },
        );
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn frame_ids_follow_the_mount() {
        assert_eq!(frame_element_id(MountGeneration(7)), "cineplay-frame-7");
    }
}
