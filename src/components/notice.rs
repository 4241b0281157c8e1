use dioxus::prelude::*;

use crate::playback::ListNotice;

const NOTICE_DURATION_MS: u32 = 3_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
    id: u64,
}

impl From<ListNotice> for Notice {
    fn from(notice: ListNotice) -> Self {
        Self {
            message: notice.message.to_string(),
            is_error: notice.is_error,
            id: 0,
        }
    }
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
            id: 0,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
            id: 0,
        }
    }
}

#[derive(Clone, Copy)]
pub struct NoticeSignal(pub Signal<Option<Notice>>);

impl NoticeSignal {
    /// Shows `notice` and clears it after a few seconds unless a newer one replaced it.
    pub fn show(self, notice: impl Into<Notice>) {
        let mut slot = self.0;
        let id = slot.peek().as_ref().map(|n| n.id + 1).unwrap_or(1);
        let mut notice = notice.into();
        notice.id = id;
        slot.set(Some(notice));

        spawn(async move {
            sleep_ms(NOTICE_DURATION_MS).await;
            if slot.peek().as_ref().map(|n| n.id) == Some(id) {
                slot.set(None);
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
async fn sleep_ms(ms: u32) {
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep_ms(ms: u32) {
    tokio::time::sleep(std::time::Duration::from_millis(u64::from(ms))).await;
}

#[component]
pub fn NoticeToast() -> Element {
    let notice = use_context::<NoticeSignal>().0;

    rsx! {
        if let Some(current) = notice() {
            div { class: "fixed left-0 right-0 bottom-6 px-3 z-[120] pointer-events-none flex justify-center",
                div {
                    class: if current.is_error { "notice notice-error" } else { "notice notice-success" },
                    "{current.message}"
                }
            }
        }
    }
}
