//! Toast Notifications
//!
//! Transient messages stacked in a corner, each dismissed after a few
//! seconds or by its close button.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::store::{store_dismiss_toast, store_push_toast, use_app_store, AppStateStoreFields, AppStore, ToastKind};

const TOAST_DURATION_MS: u32 = 4_000;

/// Show a toast and schedule its removal
pub fn notify(store: AppStore, kind: ToastKind, message: impl Into<String>) {
    let id = store_push_toast(&store, kind, message);
    spawn_local(async move {
        TimeoutFuture::new(TOAST_DURATION_MS).await;
        store_dismiss_toast(&store, id);
    });
}

#[component]
pub fn Toasts() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="toast-stack">
            <For
                each=move || store.toasts().get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.class() role="status">
                            <span class="toast-message">{toast.message}</span>
                            <button
                                class="toast-close"
                                on:click=move |_| store_dismiss_toast(&store, id)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
