//! Add Item Form Component
//!
//! Admin-only row for creating a record in the current pool.

use leptos::prelude::*;
use leptos::task::spawn_local;

use inventory_core::{ItemDraft, ItemField, Pool};

use super::status_select::StatusSelect;
use super::toast::notify;
use crate::context::use_app_context;
use crate::store::{use_app_store, ToastKind};

/// Form for creating new inventory records
#[component]
pub fn AddItemForm(pool: Pool) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let draft = RwSignal::new(ItemDraft::default());
    let (submitting, set_submitting) = signal(false);

    let add_item = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let current = draft.get_untracked();
        let hook = ctx.inventory(pool);
        set_submitting.set(true);

        spawn_local(async move {
            if let Ok(created) = hook.add(&current).await {
                draft.set(ItemDraft::default());
                notify(store, ToastKind::Success, format!("Added {}", created.gpu));
            }
            set_submitting.set(false);
        });
    };

    let text_input = move |field: ItemField| {
        view! {
            <input
                type="text"
                class=format!("add-item-{}", field.name())
                placeholder=field.placeholder()
                prop:value=move || draft.with(|d| d.get(field).to_string())
                on:input=move |ev| draft.update(|d| d.set(field, event_target_value(&ev)))
            />
        }
    };

    view! {
        <form class="add-item-form" on:submit=add_item>
            {text_input(ItemField::Gpu)}
            <StatusSelect
                value=Signal::derive(move || draft.with(|d| d.status.clone()))
                on_change=Callback::new(move |status: String| draft.update(|d| d.status = status))
            />
            {text_input(ItemField::Location)}
            {text_input(ItemField::Notes)}
            <button type="submit" disabled=move || submitting.get()>
                {move || if submitting.get() { "Adding..." } else { "Add" }}
            </button>
        </form>
    }
}
