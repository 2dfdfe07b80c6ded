//! Inventory Row Component
//!
//! One table row. Read-only cells normally; while the row is the pool's
//! edit target the cells become inputs bound to the scratch copy.

use leptos::prelude::*;
use leptos::task::spawn_local;

use inventory_core::{Confirmed, DeleteOutcome, InventoryItem, ItemField, ItemFields, ItemId, Pool, SaveOutcome};

use super::delete_confirm_button::DeleteConfirmButton;
use super::status_select::{status_class, StatusSelect};
use super::toast::notify;
use crate::context::use_app_context;
use crate::store::{use_app_store, ToastKind};

/// Text input bound to one scratch field
#[component]
fn ScratchInput(pool: Pool, field: ItemField, scratch: Memo<Option<ItemFields>>) -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <input
            type="text"
            class="row-input"
            placeholder=field.placeholder()
            prop:value=move || scratch.with(|s| s.as_ref().map(|f| f.get(field).to_string()).unwrap_or_default())
            on:input=move |ev| {
                ctx.inventory(pool).update_scratch(field, event_target_value(&ev));
            }
        />
    }
}

#[component]
pub fn InventoryRow(pool: Pool, id: ItemId, can_manage: Memo<bool>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let state = ctx.pool_state(pool);
    let id = StoredValue::new(id);

    let item = Memo::new(move |_| id.with_value(|id| state.with(|s| s.find(id).cloned())));
    let editing = Memo::new(move |_| id.with_value(|id| state.with(|s| s.edit().is_editing(id))));
    let scratch = Memo::new(move |_| {
        if editing.get() {
            state.with(|s| s.edit().scratch().cloned())
        } else {
            None
        }
    });

    let start_edit = move |_| {
        let result = id.with_value(|id| ctx.inventory(pool).edit(id));
        match result {
            Ok(Some(abandoned)) => {
                let gpu = state.with_untracked(|s| s.find(&abandoned).map(|item| item.gpu.clone()));
                let label = gpu.unwrap_or_else(|| abandoned.to_string());
                notify(store, ToastKind::Info, format!("Discarded unsaved changes to {label}"));
            }
            Ok(None) => {}
            Err(err) => notify(store, ToastKind::Error, err.to_string()),
        }
    };

    let save = move |_| {
        let hook = ctx.inventory(pool);
        spawn_local(async move {
            if let Ok(SaveOutcome::Saved(saved)) = hook.save().await {
                notify(store, ToastKind::Success, format!("Saved {}", saved.gpu));
            }
        });
    };

    let cancel = move |_| ctx.inventory(pool).cancel_edit();

    let delete = Callback::new(move |_: ()| {
        let hook = ctx.inventory(pool);
        let target = id.get_value();
        let gpu = item.get_untracked().map(|item| item.gpu).unwrap_or_default();
        spawn_local(async move {
            if let Ok(DeleteOutcome::Deleted) = hook.delete(&target, &Confirmed).await {
                notify(store, ToastKind::Success, format!("Deleted {gpu}"));
            }
        });
    });

    let viewing_cells = move |current: InventoryItem| {
        view! {
            <td class="cell-gpu">{current.gpu.clone()}</td>
            <td class="cell-status">
                <span class=status_class(&current.status)>{current.status.label().to_string()}</span>
            </td>
            <td class="cell-location">{current.location.clone()}</td>
            <td class="cell-notes">{current.notes_text().to_string()}</td>
            <Show when=move || can_manage.get()>
                <td class="cell-actions">
                    <button class="edit-btn" on:click=start_edit>"Edit"</button>
                    <DeleteConfirmButton
                        subject=Signal::derive(move || item.with(|i| i.as_ref().map(|i| i.gpu.clone()).unwrap_or_default()))
                        on_confirm=delete
                    />
                </td>
            </Show>
        }
    };

    let editing_cells = move || {
        view! {
            <td><ScratchInput pool field=ItemField::Gpu scratch /></td>
            <td>
                <StatusSelect
                    value=Signal::derive(move || scratch.with(|s| s.as_ref().map(|f| f.status.clone()).unwrap_or_default()))
                    on_change=Callback::new(move |status: String| {
                        ctx.inventory(pool).update_scratch(ItemField::Status, status);
                    })
                />
            </td>
            <td><ScratchInput pool field=ItemField::Location scratch /></td>
            <td><ScratchInput pool field=ItemField::Notes scratch /></td>
            <td class="cell-actions">
                <button class="save-btn" on:click=save>"Save"</button>
                <button class="cancel-btn" on:click=cancel>"Cancel"</button>
            </td>
        }
    };

    view! {
        <tr class=move || if editing.get() { "inventory-row editing" } else { "inventory-row" }>
            {move || {
                let current = item.get()?;
                Some(if editing.get() && can_manage.get() {
                    editing_cells().into_any()
                } else {
                    viewing_cells(current).into_any()
                })
            }}
        </tr>
    }
}
