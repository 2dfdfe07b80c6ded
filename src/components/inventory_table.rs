//! Inventory Table Component
//!
//! Loading, load-error and empty states, the add row and the item rows.

use leptos::prelude::*;
use leptos::task::spawn_local;

use inventory_core::{InventoryItem, LoadStatus, Pool};

use super::add_item_form::AddItemForm;
use super::inventory_row::InventoryRow;
use crate::context::use_app_context;

#[component]
pub fn InventoryTable(pool: Pool, items: Memo<Vec<InventoryItem>>) -> impl IntoView {
    let ctx = use_app_context();
    let state = ctx.pool_state(pool);
    let can_manage = Memo::new(move |_| ctx.can_manage());
    let status = Memo::new(move |_| state.with(|s| s.load_status().clone()));

    let retry = move |_| {
        let hook = ctx.inventory(pool);
        spawn_local(async move {
            let _ = hook.load().await;
        });
    };

    let table = move || {
        view! {
            <Show when=move || can_manage.get()>
                <AddItemForm pool />
            </Show>
            <Show
                when=move || !items.with(Vec::is_empty)
                fallback=|| view! { <p class="table-empty">"No inventory items found."</p> }
            >
                <table class="inventory-table">
                    <thead>
                        <tr>
                            <th>"GPU"</th>
                            <th>"Status"</th>
                            <th>"Location"</th>
                            <th>"Notes"</th>
                            <Show when=move || can_manage.get()>
                                <th>"Actions"</th>
                            </Show>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || items.get()
                            key=|item| item.id.clone()
                            children=move |item| view! { <InventoryRow pool id=item.id can_manage /> }
                        />
                    </tbody>
                </table>
            </Show>
        }
    };

    move || match status.get() {
        LoadStatus::Idle | LoadStatus::Loading => {
            view! { <p class="table-status">"Loading inventory..."</p> }.into_any()
        }
        LoadStatus::Failed(message) => view! {
            <div class="table-status error">
                <span>{format!("Error loading inventory: {message}")}</span>
                <button class="retry-btn" on:click=retry>"Retry"</button>
            </div>
        }
        .into_any(),
        LoadStatus::Ready => table().into_any(),
    }
}
