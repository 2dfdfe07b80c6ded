//! Inventory Tab Component
//!
//! One pool: filter box, stats line, mutation error banner and table.

use leptos::prelude::*;
use leptos::task::spawn_local;

use inventory_core::{InventoryStats, LoadStatus, Pool, PoolState};

use super::inventory_table::InventoryTable;
use crate::context::use_app_context;

#[component]
fn InventoryFilter(pool: Pool) -> impl IntoView {
    let ctx = use_app_context();
    let state = ctx.pool_state(pool);

    view! {
        <input
            type="search"
            class="inventory-filter"
            placeholder="Filter by GPU..."
            prop:value=move || state.with(|s| s.filter().to_string())
            on:input=move |ev| ctx.inventory(pool).set_filter(event_target_value(&ev))
        />
    }
}

#[component]
fn InventoryStatsLine(stats: Memo<InventoryStats>) -> impl IntoView {
    view! {
        <p class="inventory-stats">
            {move || {
                let stats = stats.get();
                let mut line = format!(
                    "Total: {} | Billed: {} | Not Billed: {} | Consumed: {}",
                    stats.total, stats.billed, stats.not_billed, stats.consumed
                );
                if stats.unrecognized() > 0 {
                    line.push_str(&format!(" | Other: {}", stats.unrecognized()));
                }
                line
            }}
        </p>
    }
}

#[component]
pub fn InventoryTab(pool: Pool) -> impl IntoView {
    let ctx = use_app_context();
    let state = ctx.pool_state(pool);

    // First visit fetches; later visits show the cached pool
    if state.with_untracked(|s| s.load_status() == &LoadStatus::Idle) {
        let hook = ctx.inventory(pool);
        spawn_local(async move {
            let _ = hook.load().await;
        });
    }

    let revision = Memo::new(move |_| state.with(PoolState::revision));
    let filter = Memo::new(move |_| state.with(|s| s.filter().to_string()));
    let items = Memo::new(move |_| {
        revision.track();
        filter.track();
        state.with_untracked(PoolState::filtered_items)
    });
    let stats = Memo::new(move |_| items.with(|items| InventoryStats::from_items(items)));
    let error = Memo::new(move |_| state.with(|s| s.error().map(str::to_string)));
    let loading = Memo::new(move |_| state.with(PoolState::is_loading));

    let reload = move |_| {
        let hook = ctx.inventory(pool);
        spawn_local(async move {
            let _ = hook.load().await;
        });
    };

    view! {
        <section class="inventory-tab">
            <h2>{pool.title()}</h2>
            <div class="inventory-toolbar">
                <InventoryFilter pool />
                <InventoryStatsLine stats />
                <button class="reload-btn" disabled=move || loading.get() on:click=reload>
                    "Reload"
                </button>
            </div>
            {move || error.get().map(|message| view! {
                <div class="error-banner" role="alert">
                    <span>{message}</span>
                    <button on:click=move |_| ctx.inventory(pool).dismiss_error()>"Dismiss"</button>
                </div>
            })}
            <InventoryTable pool items />
        </section>
    }
}
