//! Pool Tab Bar Component
//!
//! Switches between the two inventory pools.

use leptos::prelude::*;

use inventory_core::Pool;

use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn PoolTabBar() -> impl IntoView {
    let store = use_app_store();

    view! {
        <nav class="pool-tab-bar">
            <For
                each=|| Pool::ALL
                key=|pool| *pool
                children=move |pool| {
                    let tab_class = move || {
                        if store.active_pool().get() == pool { "pool-tab active" } else { "pool-tab" }
                    };
                    view! {
                        <button class=tab_class on:click=move |_| store.active_pool().set(pool)>
                            {pool.title()}
                        </button>
                    }
                }
            />
        </nav>
    }
}
