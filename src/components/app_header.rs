//! App Header Component
//!
//! Title bar with the session controls.

use leptos::prelude::*;
use leptos::task::spawn_local;

use inventory_core::{AuthState, Pool};

use super::toast::notify;
use crate::context::use_app_context;
use crate::store::{store_set_login_open, use_app_store, ToastKind};

/// Login button, or the signed-in email with a logout button
#[component]
fn SessionControls() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let auth = ctx.auth_state();

    let logout = move |_| {
        let hook = ctx.auth();
        spawn_local(async move {
            let result = hook.sign_out().await;
            for pool in Pool::ALL {
                ctx.inventory(pool).cancel_edit();
            }
            // Local session is gone either way
            ctx.reload_loaded_pools();
            match result {
                Ok(()) => notify(store, ToastKind::Info, "Signed out"),
                Err(err) => notify(store, ToastKind::Error, format!("Sign-out failed: {err}")),
            }
        });
    };

    move || {
        let (checking, email, is_admin) =
            auth.with(|s: &AuthState| (s.is_checking(), s.email().map(str::to_string), s.is_admin()));
        match email {
            Some(email) => view! {
                <div class="session-controls">
                    <span class="session-user">{email}</span>
                    {is_admin.then(|| view! { <span class="role-badge">"admin"</span> })}
                    <button class="logout-btn" on:click=logout>"Logout"</button>
                </div>
            }
            .into_any(),
            None if checking => view! {
                <div class="session-controls">
                    <span class="session-status">"Loading…"</span>
                </div>
            }
            .into_any(),
            None => view! {
                <div class="session-controls">
                    <button class="login-btn" on:click=move |_| store_set_login_open(&store, true)>
                        "Login"
                    </button>
                </div>
            }
            .into_any(),
        }
    }
}

#[component]
pub fn AppHeader() -> impl IntoView {
    view! {
        <header class="app-header">
            <h1>"GPU Inventory"</h1>
            <SessionControls />
        </header>
    }
}
