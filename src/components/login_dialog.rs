//! Login Dialog Component
//!
//! Modal email/password form. Fields left blank are asked for with the
//! browser prompt.

use leptos::prelude::*;
use leptos::task::spawn_local;

use inventory_core::AuthState;

use super::toast::notify;
use crate::browser::BrowserPrompt;
use crate::context::use_app_context;
use crate::store::{store_set_login_open, use_app_store, AppStateStoreFields, ToastKind};

#[component]
pub fn LoginDialog() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let auth = ctx.auth_state();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let close = move || {
        store_set_login_open(&store, false);
        set_password.set(String::new());
        ctx.auth().dismiss_error();
    };

    let sign_in = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let hook = ctx.auth();
        let (email, secret) = (email.get_untracked(), password.get_untracked());

        spawn_local(async move {
            if hook.sign_in(Some(email), Some(secret), &BrowserPrompt).await.is_ok() {
                set_password.set(String::new());
                store_set_login_open(&store, false);
                ctx.reload_loaded_pools();
                let who = auth.with_untracked(|s| s.email().unwrap_or_default().to_string());
                notify(store, ToastKind::Success, format!("Signed in as {who}"));
            }
        });
    };

    view! {
        <Show when=move || store.login_open().get()>
            <div class="modal-backdrop" on:click=move |_| close()>
                <form
                    class="login-dialog"
                    on:submit=sign_in
                    on:click=|ev| ev.stop_propagation()
                >
                    <h2>"Sign in"</h2>
                    <label>
                        "Email"
                        <input
                            type="email"
                            autocomplete="username"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Password"
                        <input
                            type="password"
                            autocomplete="current-password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                    </label>
                    {move || auth.with(|s| s.error().map(str::to_string)).map(|message| view! {
                        <p class="login-error" role="alert">{message}</p>
                    })}
                    <div class="dialog-actions">
                        <button type="submit" disabled=move || auth.with(AuthState::is_checking)>
                            "Login"
                        </button>
                        <button type="button" on:click=move |_| close()>"Cancel"</button>
                    </div>
                </form>
            </div>
        </Show>
    }
}
