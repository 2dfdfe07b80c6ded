//! GPU Inventory App
//!
//! Connects to the hosted backend and lays out the header, pool tabs,
//! active inventory tab, login dialog, toasts and activity log.

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use tracing::{error, info};

use inventory_core::{ConfigError, RemoteClient, SupabaseClient};
use rolling_logger::LogBuffer;

use crate::browser::LocalSessionStore;
use crate::components::{notify, ActivityLog, AppHeader, InventoryTab, LoginDialog, PoolTabBar, Toasts};
use crate::config::{AppSettings, SESSION_STORAGE_KEY};
use crate::context::AppContext;
use crate::store::{AppState, AppStateStoreFields, ToastKind};

/// Backend client for the configured project, resuming any stored session
fn connect(settings: &AppSettings) -> Result<Arc<dyn RemoteClient>, ConfigError> {
    let config = settings.backend_config().inspect_err(|err| {
        error!(error = %err, "Backend is not configured");
    })?;
    info!(url = %config.url, role_table = %config.role_table, "Connecting to backend");

    let client = SupabaseClient::new(config)?.with_session_store(LocalSessionStore::new(SESSION_STORAGE_KEY));
    Ok(Arc::new(client))
}

#[component]
fn Dashboard(backend: Arc<dyn RemoteClient>, logs: LogBuffer) -> impl IntoView {
    let store = Store::new(AppState::new());
    provide_context(store);
    let ctx = AppContext::new(backend, logs);
    provide_context(ctx);

    // Session check on mount
    Effect::new(move |_| {
        let hook = ctx.auth();
        spawn_local(async move {
            if let Err(err) = hook.refresh().await {
                notify(store, ToastKind::Error, format!("Session check failed: {err}"));
            }
        });
    });

    view! {
        <div class="app-layout">
            <AppHeader />
            <PoolTabBar />
            <main class="main-content">
                {move || {
                    let pool = store.active_pool().get();
                    view! { <InventoryTab pool /> }
                }}
            </main>
            <LoginDialog />
            <Toasts />
            <ActivityLog />
        </div>
    }
}

#[component]
pub fn App(settings: AppSettings, logs: LogBuffer) -> impl IntoView {
    let connected = connect(&settings);

    view! {
        <ErrorBoundary fallback=|errors| {
            view! {
                <div class="fatal-error">
                    <h2>"Something went wrong. Please try again later."</h2>
                    <ul>
                        {move || {
                            errors
                                .get()
                                .into_iter()
                                .map(|(_, err)| view! { <li>{err.to_string()}</li> })
                                .collect_view()
                        }}
                    </ul>
                </div>
            }
        }>
            {connected.map(|backend| view! { <Dashboard backend logs /> })}
        </ErrorBoundary>
    }
}
