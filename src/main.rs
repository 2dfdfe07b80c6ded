//! GPU Inventory Frontend Entry Point

mod app;
mod browser;
mod components;
mod config;
mod context;
mod store;

use app::App;
use config::{AppSettings, APP_NAME, LOG_CAPACITY};
use leptos::prelude::*;
use rolling_logger::LogBuffer;

fn main() {
    console_error_panic_hook::set_once();

    let settings = AppSettings::from_build_env();
    let logs = match rolling_logger::init_logger(APP_NAME, &settings.log_level, LOG_CAPACITY) {
        Ok(logs) => logs,
        Err(err) => {
            leptos::logging::error!("logger init failed: {err}");
            LogBuffer::new(LOG_CAPACITY)
        }
    };

    mount_to_body(move || view! { <App settings logs /> });
}
