//! UI Components
//!
//! Leptos components of the inventory dashboard.

mod activity_log;
mod add_item_form;
mod app_header;
mod delete_confirm_button;
mod inventory_row;
mod inventory_tab;
mod inventory_table;
mod login_dialog;
mod pool_tab_bar;
mod status_select;
mod toast;

pub use activity_log::ActivityLog;
pub use app_header::AppHeader;
pub use inventory_tab::InventoryTab;
pub use login_dialog::LoginDialog;
pub use pool_tab_bar::PoolTabBar;
pub use toast::{notify, Toasts};
