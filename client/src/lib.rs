//! Data layer for the coaching-center dashboard.
//!
//! The dashboard never talks to the backend directly: it goes through
//! [`store::DataStore`], which probes the API once per session and then routes
//! every read and mutation either through the REST transport ([`api`]) and the
//! shape mappers ([`mappers`]), or against the built-in offline sample data
//! ([`sample`]). Local app settings (center name, access password) live in
//! [`settings`].

pub mod api;
pub mod mappers;
pub mod sample;
pub mod settings;
pub mod store;

pub use api::{ApiClient, ApiError};
pub use settings::{Settings, SettingsError, SettingsFile};
pub use store::{ConnectionMode, DataStore, Notification, NotificationKind, StoreError};
