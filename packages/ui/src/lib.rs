//! This crate contains all shared UI for the community hub.
//!
//! Mount order: [`HubProvider`] (dispatcher, config, feeds, alerts), then
//! [`SessionProvider`], then [`views::AppShell`].

pub mod alert;
pub use alert::{raise_alert, use_alerts, Alert, AlertHost, AlertLevel, Alerts};

mod device;
pub use device::{make_document_store, make_session_store, DeviceKv};

pub mod format;

mod hub;
pub use hub::{use_config, use_hub, use_hub_data, AppHub, HubData, HubProvider};

pub mod image_attach;
pub use image_attach::{downscale_to_data_url, ImageError};

pub mod login;
pub use login::{LoginError, LoginFlow, LoginOutcome, LoginStep};

mod session;
pub use session::{log_in, log_out, use_session, SessionProvider};

pub mod share_card;
pub use share_card::{share_card, ShareCard, ShareOutcome};

pub mod view_state;
pub use view_state::{FormView, Screen, Tab, ViewState};

pub mod views;
pub use views::{use_view_state, AppShell};
