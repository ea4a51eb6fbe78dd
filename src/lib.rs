//! Library crate for usermgmt-tui.
//!
//! This crate exposes the building blocks of the TUI:
//! - HTTP client and wire types for the user-management API (`api`)
//! - Application state, controller and update loop (`app`)
//! - Error taxonomy and banner text composition (`error`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `usermgmt-tui` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod error;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
pub use api::{ApiClient, NewUser, PositionList, User};
pub use app::controller::Controller;
pub use error::ApiError;
