//! roster — terminal user-management client (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod api;
pub mod config;
pub mod constants;
pub mod controller;
pub mod env;
pub mod form;
pub mod listing;
pub mod logging;
pub mod models;
pub mod notice;
pub mod output;
pub mod store;
