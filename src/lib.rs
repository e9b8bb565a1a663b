//! Reporting server library.
//!
//! Accepts report-generation requests carrying RISON-encoded job params,
//! validates them against the registered export types and the current
//! license, and persists pending report jobs for workers to pick up.

pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod db;
pub mod entity;
pub mod error;
pub mod export_types;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod rison;
pub mod services;
pub mod store;
