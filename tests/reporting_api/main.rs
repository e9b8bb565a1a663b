//! HTTP tests for the reporting routes.
//!
//! Every test builds an in-process app around a memory store (or a failing
//! store double); no database is required.
//!
//! Run with: cargo test --test reporting_api

mod test_helpers;

mod test_auth;
mod test_generate;
mod test_jobs;
