//! HTTP API for workbook imports
//!
//! Run with `attendance-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
