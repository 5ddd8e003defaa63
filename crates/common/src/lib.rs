//! Common utilities, types, and configurations shared across Prodex crates.
//!
//! This crate contains the base building blocks for the Prodex system, including:
//! - **Configuration**: Strongly typed application configuration (`config`).
//! - **Models**: The result record representation (`models`).
//! - **Telemetry**: Logging setup (`telemetry`).
//! - **Resilience**: Retry helpers for backend connection (`retry`).
pub mod config;
pub mod models;
pub mod retry;
pub mod telemetry;
