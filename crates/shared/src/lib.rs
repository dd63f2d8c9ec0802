//! Shared types and configuration for Kudi.
//!
//! This crate provides common building blocks used across all other crates:
//! - Money rounding and formatting helpers (decimal, never floating point)
//! - Pagination types for list endpoints
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
