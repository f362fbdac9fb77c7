//! Local settings and subscription state for the Peerdraft collaboration plugin.
//!
//! - [`settings`] loads, migrates and persists the per-installation record
//! - [`subscription`] keeps the cached plan in step with the subscription service

pub mod cli;
pub mod config;
pub mod paths;
pub mod render;
pub mod settings;
pub mod subscription;
