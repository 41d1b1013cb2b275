//! Server-side state: configuration and the per-session list views.

pub mod config;
pub mod list_views;
