//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Liveness and build information.
pub mod health;
/// Research and plan handlers.
pub mod research;
/// Session counter handlers.
pub mod session;
