//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for the research agent, built on
//! the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /api/research` - Run the full pipeline, returns a `ResearchBundle`
//! - `POST /api/plan` - Generate a research plan only
//! - `GET /api/session` - Counters for this server process
//!
//! Request bodies are JSON: `{"query": "prix immobilier Paris 2025"}`.
//! Errors are returned as `{"error": "..."}` with 400 for invalid input.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
