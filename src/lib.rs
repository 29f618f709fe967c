//! Portfolio API Library
//!
//! Backend for a personal portfolio site: read endpoints over projects,
//! certifications and user profiles, submission endpoints for feedback,
//! queries and contact requests, a resume click counter, and visitor
//! location tracking de-duplicated by distance moved.
//!
//! # Modules
//!
//! - `api`: API-layer namespace.
//! - `core`: Domain-layer namespace.
//! - `auth`: Shared-secret check.
//! - `config`: Configuration management.
//! - `counter`: Resume click counter.
//! - `db`: Database connection and schema.
//! - `db_storage`: PostgreSQL store implementation.
//! - `errors`: Error handling types.
//! - `fingerprint`: Device fingerprint derivation.
//! - `geo`: Coordinates and great-circle distance.
//! - `handlers`: HTTP request handlers.
//! - `models`: Records, payloads and responses.
//! - `sanitize`: Request body markup filter.
//! - `store`: Store abstraction used by handlers.
//! - `visits`: Visit deduplication.

pub mod api;
pub mod core;

pub mod auth;
pub mod config;
pub mod counter;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod fingerprint;
pub mod geo;
pub mod handlers;
pub mod models;
pub mod sanitize;
pub mod store;
pub mod visits;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::AppState;
use crate::store::PortfolioStore;

/// Builds every API route over `state`.
///
/// Middleware (tracing, CORS, rate limiting, body limits) is added by the
/// binary, so tests can drive this router directly.
pub fn router<S: PortfolioStore>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/health", get(handlers::health))
        // Visitor tracking
        .route("/visited", get(handlers::list_visits::<S>))
        .route("/visited/last", get(handlers::last_visit::<S>))
        .route("/visited/location", post(handlers::record_location::<S>))
        // Resume clicks
        .route("/resume-clicks", get(handlers::resume_clicks::<S>))
        .route(
            "/resume-clicks/increment",
            post(handlers::increment_resume_clicks::<S>),
        )
        // Portfolio content
        .route("/certifications", get(handlers::list_certifications::<S>))
        .route(
            "/certifications/:title",
            get(handlers::get_certification::<S>),
        )
        .route(
            "/projects/category/:category",
            get(handlers::projects_by_category::<S>),
        )
        .route(
            "/projects/details/:id",
            get(handlers::project_details::<S>),
        )
        // Submissions
        .route("/feedback", post(handlers::submit_feedback::<S>))
        .route("/feedbacks", get(handlers::list_feedback::<S>))
        .route("/query", post(handlers::submit_query::<S>))
        .route("/queries", get(handlers::list_queries::<S>))
        .route("/contact", post(handlers::submit_contact::<S>))
        .route("/user-details", get(handlers::list_contacts::<S>))
        .route("/user-profiles", get(handlers::list_user_profiles::<S>))
        // Admin
        .route("/authenticate", post(handlers::authenticate::<S>))
        .with_state(state)
}
