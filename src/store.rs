//! The [`PortfolioStore`] trait: every document-store operation the API performs.
//!
//! Handlers depend on this abstraction rather than on PostgreSQL directly;
//! [`crate::db_storage::PgStore`] is the production implementation.

use std::future::Future;

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    Certification, ContactSubmission, FeedbackEntry, NewContact, NewFeedback, NewQuery,
    NewVisit, Project, QueryEntry, UserProfile, VisitRecord,
};

/// Abstraction over the portfolio's document collections.
///
/// Each method is a single store round trip. Records are append-only: nothing
/// here updates or deletes.
pub trait PortfolioStore: Send + Sync + 'static {
    // ── Visits ────────────────────────────────────────────────────────────

    /// Most recent visit across all clients.
    fn latest_visit(
        &self,
    ) -> impl Future<Output = Result<Option<VisitRecord>, AppError>> + Send + '_;

    /// Most recent visit for one client identity.
    ///
    /// Ordered by `recorded_at` descending with the insertion id as tie-break,
    /// so the answer is stable when timestamps collide.
    fn latest_visit_for<'a>(
        &'a self,
        client_identity: &'a str,
    ) -> impl Future<Output = Result<Option<VisitRecord>, AppError>> + Send + 'a;

    fn list_visits(&self) -> impl Future<Output = Result<Vec<VisitRecord>, AppError>> + Send + '_;

    fn insert_visit(
        &self,
        visit: NewVisit,
    ) -> impl Future<Output = Result<VisitRecord, AppError>> + Send + '_;

    // ── Certifications & projects ─────────────────────────────────────────

    fn list_certifications(
        &self,
    ) -> impl Future<Output = Result<Vec<Certification>, AppError>> + Send + '_;

    fn find_certification<'a>(
        &'a self,
        title: &'a str,
    ) -> impl Future<Output = Result<Option<Certification>, AppError>> + Send + 'a;

    /// Projects in `category`, or every project when `category` is `None`.
    fn list_projects<'a>(
        &'a self,
        category: Option<&'a str>,
    ) -> impl Future<Output = Result<Vec<Project>, AppError>> + Send + 'a;

    fn find_project(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Project>, AppError>> + Send + '_;

    // ── Submissions ───────────────────────────────────────────────────────

    fn insert_feedback(
        &self,
        entry: NewFeedback,
    ) -> impl Future<Output = Result<FeedbackEntry, AppError>> + Send + '_;

    fn list_feedback(
        &self,
    ) -> impl Future<Output = Result<Vec<FeedbackEntry>, AppError>> + Send + '_;

    fn insert_query(
        &self,
        entry: NewQuery,
    ) -> impl Future<Output = Result<QueryEntry, AppError>> + Send + '_;

    fn list_queries(&self) -> impl Future<Output = Result<Vec<QueryEntry>, AppError>> + Send + '_;

    fn insert_contact(
        &self,
        contact: NewContact,
    ) -> impl Future<Output = Result<ContactSubmission, AppError>> + Send + '_;

    fn list_contacts(
        &self,
    ) -> impl Future<Output = Result<Vec<ContactSubmission>, AppError>> + Send + '_;

    // ── Profiles ──────────────────────────────────────────────────────────

    fn list_user_profiles(
        &self,
    ) -> impl Future<Output = Result<Vec<UserProfile>, AppError>> + Send + '_;
}
