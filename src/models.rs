use crate::config::AdminContact;
use crate::geo::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ============ Stored Records ============

/// One accepted location report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    /// Insertion-ordered identifier; breaks ties between equal `recorded_at` values.
    pub id: i64,
    /// Deduplication key, see [`crate::visits::client_identity`].
    pub client_identity: String,
    pub network_address: String,
    pub device_fingerprint: String,
    pub location: GeoPoint,
    pub recorded_at: DateTime<Utc>,
}

/// A visit about to be written; the store assigns `id` and `recorded_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVisit {
    pub client_identity: String,
    pub network_address: String,
    pub device_fingerprint: String,
    pub location: GeoPoint,
}

/// A contact-form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: Uuid,
    pub full_name: String,
    pub wants_collaboration: bool,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub query: String,
    pub created_at: DateTime<Utc>,
}

/// A certification, looked up by its unique title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: Uuid,
    pub title: String,
    pub image_references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub description: Vec<String>,
    pub additional_details: Vec<String>,
}

/// A signed-in user's profile. Populated outside this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub location: Option<GeoPoint>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

// ============ Request Payloads ============

/// Body of `POST /visited/location`. Coordinates stay raw until
/// [`GeoPoint::from_report`] validates them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationReport {
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub full_name: Option<String>,
    #[serde(default)]
    pub wants_collaboration: bool,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticateRequest {
    #[serde(default)]
    pub password: String,
}

// Validated inputs handed to the store.

#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub name: String,
    pub email: String,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQuery {
    pub name: String,
    pub email: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub full_name: String,
    pub wants_collaboration: bool,
    pub phone_number: String,
}

// ============ Responses ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub message: String,
    pub stored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit: Option<VisitRecord>,
    /// Distance from the previous record, when there was one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClickCountResponse {
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub message: String,
    pub admin_info: AdminContact,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    pub authenticated: bool,
}
