use crate::auth::verify_shared_secret;
use crate::config::Config;
use crate::counter::ResumeClickCounter;
use crate::errors::AppError;
use crate::fingerprint::device_fingerprint;
use crate::geo::GeoPoint;
use crate::models::*;
use crate::sanitize::SanitizedJson;
use crate::store::PortfolioStore;
use crate::visits::{client_address, VisitDeduplicator, VisitOutcome, VisitReport};
use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use uuid::Uuid;

/// Category value that matches every project.
pub const ALL_CATEGORIES: &str = "all";

/// Shared application state injected into handlers.
pub struct AppState<S> {
    /// Document store backing every collection.
    pub store: S,
    /// Application configuration.
    pub config: Config,
    /// Resume link clicks since process start.
    pub resume_clicks: ResumeClickCounter,
    /// Serializes visit lookups/inserts per client identity.
    pub visits: VisitDeduplicator,
}

impl<S: PortfolioStore> AppState<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self {
            store,
            config,
            resume_clicks: ResumeClickCounter::new(),
            visits: VisitDeduplicator::new(),
        }
    }
}

type SharedState<S> = State<Arc<AppState<S>>>;

/// Returns the trimmed value of a required text field, or a 400 naming the field.
fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing required field: {}", field)))
}

/// GET /
pub async fn welcome() -> &'static str {
    "Welcome to My API"
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "portfolio-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

// ============ Visits ============

/// GET /visited/last
///
/// Most recent visit from any client, or `null` when nothing has been recorded.
pub async fn last_visit<S: PortfolioStore>(
    State(state): SharedState<S>,
) -> Result<Json<Option<VisitRecord>>, AppError> {
    tracing::info!("GET /visited/last");
    let visit = state.store.latest_visit().await?;
    Ok(Json(visit))
}

/// GET /visited
pub async fn list_visits<S: PortfolioStore>(
    State(state): SharedState<S>,
) -> Result<Json<Vec<VisitRecord>>, AppError> {
    tracing::info!("GET /visited");
    let visits = state.store.list_visits().await?;
    Ok(Json(visits))
}

/// POST /visited/location
///
/// Resolves the client's address and fingerprint, then stores the reported
/// location only if the client moved at least a kilometre since its last
/// stored visit.
///
/// # Returns
///
/// * `201 Created` with the new record when stored.
/// * `200 OK` with `stored: false` when the client has not moved far enough.
pub async fn record_location<S: PortfolioStore>(
    State(state): SharedState<S>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    SanitizedJson(report): SanitizedJson<LocationReport>,
) -> Result<(StatusCode, Json<LocationResponse>), AppError> {
    let location = GeoPoint::from_report(report.latitude.as_ref(), report.longitude.as_ref())?;
    let network_address = client_address(
        &headers,
        connect_info.map(|ConnectInfo(addr)| addr),
        state.config.trust_proxy_headers,
    )?;
    let device_fingerprint = device_fingerprint(&headers)?;

    tracing::info!(
        "POST /visited/location - address: {}, location: ({}, {})",
        network_address,
        location.latitude,
        location.longitude
    );

    let outcome = state
        .visits
        .record(
            &state.store,
            VisitReport {
                network_address,
                device_fingerprint,
                location,
            },
        )
        .await?;

    let response = match outcome {
        VisitOutcome::Stored {
            record,
            distance_km,
        } => (
            StatusCode::CREATED,
            Json(LocationResponse {
                message: "Location stored".to_string(),
                stored: true,
                visit: Some(record),
                distance_km,
            }),
        ),
        VisitOutcome::NotStored { distance_km } => (
            StatusCode::OK,
            Json(LocationResponse {
                message: "Location not stored: insufficient movement".to_string(),
                stored: false,
                visit: None,
                distance_km: Some(distance_km),
            }),
        ),
    };

    Ok(response)
}

// ============ Resume clicks ============

/// POST /resume-clicks/increment
pub async fn increment_resume_clicks<S: PortfolioStore>(
    State(state): SharedState<S>,
) -> Json<ClickCountResponse> {
    let count = state.resume_clicks.increment();
    tracing::debug!("Resume clicks: {}", count);
    Json(ClickCountResponse { count })
}

/// GET /resume-clicks
pub async fn resume_clicks<S: PortfolioStore>(
    State(state): SharedState<S>,
) -> Json<ClickCountResponse> {
    Json(ClickCountResponse {
        count: state.resume_clicks.current(),
    })
}

// ============ Certifications & projects ============

/// GET /certifications
pub async fn list_certifications<S: PortfolioStore>(
    State(state): SharedState<S>,
) -> Result<Json<Vec<Certification>>, AppError> {
    tracing::info!("GET /certifications");
    Ok(Json(state.store.list_certifications().await?))
}

/// GET /certifications/:title
pub async fn get_certification<S: PortfolioStore>(
    State(state): SharedState<S>,
    Path(title): Path<String>,
) -> Result<Json<Certification>, AppError> {
    tracing::info!("GET /certifications/{}", title);

    let certification = state
        .store
        .find_certification(&title)
        .await?
        .ok_or_else(|| AppError::NotFound("Certification not found".to_string()))?;

    Ok(Json(certification))
}

/// GET /projects/category/:category
///
/// `all` returns every project.
pub async fn projects_by_category<S: PortfolioStore>(
    State(state): SharedState<S>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Project>>, AppError> {
    tracing::info!("GET /projects/category/{}", category);

    let filter = (category != ALL_CATEGORIES).then_some(category.as_str());
    let projects = state.store.list_projects(filter).await?;

    Ok(Json(projects))
}

/// GET /projects/details/:id
///
/// The id is validated before any lookup; a malformed id is a 400.
pub async fn project_details<S: PortfolioStore>(
    State(state): SharedState<S>,
    Path(id): Path<String>,
) -> Result<Json<Project>, AppError> {
    tracing::info!("GET /projects/details/{}", id);

    let id = Uuid::parse_str(&id).map_err(|_| {
        tracing::warn!("Invalid project ID: {}", id);
        AppError::BadRequest("Invalid project ID".to_string())
    })?;

    let project = state
        .store
        .find_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

// ============ Submissions ============

/// POST /feedback
pub async fn submit_feedback<S: PortfolioStore>(
    State(state): SharedState<S>,
    SanitizedJson(payload): SanitizedJson<FeedbackRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let entry = NewFeedback {
        name: required(payload.name, "name")?,
        email: required(payload.email, "email")?,
        feedback: required(payload.feedback, "feedback")?,
    };
    tracing::info!("POST /feedback - from: {}", entry.email);

    state.store.insert_feedback(entry).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Feedback submitted successfully".to_string(),
        }),
    ))
}

/// GET /feedbacks
pub async fn list_feedback<S: PortfolioStore>(
    State(state): SharedState<S>,
) -> Result<Json<Vec<FeedbackEntry>>, AppError> {
    tracing::info!("GET /feedbacks");
    Ok(Json(state.store.list_feedback().await?))
}

/// POST /query
pub async fn submit_query<S: PortfolioStore>(
    State(state): SharedState<S>,
    SanitizedJson(payload): SanitizedJson<QueryRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let entry = NewQuery {
        name: required(payload.name, "name")?,
        email: required(payload.email, "email")?,
        query: required(payload.query, "query")?,
    };
    tracing::info!("POST /query - from: {}", entry.email);

    state.store.insert_query(entry).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Query submitted successfully".to_string(),
        }),
    ))
}

/// GET /queries
pub async fn list_queries<S: PortfolioStore>(
    State(state): SharedState<S>,
) -> Result<Json<Vec<QueryEntry>>, AppError> {
    tracing::info!("GET /queries");
    Ok(Json(state.store.list_queries().await?))
}

/// POST /contact
///
/// Stores the submission and answers with the configured admin contact details.
pub async fn submit_contact<S: PortfolioStore>(
    State(state): SharedState<S>,
    SanitizedJson(payload): SanitizedJson<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    let contact = NewContact {
        full_name: required(payload.full_name, "fullName")?,
        wants_collaboration: payload.wants_collaboration,
        phone_number: required(payload.phone_number, "phoneNumber")?,
    };
    tracing::info!(
        "POST /contact - collaboration requested: {}",
        contact.wants_collaboration
    );

    state.store.insert_contact(contact).await?;

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            message: "Contact submitted successfully".to_string(),
            admin_info: state.config.admin_contact.clone(),
        }),
    ))
}

/// GET /user-details
pub async fn list_contacts<S: PortfolioStore>(
    State(state): SharedState<S>,
) -> Result<Json<Vec<ContactSubmission>>, AppError> {
    tracing::info!("GET /user-details");
    Ok(Json(state.store.list_contacts().await?))
}

/// GET /user-profiles
pub async fn list_user_profiles<S: PortfolioStore>(
    State(state): SharedState<S>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    tracing::info!("GET /user-profiles");
    Ok(Json(state.store.list_user_profiles().await?))
}

// ============ Auth ============

/// POST /authenticate
///
/// Always answers 200; the body says whether the password matched.
pub async fn authenticate<S: PortfolioStore>(
    State(state): SharedState<S>,
    SanitizedJson(payload): SanitizedJson<AuthenticateRequest>,
) -> Json<AuthenticateResponse> {
    let authenticated =
        verify_shared_secret(state.config.admin_password.as_deref(), &payload.password);
    if !authenticated {
        tracing::warn!("Failed authentication attempt");
    }
    Json(AuthenticateResponse { authenticated })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required(Some("  Ada ".into()), "name").unwrap(), "Ada");
        let err = required(Some("   ".into()), "email").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Missing required field: email"));
        assert!(required(None, "name").is_err());
    }
}
