use crate::errors::{AppError, ResultExt};
use crate::geo::GeoPoint;
use crate::models::{
    Certification, ContactSubmission, FeedbackEntry, NewContact, NewFeedback, NewQuery,
    NewVisit, Project, QueryEntry, UserProfile, VisitRecord,
};
use crate::store::PortfolioStore;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const VISIT_COLUMNS: &str =
    "id, client_identity, network_address, device_fingerprint, latitude, longitude, recorded_at";

#[derive(Debug, FromRow)]
struct VisitRow {
    id: i64,
    client_identity: String,
    network_address: String,
    device_fingerprint: String,
    latitude: f64,
    longitude: f64,
    recorded_at: DateTime<Utc>,
}

impl From<VisitRow> for VisitRecord {
    fn from(row: VisitRow) -> Self {
        Self {
            id: row.id,
            client_identity: row.client_identity,
            network_address: row.network_address,
            device_fingerprint: row.device_fingerprint,
            location: GeoPoint::new(row.latitude, row.longitude),
            recorded_at: row.recorded_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserProfileRow {
    id: Uuid,
    email: String,
    username: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    last_sign_in_at: Option<DateTime<Utc>>,
}

impl From<UserProfileRow> for UserProfile {
    fn from(row: UserProfileRow) -> Self {
        let location = match (row.latitude, row.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        };
        Self {
            id: row.id,
            email: row.email,
            username: row.username,
            location,
            last_sign_in_at: row.last_sign_in_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CertificationRow {
    id: Uuid,
    title: String,
    image_references: Vec<String>,
}

impl From<CertificationRow> for Certification {
    fn from(row: CertificationRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            image_references: row.image_references,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: Uuid,
    category: String,
    title: String,
    description: Vec<String>,
    additional_details: Vec<String>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            category: row.category,
            title: row.title,
            description: row.description,
            additional_details: row.additional_details,
        }
    }
}

#[derive(Debug, FromRow)]
struct FeedbackRow {
    id: Uuid,
    name: String,
    email: String,
    feedback: String,
    created_at: DateTime<Utc>,
}

impl From<FeedbackRow> for FeedbackEntry {
    fn from(row: FeedbackRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            feedback: row.feedback,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct QueryRow {
    id: Uuid,
    name: String,
    email: String,
    query: String,
    created_at: DateTime<Utc>,
}

impl From<QueryRow> for QueryEntry {
    fn from(row: QueryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            query: row.query,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ContactRow {
    id: Uuid,
    full_name: String,
    wants_collaboration: bool,
    phone_number: String,
    created_at: DateTime<Utc>,
}

impl From<ContactRow> for ContactSubmission {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            wants_collaboration: row.wants_collaboration,
            phone_number: row.phone_number,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed [`PortfolioStore`]. One table per collection.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PortfolioStore for PgStore {
    async fn latest_visit(&self) -> Result<Option<VisitRecord>, AppError> {
        let row = sqlx::query_as::<_, VisitRow>(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits ORDER BY recorded_at DESC, id DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await
        .context("Error fetching last user visit")?;

        Ok(row.map(VisitRecord::from))
    }

    async fn latest_visit_for(
        &self,
        client_identity: &str,
    ) -> Result<Option<VisitRecord>, AppError> {
        let row = sqlx::query_as::<_, VisitRow>(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits WHERE client_identity = $1 \
             ORDER BY recorded_at DESC, id DESC LIMIT 1"
        ))
        .bind(client_identity)
        .fetch_optional(&self.pool)
        .await
        .context("Error fetching previous visit")?;

        Ok(row.map(VisitRecord::from))
    }

    async fn list_visits(&self) -> Result<Vec<VisitRecord>, AppError> {
        let rows = sqlx::query_as::<_, VisitRow>(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits ORDER BY recorded_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Error fetching user visits")?;

        Ok(rows.into_iter().map(VisitRecord::from).collect())
    }

    async fn insert_visit(&self, visit: NewVisit) -> Result<VisitRecord, AppError> {
        let row = sqlx::query_as::<_, VisitRow>(&format!(
            "INSERT INTO visits \
             (client_identity, network_address, device_fingerprint, latitude, longitude, recorded_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {VISIT_COLUMNS}"
        ))
        .bind(&visit.client_identity)
        .bind(&visit.network_address)
        .bind(&visit.device_fingerprint)
        .bind(visit.location.latitude)
        .bind(visit.location.longitude)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Error saving user location")?;

        Ok(row.into())
    }

    async fn list_certifications(&self) -> Result<Vec<Certification>, AppError> {
        let rows = sqlx::query_as::<_, CertificationRow>(
            "SELECT id, title, image_references FROM certifications ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await
        .context("Error fetching certifications")?;

        Ok(rows.into_iter().map(Certification::from).collect())
    }

    async fn find_certification(&self, title: &str) -> Result<Option<Certification>, AppError> {
        let row = sqlx::query_as::<_, CertificationRow>(
            "SELECT id, title, image_references FROM certifications WHERE title = $1",
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .context("Error fetching certification details")?;

        Ok(row.map(Certification::from))
    }

    async fn list_projects(&self, category: Option<&str>) -> Result<Vec<Project>, AppError> {
        let rows = match category {
            Some(category) => {
                sqlx::query_as::<_, ProjectRow>(
                    "SELECT id, category, title, description, additional_details \
                     FROM projects WHERE category = $1 ORDER BY title",
                )
                .bind(category)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, ProjectRow>(
                    "SELECT id, category, title, description, additional_details \
                     FROM projects ORDER BY title",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .context("Error fetching projects")?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, category, title, description, additional_details \
             FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Error fetching project details")?;

        Ok(row.map(Project::from))
    }

    async fn insert_feedback(&self, entry: NewFeedback) -> Result<FeedbackEntry, AppError> {
        let row = sqlx::query_as::<_, FeedbackRow>(
            "INSERT INTO feedback_entries (id, name, email, feedback, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id, name, email, feedback, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&entry.name)
        .bind(&entry.email)
        .bind(&entry.feedback)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Error submitting feedback")?;

        Ok(row.into())
    }

    async fn list_feedback(&self) -> Result<Vec<FeedbackEntry>, AppError> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            "SELECT id, name, email, feedback, created_at FROM feedback_entries ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .context("Error fetching feedbacks")?;

        Ok(rows.into_iter().map(FeedbackEntry::from).collect())
    }

    async fn insert_query(&self, entry: NewQuery) -> Result<QueryEntry, AppError> {
        let row = sqlx::query_as::<_, QueryRow>(
            "INSERT INTO query_entries (id, name, email, query, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id, name, email, query, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&entry.name)
        .bind(&entry.email)
        .bind(&entry.query)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Error submitting query")?;

        Ok(row.into())
    }

    async fn list_queries(&self) -> Result<Vec<QueryEntry>, AppError> {
        let rows = sqlx::query_as::<_, QueryRow>(
            "SELECT id, name, email, query, created_at FROM query_entries ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .context("Error fetching queries")?;

        Ok(rows.into_iter().map(QueryEntry::from).collect())
    }

    async fn insert_contact(&self, contact: NewContact) -> Result<ContactSubmission, AppError> {
        let row = sqlx::query_as::<_, ContactRow>(
            "INSERT INTO contact_submissions \
             (id, full_name, wants_collaboration, phone_number, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, full_name, wants_collaboration, phone_number, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&contact.full_name)
        .bind(contact.wants_collaboration)
        .bind(&contact.phone_number)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Error submitting contact")?;

        Ok(row.into())
    }

    async fn list_contacts(&self) -> Result<Vec<ContactSubmission>, AppError> {
        let rows = sqlx::query_as::<_, ContactRow>(
            "SELECT id, full_name, wants_collaboration, phone_number, created_at \
             FROM contact_submissions ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .context("Error fetching user details")?;

        Ok(rows.into_iter().map(ContactSubmission::from).collect())
    }

    async fn list_user_profiles(&self) -> Result<Vec<UserProfile>, AppError> {
        let rows = sqlx::query_as::<_, UserProfileRow>(
            "SELECT id, email, username, latitude, longitude, last_sign_in_at \
             FROM user_profiles ORDER BY last_sign_in_at DESC NULLS LAST",
        )
        .fetch_all(&self.pool)
        .await
        .context("Error fetching user profiles")?;

        Ok(rows.into_iter().map(UserProfile::from).collect())
    }
}
