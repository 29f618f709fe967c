//! In-memory `PortfolioStore` shared by the integration tests.
#![allow(dead_code)]

use chrono::Utc;
use portfolio_api::config::{AdminContact, Config};
use portfolio_api::errors::AppError;
use portfolio_api::models::*;
use portfolio_api::store::PortfolioStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    visits: Mutex<Vec<VisitRecord>>,
    certifications: Mutex<Vec<Certification>>,
    projects: Mutex<Vec<Project>>,
    feedback: Mutex<Vec<FeedbackEntry>>,
    queries: Mutex<Vec<QueryEntry>>,
    contacts: Mutex<Vec<ContactSubmission>>,
    profiles: Mutex<Vec<UserProfile>>,
    /// When set, every operation fails like an unreachable database.
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn visit_count(&self) -> usize {
        self.visits.lock().unwrap().len()
    }

    pub fn add_certification(&self, title: &str, images: &[&str]) -> Certification {
        let cert = Certification {
            id: Uuid::new_v4(),
            title: title.to_string(),
            image_references: images.iter().map(|s| s.to_string()).collect(),
        };
        self.certifications.lock().unwrap().push(cert.clone());
        cert
    }

    pub fn add_project(&self, category: &str, title: &str) -> Project {
        let project = Project {
            id: Uuid::new_v4(),
            category: category.to_string(),
            title: title.to_string(),
            description: vec![format!("{} overview", title)],
            additional_details: vec!["Built with Rust".to_string()],
        };
        self.projects.lock().unwrap().push(project.clone());
        project
    }

    pub fn add_profile(&self, email: &str, username: &str) -> UserProfile {
        let profile = UserProfile {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
            location: None,
            last_sign_in_at: Some(Utc::now()),
        };
        self.profiles.lock().unwrap().push(profile.clone());
        profile
    }

    fn check(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

fn newest(visits: &[VisitRecord]) -> Option<VisitRecord> {
    visits
        .iter()
        .max_by_key(|v| (v.recorded_at, v.id))
        .cloned()
}

impl PortfolioStore for MemoryStore {
    async fn latest_visit(&self) -> Result<Option<VisitRecord>, AppError> {
        self.check()?;
        Ok(newest(&self.visits.lock().unwrap()))
    }

    async fn latest_visit_for(
        &self,
        client_identity: &str,
    ) -> Result<Option<VisitRecord>, AppError> {
        self.check()?;
        let visits = self.visits.lock().unwrap();
        let mine: Vec<VisitRecord> = visits
            .iter()
            .filter(|v| v.client_identity == client_identity)
            .cloned()
            .collect();
        Ok(newest(&mine))
    }

    async fn list_visits(&self) -> Result<Vec<VisitRecord>, AppError> {
        self.check()?;
        Ok(self.visits.lock().unwrap().clone())
    }

    async fn insert_visit(&self, visit: NewVisit) -> Result<VisitRecord, AppError> {
        self.check()?;
        let mut visits = self.visits.lock().unwrap();
        let record = VisitRecord {
            id: visits.len() as i64 + 1,
            client_identity: visit.client_identity,
            network_address: visit.network_address,
            device_fingerprint: visit.device_fingerprint,
            location: visit.location,
            recorded_at: Utc::now(),
        };
        visits.push(record.clone());
        Ok(record)
    }

    async fn list_certifications(&self) -> Result<Vec<Certification>, AppError> {
        self.check()?;
        Ok(self.certifications.lock().unwrap().clone())
    }

    async fn find_certification(&self, title: &str) -> Result<Option<Certification>, AppError> {
        self.check()?;
        Ok(self
            .certifications
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.title == title)
            .cloned())
    }

    async fn list_projects(&self, category: Option<&str>) -> Result<Vec<Project>, AppError> {
        self.check()?;
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect())
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        self.check()?;
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert_feedback(&self, entry: NewFeedback) -> Result<FeedbackEntry, AppError> {
        self.check()?;
        let stored = FeedbackEntry {
            id: Uuid::new_v4(),
            name: entry.name,
            email: entry.email,
            feedback: entry.feedback,
            created_at: Utc::now(),
        };
        self.feedback.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_feedback(&self) -> Result<Vec<FeedbackEntry>, AppError> {
        self.check()?;
        Ok(self.feedback.lock().unwrap().clone())
    }

    async fn insert_query(&self, entry: NewQuery) -> Result<QueryEntry, AppError> {
        self.check()?;
        let stored = QueryEntry {
            id: Uuid::new_v4(),
            name: entry.name,
            email: entry.email,
            query: entry.query,
            created_at: Utc::now(),
        };
        self.queries.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_queries(&self) -> Result<Vec<QueryEntry>, AppError> {
        self.check()?;
        Ok(self.queries.lock().unwrap().clone())
    }

    async fn insert_contact(&self, contact: NewContact) -> Result<ContactSubmission, AppError> {
        self.check()?;
        let stored = ContactSubmission {
            id: Uuid::new_v4(),
            full_name: contact.full_name,
            wants_collaboration: contact.wants_collaboration,
            phone_number: contact.phone_number,
            created_at: Utc::now(),
        };
        self.contacts.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_contacts(&self) -> Result<Vec<ContactSubmission>, AppError> {
        self.check()?;
        Ok(self.contacts.lock().unwrap().clone())
    }

    async fn list_user_profiles(&self) -> Result<Vec<UserProfile>, AppError> {
        self.check()?;
        Ok(self.profiles.lock().unwrap().clone())
    }
}

/// Helper function to create test config
pub fn create_test_config() -> Config {
    Config {
        database_url: "postgresql://test".to_string(),
        port: 5000,
        admin_password: Some("correct horse battery staple".to_string()),
        allowed_origins: vec!["http://localhost:5173".to_string()],
        trust_proxy_headers: true,
        admin_contact: AdminContact {
            admin: "Test Admin".to_string(),
            contact_number: "+1 555 0100".to_string(),
            address: "Test City".to_string(),
        },
    }
}
