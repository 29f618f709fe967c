//! Visit deduplication.
//!
//! A location report becomes a [`VisitRecord`] only when the client has no
//! previous record, or has moved at least [`DEDUP_THRESHOLD_KM`] since its
//! most recent one. Clients are told apart by a best-effort pseudo-identity
//! built from their network address and device fingerprint.

use crate::errors::{AppError, ResultExt};
use crate::geo::{haversine_km, GeoPoint};
use crate::models::{NewVisit, VisitRecord};
use crate::store::PortfolioStore;
use axum::http::HeaderMap;
use moka::future::Cache;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Minimum movement, in kilometres, before a new visit is stored for a known client.
pub const DEDUP_THRESHOLD_KM: f64 = 1.0;

/// Joins the address and fingerprint parts of a client identity.
pub const IDENTITY_SEPARATOR: char = '|';

/// Resolves the caller's network address.
///
/// With `trust_proxy_headers`, the first non-empty entry of `X-Forwarded-For` wins,
/// then `X-Real-IP`. Otherwise, or when neither is present, the socket peer
/// address is used.
pub fn client_address(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy_headers: bool,
) -> Result<String, AppError> {
    if trust_proxy_headers {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').map(str::trim).find(|v| !v.is_empty()));

        let real_ip = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(address) = forwarded.or(real_ip) {
            return Ok(address.to_string());
        }
    }

    peer.map(|addr| addr.ip().to_string()).ok_or_else(|| {
        tracing::warn!("Could not determine client network address");
        AppError::BadRequest("Address extraction failed".to_string())
    })
}

/// Derives the deduplication key for a client.
///
/// This is a pseudo-identity, not a stable one: the same device may present a
/// different fingerprint later, and clients sharing a NAT address only differ
/// by fingerprint.
pub fn client_identity(network_address: &str, device_fingerprint: &str) -> String {
    format!("{network_address}{IDENTITY_SEPARATOR}{device_fingerprint}")
}

/// Why a report is or isn't stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisitDecision {
    /// No earlier record for this client.
    FirstVisit,
    Moved { distance_km: f64 },
    InsufficientMovement { distance_km: f64 },
}

impl VisitDecision {
    pub fn should_persist(&self) -> bool {
        !matches!(self, VisitDecision::InsufficientMovement { .. })
    }

    pub fn distance_km(&self) -> Option<f64> {
        match self {
            VisitDecision::FirstVisit => None,
            VisitDecision::Moved { distance_km }
            | VisitDecision::InsufficientMovement { distance_km } => Some(*distance_km),
        }
    }
}

/// Compares a new location with the client's previous one.
pub fn decide(previous: Option<&GeoPoint>, next: &GeoPoint) -> VisitDecision {
    match previous {
        None => VisitDecision::FirstVisit,
        Some(previous) => {
            let distance_km = haversine_km(previous, next);
            if distance_km >= DEDUP_THRESHOLD_KM {
                VisitDecision::Moved { distance_km }
            } else {
                VisitDecision::InsufficientMovement { distance_km }
            }
        }
    }
}

/// A validated location report from one client.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitReport {
    pub network_address: String,
    pub device_fingerprint: String,
    pub location: GeoPoint,
}

impl VisitReport {
    pub fn client_identity(&self) -> String {
        client_identity(&self.network_address, &self.device_fingerprint)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisitOutcome {
    Stored {
        record: VisitRecord,
        /// Distance from the previous record; `None` on a first visit.
        distance_km: Option<f64>,
    },
    NotStored {
        distance_km: f64,
    },
}

/// Decides and persists location reports.
///
/// The lookup-then-insert for one identity runs under a per-identity lock,
/// so two concurrent reports from the same client cannot both see the same
/// "previous" record. The locks are process-local; separate instances of
/// the service may still store near-duplicates.
#[derive(Clone)]
pub struct VisitDeduplicator {
    identity_locks: Cache<String, Arc<Mutex<()>>>,
}

impl Default for VisitDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitDeduplicator {
    pub fn new() -> Self {
        // Idle locks are dropped after 10 minutes, 10k identities at most
        let identity_locks = Cache::builder()
            .time_to_idle(Duration::from_secs(600))
            .max_capacity(10_000)
            .build();
        Self { identity_locks }
    }

    pub async fn record<S: PortfolioStore>(
        &self,
        store: &S,
        report: VisitReport,
    ) -> Result<VisitOutcome, AppError> {
        let identity = report.client_identity();

        let lock = self
            .identity_locks
            .get_with(identity.clone(), async { Arc::new(Mutex::new(())) })
            .await;
        let _guard = lock.lock().await;

        let previous = store
            .latest_visit_for(&identity)
            .await
            .context("Error fetching previous visit")?;

        let decision = decide(previous.as_ref().map(|v| &v.location), &report.location);
        tracing::debug!(
            "Visit decision for {}: {:?}",
            report.network_address,
            decision
        );

        if !decision.should_persist() {
            let distance_km = decision.distance_km().unwrap_or_default();
            tracing::info!(
                "Location not stored for {}: moved {:.3} km (< {} km)",
                report.network_address,
                distance_km,
                DEDUP_THRESHOLD_KM
            );
            return Ok(VisitOutcome::NotStored { distance_km });
        }

        let record = store
            .insert_visit(NewVisit {
                client_identity: identity,
                network_address: report.network_address,
                device_fingerprint: report.device_fingerprint,
                location: report.location,
            })
            .await
            .context("Error saving user location")?;

        tracing::info!(
            "Stored visit {} at ({}, {})",
            record.id,
            record.location.latitude,
            record.location.longitude
        );

        Ok(VisitOutcome::Stored {
            record,
            distance_km: decision.distance_km(),
        })
    }
}
