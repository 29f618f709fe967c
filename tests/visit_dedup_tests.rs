/// Tests for the visit deduplication flow against an in-memory store
mod common;

use common::MemoryStore;
use portfolio_api::geo::GeoPoint;
use portfolio_api::visits::{VisitDeduplicator, VisitOutcome, VisitReport};
use std::sync::Arc;

fn report(address: &str, fingerprint: &str, lat: f64, lon: f64) -> VisitReport {
    VisitReport {
        network_address: address.to_string(),
        device_fingerprint: fingerprint.to_string(),
        location: GeoPoint::new(lat, lon),
    }
}

#[tokio::test]
async fn test_first_report_is_stored() {
    let store = MemoryStore::new();
    let dedup = VisitDeduplicator::new();

    let outcome = dedup
        .record(&store, report("203.0.113.9", "fp-a", 28.6139, 77.2090))
        .await
        .unwrap();

    match outcome {
        VisitOutcome::Stored {
            record,
            distance_km,
        } => {
            assert_eq!(record.client_identity, "203.0.113.9|fp-a");
            assert_eq!(record.location, GeoPoint::new(28.6139, 77.2090));
            assert_eq!(distance_km, None);
        }
        other => panic!("Expected first report to be stored, got {:?}", other),
    }
    assert_eq!(store.visit_count(), 1);
}

#[tokio::test]
async fn test_same_coordinates_not_stored_again() {
    let store = MemoryStore::new();
    let dedup = VisitDeduplicator::new();

    dedup
        .record(&store, report("203.0.113.9", "fp-a", 28.6139, 77.2090))
        .await
        .unwrap();
    let outcome = dedup
        .record(&store, report("203.0.113.9", "fp-a", 28.6139, 77.2090))
        .await
        .unwrap();

    assert_eq!(outcome, VisitOutcome::NotStored { distance_km: 0.0 });
    assert_eq!(store.visit_count(), 1);
}

#[tokio::test]
async fn test_moving_north_a_kilometre_is_stored() {
    let store = MemoryStore::new();
    let dedup = VisitDeduplicator::new();

    dedup
        .record(&store, report("203.0.113.9", "fp-a", 28.6139, 77.2090))
        .await
        .unwrap();
    let outcome = dedup
        .record(&store, report("203.0.113.9", "fp-a", 28.6239, 77.2090))
        .await
        .unwrap();

    match outcome {
        VisitOutcome::Stored { distance_km, .. } => {
            let d = distance_km.expect("distance from previous visit");
            assert!((d - 1.112).abs() < 0.01, "got {}", d);
        }
        other => panic!("Expected move to be stored, got {:?}", other),
    }
    assert_eq!(store.visit_count(), 2);
}

#[tokio::test]
async fn test_comparison_uses_most_recent_visit() {
    let store = MemoryStore::new();
    let dedup = VisitDeduplicator::new();

    dedup
        .record(&store, report("203.0.113.9", "fp-a", 28.6139, 77.2090))
        .await
        .unwrap();
    dedup
        .record(&store, report("203.0.113.9", "fp-a", 28.6239, 77.2090))
        .await
        .unwrap();

    // Back at the first spot: over a kilometre from the latest record
    let outcome = dedup
        .record(&store, report("203.0.113.9", "fp-a", 28.6139, 77.2090))
        .await
        .unwrap();
    assert!(matches!(outcome, VisitOutcome::Stored { .. }));
    assert_eq!(store.visit_count(), 3);
}

#[tokio::test]
async fn test_identities_are_tracked_separately() {
    let store = MemoryStore::new();
    let dedup = VisitDeduplicator::new();

    for (address, fingerprint) in [
        ("203.0.113.9", "fp-a"),
        ("203.0.113.9", "fp-b"),
        ("198.51.100.4", "fp-a"),
    ] {
        let outcome = dedup
            .record(&store, report(address, fingerprint, 28.6139, 77.2090))
            .await
            .unwrap();
        assert!(
            matches!(outcome, VisitOutcome::Stored { .. }),
            "{}|{} should be a first visit",
            address,
            fingerprint
        );
    }
    assert_eq!(store.visit_count(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reports_from_one_client_store_once() {
    let store = Arc::new(MemoryStore::new());
    let dedup = VisitDeduplicator::new();

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            let dedup = dedup.clone();
            tokio::spawn(async move {
                dedup
                    .record(
                        store.as_ref(),
                        report("203.0.113.9", "fp-a", 28.6139, 77.2090),
                    )
                    .await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(store.visit_count(), 1);
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let store = MemoryStore::new();
    store.set_failing(true);
    let dedup = VisitDeduplicator::new();

    let result = dedup
        .record(&store, report("203.0.113.9", "fp-a", 28.6139, 77.2090))
        .await;

    let err = result.unwrap_err();
    assert_eq!(
        err.status(),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}
