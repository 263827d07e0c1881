//! Policy engine behavior through the public API.

use std::convert::Infallible;
use std::sync::Arc;

use axum::http::{header, Request, Response, StatusCode};
use tower::{service_fn, Layer, ServiceExt};

use hsts_transport::{HstsLayer, ManualClock, MemoryStore, PolicyRecord, PolicyStore};

const HOUR: i64 = 3600;
const NOW: i64 = 1_700_000_000;

fn store_at(now: i64) -> (Arc<MemoryStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(now));
    (Arc::new(MemoryStore::with_clock(clock.clone())), clock)
}

#[test]
fn test_exact_host_rule() {
    let record = PolicyRecord {
        host: "b.example.com".into(),
        include_subdomains: false,
        permanent: false,
        created: NOW,
        max_age: 36_000,
    };

    assert!(record.applies("b.example.com", NOW));
    assert!(!record.applies("z.b.example.com", NOW));
}

#[test]
fn test_expired_rule() {
    let record = PolicyRecord {
        host: "z.example.com".into(),
        include_subdomains: false,
        permanent: false,
        created: NOW - 10 * HOUR,
        max_age: 5 * HOUR,
    };

    assert!(!record.applies("z.example.com", NOW));
}

#[test]
fn test_permanent_rule() {
    let record = PolicyRecord {
        host: "z.example.com".into(),
        include_subdomains: false,
        permanent: true,
        created: 0,
        max_age: 0,
    };

    assert!(record.applies("z.example.com", NOW));
}

#[test]
fn test_sibling_and_nested_hosts() {
    let (store, _) = store_at(NOW);
    store.add(PolicyRecord::learned("example.org", false, HOUR, NOW));
    store.add(PolicyRecord::learned("a.example.org", true, HOUR, NOW));

    assert!(store.contains("a.example.org"));
    assert!(!store.contains("b.example.org"));
    assert!(store.contains("x.a.example.org"));
}

#[test]
fn test_contains_holds_until_expiry() {
    let (store, clock) = store_at(NOW);
    store.add(PolicyRecord::learned("example.net", false, 30, NOW));

    for _ in 0..30 {
        assert!(store.contains("example.net"));
        clock.advance(1);
    }
    assert!(store.contains("example.net"));
    clock.advance(1);
    assert!(!store.contains("example.net"));
}

#[tokio::test]
async fn test_secure_header_installs_then_zero_max_age_removes() {
    let (store, clock) = store_at(NOW);
    let layer = HstsLayer::new(store.clone()).with_clock(clock);

    for (sts, expected) in [("max-age=10000", true), ("max-age=0", false)] {
        let backend = service_fn(move |_req: Request<()>| async move {
            Ok::<_, Infallible>(
                Response::builder()
                    .status(StatusCode::OK)
                    .header(header::STRICT_TRANSPORT_SECURITY, sts)
                    .body(String::new())
                    .unwrap(),
            )
        });
        let req = Request::builder().uri("https://example.com/index.html").body(()).unwrap();
        layer.layer(backend).oneshot(req).await.unwrap();

        assert_eq!(store.contains("example.com"), expected, "after {}", sts);
    }
}
