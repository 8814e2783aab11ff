//! Route discovery from a pages directory, end to end through the router.

use waypoint::routing::discovery::{discover_routes, DiscoveryError};
use waypoint::Router;

mod common;
use common::write_pages;

const PAGES: &[&str] = &[
    "index.rs",
    "about.rs",
    "_app.rs",
    ".draft.rs",
    "users/index.rs",
    "users/[id].rs",
    "users/new.rs",
    "docs/[...slug].rs",
];

#[tokio::test]
async fn test_discovered_tree_shape() {
    let dir = tempfile::tempdir().unwrap();
    write_pages(dir.path(), PAGES);

    let routes = discover_routes(dir.path()).unwrap();
    let router = Router::new(routes).unwrap();

    let rows: Vec<(String, String, Option<String>)> = router
        .route_entries()
        .into_iter()
        .map(|entry| {
            (
                entry.pattern,
                entry.route.component().to_string(),
                entry.route.name().map(str::to_string),
            )
        })
        .collect();

    let expected = [
        ("/", "index", "index"),
        ("/about", "about", "about"),
        ("/docs/*slug", "docs/[...slug]", "docs-slug"),
        ("/users", "users/index", "users"),
        ("/users/new", "users/new", "users-new"),
        ("/users/:id", "users/[id]", "users-id"),
    ];
    assert_eq!(rows.len(), expected.len());
    for (row, (pattern, component, name)) in rows.iter().zip(expected) {
        assert_eq!(row.0, pattern);
        assert_eq!(row.1, component);
        assert_eq!(row.2.as_deref(), Some(name));
    }
}

#[tokio::test]
async fn test_discovered_routes_navigate() {
    let dir = tempfile::tempdir().unwrap();
    write_pages(dir.path(), PAGES);
    let router = Router::new(discover_routes(dir.path()).unwrap()).unwrap();

    // Literal siblings are tried before params.
    assert!(router.push("/users/new").await);
    assert_eq!(router.current_route().unwrap().component, "users/new");

    assert!(router.push("/users/42").await);
    let current = router.current_route().unwrap();
    assert_eq!(current.component, "users/[id]");
    assert_eq!(current.param("id"), Some("42"));
    assert_eq!(current.parent().map(|r| r.component()), Some("users/index"));

    assert!(router.push("/docs/guide/install").await);
    assert_eq!(
        router.current_route().unwrap().param("slug"),
        Some("guide/install")
    );

    assert!(!router.push("/_app").await);
}

#[test]
fn test_invalid_segment_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_pages(dir.path(), &["index.rs", "[].rs"]);

    let err = discover_routes(dir.path()).unwrap_err();
    assert!(matches!(err, DiscoveryError::InvalidSegment { ref segment, .. } if segment == "[]"));
}

#[test]
fn test_empty_pages_directory() {
    let dir = tempfile::tempdir().unwrap();
    let routes = discover_routes(dir.path()).unwrap();
    assert!(routes.is_empty());
}
