//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use waypoint::{BoxError, Route, RouteMeta, Transition};

/// The route tree most navigation tests run against.
///
/// ```text
/// /                      Home        (home)
/// /about                 About       (about)
/// /user/:id              User        (user)
///   /user/:id/profile    UserProfile (user-profile)
/// /blog/:category/:id    BlogPost    (blog-post)
/// /files/*rest           Files
/// ```
pub fn app_routes() -> Vec<Route> {
    vec![
        Route::new("/", "Home")
            .with_name("home")
            .with_meta(RouteMeta::title("Home")),
        Route::new("/about", "About").with_name("about"),
        Route::new("/user/:id", "User")
            .with_name("user")
            .with_child(Route::new("profile", "UserProfile").with_name("user-profile")),
        Route::new("/blog/:category/:id", "BlogPost").with_name("blog-post"),
        Route::new("/files/*rest", "Files"),
    ]
}

/// An ordered, shareable log of events recorded by callbacks.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// A guard that records `label` and answers `verdict`.
    pub fn guard(
        &self,
        label: &'static str,
        verdict: bool,
    ) -> impl Fn(Transition) -> std::future::Ready<Result<bool, BoxError>> + Send + Sync + 'static {
        let recorder = self.clone();
        move |_t: Transition| {
            recorder.record(label);
            std::future::ready(Ok(verdict))
        }
    }
}

/// Create a placeholder page for each relative path under `root`.
pub fn write_pages(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "// page\n").unwrap();
    }
}
