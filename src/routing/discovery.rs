//! Convention-based route discovery from a pages directory.
//!
//! # Conventions
//! - A directory is a nested route; its `index` file is the directory's own route
//!   and its other entries become that route's children
//! - A directory without an `index` file contributes its entries with its segment
//!   prefixed onto their paths
//! - `[name]` becomes the dynamic segment `:name`; `[...name]` becomes `*name`
//! - The component identifier is the file path relative to the pages root,
//!   without extension (`users/[id]`)
//! - Entries starting with `.` or `_` are ignored
//!
//! # Design Decisions
//! - Within a directory, routes are ordered index, literals, params, catch-alls, so
//!   first-match-wins resolution prefers the most specific page
//! - Top-level entries are siblings of the root index rather than its children
//! - Build-time only: the router consumes the resulting `Vec<Route>` like any other

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::routing::route::Route;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("pages directory `{}` does not exist", .0.display())]
    MissingRoot(PathBuf),

    #[error("failed to scan pages directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid segment `{segment}` in `{}`", .path.display())]
    InvalidSegment { segment: String, path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Index,
    Literal,
    Param,
    CatchAll,
}

#[derive(Debug)]
struct Entry {
    rank: Rank,
    stem: String,
    path: PathBuf,
    is_dir: bool,
}

/// Scan `root` and produce the route forest it describes.
pub fn discover_routes(root: &Path) -> Result<Vec<Route>, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::MissingRoot(root.to_path_buf()));
    }

    let entries = list_dir(root)?;
    let mut routes = Vec::new();
    for entry in entries {
        if entry.is_dir {
            routes.extend(scan_dir(root, &entry)?);
        } else if entry.rank == Rank::Index {
            routes.push(page_route(root, "/", &entry));
        } else {
            let segment = to_segment(&entry)?;
            routes.push(page_route(root, &format!("/{}", segment), &entry));
        }
    }

    tracing::debug!(root = %root.display(), routes = routes.len(), "Pages discovered");
    Ok(routes)
}

/// Routes contributed by the directory `dir`.
fn scan_dir(root: &Path, dir: &Entry) -> Result<Vec<Route>, DiscoveryError> {
    let segment = to_segment(dir)?;
    let mut index = None;
    let mut children = Vec::new();

    for entry in list_dir(&dir.path)? {
        if entry.is_dir {
            children.extend(scan_dir(root, &entry)?);
        } else if entry.rank == Rank::Index && index.is_none() {
            index = Some(entry);
        } else {
            let child_segment = to_segment(&entry)?;
            children.push(page_route(root, &child_segment, &entry));
        }
    }

    let prefix = if dir.path.parent() == Some(root) {
        format!("/{}", segment)
    } else {
        segment
    };

    match index {
        Some(index) => Ok(vec![page_route(root, &prefix, &index).with_children(children)]),
        None => Ok(children
            .into_iter()
            .map(|child| reprefix(&prefix, child))
            .collect()),
    }
}

/// Rebuild `route` with `prefix/` in front of its path.
fn reprefix(prefix: &str, route: Route) -> Route {
    let path = if route.path().starts_with('/') {
        route.path().to_string()
    } else {
        format!("{}/{}", prefix, route.path())
    };

    let mut rebuilt = Route::new(path, route.component()).with_meta(route.meta().clone());
    if let Some(name) = route.name() {
        rebuilt = rebuilt.with_name(name);
    }
    for child in route.children() {
        rebuilt = rebuilt.with_child(Route::clone(child));
    }
    rebuilt
}

fn page_route(root: &Path, path: &str, entry: &Entry) -> Route {
    let relative = entry.path.strip_prefix(root).unwrap_or(&entry.path);
    let component = relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");

    let name = route_name(&component);
    Route::new(path, component).with_name(name)
}

/// `users/[id]` → `users-id`, `blog/index` → `blog`, `index` → `index`.
fn route_name(component: &str) -> String {
    let parts: Vec<String> = component
        .split('/')
        .map(|part| {
            part.trim_start_matches('[')
                .trim_end_matches(']')
                .trim_start_matches("...")
                .to_string()
        })
        .collect();

    match parts.split_last() {
        Some((last, rest)) if last == "index" && !rest.is_empty() => rest.join("-"),
        _ => parts.join("-"),
    }
}

fn to_segment(entry: &Entry) -> Result<String, DiscoveryError> {
    let stem = entry.stem.as_str();
    let invalid = || DiscoveryError::InvalidSegment {
        segment: stem.to_string(),
        path: entry.path.clone(),
    };

    match entry.rank {
        Rank::CatchAll => {
            let name = &stem[4..stem.len() - 1];
            if name.is_empty() {
                return Err(invalid());
            }
            Ok(format!("*{}", name))
        }
        Rank::Param => {
            let name = &stem[1..stem.len() - 1];
            if name.is_empty() {
                return Err(invalid());
            }
            Ok(format!(":{}", name))
        }
        Rank::Index | Rank::Literal => {
            if stem.contains('[') || stem.contains(']') {
                return Err(invalid());
            }
            Ok(stem.to_string())
        }
    }
}

fn rank(stem: &str, is_dir: bool) -> Rank {
    if stem.starts_with("[...") && stem.ends_with(']') && stem.len() >= 5 {
        Rank::CatchAll
    } else if stem.starts_with('[') && stem.ends_with(']') && stem.len() >= 2 {
        Rank::Param
    } else if stem == "index" && !is_dir {
        Rank::Index
    } else {
        Rank::Literal
    }
}

fn list_dir(dir: &Path) -> Result<Vec<Entry>, DiscoveryError> {
    let mut entries = Vec::new();
    for item in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let item = item?;
        let file_name = item.file_name().to_string_lossy();
        if file_name.starts_with('.') || file_name.starts_with('_') {
            continue;
        }

        let is_dir = item.file_type().is_dir();
        let stem = if is_dir {
            file_name.into_owned()
        } else {
            match item.path().file_stem() {
                Some(stem) => stem.to_string_lossy().into_owned(),
                None => continue,
            }
        };

        entries.push(Entry {
            rank: rank(&stem, is_dir),
            stem,
            path: item.path().to_path_buf(),
            is_dir,
        });
    }

    entries.sort_by(compare_entries);
    Ok(entries)
}

// Files before directories of the same rank and stem, so `users.rs` precedes `users/`.
fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    a.rank
        .cmp(&b.rank)
        .then_with(|| a.stem.cmp(&b.stem))
        .then_with(|| a.is_dir.cmp(&b.is_dir))
}
