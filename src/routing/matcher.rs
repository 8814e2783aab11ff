//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile a route pattern into a segment list once
//! - Match a pathname against the compiled segments (anchored)
//! - Extract dynamic segment values by name
//!
//! # Design Decisions
//! - Segment comparison only, no regex, so matching is O(segments)
//! - `:name` matches exactly one non-empty segment
//! - `*` / `*name` must be the final segment and swallows the rest (zero or more segments)
//! - Empty segments are ignored, so `/a//b/` and `/a/b` are the same path

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors raised while compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern `{pattern}`: dynamic segment is missing a name")]
    EmptyParamName { pattern: String },

    #[error("pattern `{pattern}`: parameter `{name}` is declared twice")]
    DuplicateParam { pattern: String, name: String },

    #[error("pattern `{pattern}`: rest wildcard must be the last segment")]
    WildcardNotLast { pattern: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Rest(Option<String>),
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatcher {
    pattern: String,
    segments: Vec<Segment>,
}

impl PathMatcher {
    /// Compile a pattern such as `/blog/:category/:id` or `/files/*path`.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let normalized = normalize_path(pattern);
        let raw: Vec<&str> = split_segments(&normalized).collect();
        let mut segments = Vec::with_capacity(raw.len());
        let mut names: Vec<&str> = Vec::new();

        for (i, seg) in raw.iter().enumerate() {
            let compiled = if let Some(name) = seg.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError::EmptyParamName {
                        pattern: pattern.to_string(),
                    });
                }
                if names.contains(&name) {
                    return Err(PatternError::DuplicateParam {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                names.push(name);
                Segment::Param(name.to_string())
            } else if let Some(name) = seg.strip_prefix('*') {
                if i + 1 != raw.len() {
                    return Err(PatternError::WildcardNotLast {
                        pattern: pattern.to_string(),
                    });
                }
                if name.is_empty() {
                    Segment::Rest(None)
                } else {
                    if names.contains(&name) {
                        return Err(PatternError::DuplicateParam {
                            pattern: pattern.to_string(),
                            name: name.to_string(),
                        });
                    }
                    names.push(name);
                    Segment::Rest(Some(name.to_string()))
                }
            } else {
                Segment::Literal((*seg).to_string())
            };
            segments.push(compiled);
        }

        Ok(Self {
            pattern: normalized,
            segments,
        })
    }

    /// The normalized pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Names of the dynamic segments, in declaration order.
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) => Some(name.as_str()),
                Segment::Rest(name) => name.as_deref(),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Returns true if the pattern has no dynamic segments.
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Match a pathname against the pattern.
    ///
    /// Returns the extracted params on a whole-path match. The pathname is
    /// normalized first, so callers may pass raw input.
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let normalized = normalize_path(path);
        let parts: Vec<&str> = split_segments(&normalized).collect();
        let mut params = BTreeMap::new();

        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                Segment::Literal(lit) => {
                    if parts.get(i) != Some(&lit.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = parts.get(i)?;
                    params.insert(name.clone(), (*value).to_string());
                }
                Segment::Rest(name) => {
                    if let Some(name) = name {
                        let rest = parts.get(i..).unwrap_or_default().join("/");
                        params.insert(name.clone(), rest);
                    }
                    return Some(params);
                }
            }
        }

        (parts.len() == self.segments.len()).then_some(params)
    }
}

/// Normalize a pathname: leading separator, no trailing separator (except root),
/// no empty segments.
pub fn normalize_path(path: &str) -> String {
    let joined = split_segments(path).collect::<Vec<_>>().join("/");
    format!("/{}", joined)
}

/// Join a child pattern onto its parent's. Absolute children are kept as-is.
pub fn join_patterns(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return normalize_path(child);
    }
    normalize_path(&format!("{}/{}", parent, child))
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
