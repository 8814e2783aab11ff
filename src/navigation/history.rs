//! The ambient navigation-history collaborator.
//!
//! The router never owns the host's history (a browser window, a native shell, a
//! test harness). It only talks to it through [`NavigationHistory`], and every
//! access is optional: a router without a collaborator navigates headlessly.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::navigation::context::RouteContext;

/// Capabilities the router needs from the host's history.
pub trait NavigationHistory: Send + Sync {
    /// Raw query string of the current location, without or with a leading `?`.
    fn get_query(&self) -> String;

    fn push_entry(&self, ctx: &RouteContext, url: &str);

    fn replace_entry(&self, ctx: &RouteContext, url: &str);

    fn back(&self);

    fn forward(&self);
}

/// A collaborator that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHistory;

impl NavigationHistory for NoopHistory {
    fn get_query(&self) -> String {
        String::new()
    }

    fn push_entry(&self, _ctx: &RouteContext, _url: &str) {}

    fn replace_entry(&self, _ctx: &RouteContext, _url: &str) {}

    fn back(&self) {}

    fn forward(&self) {}
}

#[derive(Debug, Default)]
struct Stack {
    entries: Vec<String>,
    cursor: usize,
}

/// An in-memory history stack with a cursor, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    stack: Mutex<Stack>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `url` as the current entry.
    pub fn with_initial(url: impl Into<String>) -> Self {
        Self {
            stack: Mutex::new(Stack {
                entries: vec![url.into()],
                cursor: 0,
            }),
        }
    }

    /// URL at the cursor.
    pub fn location(&self) -> Option<String> {
        let stack = self.lock();
        stack.entries.get(stack.cursor).cloned()
    }

    pub fn entries(&self) -> Vec<String> {
        self.lock().entries.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Stack> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NavigationHistory for MemoryHistory {
    fn get_query(&self) -> String {
        self.location()
            .and_then(|url| url.split_once('?').map(|(_, query)| query.to_string()))
            .unwrap_or_default()
    }

    fn push_entry(&self, _ctx: &RouteContext, url: &str) {
        let mut stack = self.lock();
        if !stack.entries.is_empty() {
            let keep = stack.cursor + 1;
            stack.entries.truncate(keep);
        }
        stack.entries.push(url.to_string());
        stack.cursor = stack.entries.len() - 1;
    }

    fn replace_entry(&self, _ctx: &RouteContext, url: &str) {
        let mut stack = self.lock();
        let cursor = stack.cursor;
        if let Some(entry) = stack.entries.get_mut(cursor) {
            *entry = url.to_string();
        } else {
            stack.entries.push(url.to_string());
            stack.cursor = stack.entries.len() - 1;
        }
    }

    fn back(&self) {
        let mut stack = self.lock();
        stack.cursor = stack.cursor.saturating_sub(1);
    }

    fn forward(&self) {
        let mut stack = self.lock();
        if stack.cursor + 1 < stack.entries.len() {
            stack.cursor += 1;
        }
    }
}
