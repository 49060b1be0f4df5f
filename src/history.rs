//! Navigation history management
//!
//! The back-stack of visited screens. The top entry always describes the
//! screen on display. Supports:
//! - Push/pop/peek
//! - Clearing
//! - An optional size limit that drops the oldest entries

use crate::params::RouteArgs;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How an entry was addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    /// Resolved through the route table
    Address,
    /// A view named directly
    View,
}

/// Navigation history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Address (or view identifier for [`EntrySource::View`])
    pub address: String,
    /// View the address resolved to, when known
    pub view: Option<String>,
    /// Arguments extracted when the address was resolved
    pub args: RouteArgs,
    /// Opaque data handed to the screen
    pub payload: Option<Value>,
    pub source: EntrySource,
}

impl HistoryEntry {
    /// Create an entry for an address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            view: None,
            args: RouteArgs::new(),
            payload: None,
            source: EntrySource::Address,
        }
    }

    /// Create an entry for a directly addressed view
    pub fn for_view(view: impl Into<String>) -> Self {
        let view = view.into();
        Self {
            address: view.clone(),
            view: Some(view),
            args: RouteArgs::new(),
            payload: None,
            source: EntrySource::View,
        }
    }

    /// Attach a payload
    pub fn with_payload(mut self, payload: Option<Value>) -> Self {
        self.payload = payload;
        self
    }

    /// Record what the address resolved to
    pub fn with_resolution(mut self, view: Option<String>, args: RouteArgs) -> Self {
        self.view = view;
        self.args = args;
        self
    }
}

/// Navigation history stack
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
    /// Maximum history size (0 = unlimited)
    max_size: usize,
}

impl HistoryStack {
    /// Create an empty, unlimited stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom max size
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
        }
    }

    /// Push a new entry on top
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        self.enforce_size_limit();
    }

    /// Remove and return the top entry
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    /// The top entry (the screen on display)
    pub fn peek(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Replace every entry with a snapshot taken from [`HistoryStack::entries`]
    pub fn restore(&mut self, entries: Vec<HistoryEntry>) {
        self.entries = entries;
        self.enforce_size_limit();
    }

    /// Enforce maximum size limit
    fn enforce_size_limit(&mut self) {
        if self.max_size > 0 && self.entries.len() > self.max_size {
            let excess = self.entries.len() - self.max_size;
            self.entries.drain(0..excess);
        }
    }
}
