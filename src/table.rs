//! Compiled route table and address resolution

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, RouteCache};
use crate::matcher::{normalize_address, RoutePattern};
use crate::params::RouteArgs;
use crate::route::{Destination, RouteConfig, Resolver};
use crate::{debug_log, trace_log};
#[cfg(feature = "cache")]
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Whether a lookup found a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    Success,
    NotFound,
}

/// Resolved outcome of matching an address against the route table
#[derive(Clone, Serialize)]
pub struct DecisionRoute {
    /// The normalised address that was resolved
    pub address: String,
    pub mode: RouteMode,
    pub controller: Option<String>,
    pub action: Option<String>,
    pub view: Option<String>,
    /// Parameter values in pattern order
    pub args: RouteArgs,
    #[serde(skip)]
    pub resolver: Option<Resolver>,
}

impl DecisionRoute {
    /// A lookup that matched nothing
    pub fn not_found(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            mode: RouteMode::NotFound,
            controller: None,
            action: None,
            view: None,
            args: RouteArgs::new(),
            resolver: None,
        }
    }

    /// A decision for a view addressed directly, bypassing the table
    pub fn direct_view(view: impl Into<String>, args: RouteArgs) -> Self {
        let view = view.into();
        Self {
            address: view.clone(),
            mode: RouteMode::Success,
            controller: None,
            action: None,
            view: Some(view),
            args,
            resolver: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.mode == RouteMode::Success
    }

    /// JSON form handed to rendering hooks
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl PartialEq for DecisionRoute {
    fn eq(&self, other: &Self) -> bool {
        let same_resolver = match (&self.resolver, &other.resolver) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.address == other.address
            && self.mode == other.mode
            && self.controller == other.controller
            && self.action == other.action
            && self.view == other.view
            && self.args == other.args
            && same_resolver
    }
}

impl fmt::Debug for DecisionRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionRoute")
            .field("address", &self.address)
            .field("mode", &self.mode)
            .field("controller", &self.controller)
            .field("action", &self.action)
            .field("view", &self.view)
            .field("args", &self.args)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

/// One compiled table entry
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub pattern: RoutePattern,
    pub destination: Destination,
}

/// Flat, insertion-ordered table of compiled patterns
///
/// # Example
///
/// ```
/// use screen_navigator::{RouteConfig, RouteTable};
///
/// let table = RouteTable::compile(
///     &RouteConfig::new()
///         .route("/a/{x}", "required")
///         .route("/a/{x?}", "optional"),
/// );
///
/// // Both entries accept "/a/5"; the later one wins.
/// assert_eq!(table.resolve("/a/5").view.as_deref(), Some("optional"));
/// ```
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    #[cfg(feature = "cache")]
    cache: Mutex<RouteCache>,
}

impl RouteTable {
    /// Compile a configuration into a table
    pub fn compile(config: &RouteConfig) -> Self {
        Self::compile_with_capacity(config, 0)
    }

    /// Compile with a specific resolution cache size (0 = default)
    pub fn compile_with_capacity(config: &RouteConfig, cache_capacity: usize) -> Self {
        let entries: Vec<RouteEntry> = config
            .flatten()
            .into_iter()
            .map(|(path, destination)| RouteEntry {
                pattern: RoutePattern::from_path(&path),
                destination,
            })
            .collect();

        debug_log!("Compiled route table with {} entries", entries.len());

        #[cfg(not(feature = "cache"))]
        let _ = cache_capacity;

        Self {
            entries,
            #[cfg(feature = "cache")]
            cache: Mutex::new(if cache_capacity == 0 {
                RouteCache::new()
            } else {
                RouteCache::with_capacity(cache_capacity)
            }),
        }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve an address into a [`DecisionRoute`]
    pub fn resolve(&self, address: &str) -> DecisionRoute {
        let address = normalize_address(address);

        let Some((index, args)) = self.lookup(&address) else {
            debug_log!("No route matches '{}'", address);
            return DecisionRoute::not_found(address);
        };

        let entry = &self.entries[index];
        let mut view = entry.destination.view().map(str::to_string);
        let resolver = entry.destination.resolver().cloned();
        if let Some(resolver) = &resolver {
            view = resolver(&address).view().map(str::to_string);
        }

        trace_log!(
            "'{}' matched '{}' -> {:?}",
            address,
            entry.pattern.as_str(),
            entry.destination
        );

        DecisionRoute {
            address,
            mode: RouteMode::Success,
            controller: entry.destination.controller().map(str::to_string),
            action: entry.destination.action().map(str::to_string),
            view,
            args,
            resolver,
        }
    }

    fn lookup(&self, address: &str) -> Option<(usize, RouteArgs)> {
        #[cfg(feature = "cache")]
        if let Some(cached) = self.cache.lock().get(address) {
            return cached;
        }

        let found = self.scan(address);

        #[cfg(feature = "cache")]
        self.cache.lock().insert(address.to_string(), found.clone());

        found
    }

    /// Every entry is tested; the last one that matches wins.
    fn scan(&self, address: &str) -> Option<(usize, RouteArgs)> {
        let mut found = None;
        for (index, entry) in self.entries.iter().enumerate() {
            if let Some(args) = entry.pattern.matches(address) {
                found = Some((index, args));
            }
        }
        found
    }

    /// Resolution cache statistics
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats().clone()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}
