//! Route definition and configuration
//!
//! A [`RouteConfig`] is the declarative, possibly nested mapping from address
//! segments to destinations. [`RouteMap`] entries are the in-memory
//! alternative: named, addressable descriptors that can be navigated to
//! directly and whose address templates are expanded with positional
//! arguments.

use crate::error::NavigationError;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};

// ============================================================================
// Destinations
// ============================================================================

/// Output of a resolver destination
#[derive(Debug, Clone)]
pub enum Resolved {
    /// A view identifier
    View(String),
    /// A route map entry; its view is used
    Map(RouteMap),
}

impl Resolved {
    /// The view identifier this output designates
    pub fn view(&self) -> Option<&str> {
        match self {
            Resolved::View(view) => Some(view),
            Resolved::Map(map) => map.view(),
        }
    }
}

impl From<&str> for Resolved {
    fn from(view: &str) -> Self {
        Resolved::View(view.to_string())
    }
}

impl From<String> for Resolved {
    fn from(view: String) -> Self {
        Resolved::View(view)
    }
}

impl From<RouteMap> for Resolved {
    fn from(map: RouteMap) -> Self {
        Resolved::Map(map)
    }
}

/// Resolver destination: receives the requested address, picks the view
pub type Resolver = Arc<dyn Fn(&str) -> Resolved + Send + Sync>;

/// Where a route entry leads
#[derive(Clone)]
pub enum Destination {
    /// A view, or a controller/action pair (optionally with a view override)
    Screen {
        controller: Option<String>,
        action: Option<String>,
        view: Option<String>,
    },
    /// A function deciding the view from the address
    Resolver(Resolver),
}

impl Destination {
    /// Parse a tagged destination string
    ///
    /// Tags are comma separated: `c:`/`controller:`, `a:`/`action:`,
    /// `v:`/`view:`. A string without any recognised tag names a view.
    ///
    /// ```
    /// use screen_navigator::Destination;
    ///
    /// let dest = Destination::parse("c:user, a:detail");
    /// assert_eq!(dest.controller(), Some("user"));
    /// assert_eq!(dest.action(), Some("detail"));
    ///
    /// assert_eq!(Destination::parse("home").view(), Some("home"));
    /// ```
    pub fn parse(tagged: &str) -> Self {
        let mut controller = None;
        let mut action = None;
        let mut view = None;

        for part in tagged.split(',').map(str::trim) {
            if let Some(value) = strip_tag(part, &["controller:", "c:"]) {
                controller = Some(value);
            } else if let Some(value) = strip_tag(part, &["action:", "a:"]) {
                action = Some(value);
            } else if let Some(value) = strip_tag(part, &["view:", "v:"]) {
                view = Some(value);
            }
        }

        if controller.is_none() && action.is_none() && view.is_none() {
            view = Some(tagged.to_string());
        }

        Destination::Screen {
            controller,
            action,
            view,
        }
    }

    /// A plain view destination
    pub fn view_named(view: impl Into<String>) -> Self {
        Destination::Screen {
            controller: None,
            action: None,
            view: Some(view.into()),
        }
    }

    pub fn controller(&self) -> Option<&str> {
        match self {
            Destination::Screen { controller, .. } => controller.as_deref(),
            Destination::Resolver(_) => None,
        }
    }

    pub fn action(&self) -> Option<&str> {
        match self {
            Destination::Screen { action, .. } => action.as_deref(),
            Destination::Resolver(_) => None,
        }
    }

    pub fn view(&self) -> Option<&str> {
        match self {
            Destination::Screen { view, .. } => view.as_deref(),
            Destination::Resolver(_) => None,
        }
    }

    pub fn resolver(&self) -> Option<&Resolver> {
        match self {
            Destination::Resolver(resolver) => Some(resolver),
            Destination::Screen { .. } => None,
        }
    }
}

fn strip_tag(part: &str, tags: &[&str]) -> Option<String> {
    tags.iter()
        .find_map(|tag| part.strip_prefix(tag))
        .map(|value| value.trim().to_string())
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Screen {
                controller,
                action,
                view,
            } => f
                .debug_struct("Destination::Screen")
                .field("controller", controller)
                .field("action", action)
                .field("view", view)
                .finish(),
            Destination::Resolver(_) => write!(f, "Destination::Resolver(..)"),
        }
    }
}

// ============================================================================
// Route Validation
// ============================================================================

/// Validate a route address pattern
///
/// # Validation Rules
///
/// - Parameter segments are `{name}` or `{name?}` with a non-empty name
/// - Parameter names use alphanumeric characters and underscores
/// - No duplicate parameter names
/// - Braces only appear as a whole-segment parameter
pub fn validate_route_path(path: &str) -> Result<(), String> {
    let mut names = HashSet::new();

    for segment in path.split('/') {
        let has_braces = segment.contains('{') || segment.contains('}');
        let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
            if has_braces {
                return Err(format!("Malformed parameter segment '{}'", segment));
            }
            continue;
        };

        let name = inner.strip_suffix('?').unwrap_or(inner);
        if name.is_empty() {
            return Err("Route parameter name cannot be empty".to_string());
        }
        if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(format!(
                "Route parameter '{}' must contain only alphanumeric characters and underscores",
                name
            ));
        }
        if !names.insert(name.to_string()) {
            return Err(format!("Duplicate route parameter: '{}'", name));
        }
    }

    Ok(())
}

// ============================================================================
// RouteConfig
// ============================================================================

/// One value in a route configuration
#[derive(Debug, Clone)]
pub enum RouteNode {
    Destination(Destination),
    Group(RouteConfig),
}

/// Declarative route configuration
///
/// Keys are address segments; nested groups are flattened by concatenating
/// keys, with a child key of `/` standing for the group's own address.
/// Declaration order is kept and matters for matching.
///
/// # Example
///
/// ```
/// use screen_navigator::RouteConfig;
///
/// let routes = RouteConfig::new()
///     .route("/", "home")
///     .group(
///         "/users",
///         RouteConfig::new()
///             .route("/", "c:user, a:index")
///             .route("/{id}", "c:user, a:detail"),
///     );
///
/// let flat: Vec<String> = routes.flatten().into_iter().map(|(path, _)| path).collect();
/// assert_eq!(flat, vec!["/", "/users", "/users/{id}"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteConfig {
    entries: Vec<(String, RouteNode)>,
}

impl RouteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tagged-string destination
    pub fn route(mut self, key: impl Into<String>, tagged: &str) -> Self {
        self.entries.push((
            key.into(),
            RouteNode::Destination(Destination::parse(tagged)),
        ));
        self
    }

    /// Add a resolver destination
    pub fn resolver<F, R>(mut self, key: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&str) -> R + Send + Sync + 'static,
        R: Into<Resolved>,
    {
        let resolver: Resolver = Arc::new(move |address| resolver(address).into());
        self.entries.push((
            key.into(),
            RouteNode::Destination(Destination::Resolver(resolver)),
        ));
        self
    }

    /// Add a nested group
    pub fn group(mut self, key: impl Into<String>, group: RouteConfig) -> Self {
        self.entries.push((key.into(), RouteNode::Group(group)));
        self
    }

    /// Add an already-built destination
    pub fn destination(mut self, key: impl Into<String>, destination: Destination) -> Self {
        self.entries
            .push((key.into(), RouteNode::Destination(destination)));
        self
    }

    /// Append every entry of `other` after this configuration's entries
    pub fn merge(mut self, other: RouteConfig) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Read a configuration from a JSON object
    ///
    /// Values are tagged strings or nested objects. Resolver destinations can
    /// only be added in code.
    pub fn from_json(value: &Value) -> Result<Self, NavigationError> {
        let Value::Object(map) = value else {
            return Err(NavigationError::InvalidConfig {
                message: "route configuration must be an object".to_string(),
            });
        };

        let mut config = RouteConfig::new();
        for (key, value) in map {
            validate_route_path(key)
                .map_err(|message| NavigationError::InvalidConfig { message })?;
            config = match value {
                Value::String(tagged) => config.route(key.clone(), tagged),
                Value::Object(_) => config.group(key.clone(), RouteConfig::from_json(value)?),
                other => {
                    return Err(NavigationError::InvalidConfig {
                        message: format!("route '{}' has unsupported value {}", key, other),
                    })
                }
            };
        }
        Ok(config)
    }

    /// Parse [`RouteConfig::from_json`] input from a string
    pub fn from_json_str(json: &str) -> Result<Self, NavigationError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| NavigationError::InvalidConfig {
                message: e.to_string(),
            })?;
        Self::from_json(&value)
    }

    /// Build a configuration from route maps
    pub fn from_maps(maps: &RouteMaps) -> Self {
        let mut config = RouteConfig::new();
        for map in maps.iter_maps() {
            let destination = match &map.handle {
                Some(resolver) => Destination::Resolver(resolver.clone()),
                None => Destination::view_named(map.view.clone().unwrap_or_default()),
            };
            config = config.destination(map.url.clone(), destination);
        }
        config
    }

    /// Flatten into `(pattern, destination)` pairs in declaration order
    ///
    /// A pattern declared twice keeps its first position and its last
    /// destination.
    pub fn flatten(&self) -> Vec<(String, Destination)> {
        let mut flat: Vec<(String, Destination)> = Vec::new();
        for (path, destination) in self.flatten_raw() {
            match flat.iter_mut().find(|(existing, _)| *existing == path) {
                Some(slot) => slot.1 = destination,
                None => flat.push((path, destination)),
            }
        }
        flat
    }

    fn flatten_raw(&self) -> Vec<(String, Destination)> {
        let mut out = Vec::new();
        for (key, node) in &self.entries {
            match node {
                RouteNode::Destination(destination) => out.push((key.clone(), destination.clone())),
                RouteNode::Group(group) => {
                    for (child, destination) in group.flatten() {
                        let child = if child == "/" { "" } else { child.as_str() };
                        out.push((format!("{}{}", key, child), destination));
                    }
                }
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// RouteMap
// ============================================================================

static NEXT_MAP_ID: AtomicUsize = AtomicUsize::new(0);

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\{[^}]+\}").expect("placeholder pattern is valid"));

/// Addressable route descriptor
///
/// A map without an explicit address gets a generated one so it can still
/// be recorded in history and resolved.
#[derive(Clone)]
pub struct RouteMap {
    url: String,
    view: Option<String>,
    handle: Option<Resolver>,
}

impl RouteMap {
    /// Map an address template to a view
    pub fn new(url: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            view: Some(view.into()),
            handle: None,
        }
    }

    /// A view with a generated address
    pub fn view_only(view: impl Into<String>) -> Self {
        Self::new(generated_url(), view)
    }

    /// Map an address template to a resolver
    pub fn handler<F, R>(url: impl Into<String>, handle: F) -> Self
    where
        F: Fn(&str) -> R + Send + Sync + 'static,
        R: Into<Resolved>,
    {
        Self {
            url: url.into(),
            view: None,
            handle: Some(Arc::new(move |address| handle(address).into())),
        }
    }

    /// Address template, e.g. `/users/{id}`
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn view(&self) -> Option<&str> {
        self.view.as_deref()
    }

    pub fn resolver(&self) -> Option<&Resolver> {
        self.handle.as_ref()
    }

    /// Expand the address template with positional arguments
    ///
    /// ```
    /// use screen_navigator::RouteMap;
    ///
    /// let map = RouteMap::new("/u/{id}/{tab?}", "user");
    /// assert_eq!(map.expand(&["7", "posts"]), "/u/7/posts");
    /// assert_eq!(map.expand(&["7"]), "/u/7");
    /// ```
    pub fn expand<S: AsRef<str>>(&self, args: &[S]) -> String {
        expand_template(&self.url, args)
    }
}

impl fmt::Debug for RouteMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMap")
            .field("url", &self.url)
            .field("view", &self.view)
            .field("handle", &self.handle.is_some())
            .finish()
    }
}

fn generated_url() -> String {
    format!("/~map{}", NEXT_MAP_ID.fetch_add(1, Ordering::Relaxed))
}

/// Substitute `{token}` placeholders in order
///
/// Placeholders beyond the supplied arguments are removed together with
/// their leading slash.
pub fn expand_template<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut args = args.iter();
    PLACEHOLDER
        .replace_all(template, |_: &Captures<'_>| match args.next() {
            Some(arg) => format!("/{}", arg.as_ref()),
            None => String::new(),
        })
        .into_owned()
}

/// Nested, named groups of route maps
#[derive(Debug, Clone, Default)]
pub struct RouteMaps {
    entries: Vec<(String, RouteMapNode)>,
}

#[derive(Debug, Clone)]
enum RouteMapNode {
    Map(RouteMap),
    Group(RouteMaps),
}

impl RouteMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(mut self, name: impl Into<String>, map: RouteMap) -> Self {
        self.entries.push((name.into(), RouteMapNode::Map(map)));
        self
    }

    pub fn group(mut self, name: impl Into<String>, group: RouteMaps) -> Self {
        self.entries.push((name.into(), RouteMapNode::Group(group)));
        self
    }

    /// Look up a map by dotted name, e.g. `"users.detail"`
    pub fn get(&self, name: &str) -> Option<&RouteMap> {
        let (head, rest) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };
        let (_, node) = self.entries.iter().find(|(key, _)| key == head)?;
        match (node, rest) {
            (RouteMapNode::Map(map), None) => Some(map),
            (RouteMapNode::Group(group), Some(rest)) => group.get(rest),
            _ => None,
        }
    }

    /// All maps, depth first, in declaration order
    pub fn iter_maps(&self) -> Vec<&RouteMap> {
        let mut out = Vec::new();
        for (_, node) in &self.entries {
            match node {
                RouteMapNode::Map(map) => out.push(map),
                RouteMapNode::Group(group) => out.extend(group.iter_maps()),
            }
        }
        out
    }
}

// ============================================================================
// Navigation Targets
// ============================================================================

/// What an entry point navigates to
#[derive(Debug, Clone)]
pub enum Target {
    /// A plain address, resolved through the route table
    Address(String),
    /// A route map entry; its template is expanded with `args`
    Map { map: RouteMap, args: Vec<String> },
    /// A view identifier, rendered without route resolution
    View(String),
}

impl Target {
    /// Target a view directly
    pub fn view(name: impl Into<String>) -> Self {
        Target::View(name.into())
    }

    /// Target a route map with positional arguments
    pub fn map<I, T>(map: RouteMap, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Target::Map {
            map,
            args: args.into_iter().map(|arg| arg.to_string()).collect(),
        }
    }

    /// JSON description handed to transition hooks
    pub fn describe(&self) -> Value {
        match self {
            Target::Address(address) => serde_json::json!({ "address": address }),
            Target::Map { map, args } => serde_json::json!({
                "map": map.url(),
                "view": map.view(),
                "args": args,
            }),
            Target::View(view) => serde_json::json!({ "view": view }),
        }
    }
}

impl From<&str> for Target {
    fn from(address: &str) -> Self {
        Target::Address(address.to_string())
    }
}

impl From<String> for Target {
    fn from(address: String) -> Self {
        Target::Address(address)
    }
}

impl From<RouteMap> for Target {
    fn from(map: RouteMap) -> Self {
        Target::Map {
            map,
            args: Vec::new(),
        }
    }
}

impl From<&RouteMap> for Target {
    fn from(map: &RouteMap) -> Self {
        Target::from(map.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_controller_action() {
        let dest = Destination::parse("controller: shop , action:list");
        assert_eq!(dest.controller(), Some("shop"));
        assert_eq!(dest.action(), Some("list"));
        assert_eq!(dest.view(), None);
    }

    #[test]
    fn test_parse_short_tags() {
        let dest = Destination::parse("c:shop, a:list, v:shop/grid");
        assert_eq!(dest.controller(), Some("shop"));
        assert_eq!(dest.action(), Some("list"));
        assert_eq!(dest.view(), Some("shop/grid"));
    }

    #[test]
    fn test_parse_bare_view() {
        let dest = Destination::parse("page/about");
        assert_eq!(dest.view(), Some("page/about"));
        assert_eq!(dest.controller(), None);
    }

    #[test]
    fn test_flatten_nested_groups() {
        let config = RouteConfig::new().route("/", "home").group(
            "/shop",
            RouteConfig::new()
                .route("/", "shop")
                .group("/item", RouteConfig::new().route("/{id}", "item")),
        );

        let paths: Vec<String> = config.flatten().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["/", "/shop", "/shop/item/{id}"]);
    }

    #[test]
    fn test_flatten_redeclared_path_keeps_position() {
        let config = RouteConfig::new()
            .route("/a", "first")
            .route("/b", "b")
            .group("/a", RouteConfig::new().route("/", "second"));

        let flat = config.flatten();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].0, "/a");
        assert_eq!(flat[0].1.view(), Some("second"));
    }

    #[test]
    fn test_from_json_keeps_order() {
        let config = RouteConfig::from_json_str(
            r#"{ "/": "home", "/z": "z", "/users": { "/": "c:user, a:index", "/{id}": "c:user, a:show" } }"#,
        )
        .unwrap();

        let paths: Vec<String> = config.flatten().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["/", "/z", "/users", "/users/{id}"]);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(RouteConfig::from_json_str(r#"{ "/": 3 }"#).is_err());
        assert!(RouteConfig::from_json_str(r#"["/"]"#).is_err());
        assert!(RouteConfig::from_json_str(r#"{ "/{id}/{id}": "x" }"#).is_err());
    }

    #[test]
    fn test_validate_route_path() {
        assert!(validate_route_path("/users/{id}/{tab?}").is_ok());
        assert!(validate_route_path("/").is_ok());
        assert!(validate_route_path("/{}").is_err());
        assert!(validate_route_path("/{a-b}").is_err());
        assert!(validate_route_path("/x{id}").is_err());
    }

    #[test]
    fn test_expand_template() {
        assert_eq!(expand_template("/u/{id}", &["7"]), "/u/7");
        assert_eq!(expand_template("/u/{id}/p/{page}", &["1", "2"]), "/u/1/p/2");
        assert_eq!(expand_template::<&str>("/u/{id}", &[]), "/u");
        assert_eq!(expand_template("/static", &["ignored"]), "/static");
    }

    #[test]
    fn test_route_map_generated_url_is_unique() {
        let a = RouteMap::view_only("a");
        let b = RouteMap::view_only("b");
        assert_ne!(a.url(), b.url());
    }

    #[test]
    fn test_route_maps_lookup_and_flatten() {
        let maps = RouteMaps::new()
            .map("home", RouteMap::new("/", "home"))
            .group(
                "users",
                RouteMaps::new().map("detail", RouteMap::new("/users/{id}", "user/detail")),
            );

        assert_eq!(maps.get("users.detail").unwrap().url(), "/users/{id}");
        assert!(maps.get("users").is_none());

        let config = RouteConfig::from_maps(&maps);
        let flat = config.flatten();
        assert_eq!(flat[1].0, "/users/{id}");
        assert_eq!(flat[1].1.view(), Some("user/detail"));
    }

    #[test]
    fn test_merge_appends_entries() {
        let config = RouteConfig::new()
            .route("/", "home")
            .merge(RouteConfig::new().route("/", "landing").route("/about", "about"));

        let flat = config.flatten();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].1.view(), Some("landing"));
        assert_eq!(flat[1].0, "/about");
    }

    #[test]
    fn test_resolver_output_view() {
        let map = RouteMap::new("/x", "x-view");
        assert_eq!(Resolved::from(map).view(), Some("x-view"));
        assert_eq!(Resolved::from("plain").view(), Some("plain"));
    }
}
