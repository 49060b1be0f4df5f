//! Navigator configuration

use crate::error::NavigationError;
use crate::transition::AnimationSelector;
use serde::Deserialize;
use std::time::Duration;

/// Where navigation state lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    /// Addresses are mirrored into the address-bar fragment; the host reports
    /// fragment changes and those drive rendering
    #[default]
    Web,
    /// The navigator's own history stack is the only source of truth
    Application,
}

/// Navigator settings
///
/// Usually built in code, but can also be read from JSON:
///
/// ```
/// use screen_navigator::{NavigatorConfig, RouteType};
///
/// let config = NavigatorConfig::from_json_str(
///     r#"{ "route_type": "application", "delay_ms": 0, "not_found_view": "missing" }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.route_type, RouteType::Application);
/// assert_eq!(config.begin, "/");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub route_type: RouteType,
    /// View shown when no route matches
    pub not_found_view: Option<String>,
    /// Address rendered by [`Navigator::start`](crate::Navigator::start)
    pub begin: String,
    /// Pause between the close animation and the content swap
    pub delay_ms: u64,
    pub animation: AnimationSelector,
    /// Maximum history entries (0 = unlimited)
    pub history_limit: usize,
    /// Route resolution cache size (0 = default)
    pub cache_capacity: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            route_type: RouteType::Web,
            not_found_view: None,
            begin: "/".to_string(),
            delay_ms: 100,
            animation: AnimationSelector::default(),
            history_limit: 0,
            cache_capacity: 0,
        }
    }
}

impl NavigatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, NavigationError> {
        serde_json::from_str(json).map_err(|err| NavigationError::InvalidConfig {
            message: err.to_string(),
        })
    }

    pub fn route_type(mut self, route_type: RouteType) -> Self {
        self.route_type = route_type;
        self
    }

    pub fn not_found_view(mut self, view: impl Into<String>) -> Self {
        self.not_found_view = Some(view.into());
        self
    }

    pub fn begin(mut self, address: impl Into<String>) -> Self {
        self.begin = address.into();
        self
    }

    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn animation(mut self, animation: AnimationSelector) -> Self {
        self.animation = animation;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn is_web(&self) -> bool {
        self.route_type == RouteType::Web
    }
}
