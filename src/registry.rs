//! Screen registry
//!
//! Maps view and controller names to factories. Routes only carry names;
//! the navigator asks the registry for a fresh screen each time one is
//! entered. Markup can be registered per view name so screens don't have to
//! carry their own.

use crate::error::{NavigationError, ScreenKind};
use crate::lifecycle::{Controller, ScreenContext, View};
use crate::trace_log;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a view for a navigation
pub type ViewFactory = Arc<dyn Fn(&ScreenContext) -> Box<dyn View> + Send + Sync>;

/// Builds a controller for a navigation
pub type ControllerFactory = Arc<dyn Fn(&ScreenContext) -> Box<dyn Controller> + Send + Sync>;

/// Name → factory lookup
///
/// # Example
///
/// ```
/// use screen_navigator::{Layout, ScreenRegistry, View};
///
/// struct Home;
/// impl Layout for Home {}
/// impl View for Home {}
///
/// let registry = ScreenRegistry::new()
///     .view("home", |_| Home)
///     .markup("home", "<h1>Home</h1>");
///
/// assert!(registry.has_view("home"));
/// assert_eq!(registry.markup_for("home"), Some("<h1>Home</h1>"));
/// ```
#[derive(Clone, Default)]
pub struct ScreenRegistry {
    views: HashMap<String, ViewFactory>,
    controllers: HashMap<String, ControllerFactory>,
    markup: HashMap<String, String>,
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view factory
    pub fn view<V, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        V: View + 'static,
        F: Fn(&ScreenContext) -> V + Send + Sync + 'static,
    {
        self.register_view(name, factory);
        self
    }

    /// Register a controller factory
    ///
    /// Action views are looked up as `"{controller}/{action}"`.
    pub fn controller<C, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        C: Controller + 'static,
        F: Fn(&ScreenContext) -> C + Send + Sync + 'static,
    {
        self.register_controller(name, factory);
        self
    }

    /// Register markup for a view name
    pub fn markup(mut self, view: impl Into<String>, markup: impl Into<String>) -> Self {
        self.register_markup(view, markup);
        self
    }

    pub fn register_view<V, F>(&mut self, name: impl Into<String>, factory: F)
    where
        V: View + 'static,
        F: Fn(&ScreenContext) -> V + Send + Sync + 'static,
    {
        let name = name.into();
        trace_log!("Registering view '{}'", name);
        self.views
            .insert(name, Arc::new(move |ctx: &ScreenContext| {
                Box::new(factory(ctx)) as Box<dyn View>
            }));
    }

    pub fn register_controller<C, F>(&mut self, name: impl Into<String>, factory: F)
    where
        C: Controller + 'static,
        F: Fn(&ScreenContext) -> C + Send + Sync + 'static,
    {
        let name = name.into();
        trace_log!("Registering controller '{}'", name);
        self.controllers.insert(
            name,
            Arc::new(move |ctx: &ScreenContext| {
                Box::new(factory(ctx)) as Box<dyn Controller>
            }),
        );
    }

    pub fn register_markup(&mut self, view: impl Into<String>, markup: impl Into<String>) {
        self.markup.insert(view.into(), markup.into());
    }

    pub fn has_view(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    pub fn has_controller(&self, name: &str) -> bool {
        self.controllers.contains_key(name)
    }

    /// Build a view, failing when none is registered under `name`
    pub fn build_view(
        &self,
        name: &str,
        ctx: &ScreenContext,
    ) -> Result<Box<dyn View>, NavigationError> {
        self.try_build_view(name, ctx)
            .ok_or_else(|| NavigationError::missing(ScreenKind::View, name))
    }

    /// Build a view if one is registered under `name`
    pub fn try_build_view(&self, name: &str, ctx: &ScreenContext) -> Option<Box<dyn View>> {
        self.views.get(name).map(|factory| factory(ctx))
    }

    pub fn build_controller(
        &self,
        name: &str,
        ctx: &ScreenContext,
    ) -> Result<Box<dyn Controller>, NavigationError> {
        self.controllers
            .get(name)
            .map(|factory| factory(ctx))
            .ok_or_else(|| NavigationError::missing(ScreenKind::Controller, name))
    }

    /// Registered markup for a view name
    pub fn markup_for(&self, view: &str) -> Option<&str> {
        self.markup.get(view).map(String::as_str)
    }
}

impl fmt::Debug for ScreenRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut views: Vec<_> = self.views.keys().collect();
        views.sort();
        let mut controllers: Vec<_> = self.controllers.keys().collect();
        controllers.sort();
        f.debug_struct("ScreenRegistry")
            .field("views", &views)
            .field("controllers", &controllers)
            .field("markup", &self.markup.len())
            .finish()
    }
}
