//! # Screen Navigator
//!
//! The navigation engine of a single-page application, without any UI:
//!
//! - **Route Table** - Address patterns resolved last-match-wins, with
//!   positional arguments and optional trailing segments
//! - **History Stack** - The back-stack of visited screens, with payloads
//! - **Hook Bus** - Named interceptors that observe or rewrite values at
//!   every lifecycle point
//! - **Lifecycle Sequencing** - Leave (with veto), close animation,
//!   not-found handling, content swap and enter, in a fixed order
//! - **Stacked Views** - Overlays that resolve to a value when closed
//! - **Web and Application Routing** - Mirror addresses into the fragment, or
//!   keep navigation entirely in memory
//!
//! The page itself belongs to the host: a [`ContentSwap`] materializes
//! screens and a [`Platform`] provides the address bar, native history and
//! timers.
//!
//! # Quick Start
//!
//! ```
//! use screen_navigator::*;
//!
//! struct Home;
//! impl Layout for Home {
//!     fn markup(&self) -> Option<String> {
//!         Some("<h1>Home</h1>".into())
//!     }
//! }
//! impl View for Home {}
//!
//! struct User;
//! impl Layout for User {}
//! impl View for User {
//!     fn handle<'a>(&'a mut self, args: &'a RouteArgs) -> CallbackFuture<'a> {
//!         assert_eq!(args.get(0), Some("42"));
//!         done()
//!     }
//! }
//!
//! let navigator = Navigator::builder()
//!     .config(NavigatorConfig::new().route_type(RouteType::Application).delay_ms(0))
//!     .routes(RouteConfig::new().route("/", "home").route("/users/{id}", "user"))
//!     .registry(ScreenRegistry::new().view("home", |_| Home).view("user", |_| User))
//!     .build();
//!
//! pollster::block_on(async {
//!     navigator.start().await.unwrap();
//!     let outcome = navigator.next("/users/42", None).await.unwrap();
//!     assert!(outcome.is_success());
//! });
//! ```
//!
//! # Web Routing
//!
//! With [`RouteType::Web`] (the default) forward navigation only updates the
//! fragment and returns [`NavigationOutcome::Deferred`]. The host reports
//! the new fragment through [`Navigator::address_changed`], which renders.
//!
//! # Hooks
//!
//! ```
//! use screen_navigator::*;
//! use serde_json::Value;
//!
//! let navigator = Navigator::builder()
//!     .interceptor(Interceptor::new("banner").on(HookEvent::SetRenderContent, |markup| {
//!         let markup = markup?.as_str()?.to_string();
//!         Some(Value::String(format!("<aside>beta</aside>{}", markup)))
//!     }))
//!     .build();
//!
//! let out = navigator
//!     .hooks()
//!     .dispatch(HookEvent::SetRenderContent, Some(Value::from("<p/>")));
//! assert_eq!(out, Some(Value::from("<aside>beta</aside><p/>")));
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `cache` (default) - LRU cache for route resolution

#![doc(html_root_url = "https://docs.rs/screen-navigator/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Core routing modules
pub mod history;
pub mod matcher;
pub mod params;
pub mod route;
pub mod table;

// Error handling
pub mod error;

// Configuration
pub mod config;

// Screens and their lifecycle
pub mod hooks;
pub mod lifecycle;
pub mod registry;
pub mod state;
pub mod transition;

// Host contracts
pub mod platform;
pub mod render;

// Navigator
pub mod navigator;
mod pipeline;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, RouteCache};
pub use config::{NavigatorConfig, RouteType};
pub use error::{BoxError, NavigationError, NavigationOutcome, RefusalReason, ScreenKind};
pub use history::{EntrySource, HistoryEntry, HistoryStack};
pub use hooks::{HookBus, HookEvent, HookHandler, Interceptor};
pub use lifecycle::{
    done, proceed, CallbackFuture, Controller, Layout, LeaveDecision, ScreenContext, View,
};
pub use matcher::{normalize_address, RoutePattern};
pub use navigator::{Navigator, NavigatorBuilder};
pub use params::RouteArgs;
pub use platform::{HeadlessPlatform, Platform};
pub use registry::{ControllerFactory, ScreenRegistry, ViewFactory};
pub use render::{ContentSwap, NullSwap, Region, RegionUpdate, RenderRequest, SwapReport};
pub use route::{
    expand_template, validate_route_path, Destination, Resolved, Resolver, RouteConfig, RouteMap,
    RouteMaps, Target,
};
pub use state::{ActiveScreen, NavigationContext, NavigationState, RegionSlots};
pub use table::{DecisionRoute, RouteMode, RouteTable};
pub use transition::{AnimationClasses, AnimationPhase, AnimationSelector};

/// Navigation direction indicator.
///
/// Used to pick leave/enter callbacks and animation classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    /// Navigating forward to a new screen
    Forward,
    /// Navigating back in history
    Back,
}
