//! The navigator
//!
//! [`Navigator`] owns the route table, the history stack, the transition
//! flags and the active screen. Every entry point checks the flags first and
//! returns a refusal instead of starting a second transition. The render
//! sequence itself lives in the `pipeline` module.
//!
//! # Example
//!
//! ```
//! use screen_navigator::*;
//!
//! struct Page;
//! impl Layout for Page {}
//! impl View for Page {}
//!
//! let navigator = Navigator::builder()
//!     .config(NavigatorConfig::new().route_type(RouteType::Application).delay_ms(0))
//!     .routes(RouteConfig::new().route("/", "home").route("/about", "about"))
//!     .registry(
//!         ScreenRegistry::new()
//!             .view("home", |_| Page)
//!             .view("about", |_| Page),
//!     )
//!     .build();
//!
//! pollster::block_on(async {
//!     navigator.start().await.unwrap();
//!     navigator.next("/about", None).await.unwrap();
//!     assert_eq!(navigator.now().as_deref(), Some("/about"));
//!
//!     assert!(navigator.back(1).await.unwrap());
//!     assert_eq!(navigator.now().as_deref(), Some("/"));
//! });
//! ```

use crate::config::NavigatorConfig;
use crate::error::{NavigationError, NavigationOutcome, RefusalReason, ScreenKind};
use crate::history::{EntrySource, HistoryEntry, HistoryStack};
use crate::hooks::{HookBus, HookEvent, Interceptor};
use crate::lifecycle::View;
use crate::matcher::{normalize_address, RoutePattern};
use crate::params::RouteArgs;
use crate::platform::{HeadlessPlatform, Platform};
use crate::render::{ContentSwap, NullSwap};
use crate::route::{RouteConfig, RouteMap, RouteMaps, Target};
use crate::state::{NavigationContext, NavigationState};
use crate::table::{DecisionRoute, RouteMode, RouteTable};
use crate::{debug_log, trace_log};
use futures::channel::oneshot;
use parking_lot::{Mutex, MutexGuard};
use serde_json::{json, Value};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A stacked view waiting for [`Navigator::stack_close`]
pub(crate) struct PendingStack {
    pub(crate) view: Box<dyn View>,
    pub(crate) sender: oneshot::Sender<Option<Value>>,
}

/// Everything the navigator mutates
pub(crate) struct Shared {
    pub(crate) flags: NavigationState,
    pub(crate) history: HistoryStack,
    pub(crate) context: NavigationContext,
    pub(crate) pending: Option<PendingStack>,
}

pub(crate) struct Inner {
    pub(crate) config: NavigatorConfig,
    routes: RouteConfig,
    table: OnceLock<RouteTable>,
    pub(crate) registry: crate::registry::ScreenRegistry,
    pub(crate) hooks: HookBus,
    pub(crate) swap: Mutex<Box<dyn ContentSwap>>,
    pub(crate) platform: Arc<dyn Platform>,
    pub(crate) shared: Mutex<Shared>,
}

/// History as it was before the entry point touched it
///
/// Restored whole when the previous screen stays on display, so entries
/// trimmed by the size limit come back too.
#[derive(Debug, Default)]
pub(crate) struct Rollback {
    snapshot: Option<Vec<HistoryEntry>>,
}

impl Rollback {
    pub(crate) fn none() -> Self {
        Self::default()
    }

    fn capture(history: &HistoryStack) -> Self {
        Self {
            snapshot: Some(history.entries().to_vec()),
        }
    }

    pub(crate) fn apply(self, history: &mut HistoryStack) {
        if let Some(snapshot) = self.snapshot {
            history.restore(snapshot);
        }
    }
}

/// Resets transition flags when an entry point returns
pub(crate) struct TransitionGuard<'a> {
    shared: &'a Mutex<Shared>,
    reset_back: bool,
    reset_rendering: bool,
}

impl TransitionGuard<'_> {
    /// Leave `is_back` set for the host to clear
    fn keep_back(&mut self) {
        self.reset_back = false;
    }
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        let mut shared = self.shared.lock();
        if self.reset_back {
            shared.flags.is_back = false;
        }
        if self.reset_rendering {
            shared.flags.rendering = false;
        }
    }
}

/// How a render sequence ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rendered {
    Shown,
    Vetoed,
    Fallback,
}

impl Rendered {
    fn outcome(self, address: String) -> NavigationOutcome {
        match self {
            Rendered::Shown => NavigationOutcome::Completed { address },
            Rendered::Vetoed => NavigationOutcome::Vetoed,
            Rendered::Fallback => NavigationOutcome::NotFound {
                address,
                fallback: true,
            },
        }
    }
}

/// Screen navigator
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Navigator {
    pub(crate) inner: Arc<Inner>,
}

impl Navigator {
    pub fn builder() -> NavigatorBuilder {
        NavigatorBuilder::new()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub(crate) fn shared(&self) -> MutexGuard<'_, Shared> {
        self.inner.shared.lock()
    }

    /// The compiled route table (compiled on first use)
    pub fn table(&self) -> &RouteTable {
        self.inner.table.get_or_init(|| {
            RouteTable::compile_with_capacity(&self.inner.routes, self.inner.config.cache_capacity)
        })
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.inner.config
    }

    pub fn hooks(&self) -> &HookBus {
        &self.inner.hooks
    }

    /// Address of the screen on display
    pub fn now(&self) -> Option<String> {
        self.shared().context.address.clone()
    }

    /// A backward transition is in flight
    pub fn is_back(&self) -> bool {
        self.shared().flags.is_back
    }

    pub fn is_next(&self) -> bool {
        self.shared().flags.is_next()
    }

    /// Disable or re-enable every entry point
    pub fn set_lock(&self, lock: bool) {
        debug_log!("Navigation lock set to {}", lock);
        self.shared().flags.lock = lock;
    }

    pub fn is_locked(&self) -> bool {
        self.shared().flags.lock
    }

    /// Snapshot of the history stack, oldest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.shared().history.entries().to_vec()
    }

    /// View identifier of the screen on display
    pub fn active_view_id(&self) -> Option<String> {
        self.shared().context.active.as_ref().map(|screen| screen.view_id())
    }

    /// A stacked view is waiting to be closed
    pub fn stack_pending(&self) -> bool {
        self.shared().pending.is_some()
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Start a transition, or report why one can't start
    fn enter(&self, is_back: bool) -> Result<TransitionGuard<'_>, RefusalReason> {
        let mut shared = self.shared();
        if let Some(reason) = shared.flags.refusal() {
            debug_log!("Transition refused: {}", reason);
            return Err(reason);
        }
        shared.flags.is_back = is_back;
        shared.flags.rendering = true;
        Ok(TransitionGuard {
            shared: &self.inner.shared,
            reset_back: is_back,
            reset_rendering: true,
        })
    }

    /// Render the begin address
    ///
    /// Web routed navigators prefer the fragment already in the address bar;
    /// application routed ones navigate forward to the begin address.
    pub async fn start(&self) -> Result<NavigationOutcome, NavigationError> {
        self.inner.hooks.dispatch(HookEvent::StartorBegin, None);
        let begin = self.inner.config.begin.clone();
        debug_log!("Starting navigator at '{}'", begin);

        if !self.inner.config.is_web() {
            return self.next(begin.as_str(), None).await;
        }

        let _guard = match self.enter(false) {
            Ok(guard) => guard,
            Err(reason) => return Ok(NavigationOutcome::Refused(reason)),
        };
        let address = self.inner.platform.fragment().unwrap_or(begin);
        let decision = self.table().resolve(&address);
        let rollback = {
            let mut shared = self.shared();
            let rollback = Rollback::capture(&shared.history);
            shared.history.push(history_entry(&decision, None));
            rollback
        };
        self.render_outcome(decision, None, rollback).await
    }

    /// Navigate forward
    ///
    /// Web routed navigators only record the entry and update the fragment;
    /// the host reports the change through [`Navigator::address_changed`].
    /// View targets are always rendered directly.
    pub async fn next(
        &self,
        target: impl Into<Target>,
        payload: Option<Value>,
    ) -> Result<NavigationOutcome, NavigationError> {
        match target.into() {
            Target::Map { map, args } => self.move_to(&map, args, payload).await,
            target => {
                let _guard = match self.enter(false) {
                    Ok(guard) => guard,
                    Err(reason) => return Ok(NavigationOutcome::Refused(reason)),
                };
                let rollback = Rollback::capture(&self.shared().history);
                self.forward(target, payload, rollback).await
            }
        }
    }

    /// Navigate to a route map, expanding its address template with `args`
    pub async fn move_to<I, T>(
        &self,
        map: &RouteMap,
        args: I,
        payload: Option<Value>,
    ) -> Result<NavigationOutcome, NavigationError>
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let _guard = match self.enter(false) {
            Ok(guard) => guard,
            Err(reason) => return Ok(NavigationOutcome::Refused(reason)),
        };
        let target = Target::map(map.clone(), args);
        self.inner
            .hooks
            .dispatch(HookEvent::TransitionMove, Some(target.describe()));
        let rollback = Rollback::capture(&self.shared().history);
        self.forward(target, payload, rollback).await
    }

    /// Replace the current history entry with `target`
    pub async fn replace(
        &self,
        target: impl Into<Target>,
        payload: Option<Value>,
    ) -> Result<NavigationOutcome, NavigationError> {
        let _guard = match self.enter(false) {
            Ok(guard) => guard,
            Err(reason) => return Ok(NavigationOutcome::Refused(reason)),
        };
        let target = target.into();
        self.inner
            .hooks
            .dispatch(HookEvent::TransitionReplace, Some(target.describe()));

        let rollback = {
            let mut shared = self.shared();
            let rollback = Rollback::capture(&shared.history);
            shared.history.pop();
            rollback
        };
        if let Target::Map { .. } = &target {
            self.inner
                .hooks
                .dispatch(HookEvent::TransitionMove, Some(target.describe()));
        }
        self.forward(target, payload, rollback).await
    }

    /// Push a history entry for `target` and show it
    async fn forward(
        &self,
        target: Target,
        payload: Option<Value>,
        rollback: Rollback,
    ) -> Result<NavigationOutcome, NavigationError> {
        self.inner
            .hooks
            .dispatch(HookEvent::TransitionNext, Some(target.describe()));

        let direct = matches!(target, Target::View(_));
        let decision = match target {
            Target::View(view) => DecisionRoute::direct_view(view, RouteArgs::new()),
            Target::Address(address) => self.table().resolve(&address),
            Target::Map { map, args } => self.resolve_map(&map, &args),
        };
        debug_log!("Navigating forward to '{}'", decision.address);

        let mut entry = history_entry(&decision, payload.clone());
        if direct {
            entry.source = EntrySource::View;
        }
        self.shared().history.push(entry);

        if self.inner.config.is_web() && !direct {
            let fragment = if decision.address == "/" {
                ""
            } else {
                decision.address.as_str()
            };
            self.inner.platform.set_fragment(fragment);
            return Ok(NavigationOutcome::Deferred {
                address: decision.address,
            });
        }

        self.render_outcome(decision, payload, rollback).await
    }

    /// Go back `count` screens
    ///
    /// Closes a stacked view instead when one is open. Returns `false` when
    /// refused, when history is too short, or when the transition was
    /// vetoed.
    pub async fn back(&self, count: usize) -> Result<bool, NavigationError> {
        let count = count.max(1);
        let mut guard = match self.enter(true) {
            Ok(guard) => guard,
            Err(_) => return Ok(false),
        };
        self.inner
            .hooks
            .dispatch(HookEvent::TransitionBack, Some(json!({ "count": count })));

        if self.stack_pending() {
            self.close_stack(None).await?;
            return Ok(true);
        }

        if self.inner.config.is_web() {
            {
                let mut shared = self.shared();
                let drop_count = count.min(shared.history.len().saturating_sub(1));
                for _ in 0..drop_count {
                    shared.history.pop();
                }
            }
            for _ in 0..count {
                self.inner.platform.history_back();
            }
            debug_log!("Requested {} native back step(s)", count);
            guard.keep_back();
            return Ok(true);
        }

        let (rollback, top) = {
            let mut shared = self.shared();
            if shared.history.len() <= count {
                debug_log!(
                    "Back refused: {} history entries, {} requested",
                    shared.history.len(),
                    count
                );
                return Ok(false);
            }
            let rollback = Rollback::capture(&shared.history);
            for _ in 0..count {
                shared.history.pop();
            }
            let top = shared.history.peek().cloned();
            (rollback, top)
        };
        let Some(top) = top else {
            return Ok(false);
        };

        let decision = self.resolve_entry(&top);
        debug_log!("Navigating back to '{}'", decision.address);
        let rendered = self.render(decision, top.payload.clone(), rollback).await?;
        Ok(rendered != Rendered::Vetoed)
    }

    /// Render the address the host reports after a fragment change
    ///
    /// While locked, the fragment is put back and nothing renders.
    pub async fn address_changed(
        &self,
        fragment: &str,
    ) -> Result<NavigationOutcome, NavigationError> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let address = normalize_address(fragment);
        let payload = {
            let mut shared = self.shared();
            if shared.flags.lock {
                let current = shared.context.address.clone().unwrap_or_default();
                drop(shared);
                debug_log!("Locked, restoring fragment '{}'", current);
                self.inner
                    .platform
                    .set_fragment(if current == "/" { "" } else { &current });
                return Ok(NavigationOutcome::Refused(RefusalReason::Locked));
            }
            if shared.flags.rendering {
                return Ok(NavigationOutcome::Refused(RefusalReason::Busy));
            }
            shared.flags.rendering = true;
            shared
                .history
                .peek()
                .filter(|entry| entry.address == address)
                .and_then(|entry| entry.payload.clone())
        };
        let _guard = TransitionGuard {
            shared: &self.inner.shared,
            reset_back: true,
            reset_rendering: true,
        };

        trace_log!("Address changed to '{}'", address);
        let decision = self.table().resolve(&address);
        self.render_outcome(decision, payload, Rollback::none())
            .await
    }

    // ========================================================================
    // Stacked views
    // ========================================================================

    /// Show a view on top of the current screen without touching history
    ///
    /// Resolves once [`Navigator::stack_close`] (or [`Navigator::back`])
    /// closes it, with the closer's value or else the view's own
    /// [`View::stack_closed`] value. A refused stack resolves to `None`
    /// immediately.
    pub async fn stack(
        &self,
        target: impl Into<Target>,
        payload: Option<Value>,
    ) -> Result<Option<Value>, NavigationError> {
        let guard = match self.enter(false) {
            Ok(guard) => guard,
            Err(_) => return Ok(None),
        };
        if self.stack_pending() {
            debug_log!("Stack refused: a view is already stacked");
            return Ok(None);
        }

        let target = target.into();
        self.inner
            .hooks
            .dispatch(HookEvent::TransitionStack, Some(target.describe()));

        let decision = match target {
            Target::View(view) => DecisionRoute::direct_view(view, RouteArgs::new()),
            Target::Address(address) => self.table().resolve(&address),
            Target::Map { map, args } => self.resolve_map(&map, &args),
        };
        if !decision.is_success() {
            return Err(NavigationError::RouteNotFound {
                address: decision.address,
            });
        }
        // Only views can be stacked; controller routes carry no view.
        let Some(view_name) = decision.view.clone() else {
            return Err(NavigationError::missing(ScreenKind::View, decision.address));
        };

        let view = self.open_layer(&view_name, &decision, payload).await?;
        let (sender, receiver) = oneshot::channel();
        self.shared().pending = Some(PendingStack { view, sender });
        debug_log!("Stacked view '{}'", view_name);
        drop(guard);

        receiver.await.map_err(|_| NavigationError::StackAborted)
    }

    /// Close the stacked view, resolving its [`Navigator::stack`] call
    ///
    /// Returns `false` when nothing is stacked, when locked, or while a
    /// backward transition is in flight.
    pub async fn stack_close(&self, result: Option<Value>) -> Result<bool, NavigationError> {
        let _guard = {
            let mut shared = self.shared();
            if shared.flags.lock || shared.flags.is_back || shared.pending.is_none() {
                trace_log!("Stack close ignored");
                return Ok(false);
            }
            shared.flags.is_back = true;
            TransitionGuard {
                shared: &self.inner.shared,
                reset_back: true,
                reset_rendering: false,
            }
        };
        self.close_stack(result).await?;
        Ok(true)
    }

    // ========================================================================
    // History manipulation
    // ========================================================================

    /// Record `target` in history without rendering it
    pub fn history_add(&self, target: impl Into<Target>, payload: Option<Value>) -> bool {
        if self.history_refused() {
            return false;
        }
        let target = target.into();
        self.inner
            .hooks
            .dispatch(HookEvent::TransitionHistoryAdd, Some(target.describe()));

        let entry = match target {
            Target::View(view) => HistoryEntry::for_view(view).with_payload(payload),
            Target::Address(address) => history_entry(&self.table().resolve(&address), payload),
            Target::Map { map, args } => history_entry(&self.resolve_map(&map, &args), payload),
        };
        trace_log!("History add '{}'", entry.address);
        self.shared().history.push(entry);
        true
    }

    /// Drop every history entry
    pub fn history_clear(&self) -> bool {
        if self.history_refused() {
            return false;
        }
        self.inner
            .hooks
            .dispatch(HookEvent::TransitionHistoryClear, None);
        self.shared().history.clear();
        true
    }

    /// Drop the top history entry without rendering
    pub fn history_pop(&self) -> Option<HistoryEntry> {
        if self.history_refused() {
            return None;
        }
        self.inner.hooks.dispatch(HookEvent::TransitionHistoryPop, None);
        self.shared().history.pop()
    }

    fn history_refused(&self) -> bool {
        match self.shared().flags.refusal() {
            Some(RefusalReason::Busy) | None => false,
            Some(reason) => {
                debug_log!("History change refused: {}", reason);
                true
            }
        }
    }

    // ========================================================================
    // Resolution helpers
    // ========================================================================

    /// Resolve a route map, falling back to the map itself when its address
    /// is not in the route table
    fn resolve_map(&self, map: &RouteMap, args: &[String]) -> DecisionRoute {
        let address = map.expand(args);
        let decision = self.table().resolve(&address);
        if decision.is_success() {
            return decision;
        }

        let view = match map.resolver() {
            Some(resolver) => resolver(&decision.address).view().map(str::to_string),
            None => map.view().map(str::to_string),
        };
        if view.is_none() {
            return decision;
        }
        let args = RoutePattern::from_path(map.url())
            .matches(&decision.address)
            .unwrap_or_default();
        DecisionRoute {
            mode: RouteMode::Success,
            view,
            args,
            resolver: map.resolver().cloned(),
            ..decision
        }
    }

    /// Decision for a history entry being returned to
    fn resolve_entry(&self, entry: &HistoryEntry) -> DecisionRoute {
        if entry.source == EntrySource::View {
            if let Some(view) = &entry.view {
                return DecisionRoute::direct_view(view.clone(), entry.args.clone());
            }
        }
        let decision = self.table().resolve(&entry.address);
        if decision.is_success() || entry.view.is_none() {
            return decision;
        }
        DecisionRoute {
            mode: RouteMode::Success,
            view: entry.view.clone(),
            args: entry.args.clone(),
            ..decision
        }
    }

    async fn render_outcome(
        &self,
        decision: DecisionRoute,
        payload: Option<Value>,
        rollback: Rollback,
    ) -> Result<NavigationOutcome, NavigationError> {
        let address = decision.address.clone();
        let rendered = self.render(decision, payload, rollback).await?;
        Ok(rendered.outcome(address))
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared();
        f.debug_struct("Navigator")
            .field("config", &self.inner.config)
            .field("flags", &shared.flags)
            .field("history", &shared.history.len())
            .field("active", &shared.context.active)
            .finish_non_exhaustive()
    }
}

fn history_entry(decision: &DecisionRoute, payload: Option<Value>) -> HistoryEntry {
    HistoryEntry::new(decision.address.clone())
        .with_resolution(decision.view.clone(), decision.args.clone())
        .with_payload(payload)
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Navigator`]
///
/// Defaults: web routing, no routes, an empty registry, [`NullSwap`] and
/// [`HeadlessPlatform`].
#[derive(Default)]
pub struct NavigatorBuilder {
    config: NavigatorConfig,
    routes: RouteConfig,
    registry: crate::registry::ScreenRegistry,
    interceptors: Vec<Interceptor>,
    swap: Option<Box<dyn ContentSwap>>,
    platform: Option<Arc<dyn Platform>>,
}

impl NavigatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Append routes
    pub fn routes(mut self, routes: RouteConfig) -> Self {
        self.routes = self.routes.merge(routes);
        self
    }

    /// Append the routes described by route maps
    pub fn maps(mut self, maps: &RouteMaps) -> Self {
        self.routes = self.routes.merge(RouteConfig::from_maps(maps));
        self
    }

    pub fn registry(mut self, registry: crate::registry::ScreenRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn interceptor(mut self, interceptor: Interceptor) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn content_swap(mut self, swap: impl ContentSwap + 'static) -> Self {
        self.swap = Some(Box::new(swap));
        self
    }

    pub fn platform(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn build(self) -> Navigator {
        let hooks = HookBus::new();
        for interceptor in self.interceptors {
            hooks.register(interceptor);
        }

        let history = HistoryStack::with_max_size(self.config.history_limit);
        debug_log!(
            "Building navigator ({:?} routing, {} route entries)",
            self.config.route_type,
            self.routes.len()
        );

        Navigator {
            inner: Arc::new(Inner {
                config: self.config,
                routes: self.routes,
                table: OnceLock::new(),
                registry: self.registry,
                hooks,
                swap: Mutex::new(self.swap.unwrap_or_else(|| Box::new(NullSwap))),
                platform: self
                    .platform
                    .unwrap_or_else(|| Arc::new(HeadlessPlatform::new())),
                shared: Mutex::new(Shared {
                    flags: NavigationState::new(),
                    history,
                    context: NavigationContext::new(),
                    pending: None,
                }),
            }),
        }
    }
}

impl fmt::Debug for NavigatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigatorBuilder")
            .field("config", &self.config)
            .field("routes", &self.routes.len())
            .field("registry", &self.registry)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}
