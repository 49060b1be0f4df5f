//! Navigation hooks
//!
//! Interceptors observe or transform lifecycle events. Unlike a broadcast,
//! dispatch is a sequential reducer: interceptors run in registration order
//! and each one receives the value returned by the previous one.
//!
//! # Example
//!
//! ```
//! use screen_navigator::{HookBus, HookEvent, Interceptor};
//! use serde_json::json;
//!
//! let bus = HookBus::new();
//! bus.register(
//!     Interceptor::new("wrap").on(HookEvent::SetRenderContent, |value| {
//!         let content = value?.as_str()?.to_string();
//!         Some(json!(format!("<div>{}</div>", content)))
//!     }),
//! );
//!
//! let out = bus.dispatch(HookEvent::SetRenderContent, Some(json!("hi")));
//! assert_eq!(out, Some(json!("<div>hi</div>")));
//! ```

use crate::trace_log;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Lifecycle events interceptors can handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    /// Immediately after the navigator starts
    StartorBegin,
    /// Forward navigation requested
    TransitionNext,
    /// Navigation to a route map requested
    TransitionMove,
    /// A screen is being stacked
    TransitionStack,
    /// A stacked screen was closed
    TransitionStackClose,
    /// Backward navigation requested
    TransitionBack,
    /// The current screen is being replaced
    TransitionReplace,
    /// A history entry was added without rendering
    TransitionHistoryAdd,
    /// History was cleared
    TransitionHistoryClear,
    /// The top history entry was removed without rendering
    TransitionHistoryPop,
    /// Before the new screen's content is swapped in
    RenderingBefore,
    /// After the new screen's content is swapped in
    RenderingAfter,
    /// A UI fragment was bound
    UIBind,
    /// A UI fragment was appended
    UIAppend,
    /// Markup about to be installed; handlers may rewrite it
    SetRenderContent,
}

impl HookEvent {
    pub const ALL: [HookEvent; 15] = [
        HookEvent::StartorBegin,
        HookEvent::TransitionNext,
        HookEvent::TransitionMove,
        HookEvent::TransitionStack,
        HookEvent::TransitionStackClose,
        HookEvent::TransitionBack,
        HookEvent::TransitionReplace,
        HookEvent::TransitionHistoryAdd,
        HookEvent::TransitionHistoryClear,
        HookEvent::TransitionHistoryPop,
        HookEvent::RenderingBefore,
        HookEvent::RenderingAfter,
        HookEvent::UIBind,
        HookEvent::UIAppend,
        HookEvent::SetRenderContent,
    ];

    /// Stable string key of the event
    pub fn name(self) -> &'static str {
        match self {
            HookEvent::StartorBegin => "StartorBegin",
            HookEvent::TransitionNext => "TransitionNext",
            HookEvent::TransitionMove => "TransitionMove",
            HookEvent::TransitionStack => "TransitionStack",
            HookEvent::TransitionStackClose => "TransitionStackClose",
            HookEvent::TransitionBack => "TransitionBack",
            HookEvent::TransitionReplace => "TransitionReplace",
            HookEvent::TransitionHistoryAdd => "TransitionHistoryAdd",
            HookEvent::TransitionHistoryClear => "TransitionHistoryClear",
            HookEvent::TransitionHistoryPop => "TransitionHistoryPop",
            HookEvent::RenderingBefore => "RenderingBefore",
            HookEvent::RenderingAfter => "RenderingAfter",
            HookEvent::UIBind => "UIBind",
            HookEvent::UIAppend => "UIAppend",
            HookEvent::SetRenderContent => "SetRenderContent",
        }
    }

    /// Look an event up by key
    ///
    /// Accepts the exact key, the `on`-prefixed handler name, and the legacy
    /// `RenderinAfter` spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        let find = |key: &str| {
            if key == "RenderinAfter" {
                return Some(HookEvent::RenderingAfter);
            }
            Self::ALL.iter().copied().find(|event| event.name() == key)
        };
        find(name).or_else(|| name.strip_prefix("on").and_then(find))
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handler receiving the accumulated value; `Some` replaces it.
pub type HookHandler = Arc<dyn Fn(Option<Value>) -> Option<Value> + Send + Sync>;

/// A named set of event handlers
#[derive(Clone)]
pub struct Interceptor {
    name: String,
    handlers: HashMap<HookEvent, HookHandler>,
}

impl Interceptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: HashMap::new(),
        }
    }

    /// Handle an event (replaces an earlier handler for the same event)
    pub fn on<F>(mut self, event: HookEvent, handler: F) -> Self
    where
        F: Fn(Option<Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.handlers.insert(event, Arc::new(handler));
        self
    }

    /// Handle an event by key; unknown keys are ignored
    pub fn on_named<F>(self, name: &str, handler: F) -> Self
    where
        F: Fn(Option<Value>) -> Option<Value> + Send + Sync + 'static,
    {
        match HookEvent::from_name(name) {
            Some(event) => self.on(event, handler),
            None => self,
        }
    }

    /// Observe an event without changing the value
    pub fn observe<F>(self, event: HookEvent, observer: F) -> Self
    where
        F: Fn(Option<&Value>) + Send + Sync + 'static,
    {
        self.on(event, move |value| {
            observer(value.as_ref());
            value
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handles(&self, event: HookEvent) -> bool {
        self.handlers.contains_key(&event)
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("name", &self.name)
            .field("events", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Ordered, append-only interceptor registry
#[derive(Debug, Default)]
pub struct HookBus {
    interceptors: RwLock<Vec<Interceptor>>,
}

impl HookBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor
    pub fn register(&self, interceptor: Interceptor) {
        trace_log!("Registering interceptor '{}'", interceptor.name());
        self.interceptors.write().push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.read().is_empty()
    }

    /// Thread `initial` through every handler for `event`
    pub fn dispatch(&self, event: HookEvent, initial: Option<Value>) -> Option<Value> {
        // Handlers run without the lock held so they may register more interceptors.
        let handlers: Vec<HookHandler> = self
            .interceptors
            .read()
            .iter()
            .filter_map(|interceptor| interceptor.handlers.get(&event).cloned())
            .collect();

        trace_log!("Dispatching {} to {} handler(s)", event, handlers.len());

        handlers.iter().fold(initial, |value, handler| {
            let previous = value.clone();
            handler(value).or(previous)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    #[test]
    fn test_value_threads_through_interceptors() {
        let bus = HookBus::new();
        bus.register(Interceptor::new("double").on(HookEvent::TransitionNext, |v| {
            Some(json!(v?.as_i64()? * 2))
        }));
        bus.register(Interceptor::new("add").on(HookEvent::TransitionNext, |v| {
            Some(json!(v?.as_i64()? + 1))
        }));

        let out = bus.dispatch(HookEvent::TransitionNext, Some(json!(5)));
        assert_eq!(out, Some(json!(11)));
    }

    #[test]
    fn test_second_interceptor_sees_first_result() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();

        let bus = HookBus::new();
        bus.register(
            Interceptor::new("first").on(HookEvent::RenderingBefore, |_| Some(json!("changed"))),
        );
        bus.register(
            Interceptor::new("second").observe(HookEvent::RenderingBefore, move |v| {
                *sink.lock() = v.cloned();
            }),
        );

        bus.dispatch(HookEvent::RenderingBefore, Some(json!("original")));
        assert_eq!(*seen.lock(), Some(json!("changed")));
    }

    #[test]
    fn test_none_return_keeps_value() {
        let bus = HookBus::new();
        bus.register(Interceptor::new("quiet").on(HookEvent::UIBind, |_| None));

        let out = bus.dispatch(HookEvent::UIBind, Some(json!("kept")));
        assert_eq!(out, Some(json!("kept")));
    }

    #[test]
    fn test_only_matching_event_runs() {
        let bus = HookBus::new();
        bus.register(Interceptor::new("x").on(HookEvent::TransitionBack, |_| Some(json!(1))));

        assert_eq!(bus.dispatch(HookEvent::TransitionNext, None), None);
        assert_eq!(bus.dispatch(HookEvent::TransitionBack, None), Some(json!(1)));
    }

    #[test]
    fn test_event_name_lookup() {
        assert_eq!(
            HookEvent::from_name("TransitionNext"),
            Some(HookEvent::TransitionNext)
        );
        assert_eq!(
            HookEvent::from_name("onTransitionNext"),
            Some(HookEvent::TransitionNext)
        );
        assert_eq!(
            HookEvent::from_name("onRenderinAfter"),
            Some(HookEvent::RenderingAfter)
        );
        assert_eq!(HookEvent::from_name("Nope"), None);

        for event in HookEvent::ALL {
            assert_eq!(HookEvent::from_name(event.name()), Some(event));
        }
    }

    #[test]
    fn test_on_named_registers_known_events() {
        let interceptor = Interceptor::new("named")
            .on_named("onUIAppend", |v| v)
            .on_named("onUnknown", |v| v);

        assert!(interceptor.handles(HookEvent::UIAppend));
        assert_eq!(interceptor.handlers.len(), 1);
    }
}
