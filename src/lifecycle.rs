//! Screen lifecycle callbacks
//!
//! Screens are the application's own views and controllers. The navigator
//! drives them through a fixed phase order:
//!
//! - **leave**: `leave`, then `leave_back` or `leave_next` on the outgoing
//!   screen. Returning [`LeaveDecision::Veto`] stops the transition.
//! - **before**: `before` on the incoming view (or `before_action` on a
//!   controller) with the extracted route arguments.
//! - **enter**: `render_before`, `next` or `back`, `handle`, `render_after`.
//!
//! Every callback has a no-op default, so a screen only implements the
//! phases it cares about.
//!
//! # Example
//!
//! ```
//! use screen_navigator::{CallbackFuture, Layout, LeaveDecision, RouteArgs, View};
//!
//! struct Editor {
//!     dirty: bool,
//! }
//!
//! impl Layout for Editor {
//!     fn header(&self) -> Option<&str> {
//!         Some("editor-header")
//!     }
//! }
//!
//! impl View for Editor {
//!     fn leave(&mut self) -> CallbackFuture<'_, LeaveDecision> {
//!         let decision = if self.dirty {
//!             LeaveDecision::Veto
//!         } else {
//!             LeaveDecision::Continue
//!         };
//!         Box::pin(async move { Ok(decision) })
//!     }
//! }
//! ```

use crate::error::BoxError;
use crate::params::RouteArgs;
use crate::transition::AnimationSelector;
use futures::future::{self, BoxFuture};
use serde_json::Value;

/// Future returned by screen callbacks
pub type CallbackFuture<'a, T = ()> = BoxFuture<'a, Result<T, BoxError>>;

/// Result of a leave callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaveDecision {
    /// Let the transition proceed
    #[default]
    Continue,
    /// Stop the transition; the current screen stays active
    Veto,
}

impl LeaveDecision {
    pub fn is_veto(self) -> bool {
        self == LeaveDecision::Veto
    }
}

impl From<bool> for LeaveDecision {
    fn from(proceed: bool) -> Self {
        if proceed {
            LeaveDecision::Continue
        } else {
            LeaveDecision::Veto
        }
    }
}

/// Completed callback with no value
pub fn done<'a>() -> CallbackFuture<'a> {
    Box::pin(future::ready(Ok(())))
}

/// Completed leave callback that lets the transition continue
pub fn proceed<'a>() -> CallbackFuture<'a, LeaveDecision> {
    Box::pin(future::ready(Ok(LeaveDecision::Continue)))
}

/// Information handed to screen factories
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenContext {
    /// Address that led to the screen
    pub address: String,
    /// Route arguments extracted from the address
    pub args: RouteArgs,
    /// Opaque data passed by the caller of the entry point
    pub payload: Option<Value>,
    /// True when a controller is entered from a different controller
    pub begin: bool,
}

impl ScreenContext {
    pub fn new(address: impl Into<String>, args: RouteArgs, payload: Option<Value>) -> Self {
        Self {
            address: address.into(),
            args,
            payload,
            begin: false,
        }
    }
}

/// Page layout shared by views and controllers
///
/// Region identifiers are compared against the previous screen's; only
/// regions that differ are swapped, and the matching `*_changed` callback
/// runs with the handle the content-swap layer bound.
pub trait Layout: Send {
    /// Markup key overriding the routed view identifier
    fn view_id(&self) -> Option<&str> {
        None
    }

    fn template(&self) -> Option<&str> {
        None
    }

    fn head(&self) -> Option<&str> {
        None
    }

    fn header(&self) -> Option<&str> {
        None
    }

    fn footer(&self) -> Option<&str> {
        None
    }

    /// Inline markup used when the registry has none for this screen
    fn markup(&self) -> Option<String> {
        None
    }

    /// Per-screen animation classes, overriding the navigator's
    fn animation(&self) -> Option<&AnimationSelector> {
        None
    }

    fn template_changed(&mut self, _bound: Value) -> CallbackFuture<'_> {
        done()
    }

    fn head_changed(&mut self, _bound: Value) -> CallbackFuture<'_> {
        done()
    }

    fn header_changed(&mut self, _bound: Value) -> CallbackFuture<'_> {
        done()
    }

    fn footer_changed(&mut self, _bound: Value) -> CallbackFuture<'_> {
        done()
    }
}

/// A routed or stacked view
pub trait View: Layout {
    /// Before the markup is swapped in
    fn before<'a>(&'a mut self, _args: &'a RouteArgs) -> CallbackFuture<'a> {
        done()
    }

    /// First enter callback, after the open animation starts
    fn render_before<'a>(&'a mut self, _args: &'a RouteArgs) -> CallbackFuture<'a> {
        done()
    }

    /// Entered by forward navigation
    fn next<'a>(&'a mut self, _args: &'a RouteArgs) -> CallbackFuture<'a> {
        done()
    }

    /// Entered by backward navigation
    fn back<'a>(&'a mut self, _args: &'a RouteArgs) -> CallbackFuture<'a> {
        done()
    }

    /// Entered in either direction; also the only callback a stacked view gets
    fn handle<'a>(&'a mut self, _args: &'a RouteArgs) -> CallbackFuture<'a> {
        done()
    }

    fn render_after<'a>(&'a mut self, _args: &'a RouteArgs) -> CallbackFuture<'a> {
        done()
    }

    fn leave(&mut self) -> CallbackFuture<'_, LeaveDecision> {
        proceed()
    }

    fn leave_back(&mut self) -> CallbackFuture<'_, LeaveDecision> {
        proceed()
    }

    fn leave_next(&mut self) -> CallbackFuture<'_, LeaveDecision> {
        proceed()
    }

    /// Stacked view is being closed; the value is used when the closer
    /// supplied none
    fn stack_closed(&mut self) -> CallbackFuture<'_, Option<Value>> {
        Box::pin(future::ready(Ok(None)))
    }
}

/// A controller handling one or more actions
pub trait Controller: Layout {
    /// Before the markup for `action` is swapped in
    fn before_action<'a>(&'a mut self, _action: &'a str, _args: &'a RouteArgs) -> CallbackFuture<'a> {
        done()
    }

    /// After the markup for `action` is swapped in
    fn action<'a>(&'a mut self, _action: &'a str, _args: &'a RouteArgs) -> CallbackFuture<'a> {
        done()
    }

    fn leave<'a>(&'a mut self, _action: &'a str) -> CallbackFuture<'a, LeaveDecision> {
        proceed()
    }

    fn leave_back<'a>(&'a mut self, _action: &'a str) -> CallbackFuture<'a, LeaveDecision> {
        proceed()
    }

    fn leave_next<'a>(&'a mut self, _action: &'a str) -> CallbackFuture<'a, LeaveDecision> {
        proceed()
    }
}
