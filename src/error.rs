//! Error handling for the navigator
//!
//! Two layers: [`NavigationOutcome`] describes how an entry point ended when
//! nothing went structurally wrong (including vetoes and refusals, which are
//! not errors), and [`NavigationError`] is raised for structural failures
//! that abort a transition.

use std::fmt;
use thiserror::Error;

/// Boxed error returned by screen callbacks and collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// Navigation Outcome
// ============================================================================

/// Why an entry point returned without doing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusalReason {
    /// The navigator is locked.
    Locked,
    /// A backward transition is in flight.
    BackInFlight,
    /// A render sequence is in flight.
    Busy,
}

impl fmt::Display for RefusalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RefusalReason::Locked => "navigation is locked",
            RefusalReason::BackInFlight => "a backward transition is in flight",
            RefusalReason::Busy => "a transition is in flight",
        };
        f.write_str(text)
    }
}

/// Result of a navigation attempt that did not fail structurally.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// The new screen is displayed.
    Completed { address: String },
    /// The address bar was updated; the host drives rendering.
    Deferred { address: String },
    /// A leave callback returned [`LeaveDecision::Veto`](crate::LeaveDecision::Veto).
    Vetoed,
    /// The entry point was a no-op.
    Refused(RefusalReason),
    /// No route matched; `fallback` tells whether the fallback view was shown.
    NotFound { address: String, fallback: bool },
}

impl NavigationOutcome {
    /// Check if the navigation went through (now or deferred to the host)
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            NavigationOutcome::Completed { .. } | NavigationOutcome::Deferred { .. }
        )
    }

    /// Check if a leave callback vetoed the transition
    pub fn is_vetoed(&self) -> bool {
        matches!(self, NavigationOutcome::Vetoed)
    }

    /// Check if the entry point was refused
    pub fn is_refused(&self) -> bool {
        matches!(self, NavigationOutcome::Refused(_))
    }

    /// Check if the address did not match any route
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationOutcome::NotFound { .. })
    }

    /// Refusal reason, if refused
    pub fn refusal(&self) -> Option<RefusalReason> {
        match self {
            NavigationOutcome::Refused(reason) => Some(*reason),
            _ => None,
        }
    }
}

// ============================================================================
// Navigation Errors
// ============================================================================

/// Kind of screen looked up in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    View,
    Controller,
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenKind::View => f.write_str("view"),
            ScreenKind::Controller => f.write_str("controller"),
        }
    }
}

/// Structural failures that abort a transition.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// No route matches and no fallback view is configured
    #[error("route not found: {address}")]
    RouteNotFound { address: String },

    /// The registry has no factory for the resolved screen
    #[error("{kind} '{name}' is not registered")]
    MissingScreen { kind: ScreenKind, name: String },

    /// A screen callback or collaborator failed
    #[error("{phase} failed: {source}")]
    Callback {
        phase: &'static str,
        #[source]
        source: BoxError,
    },

    /// Route or navigator configuration could not be read
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The stacked screen went away before it was closed
    #[error("stacked screen was dropped before it was closed")]
    StackAborted,
}

impl NavigationError {
    pub(crate) fn callback(phase: &'static str, source: BoxError) -> Self {
        NavigationError::Callback { phase, source }
    }

    pub(crate) fn missing(kind: ScreenKind, name: impl Into<String>) -> Self {
        NavigationError::MissingScreen {
            kind,
            name: name.into(),
        }
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationError::RouteNotFound { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
