//! Screen transition animations
//!
//! The navigator does not animate anything itself. It tells the content-swap
//! layer which CSS classes to toggle when the outgoing screen closes and the
//! incoming one opens. Classes are chosen per navigation direction; a screen
//! can override any class the navigator configuration sets.

use crate::NavigationDirection;
use serde::{Deserialize, Serialize};

/// Which half of a transition is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationPhase {
    /// Outgoing screen: add the close class, remove the open class
    Close,
    /// Incoming screen: remove the close class, add the open class
    Open,
}

/// Open/close class pair for one direction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationClasses {
    pub open: Option<String>,
    pub close: Option<String>,
}

impl AnimationClasses {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: Some(open.into()),
            close: Some(close.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_none() && self.close.is_none()
    }

    /// Overlay `other` on top of `self`, class by class
    fn overlay(&self, other: Option<&AnimationClasses>) -> AnimationClasses {
        let Some(other) = other else {
            return self.clone();
        };
        AnimationClasses {
            open: other.open.clone().or_else(|| self.open.clone()),
            close: other.close.clone().or_else(|| self.close.clone()),
        }
    }

    /// Classes to add and remove for a phase
    pub fn toggles(&self, phase: AnimationPhase) -> (Option<&str>, Option<&str>) {
        match phase {
            AnimationPhase::Close => (self.close.as_deref(), self.open.as_deref()),
            AnimationPhase::Open => (self.open.as_deref(), self.close.as_deref()),
        }
    }
}

/// Animation classes for forward and backward navigation
///
/// # Example
///
/// ```
/// use screen_navigator::{AnimationClasses, AnimationSelector, NavigationDirection};
///
/// let app = AnimationSelector::default()
///     .next(AnimationClasses::new("slide-in", "slide-out"));
/// let screen = AnimationSelector::default().next(AnimationClasses {
///     open: Some("fade-in".into()),
///     close: None,
/// });
///
/// let classes = AnimationSelector::resolve(&app, Some(&screen), NavigationDirection::Forward);
/// assert_eq!(classes.open.as_deref(), Some("fade-in"));
/// assert_eq!(classes.close.as_deref(), Some("slide-out"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSelector {
    pub next: Option<AnimationClasses>,
    pub back: Option<AnimationClasses>,
}

impl AnimationSelector {
    pub fn next(mut self, classes: AnimationClasses) -> Self {
        self.next = Some(classes);
        self
    }

    pub fn back(mut self, classes: AnimationClasses) -> Self {
        self.back = Some(classes);
        self
    }

    /// Classes for a direction
    pub fn for_direction(&self, direction: NavigationDirection) -> Option<&AnimationClasses> {
        match direction {
            NavigationDirection::Back => self.back.as_ref(),
            NavigationDirection::Forward => self.next.as_ref(),
        }
    }

    /// Resolve the effective classes; the screen's classes win
    pub fn resolve(
        app: &AnimationSelector,
        screen: Option<&AnimationSelector>,
        direction: NavigationDirection,
    ) -> AnimationClasses {
        let base = app.for_direction(direction).cloned().unwrap_or_default();
        base.overlay(screen.and_then(|selector| selector.for_direction(direction)))
    }
}
