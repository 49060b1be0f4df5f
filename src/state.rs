//! Navigator state management
//!
//! [`NavigationState`] holds the transition flags that gate every entry
//! point. [`NavigationContext`] remembers which screen is on display and
//! which page regions it bound, so the next transition can leave it and
//! skip regions that did not change.

use crate::error::RefusalReason;
use crate::lifecycle::{Controller, Layout, View};
use crate::render::{Region, RegionUpdate};
use crate::transition::AnimationSelector;
use crate::NavigationDirection;
use std::fmt;

/// Transition flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationState {
    /// A backward transition is in flight
    pub is_back: bool,
    /// All entry points are disabled
    pub lock: bool,
    /// A render sequence is in flight
    pub rendering: bool,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_next(&self) -> bool {
        !self.is_back
    }

    pub fn direction(&self) -> NavigationDirection {
        if self.is_back {
            NavigationDirection::Back
        } else {
            NavigationDirection::Forward
        }
    }

    /// Why a new transition may not start right now
    pub fn refusal(&self) -> Option<RefusalReason> {
        if self.lock {
            Some(RefusalReason::Locked)
        } else if self.is_back {
            Some(RefusalReason::BackInFlight)
        } else if self.rendering {
            Some(RefusalReason::Busy)
        } else {
            None
        }
    }
}

/// The screen currently on display
pub enum ActiveScreen {
    View {
        name: String,
        view: Box<dyn View>,
    },
    Controller {
        name: String,
        action: String,
        controller: Box<dyn Controller>,
        /// The action's own view, when one is registered
        view: Option<Box<dyn View>>,
    },
}

impl ActiveScreen {
    /// View identifier of the screen
    pub fn view_id(&self) -> String {
        match self {
            ActiveScreen::View { name, view } => {
                view.view_id().map_or_else(|| name.clone(), str::to_string)
            }
            ActiveScreen::Controller {
                name,
                action,
                controller,
                ..
            } => controller
                .view_id()
                .map_or_else(|| format!("{}/{}", name, action), str::to_string),
        }
    }

    /// Animation classes the screen overrides
    pub fn animation(&self) -> Option<&AnimationSelector> {
        match self {
            ActiveScreen::View { view, .. } => view.animation(),
            ActiveScreen::Controller { controller, .. } => controller.animation(),
        }
    }

    pub fn controller_name(&self) -> Option<&str> {
        match self {
            ActiveScreen::View { .. } => None,
            ActiveScreen::Controller { name, .. } => Some(name),
        }
    }
}

impl fmt::Debug for ActiveScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveScreen::View { name, .. } => {
                f.debug_struct("View").field("name", name).finish_non_exhaustive()
            }
            ActiveScreen::Controller {
                name, action, view, ..
            } => f
                .debug_struct("Controller")
                .field("name", name)
                .field("action", action)
                .field("has_view", &view.is_some())
                .finish_non_exhaustive(),
        }
    }
}

/// Region identifiers bound by the previous screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSlots {
    pub template: Option<String>,
    pub head: Option<String>,
    pub header: Option<String>,
    pub footer: Option<String>,
}

impl RegionSlots {
    /// Record `layout`'s regions and return those that changed
    ///
    /// A screen without a template forgets the previous one but does not
    /// clear it; head, header and footer are cleared when the new screen has
    /// none.
    pub fn update<L: Layout + ?Sized>(&mut self, layout: &L) -> Vec<RegionUpdate> {
        let mut changes = Vec::new();

        match layout.template() {
            Some(template) if self.template.as_deref() != Some(template) => {
                self.template = Some(template.to_string());
                changes.push(RegionUpdate {
                    region: Region::Template,
                    name: Some(template.to_string()),
                });
            }
            Some(_) => {}
            None => self.template = None,
        }

        let others = [
            (Region::Head, &mut self.head, layout.head()),
            (Region::Header, &mut self.header, layout.header()),
            (Region::Footer, &mut self.footer, layout.footer()),
        ];
        for (region, slot, next) in others {
            if slot.as_deref() != next {
                *slot = next.map(str::to_string);
                changes.push(RegionUpdate {
                    region,
                    name: slot.clone(),
                });
            }
        }

        changes
    }
}

/// What the navigator knows about the page
#[derive(Debug, Default)]
pub struct NavigationContext {
    pub active: Option<ActiveScreen>,
    /// Address of the screen on display
    pub address: Option<String>,
    /// Controller of the last controller route, for begin detection
    pub previous_controller: Option<String>,
    pub regions: RegionSlots,
}

impl NavigationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether entering `controller` starts a new controller
    pub fn begins(&self, controller: &str) -> bool {
        self.previous_controller.as_deref() != Some(controller)
    }
}
