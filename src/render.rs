//! Content-swap contract
//!
//! The navigator decides *what* is shown; a [`ContentSwap`] implementation
//! (typically a DOM layer) decides *how*. It receives fully resolved render
//! requests and reports which page regions it actually bound.

use crate::error::BoxError;
use crate::transition::{AnimationClasses, AnimationPhase};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Page regions outside the main content area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Template,
    Head,
    Header,
    Footer,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Template => "template",
            Region::Head => "head",
            Region::Header => "header",
            Region::Footer => "footer",
        };
        f.write_str(name)
    }
}

/// A region whose identifier differs from the previous screen's
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionUpdate {
    pub region: Region,
    /// Identifier to bind, or `None` to clear the region
    pub name: Option<String>,
}

/// Everything needed to materialize a screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRequest {
    /// View identifier the markup belongs to
    pub view: String,
    /// Markup for the main content area
    pub markup: String,
    /// Regions that changed since the previous screen
    pub regions: Vec<RegionUpdate>,
}

impl RenderRequest {
    pub fn region(&self, region: Region) -> Option<&RegionUpdate> {
        self.regions.iter().find(|update| update.region == region)
    }
}

/// What the content-swap layer did with a [`RenderRequest`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwapReport {
    /// Regions that were bound, with the handle passed to `*_changed`
    pub bound: Vec<(Region, Value)>,
}

impl SwapReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, region: Region, handle: Value) -> Self {
        self.bound.push((region, handle));
        self
    }

    pub fn handle(&self, region: Region) -> Option<&Value> {
        self.bound
            .iter()
            .find(|(bound, _)| *bound == region)
            .map(|(_, handle)| handle)
    }
}

/// The layer that owns the actual page content
pub trait ContentSwap: Send {
    /// Apply an animation phase's class toggles to the active content
    fn toggle_animation(&mut self, phase: AnimationPhase, classes: &AnimationClasses);

    /// Replace the main content and the changed regions
    fn swap(&mut self, request: RenderRequest) -> Result<SwapReport, BoxError>;

    /// Put a stacked view's markup on top of the current content
    fn push_layer(&mut self, view: &str, markup: &str) -> Result<(), BoxError>;

    /// Remove the topmost stacked layer
    fn pop_layer(&mut self) -> Result<(), BoxError>;
}

/// Content swapper that binds every requested region and keeps nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSwap;

impl ContentSwap for NullSwap {
    fn toggle_animation(&mut self, _phase: AnimationPhase, _classes: &AnimationClasses) {}

    fn swap(&mut self, request: RenderRequest) -> Result<SwapReport, BoxError> {
        Ok(request
            .regions
            .into_iter()
            .filter_map(|update| Some((update.region, Value::String(update.name?))))
            .fold(SwapReport::new(), |report, (region, handle)| {
                report.bind(region, handle)
            }))
    }

    fn push_layer(&mut self, _view: &str, _markup: &str) -> Result<(), BoxError> {
        Ok(())
    }

    fn pop_layer(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}
