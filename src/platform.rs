//! Platform contract
//!
//! The address bar, the native history and timers belong to the host. Web
//! routed navigators mirror addresses into the fragment and let the host
//! report changes back through [`Navigator::address_changed`].
//!
//! [`Navigator::address_changed`]: crate::Navigator::address_changed

use futures::future::{self, BoxFuture};
use parking_lot::Mutex;
use std::time::Duration;

/// Host services the navigator depends on
pub trait Platform: Send + Sync {
    /// Current address-bar fragment without the leading `#`
    fn fragment(&self) -> Option<String>;

    /// Replace the address-bar fragment (empty clears it)
    fn set_fragment(&self, fragment: &str);

    /// Native history back by one step
    fn history_back(&self);

    /// Suspend for `duration`
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// In-memory platform for headless hosts and tests
///
/// Records fragment writes and back requests; `sleep` completes at once.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    fragment: Mutex<Option<String>>,
    fragments: Mutex<Vec<String>>,
    backs: Mutex<usize>,
    slept: Mutex<Vec<Duration>>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a fragment already in the address bar
    pub fn with_fragment(fragment: impl Into<String>) -> Self {
        let platform = Self::default();
        *platform.fragment.lock() = Some(fragment.into());
        platform
    }

    /// Every fragment written, oldest first
    pub fn fragments(&self) -> Vec<String> {
        self.fragments.lock().clone()
    }

    /// Number of native back requests
    pub fn back_count(&self) -> usize {
        *self.backs.lock()
    }

    /// Every requested sleep
    pub fn sleeps(&self) -> Vec<Duration> {
        self.slept.lock().clone()
    }
}

impl Platform for HeadlessPlatform {
    fn fragment(&self) -> Option<String> {
        self.fragment.lock().clone().filter(|fragment| !fragment.is_empty())
    }

    fn set_fragment(&self, fragment: &str) {
        *self.fragment.lock() = Some(fragment.to_string());
        self.fragments.lock().push(fragment.to_string());
    }

    fn history_back(&self) {
        *self.backs.lock() += 1;
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        self.slept.lock().push(duration);
        Box::pin(future::ready(()))
    }
}
