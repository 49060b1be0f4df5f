//! Positional route arguments
//!
//! Parameters are extracted from `{name}` / `{name?}` segments in pattern
//! order and handed to lifecycle callbacks as a list, not a map.

use serde::{Deserialize, Serialize};

/// Values extracted from the parameter segments of a matched pattern
///
/// # Example
///
/// ```
/// use screen_navigator::RouteArgs;
///
/// // Pattern: /users/{id}/posts/{post?}
/// // Address: /users/42/posts
/// let args = RouteArgs::from(vec!["42".to_string(), String::new()]);
///
/// assert_eq!(args.get(0), Some("42"));
/// assert_eq!(args.get_as::<u32>(0), Some(42));
/// assert_eq!(args.get(1), Some(""));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteArgs {
    values: Vec<String>,
}

impl RouteArgs {
    /// Create empty arguments
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an argument by position
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Get an argument and parse it as a specific type
    ///
    /// Returns `None` if the argument doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, index: usize) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.values.get(index)?.parse().ok()
    }

    /// Append an argument
    pub fn push(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    /// All arguments in pattern order
    pub fn as_slice(&self) -> &[String] {
        &self.values
    }

    /// Iterate over arguments
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl From<Vec<String>> for RouteArgs {
    fn from(values: Vec<String>) -> Self {
        Self { values }
    }
}

impl<'a> FromIterator<&'a str> for RouteArgs {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(str::to_string).collect(),
        }
    }
}
