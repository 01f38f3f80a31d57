//! Search input state machine: keystrokes in, at most one navigation out.

use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub const MIN_TERM_CHARS: usize = 2;
pub const MAX_TERM_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    pub path: String,
}

// A submission that fails validation. Silent by contract: no navigation,
// no fault, the field keeps whatever was typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("search input rejected")]
pub struct Rejected;

// Push-style navigation primitive. The controller requests route changes
// through it and never touches history itself.
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

// Production navigator: the request is logged here and the surrounding
// layer turns the returned intent into an actual redirect.
#[derive(Debug, Default, Clone)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn push(&self, path: &str) {
        debug!("Navigation requested to {}", path);
    }
}

// Owns the raw input and its validity; the two only change together, so
// is_valid always reflects the current text.
pub struct SearchController {
    navigator: Arc<dyn Navigator>,
    raw_input: String,
    is_valid: bool,
}

impl SearchController {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            navigator,
            raw_input: String::new(),
            is_valid: false,
        }
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    // A keystroke replaces the input and revalidates. Nothing else: no
    // navigation, no network.
    pub fn on_change(&mut self, value: impl Into<String>) {
        self.raw_input = value.into();
        self.is_valid = term_is_valid(&self.raw_input);
    }

    // A valid submission navigates exactly once and clears the field;
    // submitting again without typing is a no-op because the now-empty
    // input fails the minimum length.
    pub fn on_submit(&mut self) -> Result<NavigationIntent, Rejected> {
        if !self.is_valid {
            return Err(Rejected);
        }
        let term = self.raw_input.trim().to_string();
        let intent = NavigationIntent {
            path: search_path(&term),
        };
        self.navigator.push(&intent.path);
        self.raw_input.clear();
        self.is_valid = false;
        Ok(intent)
    }
}

// Trimmed Unicode-scalar count within the accepted range, both ends
// inclusive.
pub fn term_is_valid(input: &str) -> bool {
    let count = input.trim().chars().count();
    (MIN_TERM_CHARS..=MAX_TERM_CHARS).contains(&count)
}

pub fn search_path(term: &str) -> String {
    format!("/search/{}", urlencoding::encode(term))
}
