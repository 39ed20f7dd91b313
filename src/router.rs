/// Client-side routing
///
/// Views never switch screens themselves. They are handed a `Navigator`
/// and ask it to go somewhere; the application owns the concrete `Router`.

use std::fmt;
use std::str::FromStr;

use crate::state::error::ConfigError;

/// The two screens of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    /// `/`
    #[default]
    Landing,
    /// `/analyze`
    Analyzer,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Analyzer => "/analyze",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim() {
            "/" | "" => Some(Route::Landing),
            "/analyze" | "/analyze/" => Some(Route::Analyzer),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::from_path(s).ok_or_else(|| ConfigError::Route(s.to_string()))
    }
}

/// Capability to change the active route
pub trait Navigator {
    fn navigate(&mut self, route: Route);

    /// Return to the previous route; false when there is none
    fn back(&mut self) -> bool {
        false
    }
}

/// Active route plus the trail that led there
#[derive(Debug, Clone)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }
}

impl Navigator for Router {
    fn navigate(&mut self, route: Route) {
        if route == self.current {
            return;
        }
        tracing::debug!(from = %self.current, to = %route, "navigate");
        self.history.push(self.current);
        self.current = route;
    }

    fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                tracing::debug!(from = %self.current, to = %previous, "navigate back");
                self.current = previous;
                true
            }
            None => false,
        }
    }
}
