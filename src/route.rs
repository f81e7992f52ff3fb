//! Route records and the static-seed catalog filter.
//!
//! The route table is a read-only snapshot of the embedding application's
//! routing declarations, taken once at build time. Petrify never mutates it;
//! it only asks two questions:
//!
//! - which routes are candidates for seeding the crawl (visible and
//!   retrievable with a plain GET), and
//! - what is the path pattern and parameter set of a named route, so the
//!   [`resolver`](crate::resolve) can turn it into a URL.
//!
//! ## Patterns
//!
//! Path patterns use `{name}` placeholders: `/post/{id}`, `/{lang}/about`.
//! A placeholder is filled from caller-supplied parameters first, then from
//! the route's declared defaults. A route whose every placeholder has a
//! default is seedable; one with a defaultless placeholder is skipped at
//! seed time and only built if discovered through a concrete link.

use std::collections::{BTreeMap, HashMap};

/// HTTP methods a route accepts. An empty method set on a [`Route`] means
/// "any method", which includes GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

/// One routing declaration from the embedding application.
#[derive(Debug, Clone)]
pub struct Route {
    /// Stable identifier used by link-generating code (`resolve("post", …)`).
    pub name: String,
    /// Path pattern with `{name}` placeholders.
    pub pattern: String,
    /// Accepted methods. Empty means unrestricted.
    pub methods: Vec<Method>,
    /// Non-visible routes never seed the crawl, whatever their pattern.
    pub visible: bool,
    /// Default values for placeholders, applied when the caller supplies none.
    pub defaults: BTreeMap<String, String>,
}

impl Route {
    /// A visible, method-unrestricted route. Adjust with the chainable
    /// setters below.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            methods: Vec::new(),
            visible: true,
            defaults: BTreeMap::new(),
        }
    }

    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn default_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Whether a plain GET can retrieve this route.
    pub fn is_gettable(&self) -> bool {
        self.methods.is_empty() || self.methods.contains(&Method::Get)
    }

    /// Placeholder names in pattern order.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.pattern.as_str();
        while let Some(open) = rest.find('{') {
            match rest[open..].find('}') {
                Some(close) => {
                    names.push(&rest[open + 1..open + close]);
                    rest = &rest[open + close + 1..];
                }
                None => break,
            }
        }
        names
    }
}

/// Ordered, name-indexed collection of routes.
///
/// Declaration order is preserved because it determines seed order. A later
/// route with a duplicate name shadows the earlier one for lookup, matching
/// how application routers typically override.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    by_name: HashMap<String, usize>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        let mut by_name = HashMap::with_capacity(routes.len());
        for (idx, route) in routes.iter().enumerate() {
            by_name.insert(route.name.clone(), idx);
        }
        Self { routes, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&Route> {
        self.by_name.get(name).map(|&i| &self.routes[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The catalog filter: routes eligible to seed the crawl, in declaration
    /// order. Eligibility here is visibility + gettability only; whether the
    /// route actually resolves without parameters is decided at seed time
    /// (an unresolvable candidate is a skip, not an error).
    pub fn seed_candidates(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(|r| r.visible && r.is_gettable())
    }
}
