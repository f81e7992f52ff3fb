//! Discovery-aware URL generation.
//!
//! [`UrlResolver`] is the crate's version of the application's normal URL
//! generator, with one extra behavior: every URL it resolves through
//! [`UrlResolver::resolve`] is also registered in the page queue, in its
//! absolute form, before being returned in whatever form the caller asked
//! for. Link generation during rendering thereby doubles as graph-edge
//! discovery — any URL an application hands to a template while rendering is
//! presumed reachable and will itself be rendered.
//!
//! The two capabilities are explicit rather than an interface-substitution
//! trick:
//!
//! - [`resolve`](UrlResolver::resolve) — resolve *and record*: what render
//!   code uses.
//! - [`preview`](UrlResolver::preview) — resolve for display only, no side
//!   effect.
//!
//! "Route cannot be resolved without parameters" is an expected outcome, not
//! a fault, so it is a typed [`ResolveError::MissingParameter`] the seed scan
//! can match on and skip.

use crate::queue::QueueHandle;
use crate::route::{Route, RouteTable};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use url::{Position, Url};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no route named '{0}'")]
    UnknownRoute(String),
    /// Not a build failure: the seed scan treats this as "not statically
    /// seedable" and moves on.
    #[error("route '{route}' requires parameter '{param}' and declares no default for it")]
    MissingParameter { route: String, param: String },
    #[error("cannot build base URL from scheme '{scheme}' and host '{host}': {source}")]
    InvalidBase {
        scheme: String,
        host: String,
        source: url::ParseError,
    },
}

/// Which form of a URL the caller wants back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlForm {
    /// `https://example.com/post/42?draft=1`
    Absolute,
    /// `/post/42?draft=1`
    RootRelative,
}

/// Resolves route names to URLs against a fixed base, recording every
/// resolved URL in the shared page queue.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    routes: Arc<RouteTable>,
    queue: QueueHandle,
    base: Url,
}

impl UrlResolver {
    /// `scheme`/`host` form the base of every absolute URL this resolver
    /// produces; they come from the build configuration.
    pub fn new(
        routes: Arc<RouteTable>,
        queue: QueueHandle,
        scheme: &str,
        host: &str,
    ) -> Result<Self, ResolveError> {
        let base = Url::parse(&format!("{scheme}://{host}/")).map_err(|source| {
            ResolveError::InvalidBase {
                scheme: scheme.to_string(),
                host: host.to_string(),
                source,
            }
        })?;
        Ok(Self {
            routes,
            queue,
            base,
        })
    }

    /// Base URL (scheme + host) absolute resolution happens against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve a route to a URL and record the absolute form in the page
    /// queue. The queue's dedup absorbs repeats, so this is fire-and-forget.
    ///
    /// The recorded URL is always the absolute form, independent of the form
    /// returned — a page linked root-relatively is discovered all the same.
    pub fn resolve(
        &self,
        name: &str,
        params: &[(&str, &str)],
        form: UrlForm,
    ) -> Result<String, ResolveError> {
        let absolute = self.absolute(name, params)?;
        self.queue.add(absolute.as_str());
        Ok(in_form(absolute, form))
    }

    /// Resolve for display only: identical output to [`resolve`](Self::resolve),
    /// no queue side effect.
    pub fn preview(
        &self,
        name: &str,
        params: &[(&str, &str)],
        form: UrlForm,
    ) -> Result<String, ResolveError> {
        Ok(in_form(self.absolute(name, params)?, form))
    }

    fn absolute(&self, name: &str, params: &[(&str, &str)]) -> Result<Url, ResolveError> {
        let route = self
            .routes
            .get(name)
            .ok_or_else(|| ResolveError::UnknownRoute(name.to_string()))?;
        let (path, extras) = expand_pattern(route, params)?;

        let mut url = self.base.clone();
        url.set_path(&path);
        if !extras.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in extras {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

fn in_form(url: Url, form: UrlForm) -> String {
    match form {
        UrlForm::Absolute => url.into(),
        UrlForm::RootRelative => url[Position::BeforePath..].to_string(),
    }
}

/// Substitute `{name}` placeholders in a route pattern.
///
/// Values come from caller parameters first, then the route's defaults.
/// Parameters not consumed by a placeholder are returned as leftover pairs
/// for the query string, in the order given.
fn expand_pattern<'p>(
    route: &Route,
    params: &'p [(&'p str, &'p str)],
) -> Result<(String, Vec<(&'p str, &'p str)>), ResolveError> {
    let mut path = String::with_capacity(route.pattern.len());
    let mut used: HashSet<&str> = HashSet::new();
    let mut rest = route.pattern.as_str();

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        path.push_str(&rest[..open]);
        let placeholder = &rest[open + 1..open + close];

        let value = params
            .iter()
            .find(|(key, _)| *key == placeholder)
            .map(|(_, value)| *value)
            .or_else(|| route.defaults.get(placeholder).map(String::as_str))
            .ok_or_else(|| ResolveError::MissingParameter {
                route: route.name.clone(),
                param: placeholder.to_string(),
            })?;
        path.push_str(value);
        used.insert(placeholder);
        rest = &rest[open + close + 1..];
    }
    path.push_str(rest);

    let extras: Vec<(&str, &str)> = params
        .iter()
        .filter(|(key, _)| !used.contains(key))
        .copied()
        .collect();
    Ok((path, extras))
}
