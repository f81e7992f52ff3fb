//! Shared test fixtures for the petrify test suite.
//!
//! Provides the demo route table used across modules and [`StaticApp`], a
//! small in-memory application implementing [`RequestHandler`] so build
//! tests can exercise seeding, discovery, and failure paths without a real
//! web framework.

use crate::render::{PageRequest, RenderedPage, RequestHandler};
use crate::resolve::{UrlForm, UrlResolver};
use crate::route::{Method, Route, RouteTable};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Route table exercising every catalog case: plain seeds, a file-extension
/// route, a defaulted parameter, a defaultless parameter (discovery-only),
/// an invisible route, and a non-GET route.
pub fn demo_routes() -> RouteTable {
    RouteTable::new(vec![
        Route::new("home", "/"),
        Route::new("feed", "/feed.xml"),
        Route::new("docs", "/docs/{lang}").default_param("lang", "en"),
        Route::new("post", "/post/{id}"),
        Route::new("secret", "/secret").visible(false),
        Route::new("submit", "/contact").methods([Method::Post]),
    ])
}

type PageFn = Box<dyn Fn(&UrlResolver) -> anyhow::Result<String>>;

/// In-memory application: a map from request path to a body-producing
/// closure. Closures receive the resolver so pages can emit links and drive
/// discovery exactly like real render code would.
#[derive(Default)]
pub struct StaticApp {
    pages: HashMap<String, PageFn>,
    finalized: Arc<Mutex<Vec<String>>>,
}

impl StaticApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page with a fixed body.
    pub fn page(self, path: &str, body: &str) -> Self {
        let body = body.to_string();
        self.page_fn(path, move |_| Ok(body.clone()))
    }

    /// Register a page whose body ends with links generated through the
    /// resolver (root-relative, the way templates usually emit them).
    pub fn page_with_links(self, path: &str, body: &str, links: &[(&str, &[(&str, &str)])]) -> Self {
        let body = body.to_string();
        let links: Vec<(String, Vec<(String, String)>)> = links
            .iter()
            .map(|(route, params)| {
                (
                    route.to_string(),
                    params
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                )
            })
            .collect();

        self.page_fn(path, move |urls| {
            let mut out = body.clone();
            for (route, params) in &links {
                let params: Vec<(&str, &str)> = params
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                let href = urls.resolve(route, &params, UrlForm::RootRelative)?;
                out.push_str(&format!("\n<a href=\"{href}\">{route}</a>"));
            }
            Ok(out)
        })
    }

    /// Register a page rendered by an arbitrary closure.
    pub fn page_fn(
        mut self,
        path: &str,
        render: impl Fn(&UrlResolver) -> anyhow::Result<String> + 'static,
    ) -> Self {
        self.pages.insert(path.to_string(), Box::new(render));
        self
    }

    /// Register a page whose render always fails.
    pub fn failing(self, path: &str) -> Self {
        let path_owned = path.to_string();
        self.page_fn(path, move |_| {
            anyhow::bail!("render blew up for '{path_owned}'")
        })
    }

    /// Register `/post/{id}` linking to `/post/{next}` — building blocks for
    /// an unbounded discovery chain.
    pub fn chained_post(self, id: String, next: String) -> Self {
        let path = format!("/post/{id}");
        self.page_fn(&path, move |urls| {
            let href = urls.resolve("post", &[("id", next.as_str())], UrlForm::RootRelative)?;
            Ok(format!("post {id}\n<a href=\"{href}\">next</a>"))
        })
    }

    /// Handle to the list of request paths `finalize` has seen.
    pub fn finalized_paths(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.finalized)
    }
}

impl RequestHandler for StaticApp {
    fn handle(&self, request: &PageRequest, urls: &UrlResolver) -> anyhow::Result<RenderedPage> {
        let render = self
            .pages
            .get(request.path())
            .ok_or_else(|| anyhow::anyhow!("no page registered for path '{}'", request.path()))?;
        Ok(RenderedPage::new(render(urls)?))
    }

    fn finalize(&self, request: &PageRequest, _outcome: Result<&RenderedPage, &anyhow::Error>) {
        self.finalized.lock().push(request.path().to_string());
    }
}
