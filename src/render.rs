//! The render boundary.
//!
//! Rendering a page means handing a synthetic GET request to the embedding
//! application's request-handling entry point and getting a body back. That
//! entry point is opaque to petrify: it is whatever implements
//! [`RequestHandler`]. The handler receives the [`UrlResolver`] so that link
//! generation inside the application flows through discovery.
//!
//! Handler faults are `anyhow::Error` — an application can fail in arbitrary
//! ways and petrify only needs the cause chain, which the orchestrator wraps
//! with the offending URL as a fatal build error.
//!
//! ## Post-processing
//!
//! Before a rendered body is written to disk it passes through the registered
//! [`ContentTransform`]s as a mutable property map ([`PageProps`]), with the
//! body under [`CONTENT_PROPERTY`]. External transforms (an asset-URL
//! rewriter, a minifier) mutate the map in place; they are content plumbing,
//! not part of the crawl state machine.

use crate::resolve::UrlResolver;
use std::collections::BTreeMap;
use url::Url;

/// Property key the rendered body is stored under in [`PageProps`].
pub const CONTENT_PROPERTY: &str = "content";

/// Named string properties of a rendered page, mutable by transforms.
pub type PageProps = BTreeMap<String, String>;

/// A synthetic GET request for one absolute URL.
#[derive(Debug, Clone)]
pub struct PageRequest {
    url: Url,
}

impl PageRequest {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The logical request path, which decides where the rendered file is
    /// placed (`/blog/post-1/` → `blog/post-1/index.html`).
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

/// A successfully rendered response body.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub body: String,
}

impl RenderedPage {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

/// The application's request-handling entry point.
///
/// `handle` is called once per queued URL, strictly sequentially. Everything
/// it does is a single blocking call from petrify's perspective; a handler
/// that never returns stalls the build.
pub trait RequestHandler {
    /// Render the page for `request`. Links the page emits must be generated
    /// through `urls` so they are discovered and built in turn.
    fn handle(&self, request: &PageRequest, urls: &UrlResolver) -> anyhow::Result<RenderedPage>;

    /// Per-request teardown. Runs after `handle` for every request, whether
    /// rendering succeeded or failed, so the application can flush resources.
    fn finalize(&self, request: &PageRequest, outcome: Result<&RenderedPage, &anyhow::Error>) {
        let _ = (request, outcome);
    }
}

/// A named, in-place mutation of a rendered page's properties, applied after
/// rendering and before materialization. A transform error aborts the build
/// the same way a render failure does.
pub trait ContentTransform {
    fn apply(&self, props: &mut PageProps, url: &Url) -> anyhow::Result<()>;
}
