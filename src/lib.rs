//! # Petrify
//!
//! Turn a dynamically-routed application into a fully static, file-based
//! mirror. Petrify discovers every reachable page of an application, renders
//! each one through the application's own request-handling entry point, and
//! writes the results to disk as a plain file tree — ready to be served
//! without a running application process.
//!
//! # Architecture: Crawl-and-Materialize Pipeline
//!
//! One build run is a single sequential pass:
//!
//! ```text
//! Clear → Seed → Mirror assets → Drain queue → Sitemap
//! ```
//!
//! - **Seed**: the route table is scanned for routes that are visible and
//!   resolvable without parameters; each resolved URL enters the page queue.
//! - **Drain**: pages are rendered one at a time. Any URL the application
//!   generates *while rendering* (through the discovery-aware [`UrlResolver`])
//!   is enqueued as a side effect, so link generation doubles as graph-edge
//!   discovery. The loop ends when no pending page remains.
//! - **Materialize**: each rendered body lands at a stable on-disk location
//!   derived from its URL path (`/blog` → `blog/index.html`, `/feed.xml` →
//!   `feed.xml`).
//!
//! Pages reachable only through runtime parameters (say `/post/{id}`) cannot
//! be seeded from the route table, but are still built the moment any other
//! page links to a concrete instance.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`build`] | The [`Builder`] orchestrator — sequences a whole build run |
//! | [`queue`] | Deduplicating work list of discovered-but-unbuilt URLs |
//! | [`route`] | Route records and the visible/GET-resolvable catalog filter |
//! | [`resolve`] | Discovery-aware URL generation over the route table |
//! | [`render`] | The render boundary: [`RequestHandler`] trait and page transforms |
//! | [`materialize`] | URL-to-file-path policy and file persistence |
//! | [`mirror`] | Copies configured assets into the output tree before rendering |
//! | [`sitemap`] | Accumulates built pages and emits `sitemap.xml` |
//! | [`config`] | `build.toml` loading, defaults, and validation |
//!
//! # Design Decisions
//!
//! ## The Queue Is an Explicit Handle
//!
//! The page queue is mutated from two places: the orchestrator (seeding and
//! draining) and the URL resolver (discovery, deep inside application render
//! code). Rather than ambient global state, both receive a cloned
//! [`QueueHandle`] at construction time, so the queue can be substituted and
//! inspected in isolation.
//!
//! ## Discovery Is a Wrapper, Not a Crawler
//!
//! Petrify never parses rendered HTML looking for links. Instead, the
//! application generates its links through [`UrlResolver::resolve`], which
//! records the absolute form of every URL it hands out. Any code path that
//! produces a URL during a render is presumed reachable and will be built.
//! The resolver is transparent to callers apart from that side effect.
//!
//! ## Failures Are Fatal
//!
//! A build either completes with a fully consistent output tree or aborts
//! with an error naming the offending URL or path. No per-page retries, no
//! best-effort partial output: a half-built mirror that looks successful is
//! worse than a loud failure.
//!
//! ## No Binary
//!
//! The render boundary is the embedding application; a standalone executable
//! would have nothing to render. Applications drive a build by constructing
//! a [`Builder`] with their route table and a [`RequestHandler`]
//! implementation.
//!
//! # Example
//!
//! ```no_run
//! use petrify::{
//!     BuildConfig, Builder, PageRequest, RenderedPage, RequestHandler, Route, RouteTable,
//!     UrlResolver,
//! };
//!
//! struct App;
//!
//! impl RequestHandler for App {
//!     fn handle(&self, request: &PageRequest, _urls: &UrlResolver) -> anyhow::Result<RenderedPage> {
//!         Ok(RenderedPage::new(format!("<h1>{}</h1>", request.path())))
//!     }
//! }
//!
//! let routes = RouteTable::new(vec![Route::new("home", "/")]);
//! let report = Builder::new(BuildConfig::new("dist"), routes, App).build()?;
//! assert_eq!(report.pages_built, 1);
//! # Ok::<(), petrify::BuildError>(())
//! ```

pub mod build;
pub mod config;
pub mod materialize;
pub mod mirror;
pub mod queue;
pub mod render;
pub mod resolve;
pub mod route;
pub mod sitemap;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use build::{BuildError, BuildReport, Builder};
pub use config::{BuildConfig, ConfigError, CopySpec};
pub use queue::{PageQueue, PageState, QueueError, QueueHandle};
pub use render::{
    CONTENT_PROPERTY, ContentTransform, PageProps, PageRequest, RenderedPage, RequestHandler,
};
pub use resolve::{ResolveError, UrlForm, UrlResolver};
pub use route::{Method, Route, RouteTable};
pub use sitemap::{Sitemap, SitemapEntry};
