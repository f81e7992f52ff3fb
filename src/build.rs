//! The build orchestrator.
//!
//! [`Builder`] sequences one complete build run, strictly sequentially:
//!
//! ```text
//! Clear(build_dir) → Seed(route scan) → MirrorAssets → DrainQueue → Sitemap
//! ```
//!
//! The drain loop is where discovery feeds back: rendering a page may push
//! new URLs into the queue through the resolver, and the loop only ends when
//! nothing pending remains. Termination therefore depends on the reachable
//! URL graph being finite; `max_pages` turns an unbounded graph into a
//! reported error instead of a hang.
//!
//! Every failure inside the drain is fatal. There are no retries and no
//! skips: a single page failure fails the run, leaving the partially-written
//! output tree on disk for inspection.

use crate::config::{BuildConfig, ConfigError};
use crate::materialize;
use crate::mirror::{self, MirrorError};
use crate::queue::{QueueError, QueueHandle};
use crate::render::{CONTENT_PROPERTY, ContentTransform, PageProps, PageRequest, RequestHandler};
use crate::resolve::{ResolveError, UrlForm, UrlResolver};
use crate::route::RouteTable;
use crate::sitemap::Sitemap;
use chrono::Utc;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("resolver error: {0}")]
    Resolve(#[from] ResolveError),
    #[error("failed to clear build dir '{path}': {source}")]
    Clear {
        path: PathBuf,
        source: io::Error,
    },
    #[error("asset mirror failed: {0}")]
    Mirror(#[from] MirrorError),
    #[error("could not build url '{url}'")]
    Render {
        url: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: io::Error,
    },
    #[error("page queue invariant violated: {0}")]
    Queue(#[from] QueueError),
    #[error("failed to write sitemap: {0}")]
    Sitemap(io::Error),
    #[error("page limit exceeded: more than {limit} pages discovered")]
    PageLimitExceeded { limit: usize },
}

/// Counts from a completed build run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Pages rendered and written, seeds and discoveries alike.
    pub pages_built: usize,
    /// URLs seeded from the route scan before any rendering.
    pub seed_urls: usize,
    /// Files placed by the asset mirror.
    pub assets_copied: usize,
    /// Whether `sitemap.xml` was emitted.
    pub sitemap_written: bool,
}

/// Orchestrates one build run against an application's routes and handler.
pub struct Builder<H: RequestHandler> {
    config: BuildConfig,
    routes: Arc<RouteTable>,
    handler: H,
    transforms: Vec<Box<dyn ContentTransform>>,
}

impl<H: RequestHandler> Builder<H> {
    pub fn new(config: BuildConfig, routes: RouteTable, handler: H) -> Self {
        Self {
            config,
            routes: Arc::new(routes),
            handler,
            transforms: Vec::new(),
        }
    }

    /// Register a post-processing transform. Transforms run in registration
    /// order on every rendered page, before it is written.
    pub fn transform(mut self, transform: impl ContentTransform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Run the full build: clear, seed, mirror, drain, sitemap.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        self.config.validate()?;

        let queue = QueueHandle::new();
        let resolver = UrlResolver::new(
            Arc::clone(&self.routes),
            queue.clone(),
            &self.config.scheme,
            &self.config.host,
        )?;

        self.clear()?;

        let seed_urls = self.seed(&resolver);
        info!(seed_urls, "seeded page queue from route table");

        let assets_copied = if self.config.expose {
            let copied = mirror::mirror_assets(&self.config.files_to_copy, &self.config.build_dir)?;
            info!(copied, "mirrored assets");
            copied
        } else {
            0
        };

        let mut sitemap = Sitemap::new();
        let pages_built = self.drain(&queue, &resolver, &mut sitemap)?;
        info!(pages_built, "page queue drained");

        let sitemap_written = if self.config.sitemap {
            let path = sitemap
                .write(&self.config.build_dir)
                .map_err(BuildError::Sitemap)?;
            info!(path = %path.display(), "wrote sitemap");
            true
        } else {
            false
        };

        Ok(BuildReport {
            pages_built,
            seed_urls,
            assets_copied,
            sitemap_written,
        })
    }

    /// Destroy and recreate the output tree. Every build is from scratch;
    /// there is no resume.
    fn clear(&self) -> Result<(), BuildError> {
        let path = &self.config.build_dir;
        let wrap = |source| BuildError::Clear {
            path: path.clone(),
            source,
        };
        if path.exists() {
            fs::remove_dir_all(path).map_err(wrap)?;
        }
        fs::create_dir_all(path).map_err(wrap)
    }

    /// Scan the route table and enqueue every candidate that resolves
    /// without parameters. Unresolvable candidates are skips, not errors:
    /// they may still be reached through discovery.
    fn seed(&self, resolver: &UrlResolver) -> usize {
        let mut seeded = 0;
        for route in self.routes.seed_candidates() {
            match resolver.resolve(&route.name, &[], UrlForm::Absolute) {
                Ok(url) => {
                    debug!(route = %route.name, %url, "seeded");
                    seeded += 1;
                }
                Err(reason) => {
                    debug!(route = %route.name, %reason, "route not statically seedable");
                }
            }
        }
        seeded
    }

    fn drain(
        &self,
        queue: &QueueHandle,
        resolver: &UrlResolver,
        sitemap: &mut Sitemap,
    ) -> Result<usize, BuildError> {
        let mut built = 0;
        while let Some(url) = queue.next() {
            if let Some(limit) = self.config.max_pages {
                if built >= limit {
                    return Err(BuildError::PageLimitExceeded { limit });
                }
            }
            self.build_page(&url, resolver)?;
            queue.mark_done(&url)?;
            sitemap.add(url.as_str(), Utc::now());
            built += 1;
        }
        Ok(built)
    }

    /// Render one URL, run transforms, and materialize the result.
    fn build_page(&self, url: &str, resolver: &UrlResolver) -> Result<(), BuildError> {
        let render_err = |source: anyhow::Error| BuildError::Render {
            url: url.to_string(),
            source,
        };

        let parsed = Url::parse(url).map_err(|e| render_err(e.into()))?;
        let request = PageRequest::new(parsed);

        let outcome = self.handler.handle(&request, resolver);
        // The teardown hook runs whether handling succeeded or not.
        self.handler.finalize(&request, outcome.as_ref());
        let page = outcome.map_err(render_err)?;

        let mut props = PageProps::new();
        props.insert(CONTENT_PROPERTY.to_string(), page.body);
        for transform in &self.transforms {
            transform
                .apply(&mut props, request.url())
                .map_err(render_err)?;
        }
        let body = props
            .remove(CONTENT_PROPERTY)
            .ok_or_else(|| render_err(anyhow::anyhow!("a transform removed the page body")))?;

        let (dir, filename) = materialize::url_to_path(request.path());
        let target = self.config.build_dir.join(&dir).join(&filename);
        materialize::write(&self.config.build_dir, &dir, &filename, &body).map_err(|source| {
            BuildError::Write {
                path: target.clone(),
                source,
            }
        })?;
        debug!(%url, path = %target.display(), "built page");
        Ok(())
    }
}
