//! Sitemap accumulation and emission.
//!
//! Every page the drain loop completes is appended here as URL plus
//! last-modified timestamp; after the drain, one fixed sitemap.org `urlset`
//! document is written to `build_dir/sitemap.xml`.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2026-08-25</lastmod>
//!   </url>
//! </urlset>
//! ```

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const SITEMAP_FILE: &str = "sitemap.xml";

/// One built page: absolute URL and completion timestamp.
#[derive(Debug, Clone)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: DateTime<Utc>,
}

/// Accumulates entries over one build run. Entries are never removed.
#[derive(Debug, Default)]
pub struct Sitemap {
    entries: Vec<SitemapEntry>,
}

impl Sitemap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, loc: impl Into<String>, lastmod: DateTime<Utc>) {
        self.entries.push(SitemapEntry {
            loc: loc.into(),
            lastmod,
        });
    }

    pub fn entries(&self) -> &[SitemapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the urlset document.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(128 + self.entries.len() * 96);
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");
        for entry in &self.entries {
            xml.push_str("  <url>\n    <loc>");
            escape_xml_into(&mut xml, &entry.loc);
            xml.push_str("</loc>\n    <lastmod>");
            xml.push_str(&entry.lastmod.format("%Y-%m-%d").to_string());
            xml.push_str("</lastmod>\n  </url>\n");
        }
        xml.push_str("</urlset>\n");
        xml
    }

    /// Write `sitemap.xml` into the build dir. Returns the written path.
    pub fn write(&self, build_dir: &Path) -> io::Result<PathBuf> {
        let path = build_dir.join(SITEMAP_FILE);
        fs::write(&path, self.to_xml())?;
        Ok(path)
    }
}

fn escape_xml_into(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}
