//! URL-to-file-path policy and file persistence.
//!
//! The mapping is what lets a plain file server reproduce the application's
//! URLs: an extensionless path is a directory serving `index.html`, a path
//! whose last segment carries an extension is a file.
//!
//! ```text
//! /                →  index.html
//! /blog            →  blog/index.html
//! /blog/post-1/    →  blog/post-1/index.html
//! /feed.xml        →  feed.xml
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Map a URL path to `(relative directory, filename)` inside the build dir.
pub fn url_to_path(url_path: &str) -> (PathBuf, String) {
    let trimmed = url_path.trim_matches('/');
    if trimmed.is_empty() {
        return (PathBuf::new(), "index.html".to_string());
    }

    let (parent, last) = match trimmed.rsplit_once('/') {
        Some((parent, last)) => (parent, last),
        None => ("", trimmed),
    };

    // A trailing slash always means directory, extension or not.
    if url_path.ends_with('/') || Path::new(last).extension().is_none() {
        (PathBuf::from(trimmed), "index.html".to_string())
    } else {
        (PathBuf::from(parent), last.to_string())
    }
}

/// Write `body` to `build_dir/dir/filename`, creating parent directories on
/// demand and overwriting any existing file. Returns the written path.
pub fn write(build_dir: &Path, dir: &Path, filename: &str, body: &str) -> io::Result<PathBuf> {
    let directory = build_dir.join(dir);
    fs::create_dir_all(&directory)?;
    let target = directory.join(filename);
    fs::write(&target, body)?;
    Ok(target)
}
