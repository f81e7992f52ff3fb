//! The asset mirror.
//!
//! Copies configured source paths into the output tree before any page
//! renders, so rendered pages can reference assets that are already in
//! place. Directory sources are copied recursively minus gitignore-style
//! exclude patterns; file sources are copied as-is.
//!
//! A missing source is a warning by default and a build error only when the
//! spec says `fail_if_missing` — a deploy that silently drops a required
//! asset directory should fail loudly, an optional one should not.

use crate::config::CopySpec;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("cannot copy '{0}': the path is neither a file nor a directory")]
    AssetMissing(PathBuf),
    #[error("invalid exclude pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Execute every copy spec against the build dir. Returns the number of
/// files copied across all specs.
pub fn mirror_assets(specs: &[CopySpec], build_dir: &Path) -> Result<usize, MirrorError> {
    let mut copied = 0;
    for spec in specs {
        copied += mirror_one(spec, build_dir)?;
    }
    Ok(copied)
}

fn mirror_one(spec: &CopySpec, build_dir: &Path) -> Result<usize, MirrorError> {
    let dest = build_dir.join(spec.dest_name());

    if spec.src.is_dir() {
        let excludes = build_matcher(&spec.src, &spec.excludes)?;
        let copied = copy_tree(&spec.src, &dest, &excludes)?;
        debug!(src = %spec.src.display(), dest = %dest.display(), copied, "mirrored directory");
        return Ok(copied);
    }

    if spec.src.is_file() {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&spec.src, &dest)?;
        debug!(src = %spec.src.display(), dest = %dest.display(), "mirrored file");
        return Ok(1);
    }

    if spec.fail_if_missing {
        return Err(MirrorError::AssetMissing(spec.src.clone()));
    }
    warn!(
        src = %spec.src.display(),
        "skipping copy: the path is neither a file nor a directory"
    );
    Ok(0)
}

fn build_matcher(root: &Path, patterns: &[String]) -> Result<Gitignore, MirrorError> {
    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        builder
            .add_line(None, pattern)
            .map_err(|e| MirrorError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
    }
    builder.build().map_err(|e| MirrorError::InvalidPattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

fn copy_tree(src: &Path, dest: &Path, excludes: &Gitignore) -> Result<usize, MirrorError> {
    let mut copied = 0;
    let walker = WalkDir::new(src).into_iter().filter_entry(|entry| {
        let Ok(rel) = entry.path().strip_prefix(src) else {
            return true;
        };
        if rel.as_os_str().is_empty() {
            return true;
        }
        !excludes
            .matched_path_or_any_parents(rel, entry.file_type().is_dir())
            .is_ignore()
    });

    for entry in walker {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir yields paths under its root");
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn copies_single_file() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        touch(&src.path().join("robots.txt"), "User-agent: *");

        let spec = CopySpec::new(src.path().join("robots.txt"));
        let copied = mirror_assets(std::slice::from_ref(&spec), out.path()).unwrap();

        assert_eq!(copied, 1);
        assert_eq!(
            fs::read_to_string(out.path().join("robots.txt")).unwrap(),
            "User-agent: *"
        );
    }

    #[test]
    fn copies_directory_recursively() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        touch(&src.path().join("assets/css/site.css"), "body {}");
        touch(&src.path().join("assets/logo.svg"), "<svg/>");

        let spec = CopySpec::new(src.path().join("assets"));
        let copied = mirror_assets(std::slice::from_ref(&spec), out.path()).unwrap();

        assert_eq!(copied, 2);
        assert!(out.path().join("assets/css/site.css").is_file());
        assert!(out.path().join("assets/logo.svg").is_file());
    }

    #[test]
    fn excludes_filter_directory_copy() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        touch(&src.path().join("assets/a.txt"), "keep");
        touch(&src.path().join("assets/b.tmp"), "drop");

        let spec = CopySpec::new(src.path().join("assets")).exclude("*.tmp");
        let copied = mirror_assets(std::slice::from_ref(&spec), out.path()).unwrap();

        assert_eq!(copied, 1);
        assert!(out.path().join("assets/a.txt").is_file());
        assert!(!out.path().join("assets/b.tmp").exists());
    }

    #[test]
    fn excluded_directory_is_pruned_entirely() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        touch(&src.path().join("assets/keep/one.css"), "");
        touch(&src.path().join("assets/node_modules/dep/index.js"), "");

        let spec = CopySpec::new(src.path().join("assets")).exclude("node_modules/");
        mirror_assets(std::slice::from_ref(&spec), out.path()).unwrap();

        assert!(out.path().join("assets/keep/one.css").is_file());
        assert!(!out.path().join("assets/node_modules").exists());
    }

    #[test]
    fn explicit_dest_overrides_base_name() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        touch(&src.path().join("public/favicon.ico"), "icon");

        let spec = CopySpec::new(src.path().join("public")).dest("static");
        mirror_assets(std::slice::from_ref(&spec), out.path()).unwrap();

        assert!(out.path().join("static/favicon.ico").is_file());
    }

    #[test]
    fn missing_source_warns_and_continues_by_default() {
        let out = TempDir::new().unwrap();
        let spec = CopySpec::new("/nonexistent/assets");
        let copied = mirror_assets(std::slice::from_ref(&spec), out.path()).unwrap();
        assert_eq!(copied, 0);
    }

    #[test]
    fn missing_source_errors_when_fatal() {
        let out = TempDir::new().unwrap();
        let spec = CopySpec::new("/nonexistent/assets").fail_if_missing(true);
        let err = mirror_assets(std::slice::from_ref(&spec), out.path()).unwrap_err();
        assert!(matches!(err, MirrorError::AssetMissing(_)));
    }

    #[test]
    fn later_specs_still_run_after_skipped_one() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        touch(&src.path().join("robots.txt"), "ok");

        let specs = vec![
            CopySpec::new("/nonexistent/assets"),
            CopySpec::new(src.path().join("robots.txt")),
        ];
        let copied = mirror_assets(&specs, out.path()).unwrap();
        assert_eq!(copied, 1);
    }
}
