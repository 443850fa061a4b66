//! Directory walking for harvesting embeddable resources.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::WalkOrder;
use crate::resource_paths::{ExtensionFilter, make_resource_key};

/// Location of an embeddable file and the key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFile {
    /// Path on disk, rooted at the scanned directory.
    pub path: PathBuf,
    /// Normalised map key.
    pub key: String,
}

/// Walk `root` recursively, yielding the files that pass `filter` in walk order.
///
/// Symbolic links are not followed. A link pointing at a file is reported like the file itself,
/// a link pointing at a directory is skipped.
pub fn scan_resources<'a>(
    root: &'a Path,
    filter: &'a ExtensionFilter,
    order: WalkOrder,
) -> impl Iterator<Item = Result<ResourceFile, walkdir::Error>> + 'a {
    let mut walker = WalkDir::new(root).follow_links(false);
    if order == WalkOrder::Sorted {
        walker = walker.sort_by_file_name();
    }

    walker.into_iter().filter_map(move |entry| match entry {
        Ok(entry) => classify_entry(root, filter, entry).map(Ok),
        Err(err) => Some(Err(err)),
    })
}

fn classify_entry(root: &Path, filter: &ExtensionFilter, entry: DirEntry) -> Option<ResourceFile> {
    if entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir()) {
        return None;
    }

    let file_name = entry.file_name().to_string_lossy();
    if !filter.matches(&file_name) {
        tracing::trace!(path = %entry.path().display(), "skipping non-resource file");
        return None;
    }

    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    let key = make_resource_key(relative);
    Some(ResourceFile {
        path: entry.into_path(),
        key,
    })
}
