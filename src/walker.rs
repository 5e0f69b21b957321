use ignore::{DirEntry, WalkBuilder};
use std::path::{Component, Path, PathBuf};

/// A file picked up by the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path as produced by the walker (rooted at the walk root).
    pub path: PathBuf,
    /// Path below the walk root, always `/`-separated.
    pub relative: String,
}

/// Settings for a single walk.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub suffix: String,
    pub max_depth: Option<usize>,
    pub follow_links: bool,
    pub skip_hidden: bool,
    pub respect_gitignore: bool,
    /// A path that must never be returned, typically the output file.
    pub exclude: Option<PathBuf>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            suffix: ".cs".to_string(),
            max_depth: None,
            follow_links: false,
            skip_hidden: false,
            respect_gitignore: false,
            exclude: None,
        }
    }
}

/// What the walk found, plus the directories it could not read.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub files: Vec<FileEntry>,
    pub errors: Vec<String>,
}

/// Whether the file name of `path` ends with `suffix`, compared byte for byte.
pub fn matches_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().ends_with(suffix.as_bytes()))
}

/// `path` relative to `root`, joined with `/` whatever the platform separator.
pub fn relative_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Anything that is not a directory, including symlinks whose target is
/// missing. Those fail later at read time and get an error record.
fn is_file_like(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_dir() => false,
        Some(ft) if ft.is_symlink() => !entry.path().is_dir(),
        Some(_) => true,
        None => false,
    }
}

/// Walks `root` and returns every file whose name ends with the configured suffix.
///
/// Entries come back sorted by file name within each directory. Errors from
/// individual directories are collected rather than returned so a single
/// unreadable folder does not end the walk.
pub fn find_files(root: &Path, options: &WalkOptions) -> WalkOutcome {
    let mut walker_builder = WalkBuilder::new(root);
    walker_builder
        .standard_filters(false)
        .hidden(options.skip_hidden)
        .git_ignore(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .parents(options.respect_gitignore)
        .require_git(false)
        .follow_links(options.follow_links)
        .max_depth(options.max_depth)
        .sort_by_file_name(|a, b| a.cmp(b));

    let exclude = options
        .exclude
        .as_ref()
        .map(|p| p.canonicalize().unwrap_or_else(|_| p.clone()));

    let mut outcome = WalkOutcome::default();
    for result in walker_builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("walk error under {}: {}", root.display(), err);
                outcome.errors.push(err.to_string());
                continue;
            }
        };

        let path = entry.path();
        if entry.depth() == 0
            || !is_file_like(&entry)
            || !matches_suffix(path, &options.suffix)
        {
            continue;
        }

        if let Some(excluded) = &exclude
            && path.canonicalize().is_ok_and(|p| &p == excluded)
        {
            log::debug!("skipping output file {}", path.display());
            continue;
        }

        outcome.files.push(FileEntry {
            path: path.to_path_buf(),
            relative: relative_path(path, root),
        });
    }

    log::debug!(
        "found {} '{}' files under {}",
        outcome.files.len(),
        options.suffix,
        root.display()
    );
    outcome
}
