//! The collection run: walk, read, decode, concatenate.

use crate::decode::{self, Encoding};
use crate::error::CollectError;
use crate::sink::{Progress, Sink};
use crate::walker::{self, FileEntry, WalkOptions};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appended to every header line.
pub const HEADER_SUFFIX: &str = "-------------";
/// Written after each file's content.
pub const SEPARATOR: &str = "\n\n";

/// Everything one collection run needs to know.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub root: PathBuf,
    pub output: PathBuf,
    pub suffix: String,
    pub max_depth: Option<usize>,
    pub follow_links: bool,
    pub skip_hidden: bool,
    pub respect_gitignore: bool,
    /// Leave out files whose content looks binary.
    pub skip_binary: bool,
}

impl CollectOptions {
    pub fn new(root: impl Into<PathBuf>, output: impl Into<PathBuf>, suffix: &str) -> Self {
        Self {
            root: root.into(),
            output: output.into(),
            suffix: suffix.to_string(),
            max_depth: None,
            follow_links: false,
            skip_hidden: false,
            respect_gitignore: false,
            skip_binary: false,
        }
    }

    fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            suffix: self.suffix.clone(),
            max_depth: self.max_depth,
            follow_links: self.follow_links,
            skip_hidden: self.skip_hidden,
            respect_gitignore: self.respect_gitignore,
            exclude: Some(self.output.clone()),
        }
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum CollectionStatus {
    Success,
    /// Nothing matched the suffix. Not an error, but no output was written.
    NoFilesFound,
    Failed(CollectError),
}

/// Summary of a finished run.
#[derive(Debug)]
pub struct CollectionResult {
    /// Files whose header was written to the output.
    pub processed: usize,
    /// Files that could not be read; their error is inlined in the output.
    pub failures: usize,
    /// Files left out because they looked binary.
    pub skipped: usize,
    pub status: CollectionStatus,
}

impl CollectionResult {
    fn fatal(err: CollectError, processed: usize, failures: usize, skipped: usize) -> Self {
        Self {
            processed,
            failures,
            skipped,
            status: CollectionStatus::Failed(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, CollectionStatus::Success)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, CollectionStatus::Failed(_))
    }

    pub fn error(&self) -> Option<&CollectError> {
        match &self.status {
            CollectionStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// What happened to a single file.
enum FileOutcome {
    Written,
    Unreadable,
    Skipped,
}

/// Collects every `suffix` file below `root` into `output`.
pub fn collect(
    root: impl AsRef<Path>,
    output: impl AsRef<Path>,
    suffix: &str,
    sink: impl Sink,
) -> CollectionResult {
    let options = CollectOptions::new(root.as_ref(), output.as_ref(), suffix);
    collect_with(&options, sink)
}

/// Same as [`collect`], with the full set of walk options.
pub fn collect_with(options: &CollectOptions, mut sink: impl Sink) -> CollectionResult {
    let root = &options.root;
    if !root.is_dir() {
        let err = CollectError::DirectoryNotFound(root.clone());
        sink.log(&format!("Error: {err}"));
        sink.progress(Progress::Failed);
        return CollectionResult::fatal(err, 0, 0, 0);
    }

    let walk = walker::find_files(root, &options.walk_options());
    for message in &walk.errors {
        sink.log(&format!("Warning: {message}"));
    }

    let files = walk.files;
    let total = files.len();
    if total == 0 {
        sink.log(&format!(
            "No '{}' files found in '{}'.",
            options.suffix,
            root.display()
        ));
        sink.progress(Progress::Percent(100));
        return CollectionResult {
            processed: 0,
            failures: 0,
            skipped: 0,
            status: CollectionStatus::NoFilesFound,
        };
    }

    log::info!(
        "collecting {} files from {} into {}",
        total,
        root.display(),
        options.output.display()
    );

    let output_err = |e: std::io::Error| CollectError::OutputWrite(e, options.output.clone());
    let mut out = match File::create(&options.output) {
        Ok(file) => BufWriter::new(file),
        Err(e) => return abort(&mut sink, output_err(e), 0, 0, 0),
    };

    let (mut processed, mut failures, mut skipped) = (0, 0, 0);
    for (done, entry) in files.iter().enumerate() {
        match write_entry(&mut out, entry, options.skip_binary, &mut sink) {
            Ok(FileOutcome::Written) => processed += 1,
            Ok(FileOutcome::Unreadable) => {
                processed += 1;
                failures += 1;
            }
            Ok(FileOutcome::Skipped) => skipped += 1,
            Err(e) => return abort(&mut sink, output_err(e), processed, failures, skipped),
        }
        sink.progress(Progress::from_counts(done + 1, total));
    }

    if let Err(e) = out.flush() {
        return abort(&mut sink, output_err(e), processed, failures, skipped);
    }

    sink.log(&format!(
        "Successfully collected {} '{}' files into '{}'.",
        processed,
        options.suffix,
        options.output.display()
    ));
    sink.progress(Progress::Percent(100));

    CollectionResult {
        processed,
        failures,
        skipped,
        status: CollectionStatus::Success,
    }
}

fn abort(
    sink: &mut impl Sink,
    err: CollectError,
    processed: usize,
    failures: usize,
    skipped: usize,
) -> CollectionResult {
    log::error!("{err}");
    sink.log(&format!("Error: {err}"));
    sink.progress(Progress::Failed);
    CollectionResult::fatal(err, processed, failures, skipped)
}

/// Writes one record. Only errors writing to `out` are returned; problems with
/// the source file end up inside the record.
fn write_entry(
    out: &mut impl Write,
    entry: &FileEntry,
    skip_binary: bool,
    sink: &mut impl Sink,
) -> std::io::Result<FileOutcome> {
    let rel = &entry.relative;

    let bytes = match fs::read(&entry.path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("read failed for {}: {}", entry.path.display(), e);
            sink.log(&format!("Error reading {rel}: {e}"));
            writeln!(out, "{rel}{HEADER_SUFFIX}")?;
            write!(out, "\n[Error: could not read file {rel} - {e}]\n")?;
            out.write_all(SEPARATOR.as_bytes())?;
            return Ok(FileOutcome::Unreadable);
        }
    };

    if skip_binary && content_inspector::inspect(&bytes).is_binary() {
        sink.log(&format!("Skipping binary file: {rel}"));
        return Ok(FileOutcome::Skipped);
    }

    writeln!(out, "{rel}{HEADER_SUFFIX}")?;
    sink.log(&format!("Processing: {rel}"));

    let decoded = decode::decode(&bytes);
    out.write_all(decoded.text.as_bytes())?;
    if decoded.is_fallback() {
        debug_assert_eq!(decoded.encoding, Encoding::Latin1);
        write!(
            out,
            "\n[Warning: file was read using {} encoding]\n",
            decoded.encoding
        )?;
        sink.log(&format!(
            "Warning: {rel} was read using {} encoding because it is not valid UTF-8.",
            decoded.encoding
        ));
    }
    out.write_all(SEPARATOR.as_bytes())?;

    Ok(FileOutcome::Written)
}
