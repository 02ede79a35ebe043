//! Loading and saving event files on disk.
//!
//! The CLI points at a directory of Markdown files; everything here is
//! filesystem plumbing around the codec. Traversal is backed by
//! ripgrep's `ignore` crate (gitignore-aware, skips hidden entries,
//! does not follow symlinks) with the configured ignore names compiled
//! into a `globset`. Input bytes that are not valid UTF-8 are reported
//! as a descriptive error rather than fed into the parser.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::core::frontmatter;
use crate::core::record::EventRecord;

/// Compile configured ignore names into a glob set matching them at any
/// depth.
fn ignore_globs(names: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for name in names {
        builder.add(Glob::new(name).with_context(|| format!("Invalid ignore pattern '{name}'"))?);
        builder.add(
            Glob::new(&format!("**/{name}"))
                .with_context(|| format!("Invalid ignore pattern '{name}'"))?,
        );
    }
    builder.build().context("Failed to compile ignore patterns")
}

/// Recursively collect `.md` files under `root`, sorted for determinism.
/// Hidden entries and directories matching `ignore` are skipped; symlinks
/// are not followed.
pub fn collect_event_files(root: &Path, ignore: &[String]) -> Result<Vec<PathBuf>> {
    let skip = ignore_globs(ignore)?;

    let mut builder = WalkBuilder::new(root);
    builder.hidden(true);
    builder.follow_links(false);

    // Prune ignored directories early instead of filtering their files out
    let prune = skip.clone();
    builder.filter_entry(move |entry| {
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        !(is_dir && prune.is_match(entry.path()))
    });

    let mut files: Vec<PathBuf> = builder
        .build()
        .filter_map(|res| res.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("md"))
        .filter(|path| {
            let rel = path.strip_prefix(root).unwrap_or(path);
            !skip.is_match(rel)
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Load and type one event file.
///
/// Unsaved records carry no id in frontmatter; the file stem stands in
/// so that duplicate scans can still tell files apart.
pub fn load_record(path: &Path) -> Result<EventRecord> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let raw = String::from_utf8(bytes)
        .map_err(|e| anyhow::anyhow!("{}: not valid UTF-8 at byte {}", path.display(), e.utf8_error().valid_up_to()))?;

    let mut record = frontmatter::parse_record(&raw);
    record.file_path = path.display().to_string();
    if record.id.is_empty() {
        record.id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
    }
    Ok(record)
}

/// Load every event file under `root`.
pub fn load_records(root: &Path, ignore: &[String]) -> Result<Vec<EventRecord>> {
    let files = collect_event_files(root, ignore)?;
    files.iter().map(|f| load_record(f)).collect()
}

/// Write a record back to its file in canonical serialization.
pub fn save_record(record: &EventRecord) -> Result<()> {
    let path = Path::new(&record.file_path);
    let text = frontmatter::serialize_record(record);
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}
