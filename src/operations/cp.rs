use std::ffi::OsString;
use std::fmt::Display;
use std::fs;
use std::fs::Metadata;
use std::path::Path;
use std::path::PathBuf;

use filetime::FileTime;
use log::info;
use serde_json::Map;
use serde_json::Value;

use super::required_path;
use crate::error::Error;
use crate::error::Result;

/// Copy files or directories, only touching what changed since the last run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cp {
    pub src: PathBuf,
    pub dst: PathBuf,
}

/// What a synchronizing copy did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyReport {
    /// Files written to the destination.
    pub copied: usize,
    /// Files left alone because the destination was already up to date.
    pub skipped: usize,
}

impl Cp {
    pub fn from_entry(entry: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            src: required_path(entry, "src")?,
            dst: required_path(entry, "dst")?,
        })
    }

    pub fn run(&self) -> Result<CopyReport> {
        let mut report = CopyReport::default();
        sync(&self.src, &self.dst, &self.dst, &mut report)?;
        Ok(report)
    }
}

impl Display for Cp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.src.file_name().unwrap_or(self.src.as_os_str());
        write!(f, "Copying '{}'", name.to_string_lossy())
    }
}

// -----------------------------------------------------------------------------
// Synchronization

/// `root` is the top-level destination. When it lives inside the source tree
/// it is left out of the walk.
fn sync(src: &Path, dst: &Path, root: &Path, report: &mut CopyReport) -> Result<()> {
    let src_meta = fs::metadata(src).map_err(|e| Error::io(src, e))?;

    let dst_meta = match fs::metadata(dst) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return copy_new(src, &src_meta, dst, root, report);
        }
        Err(e) => return Err(Error::io(dst, e)),
    };

    if src_meta.is_dir() && dst_meta.is_file() {
        return Err(Error::DirectoryOntoFile(dst.to_path_buf()));
    }

    if src_meta.is_dir() && dst_meta.is_dir() {
        for (path, name) in children(src, root)? {
            sync(&path, &dst.join(name), root, report)?;
        }
        return Ok(());
    }

    if src_meta.is_file() && dst_meta.is_file() {
        let src_mtime = FileTime::from_last_modification_time(&src_meta);
        let dst_mtime = FileTime::from_last_modification_time(&dst_meta);

        if src_mtime > dst_mtime {
            copy_file(src, &src_meta, dst)?;
            report.copied += 1;
        } else if src_meta.len() != dst_meta.len() {
            return Err(Error::DestinationChanged(dst.to_path_buf()));
        } else {
            info!("'{}' is up to date, skipping", dst.display());
            report.skipped += 1;
        }
        return Ok(());
    }

    Err(Error::UnsupportedCopy {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
    })
}

/// Copy into a destination that does not exist yet.
fn copy_new(
    src: &Path,
    src_meta: &Metadata,
    dst: &Path,
    root: &Path,
    report: &mut CopyReport,
) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    if src_meta.is_file() {
        copy_file(src, src_meta, dst)?;
        report.copied += 1;
        return Ok(());
    }

    // List before creating `dst`, which may be one of the children.
    let entries = children(src, root)?;
    fs::create_dir(dst).map_err(|e| Error::io(dst, e))?;
    for (path, name) in entries {
        let meta = fs::metadata(&path).map_err(|e| Error::io(&path, e))?;
        copy_new(&path, &meta, &dst.join(name), root, report)?;
    }
    fs::set_permissions(dst, src_meta.permissions()).map_err(|e| Error::io(dst, e))?;

    Ok(())
}

/// Entries of `dir` as `(path, file name)` pairs, without `root`.
fn children(dir: &Path, root: &Path) -> Result<Vec<(PathBuf, OsString)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if path == root {
            continue;
        }
        entries.push((path, entry.file_name()));
    }
    Ok(entries)
}

/// Copy contents and permissions, then carry over the modification time so
/// the next run sees the pair as in sync.
fn copy_file(src: &Path, src_meta: &Metadata, dst: &Path) -> Result<()> {
    fs::copy(src, dst).map_err(|e| Error::io(dst, e))?;
    let mtime = FileTime::from_last_modification_time(src_meta);
    let atime = FileTime::from_last_access_time(src_meta);
    filetime::set_file_times(dst, atime, mtime).map_err(|e| Error::io(dst, e))?;
    Ok(())
}
