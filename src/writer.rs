use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::decoder::FileSet;
use crate::error::{ForgeError, Result};

/// Path prefixes generated files may be written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    prefixes: Vec<String>,
}

impl AllowList {
    pub fn new(prefixes: impl IntoIterator<Item = String>) -> Self {
        let prefixes = prefixes
            .into_iter()
            .map(|prefix| {
                if prefix.ends_with('/') {
                    prefix
                } else {
                    format!("{prefix}/")
                }
            })
            .collect();
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Reject `path` unless it starts with an allowed prefix, stays beneath it,
    /// and names a file rather than a directory.
    pub fn check(&self, path: &str) -> Result<()> {
        if !self.prefixes.iter().any(|prefix| path.starts_with(prefix.as_str())) {
            return Err(ForgeError::Security(format!(
                "{path} is not under any of {:?}",
                self.prefixes
            )));
        }

        let escapes = Path::new(path)
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ForgeError::Security(format!(
                "{path} contains components that leave its root"
            )));
        }

        if path.split('/').any(|segment| segment.is_empty() || segment == ".") {
            return Err(ForgeError::Security(format!("{path} does not name a file")));
        }

        Ok(())
    }
}

/// Writes a whole [`FileSet`] or nothing.
#[derive(Debug, Clone)]
pub struct PathGuardedWriter {
    root: PathBuf,
    allow: AllowList,
}

impl PathGuardedWriter {
    pub fn new(root: impl Into<PathBuf>, allow: AllowList) -> Self {
        Self {
            root: root.into(),
            allow,
        }
    }

    /// Validate every path, stage every file beside its destination, then move
    /// the staged files into place. Existing files are overwritten.
    pub fn write_all(&self, files: &FileSet) -> Result<Vec<PathBuf>> {
        debug!(prefixes = ?self.allow.prefixes(), count = files.len(), "checking paths");
        for path in files.keys() {
            self.allow.check(path)?;
            if self.root.join(path).is_dir() {
                return Err(ForgeError::Security(format!(
                    "{path} is an existing directory"
                )));
            }
        }

        let mut staged = Vec::with_capacity(files.len());
        for (path, content) in files {
            let destination = self.root.join(path);
            let tmp = stage(&destination, content.as_bytes())?;
            debug!(path = %destination.display(), "staged");
            staged.push((tmp, destination));
        }

        let mut written = Vec::with_capacity(staged.len());
        for (tmp, destination) in staged {
            tmp.persist(&destination).map_err(|err| err.error)?;
            written.push(destination);
        }

        info!(count = written.len(), "wrote generated files");
        Ok(written)
    }
}

fn stage(destination: &Path, data: &[u8]) -> Result<NamedTempFile> {
    let dir = destination.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    Ok(tmp)
}
