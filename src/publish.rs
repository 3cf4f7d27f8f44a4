use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use crate::config::{NoChangePolicy, PublishSettings};
use crate::error::{ForgeError, Result};

/// Commit identity used for generated changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// The version-control operations the publisher needs.
pub trait Vcs {
    fn stage(&self, paths: &[PathBuf]) -> Result<()>;
    fn has_staged_changes(&self) -> Result<bool>;
    fn commit(&self, message: &str, author: &Author) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Committed,
    NothingToCommit,
}

pub fn commit_message(identifier: &str) -> String {
    format!("AI: generate module for issue #{identifier}")
}

#[derive(Debug, Clone)]
pub struct ChangePublisher {
    author: Author,
    on_no_change: NoChangePolicy,
}

impl ChangePublisher {
    pub fn new(settings: &PublishSettings) -> Self {
        Self {
            author: Author {
                name: settings.author_name.clone(),
                email: settings.author_email.clone(),
            },
            on_no_change: settings.on_no_change,
        }
    }

    pub fn publish(
        &self,
        vcs: &dyn Vcs,
        paths: &[PathBuf],
        identifier: &str,
    ) -> Result<PublishOutcome> {
        vcs.stage(paths)?;

        if !vcs.has_staged_changes()? {
            return match self.on_no_change {
                NoChangePolicy::Fail => Err(ForgeError::NoOp(format!(
                    "generated output for issue #{identifier} matches what is already committed"
                ))),
                NoChangePolicy::Succeed => {
                    warn!(identifier, "no staged changes; skipping commit");
                    Ok(PublishOutcome::NothingToCommit)
                }
            };
        }

        vcs.commit(&commit_message(identifier), &self.author)?;
        info!(identifier, "committed generated module");
        Ok(PublishOutcome::Committed)
    }
}

/// [`Vcs`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.workdir);
        cmd
    }

    fn run(&self, mut cmd: Command, what: &str) -> Result<std::process::Output> {
        let output = cmd.output()?;
        if output.status.success() {
            Ok(output)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ForgeError::Io(io::Error::other(format!(
                "git {what} failed ({}): {}",
                output.status,
                stderr.trim()
            ))))
        }
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.workdir).unwrap_or(path)
    }
}

impl Vcs for GitCli {
    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        let mut cmd = self.git();
        cmd.arg("add").arg("--");
        for path in paths {
            cmd.arg(self.relative(path));
        }
        self.run(cmd, "add").map(|_| ())
    }

    fn has_staged_changes(&self) -> Result<bool> {
        let mut cmd = self.git();
        cmd.args(["diff", "--cached", "--quiet"]);
        let status = cmd.status()?;
        // `--quiet` exits 1 when there are differences.
        match status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(ForgeError::Io(io::Error::other(format!(
                "git diff --cached failed ({status})"
            )))),
        }
    }

    fn commit(&self, message: &str, author: &Author) -> Result<()> {
        let mut cmd = self.git();
        cmd.arg("-c")
            .arg(format!("user.name={}", author.name))
            .arg("-c")
            .arg(format!("user.email={}", author.email))
            .args(["commit", "-m", message]);
        self.run(cmd, "commit").map(|_| ())
    }
}
