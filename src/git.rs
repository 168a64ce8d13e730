//! Local repository queries.

use std::path::PathBuf;
use std::process::Command;

use log::debug;

use crate::error::{LabCiError, Result};

/// Access to the local git checkout.
pub trait LocalGit {
    /// Name of the branch currently checked out.
    fn current_branch(&self) -> Result<String>;
}

/// [`LocalGit`] backed by the `git` executable.
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.workdir);
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }
}

impl LocalGit for GitCli {
    fn current_branch(&self) -> Result<String> {
        let output = self
            .command()
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .output()?;

        if !output.status.success() {
            return Err(LabCiError::Git(format!(
                "could not determine current branch in {}: {}",
                self.workdir.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_branch(&String::from_utf8_lossy(&output.stdout))
    }
}

fn parse_branch(stdout: &str) -> Result<String> {
    let branch = stdout.trim();
    debug!("Current branch: {branch:?}");
    match branch {
        "" => Err(LabCiError::Git("empty branch name".to_string())),
        "HEAD" => Err(LabCiError::Git(
            "HEAD is detached, pass a ref explicitly".to_string(),
        )),
        name => Ok(name.to_string()),
    }
}
