//! Script artifact materialization and cleanup.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use timebox_common::{ExecError, ExecResult};
use tracing::debug;

/// A script body persisted to a caller-supplied path for the duration of
/// a single execution.
///
/// The file is removed when the artifact is dropped, so cleanup happens
/// on every exit path of the surrounding call, including unwinds. The
/// path is caller-supplied, not generated: the caller owns
/// collision-avoidance, and concurrent executions must use distinct
/// paths.
#[derive(Debug)]
pub struct ScriptArtifact {
    path: PathBuf,
}

impl ScriptArtifact {
    /// Write `body` to `path` and apply the given permission bits.
    ///
    /// The mode must make the file executable for the owner, since the
    /// shell runs the file rather than reading it on stdin.
    pub async fn materialize(
        body: &str,
        path: impl AsRef<Path>,
        mode: u32,
    ) -> ExecResult<Self> {
        let path = path.as_ref().to_path_buf();

        tokio::fs::write(&path, body)
            .await
            .map_err(|e| ExecError::script_write(path.display().to_string(), e.to_string()))?;

        // The guard exists from here on, so a failure below still
        // removes the file.
        let artifact = Self { path };

        tokio::fs::set_permissions(&artifact.path, std::fs::Permissions::from_mode(mode))
            .await
            .map_err(|e| {
                ExecError::script_write(artifact.path.display().to_string(), e.to_string())
            })?;

        debug!(path = %artifact.path.display(), mode = %format_args!("{mode:o}"), "script artifact materialized");
        Ok(artifact)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScriptArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "script artifact removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "failed to remove script artifact");
            }
        }
    }
}
