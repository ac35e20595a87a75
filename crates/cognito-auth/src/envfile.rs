//! Shell env file rendering and persistence
//!
//! The provisioning result is handed to other scripts as a file of
//! `export KEY=VALUE` lines, sourced before they run. Values are written
//! verbatim with no quoting or escaping.
//!
//! Every output directory receives an identical copy. Each write is atomic
//! (temp file + rename) and fully replaces any previous file.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use common::Secret;

use crate::authorizer::AuthorizerResult;
use crate::constants::{CONFIG_FILE_NAME, ENV_KEYS};
use crate::error::{Error, Result};

/// Render the authorizer result and access token as export lines.
///
/// Emits one line per entry of `ENV_KEYS`, in that order, each terminated
/// by a newline.
pub fn render(result: &AuthorizerResult, token: &Secret<String>) -> String {
    let info = &result.client_info;
    let values: [&str; 6] = [
        &info.user_pool_id,
        &info.client_id,
        info.client_secret.expose(),
        &info.domain_prefix,
        result.discovery_url(),
        token.expose(),
    ];

    ENV_KEYS
        .iter()
        .zip(values)
        .map(|(key, value)| format!("export {key}={value}\n"))
        .collect()
}

/// Write `contents` to `CONFIG_FILE_NAME` inside each directory.
///
/// Missing directories are created, including intermediate ones. Returns
/// the written file paths in the order of `dirs`. Stops at the first
/// failure; files already written stay in place.
pub async fn write(contents: &str, dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(dirs.len());
    for dir in dirs {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| Error::Io(format!("creating {}: {e}", dir.display())))?;

        let path = dir.join(CONFIG_FILE_NAME);
        write_atomic(&path, contents).await?;
        info!(path = %path.display(), "saved Cognito configuration");
        written.push(path);
    }
    Ok(written)
}

/// Write a file atomically with owner-only permissions.
///
/// The file holds a client secret and a bearer token, so the temp file is
/// opened as 0600 on unix and never exists with wider permissions. If any
/// step after creating the temp file fails, the temp file is removed.
async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::Io(format!("{} has no parent directory", path.display())))?;

    let tmp_path = dir.join(format!(".{CONFIG_FILE_NAME}.tmp.{}", std::process::id()));

    if let Err(e) = write_and_rename(&tmp_path, path, contents).await {
        // Best effort: the original error is what the caller needs
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e);
    }

    debug!(path = %path.display(), bytes = contents.len(), "persisted env file");
    Ok(())
}

async fn write_and_rename(tmp_path: &Path, path: &Path, contents: &str) -> Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options
        .open(tmp_path)
        .await
        .map_err(|e| Error::Io(format!("creating {}: {e}", tmp_path.display())))?;
    file.write_all(contents.as_bytes())
        .await
        .map_err(|e| Error::Io(format!("writing {}: {e}", tmp_path.display())))?;
    file.sync_all()
        .await
        .map_err(|e| Error::Io(format!("syncing {}: {e}", tmp_path.display())))?;
    drop(file);

    // `mode` only applies on creation; a stale temp file keeps its old bits
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(tmp_path, perms)
            .await
            .map_err(|e| {
                Error::Io(format!("setting permissions on {}: {e}", tmp_path.display()))
            })?;
    }

    tokio::fs::rename(tmp_path, path)
        .await
        .map_err(|e| Error::Io(format!("renaming into {}: {e}", path.display())))
}
