//! Atomic file replacement

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

/// Temporary sibling used while replacing `path`
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace the contents of `path` atomically
///
/// Writes a temporary file in the same directory, syncs it, then renames it
/// over the target. Readers see either the old file or the new one.
pub async fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
    let tmp_path = temp_path(path);

    let result = async {
        let mut file = File::create(&tmp_path).await?;
        file.write_all(contents).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp_path, path).await
    }
    .await;

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path).await;
    }
    result
}
