pub mod handlers;
pub mod profile;
pub mod results;
pub mod site_state;

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Atomically persists `value` as pretty JSON: write to a sibling temp file,
/// then rename over the target so readers never observe a partial write.
pub(crate) async fn persist_json<T: Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    let raw = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, raw).await?;
    tokio::fs::rename(&tmp, path).await
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn persist_json_writes_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("slot.json");

        persist_json(&path, &serde_json::json!({"v": 1})).await.unwrap();
        persist_json(&path, &serde_json::json!({"v": 2})).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["v"], 2);
        // No stray temp file left behind.
        assert!(!tmp_path(&path).exists());
    }
}
