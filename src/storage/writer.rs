//! Whole-document JSON writer
//!
//! The output file is rebuilt state, never a mutable store: each write
//! serializes the full collection to a sibling temporary file and renames it
//! over the destination, so readers see either the old or the new document.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::paths::parent_dir;

/// Serialize `value` as pretty JSON and atomically replace `path`
pub async fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> std::io::Result<()> {
    let mut contents = serde_json::to_string_pretty(value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    contents.push('\n');

    if let Some(parent) = parent_dir(path) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = temp_path(path);
    if let Err(e) = tokio::fs::write(&tmp, contents).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_replaces_whole_document() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("data/portfolio-data.json");

        write_json_atomic(&path, &vec!["a", "b", "c"]).await.unwrap();
        write_json_atomic(&path, &vec!["z"]).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, vec!["z".to_string()]);
        assert!(!tmp.path().join("data/.portfolio-data.json.tmp").exists());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        assert_eq!(
            temp_path(Path::new("public/data/out.json")),
            PathBuf::from("public/data/.out.json.tmp")
        );
    }
}
