use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::dictionary::{payload::json_kind, Dictionary};
use crate::errors::ServiceError;

const INDENT: &[u8] = b"    ";

/// Serialize `value` as JSON indented with four spaces.
pub fn to_pretty_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    Ok(buf)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_string());
    path.with_file_name(format!("{}.{}.tmp", name, Uuid::new_v4()))
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Flush the directory entry so a completed rename survives power loss.
#[cfg(unix)]
async fn sync_parent(path: &Path) -> io::Result<()> {
    fs::File::open(parent_dir(path)).await?.sync_all().await
}

// directories cannot be opened for syncing here
#[cfg(not(unix))]
async fn sync_parent(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Write `value` to `path` as pretty-printed JSON.
///
/// The bytes go to a uniquely named sibling temp file which is synced and
/// then renamed over `path`, so readers see either the previous file or the
/// new one in full. The parent directory is synced after the rename, so a
/// reported success is durable. Concurrent writers each use their own temp
/// file; the last rename wins.
pub async fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ServiceError> {
    let data = to_pretty_vec(value).map_err(|e| ServiceError::persistence(path, e))?;
    let tmp = temp_path_for(path);

    let written: io::Result<()> = async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, path).await?;
        sync_parent(path).await
    }
    .await;

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp).await;
        return Err(ServiceError::persistence(path, e));
    }
    Ok(())
}

/// Read a JSON object from `path`.
///
/// `Ok(None)` when the file does not exist. Bytes that are not a JSON
/// object yield `LoadCorruption`; any other I/O error is a
/// `PersistenceFailure`.
pub async fn read_mapping(path: &Path) -> Result<Option<Dictionary>, ServiceError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ServiceError::persistence(path, e)),
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(other) => Err(ServiceError::corruption(
            path,
            format!("top-level value is {}, expected an object", json_kind(&other)),
        )),
        Err(e) => Err(ServiceError::corruption(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tmp_file(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}_{}.json", prefix, Uuid::new_v4()))
    }

    #[tokio::test]
    async fn write_then_read_uses_four_space_indent() -> Result<(), anyhow::Error> {
        let path = tmp_file("json_file_rw");
        let value = json!({"cat": "gato", "dog": ["cão", "canino"]});
        write_pretty(&path, &value).await?;

        let text = tokio::fs::read_to_string(&path).await?;
        assert!(text.starts_with("{\n    \"cat\": \"gato\""), "got: {text}");
        assert!(text.contains("\n        \"cão\""));

        let back = read_mapping(&path).await?.expect("file present");
        assert_eq!(Value::Object(back), value);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn write_leaves_no_temp_files_behind() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("json_file_dir_{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join("dict.json");
        write_pretty(&path, &json!({"a": 1})).await?;
        write_pretty(&path, &json!({"b": 2})).await?;

        let mut entries = tokio::fs::read_dir(&dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["dict.json".to_string()]);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn parent_directory_is_synced() -> Result<(), anyhow::Error> {
        assert_eq!(parent_dir(Path::new("dict.json")), Path::new("."));
        assert_eq!(parent_dir(Path::new("/data/dict.json")), Path::new("/data"));

        let dir = std::env::temp_dir().join(format!("json_file_sync_{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        sync_parent(&dir.join("dict.json")).await?;
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_reads_as_none() -> Result<(), anyhow::Error> {
        assert!(read_mapping(&tmp_file("json_file_missing")).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn non_object_content_is_corruption() -> Result<(), anyhow::Error> {
        let path = tmp_file("json_file_corrupt");
        for content in ["{not json", "[1, 2]", "\"text\"", ""] {
            tokio::fs::write(&path, content).await?;
            let err = read_mapping(&path).await.unwrap_err();
            assert!(matches!(err, ServiceError::LoadCorruption(_)), "{content}: {err}");
        }
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn unwritable_target_is_persistence_failure() -> Result<(), anyhow::Error> {
        // parent is a regular file, so neither the temp file nor the target can exist
        let blocker = tmp_file("json_file_blocker");
        tokio::fs::write(&blocker, b"x").await?;
        let err = write_pretty(&blocker.join("dict.json"), &json!({})).await.unwrap_err();
        assert!(matches!(err, ServiceError::PersistenceFailure(_)));
        let _ = tokio::fs::remove_file(&blocker).await;
        Ok(())
    }
}
