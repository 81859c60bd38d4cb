use std::path::PathBuf;

use super::{ObjectStore, StoredObject, validate_location};
use crate::errors::{Result, TutorHubError};

/// 本地磁盘对象存储，布局为 `{root}/{bucket}/{path}`
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf> {
        validate_location(bucket, path)?;
        Ok(self.root.join(bucket).join(path))
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, bucket: &str, path: &str, data: &[u8]) -> Result<StoredObject> {
        let target = self.object_path(bucket, path)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                TutorHubError::object_store(format!("创建目录失败 {}: {e}", parent.display()))
            })?;
        }

        tokio::fs::write(&target, data).await.map_err(|e| {
            TutorHubError::object_store(format!("写入文件失败 {}: {e}", target.display()))
        })?;

        tracing::debug!("对象已写入: {}/{} ({} bytes)", bucket, path, data.len());

        Ok(StoredObject {
            bucket: bucket.to_string(),
            path: path.to_string(),
            public_url: self.public_url(bucket, path),
            size: data.len(),
        })
    }

    async fn get(&self, bucket: &str, path: &str) -> Result<Option<Vec<u8>>> {
        let target = self.object_path(bucket, path)?;
        match tokio::fs::read(&target).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TutorHubError::object_store(format!(
                "读取文件失败 {}: {e}",
                target.display()
            ))),
        }
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<bool> {
        let target = self.object_path(bucket, path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(TutorHubError::object_store(format!(
                "删除文件失败 {}: {e}",
                target.display()
            ))),
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/api/files/{bucket}/{path}", self.public_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("tutorhub-blob-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_put_get_remove() {
        let root = temp_root();
        let store = LocalObjectStore::new(&root, "http://localhost:3001/");

        let stored = store
            .put("worksheets", "worksheets/1/10_a.txt", b"2 + 2 = 4")
            .await
            .unwrap();
        assert_eq!(stored.size, 9);
        assert_eq!(
            stored.public_url,
            "http://localhost:3001/api/files/worksheets/worksheets/1/10_a.txt"
        );

        let data = store.get("worksheets", "worksheets/1/10_a.txt").await.unwrap();
        assert_eq!(data.as_deref(), Some(&b"2 + 2 = 4"[..]));

        assert!(store.remove("worksheets", "worksheets/1/10_a.txt").await.unwrap());
        assert!(!store.remove("worksheets", "worksheets/1/10_a.txt").await.unwrap());
        assert!(store.get("worksheets", "worksheets/1/10_a.txt").await.unwrap().is_none());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let store = LocalObjectStore::new(temp_root(), "http://localhost:3001");
        assert!(store.put("worksheets", "../x.txt", b"x").await.is_err());
        assert!(store.get("private", "x.txt").await.is_err());
    }
}
