use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain_types::{ItemInfoTable, ItemTable, VersionId, VersionTable};
use crate::storage::store::ConfigStore;

/// JSON 檔案後端存儲
///
/// 目錄佈局：
/// ```text
/// <root>/versions.json           版本目錄（版本 id -> 記錄）
/// <root>/<version_id>/item_info.json   該版本的項目元數據表
/// <root>/<version_id>/items.json       該版本的項目參數表
/// ```
///
/// 檔案缺失或格式錯誤時，錯誤附帶路徑資訊原樣向上傳遞。
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 存儲根目錄
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_json<T: DeserializeOwned>(&self, path: PathBuf) -> Result<T> {
        let bytes = fs::read(&path)
            .await
            .with_context(|| format!("無法讀取配置檔案: {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("配置檔案格式錯誤: {}", path.display()))
    }

    fn version_dir(&self, version: VersionId) -> PathBuf {
        self.root.join(version.to_string())
    }
}

#[async_trait::async_trait]
impl ConfigStore for JsonFileStore {
    async fn load_versions(&self) -> Result<VersionTable> {
        self.read_json(self.root.join("versions.json")).await
    }

    async fn load_item_info(&self, version: VersionId) -> Result<ItemInfoTable> {
        self.read_json(self.version_dir(version).join("item_info.json"))
            .await
    }

    async fn load_items(&self, version: VersionId) -> Result<ItemTable> {
        self.read_json(self.version_dir(version).join("items.json"))
            .await
    }
}
