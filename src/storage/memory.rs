use anyhow::{bail, Result};
use std::collections::HashMap;

use crate::domain_types::{
    ItemInfo, ItemInfoTable, ItemTable, ParamSet, VersionId, VersionRecord, VersionTable,
};
use crate::storage::store::ConfigStore;

/// 記憶體後端存儲
///
/// 以插入輔助方法建表後直接服務三個載入操作，適合測試夾具與小型的
/// 內嵌目錄。載入時回傳表的複本，存儲本身在建表完成後不再修改。
#[derive(Debug, Default)]
pub struct MemoryStore {
    versions: VersionTable,
    item_info: HashMap<VersionId, ItemInfoTable>,
    items: HashMap<VersionId, ItemTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 註冊一個版本
    pub fn insert_version(&mut self, version: VersionId, record: VersionRecord) {
        self.versions.insert(version, record);
    }

    /// 在指定版本下插入一個配置項目（元數據與參數集一起給定）
    pub fn insert_item(
        &mut self,
        version: VersionId,
        name: &str,
        info: ItemInfo,
        params: ParamSet,
    ) {
        self.item_info
            .entry(version)
            .or_default()
            .insert(name.to_string(), info);
        self.items
            .entry(version)
            .or_default()
            .insert(name.to_string(), params);
    }

    fn ensure_known(&self, version: VersionId) -> Result<()> {
        if !self.versions.contains_key(&version) {
            bail!("記憶體存儲中沒有版本: {}", version);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ConfigStore for MemoryStore {
    async fn load_versions(&self) -> Result<VersionTable> {
        Ok(self.versions.clone())
    }

    async fn load_item_info(&self, version: VersionId) -> Result<ItemInfoTable> {
        self.ensure_known(version)?;
        Ok(self.item_info.get(&version).cloned().unwrap_or_default())
    }

    async fn load_items(&self, version: VersionId) -> Result<ItemTable> {
        self.ensure_known(version)?;
        Ok(self.items.get(&version).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::ymd;
    use serde_json::json;

    #[tokio::test]
    async fn test_roundtrip() {
        let mut store = MemoryStore::new();
        store.insert_version(
            0,
            VersionRecord::new(Some("1.0"), ymd(2012, 1, 1).unwrap(), "Mr. Foo"),
        );

        let mut params = ParamSet::new();
        params.insert("universe".to_string(), json!("SPX"));
        store.insert_item(
            0,
            "quantmodel_us_largecap",
            ItemInfo::new("us_largecap", Some("quantmodel"), None, None),
            params,
        );

        let versions = store.load_versions().await.unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[&0].tag.as_deref(), Some("1.0"));

        let info = store.load_item_info(0).await.unwrap();
        assert_eq!(info["quantmodel_us_largecap"].base, "us_largecap");

        let items = store.load_items(0).await.unwrap();
        assert_eq!(items["quantmodel_us_largecap"]["universe"], json!("SPX"));
    }

    #[tokio::test]
    async fn test_unknown_version() {
        let store = MemoryStore::new();
        assert!(store.load_item_info(7).await.is_err());
        assert!(store.load_items(7).await.is_err());
    }

    #[tokio::test]
    async fn test_registered_version_without_items() {
        let mut store = MemoryStore::new();
        store.insert_version(
            1,
            VersionRecord::new(None, ymd(2012, 1, 8).unwrap(), "Ms. Bar"),
        );
        assert!(store.load_item_info(1).await.unwrap().is_empty());
        assert!(store.load_items(1).await.unwrap().is_empty());
    }
}
