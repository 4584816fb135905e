use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain_types::{VersionId, VersionRef, VersionTable};
use crate::error::{ConfigError, ConfigResult};
use crate::storage::ConfigStore;
use crate::version::ConfigVersion;

/// 版本目錄及其衍生索引
///
/// 從原始目錄表一次建出日期排序索引與標籤索引，建構後不再修改。
/// 不變量：版本 id 依建立日期全序排列，標籤值在目錄內唯一。
pub struct VersionCatalog {
    records: VersionTable,
    by_date: BTreeMap<DateTime<Utc>, VersionId>,
    tag_to_version: HashMap<String, VersionId>,
}

impl VersionCatalog {
    pub fn new(records: VersionTable) -> Self {
        let mut by_date = BTreeMap::new();
        let mut tag_to_version = HashMap::new();
        for (&id, record) in &records {
            by_date.insert(record.date, id);
            if let Some(tag) = &record.tag {
                tag_to_version.insert(tag.clone(), id);
            }
        }
        Self {
            records,
            by_date,
            tag_to_version,
        }
    }

    /// 原始目錄表
    pub fn records(&self) -> &VersionTable {
        &self.records
    }

    pub fn contains(&self, id: VersionId) -> bool {
        self.records.contains_key(&id)
    }

    /// 版本 id 對應的標籤（反向查找）
    pub fn tag_of(&self, id: VersionId) -> Option<&str> {
        self.records.get(&id).and_then(|r| r.tag.as_deref())
    }

    /// 標籤對應的版本 id
    pub fn resolve_tag(&self, tag: &str) -> Option<VersionId> {
        self.tag_to_version.get(tag).copied()
    }

    /// 向後 as-of 搜尋：建立日期不晚於 `date` 的最新版本
    pub fn asof(&self, date: DateTime<Utc>) -> Option<VersionId> {
        self.by_date.range(..=date).next_back().map(|(_, &id)| id)
    }

    /// 時間序最後的版本（建立日期與版本 id）
    pub fn latest(&self) -> Option<(DateTime<Utc>, VersionId)> {
        self.by_date.iter().next_back().map(|(&date, &id)| (date, id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 配置來源
///
/// 持有版本目錄並負責版本引用的解析，透過後端存儲接口按需實體化
/// 單一版本。目錄在首次使用時載入一次並快取；來源本身不快取已實體化
/// 的版本，那是 `ConfigManager` 的職責。
pub struct ConfigSource {
    name: String,
    settings: HashMap<String, Value>,
    store: Arc<dyn ConfigStore>,
    closed_start: bool,
    closed_end: bool,
    catalog: OnceCell<VersionCatalog>,
}

impl ConfigSource {
    pub fn new(name: &str, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            name: name.to_string(),
            settings: HashMap::new(),
            store,
            closed_start: true,
            closed_end: false,
            catalog: OnceCell::new(),
        }
    }

    /// 附加呼叫端自訂的設定鍵值
    pub fn with_settings(mut self, settings: HashMap<String, Value>) -> Self {
        self.settings = settings;
        self
    }

    /// 指定此來源實體化版本時使用的區間邊界策略
    pub fn with_closure(mut self, closed_start: bool, closed_end: bool) -> Self {
        self.closed_start = closed_start;
        self.closed_end = closed_end;
        self
    }

    /// 來源名稱
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 取得自訂設定值，鍵不存在時回傳 `KeyNotFound`
    pub fn setting(&self, key: &str) -> ConfigResult<&Value> {
        self.settings.get(key).ok_or_else(|| ConfigError::KeyNotFound {
            key: key.to_string(),
            item: self.name.clone(),
        })
    }

    /// 版本目錄（首次存取時透過後端載入，之後重用）
    async fn catalog(&self) -> ConfigResult<&VersionCatalog> {
        self.catalog
            .get_or_try_init(|| async {
                let table = self.store.load_versions().await?;
                debug!("載入版本目錄 {}: {} 個版本", self.name, table.len());
                Ok(VersionCatalog::new(table))
            })
            .await
    }

    /// 原始版本目錄表
    pub async fn versions(&self) -> ConfigResult<&VersionTable> {
        Ok(self.catalog().await?.records())
    }

    /// 解析版本引用為 (標籤, 正規版本 id)
    ///
    /// 日期引用先轉換為該日期當時生效的版本；字串先當作標籤查找，
    /// 查無標籤時才嘗試解釋為數字形式的版本 id。無法解析時回傳
    /// `VersionNotFound`。
    pub async fn clean_version(
        &self,
        reference: &VersionRef,
    ) -> ConfigResult<(Option<String>, VersionId)> {
        let catalog = self.catalog().await?;
        let id = match reference {
            VersionRef::AsOf(date) => {
                catalog
                    .asof(*date)
                    .ok_or_else(|| ConfigError::VersionNotFound {
                        reference: reference.to_string(),
                    })?
            }
            VersionRef::Name(name) => {
                if let Some(id) = catalog.resolve_tag(name) {
                    id
                } else if let Some(id) =
                    name.parse::<VersionId>().ok().filter(|id| catalog.contains(*id))
                {
                    id
                } else {
                    return Err(ConfigError::VersionNotFound {
                        reference: name.clone(),
                    });
                }
            }
            VersionRef::Id(id) => {
                if !catalog.contains(*id) {
                    return Err(ConfigError::VersionNotFound {
                        reference: id.to_string(),
                    });
                }
                *id
            }
        };
        Ok((catalog.tag_of(id).map(str::to_string), id))
    }

    /// 向後 as-of 搜尋：建立日期不晚於 `date` 的最新版本
    ///
    /// 查詢日期早於最早版本時回傳 `VersionNotFound`。
    pub async fn version_asof(&self, date: DateTime<Utc>) -> ConfigResult<VersionId> {
        self.catalog()
            .await?
            .asof(date)
            .ok_or_else(|| ConfigError::VersionNotFound {
                reference: date.format("%Y-%m-%d %H:%M:%S").to_string(),
            })
    }

    /// 時間序最後的版本 id
    pub async fn latest_version(&self) -> ConfigResult<VersionId> {
        Ok(self.latest().await?.1)
    }

    /// 時間序最後版本的建立日期
    pub async fn latest_date(&self) -> ConfigResult<DateTime<Utc>> {
        Ok(self.latest().await?.0)
    }

    async fn latest(&self) -> ConfigResult<(DateTime<Utc>, VersionId)> {
        self.catalog()
            .await?
            .latest()
            .ok_or_else(|| ConfigError::VersionNotFound {
                reference: "latest".to_string(),
            })
    }

    /// 解析版本引用並實體化該版本
    pub async fn get_version(
        &self,
        reference: impl Into<VersionRef>,
    ) -> ConfigResult<ConfigVersion> {
        let (tag, id) = self.clean_version(&reference.into()).await?;
        self.materialize(tag, id).await
    }

    /// 以兩個後端載入操作實體化指定版本
    pub(crate) async fn materialize(
        &self,
        tag: Option<String>,
        id: VersionId,
    ) -> ConfigResult<ConfigVersion> {
        debug!("實體化版本 {} (來源: {})", id, self.name);
        let item_info = self.store.load_item_info(id).await?;
        let items = self.store.load_items(id).await?;
        Ok(ConfigVersion::with_closure(
            id,
            tag,
            item_info,
            items,
            self.closed_start,
            self.closed_end,
        ))
    }
}
