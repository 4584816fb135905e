use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain_types::{ConfigItem, VersionId, VersionRef};
use crate::error::ConfigResult;
use crate::source::ConfigSource;
use crate::version::ConfigVersion;

/// 配置管理器
///
/// 將一個命名環境綁定到單一配置來源，並以正規版本 id 為鍵快取已
/// 實體化的版本。快取不設上限也不淘汰：同一版本 id 在管理器的生命
/// 週期內永遠回傳同一個 `Arc<ConfigVersion>` 實例。
pub struct ConfigManager {
    environment: String,
    source: ConfigSource,
    cache: RwLock<HashMap<VersionId, Arc<ConfigVersion>>>,
}

impl ConfigManager {
    pub fn new(environment: &str, source: ConfigSource) -> Self {
        Self {
            environment: environment.to_string(),
            source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// 環境名稱
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// 綁定的配置來源
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// 解析版本引用並回傳快取的版本實例
    ///
    /// 解析為相同正規版本 id 的引用保證回傳同一個 `Arc` 實例。
    /// 未命中時在寫鎖下重查後才實體化，同一 id 至多實體化一次。
    pub async fn get_version(
        &self,
        reference: impl Into<VersionRef>,
    ) -> ConfigResult<Arc<ConfigVersion>> {
        let (tag, id) = self.source.clean_version(&reference.into()).await?;

        if let Some(ver) = self.cache.read().await.get(&id) {
            debug!("版本快取命中: {} (環境: {})", id, self.environment);
            return Ok(ver.clone());
        }

        let mut cache = self.cache.write().await;
        if let Some(ver) = cache.get(&id) {
            return Ok(ver.clone());
        }
        debug!("版本快取未命中，實體化版本: {} (環境: {})", id, self.environment);
        let ver = Arc::new(self.source.materialize(tag, id).await?);
        cache.insert(id, ver.clone());
        Ok(ver)
    }

    /// 查詢指定項目在指定日期與版本下的配置
    ///
    /// `date` 未指定時使用來源最新版本的建立日期；`version` 未指定時
    /// 以 `date` 作為版本引用（即「該日期當時生效的版本」）。解析失敗
    /// 的錯誤原樣向上傳遞，不做轉譯。
    pub async fn get_config(
        &self,
        name: &str,
        group: Option<&str>,
        date: Option<DateTime<Utc>>,
        version: Option<VersionRef>,
    ) -> ConfigResult<ConfigItem> {
        let date = match date {
            Some(d) => d,
            None => self.source.latest_date().await?,
        };
        let reference = version.unwrap_or(VersionRef::AsOf(date));
        let ver = self.get_version(reference).await?;
        ver.get_item(name, group, Some(date))
    }
}
