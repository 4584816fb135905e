use anyhow::Result;

use crate::domain_types::{ItemInfoTable, ItemTable, VersionId, VersionTable};

/// 後端存儲接口
///
/// 具體的存儲技術（記憶體、檔案、SQL、鍵值存儲）只需實現這三個載入
/// 操作即可作為配置來源的後端。核心不解讀存儲格式，載入失敗的錯誤
/// 原樣向上傳遞，不做重試或包裝。
#[async_trait::async_trait]
pub trait ConfigStore: Send + Sync {
    /// 載入完整的版本目錄
    async fn load_versions(&self) -> Result<VersionTable>;

    /// 載入單一版本的項目元數據表（項目名稱在表內唯一）
    async fn load_item_info(&self, version: VersionId) -> Result<ItemInfoTable>;

    /// 載入單一版本的項目參數表
    async fn load_items(&self, version: VersionId) -> Result<ItemTable>;
}
