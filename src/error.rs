use chrono::{DateTime, Utc};
use thiserror::Error;

/// 配置解析錯誤類型
///
/// 變體依照三種錯誤類別劃分：查無資料（版本、群組、項目基底、項目名稱、
/// 參數集、日期區間）、項目已失效、參數鍵不存在。後端存儲的錯誤不做轉譯,
/// 直接以 `Store` 變體向上傳遞。
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 找不到版本（id、標籤或日期均無法解析）
    #[error("找不到版本: {reference}")]
    VersionNotFound { reference: String },

    /// 找不到群組
    #[error("找不到群組: {}", display_group(.group))]
    GroupNotFound { group: Option<String> },

    /// 群組中找不到項目基底
    #[error("群組 {} 中找不到項目基底: {base}", display_group(.group))]
    BaseNotFound {
        base: String,
        group: Option<String>,
    },

    /// 找不到配置項目
    #[error("找不到配置項目: {name}")]
    ItemNotFound { name: String },

    /// 項目元數據存在但參數集缺失，表示後端資料不一致
    #[error("項目 {name} 缺少參數集")]
    ParamsMissing { name: String },

    /// 查詢日期早於該基底的第一個區間
    #[error("{base} 在 {date} 沒有有效的配置項目")]
    NoItemInRange {
        base: String,
        date: DateTime<Utc>,
    },

    /// 區間匹配成功但查詢日期已超出區間結束邊界
    #[error("{base} 的配置項目已於 {end} 失效 (查詢日期 {date})")]
    ItemExpired {
        base: String,
        date: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// 項目參數集中不存在指定的參數鍵
    #[error("項目 {item} 沒有參數: {key}")]
    KeyNotFound { key: String, item: String },

    /// 後端存儲錯誤
    #[error("後端存儲錯誤: {0}")]
    Store(#[from] anyhow::Error),
}

impl ConfigError {
    /// 是否屬於「查無資料」類別
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConfigError::VersionNotFound { .. }
                | ConfigError::GroupNotFound { .. }
                | ConfigError::BaseNotFound { .. }
                | ConfigError::ItemNotFound { .. }
                | ConfigError::ParamsMissing { .. }
                | ConfigError::NoItemInRange { .. }
        )
    }

    /// 是否屬於「項目已失效」類別
    pub fn is_expired(&self) -> bool {
        matches!(self, ConfigError::ItemExpired { .. })
    }

    /// 是否屬於「參數鍵不存在」類別
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, ConfigError::KeyNotFound { .. })
    }
}

fn display_group(group: &Option<String>) -> &str {
    group.as_deref().unwrap_or("(無群組)")
}

/// 配置解析結果類型別名
pub type ConfigResult<T> = Result<T, ConfigError>;
