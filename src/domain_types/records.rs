// records.rs - 後端存儲表的原始記錄類型
//
// 三張表與後端存儲接口一一對應：
// 1. 版本目錄：版本 id -> 標籤、建立日期、作者
// 2. 項目元數據表：項目名稱 -> 基底、群組、有效日期區間
// 3. 項目參數表：項目名稱 -> 參數鍵值集

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain_types::item::ParamSet;

/// 版本 id（依建立日期全序排列的不透明識別碼）
pub type VersionId = i64;

/// 版本目錄中的一筆記錄
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    /// 版本標籤，若有則在目錄中唯一
    pub tag: Option<String>,
    /// 版本建立日期
    pub date: DateTime<Utc>,
    /// 建立者
    pub author: String,
}

impl VersionRecord {
    pub fn new(tag: Option<&str>, date: DateTime<Utc>, author: &str) -> Self {
        Self {
            tag: tag.map(str::to_string),
            date,
            author: author.to_string(),
        }
    }
}

/// 單一配置項目的元數據：所屬基底、群組與有效日期區間
///
/// `start_date` 與 `end_date` 同時為 None 表示該項目永久有效。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemInfo {
    pub base: String,
    pub group: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ItemInfo {
    pub fn new(
        base: &str,
        group: Option<&str>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            base: base.to_string(),
            group: group.map(str::to_string),
            start_date,
            end_date,
        }
    }
}

/// 版本目錄表：版本 id -> 版本記錄
pub type VersionTable = HashMap<VersionId, VersionRecord>;

/// 項目元數據表：項目名稱 -> 元數據（項目名稱在單一版本內唯一）
pub type ItemInfoTable = HashMap<String, ItemInfo>;

/// 項目參數表：項目名稱 -> 參數鍵值集
pub type ItemTable = HashMap<String, ParamSet>;
