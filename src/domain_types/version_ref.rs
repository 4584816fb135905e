use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

use crate::domain_types::records::VersionId;

/// 版本引用：明確的版本 id、標籤名稱、或查詢日期
///
/// 解析順序由 `ConfigSource::clean_version` 決定：日期先轉換為該日期
/// 當時生效的版本 id；字串先當作標籤查找，查無標籤時才嘗試解釋為
/// 數字形式的版本 id（標籤優先於原始 id）。
#[derive(Debug, Clone, PartialEq)]
pub enum VersionRef {
    /// 明確的版本 id
    Id(VersionId),
    /// 標籤名稱（或數字形式的版本 id 字串）
    Name(String),
    /// 查詢日期，解析為該日期當時生效的版本
    AsOf(DateTime<Utc>),
}

impl From<VersionId> for VersionRef {
    fn from(id: VersionId) -> Self {
        VersionRef::Id(id)
    }
}

impl From<&str> for VersionRef {
    fn from(name: &str) -> Self {
        VersionRef::Name(name.to_string())
    }
}

impl From<String> for VersionRef {
    fn from(name: String) -> Self {
        VersionRef::Name(name)
    }
}

impl From<DateTime<Utc>> for VersionRef {
    fn from(date: DateTime<Utc>) -> Self {
        VersionRef::AsOf(date)
    }
}

impl From<NaiveDate> for VersionRef {
    fn from(date: NaiveDate) -> Self {
        VersionRef::AsOf(crate::utils::time_utils::naive_date_to_datetime(date))
    }
}

impl fmt::Display for VersionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRef::Id(id) => write!(f, "{}", id),
            VersionRef::Name(name) => write!(f, "{}", name),
            VersionRef::AsOf(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}
