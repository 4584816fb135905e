use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;

use crate::domain_types::{ConfigItem, ItemInfoTable, ItemTable, VersionId};
use crate::error::{ConfigError, ConfigResult};
use crate::version::index::{asof, IntervalEntry, IntervalIndex};

/// 單一配置版本
///
/// 持有該版本的原始項目元數據表與參數表，並以惰性建立的區間索引回答
/// (基底, 群組, 日期) 查詢。索引只計算一次，之後整個實例視為不可變；
/// 每次查詢都是 (索引, 原始表, 參數) 的純函數。
pub struct ConfigVersion {
    version: VersionId,
    tag: Option<String>,
    item_info: ItemInfoTable,
    items: ItemTable,
    // closed_start 為保留配置，目前的解析路徑不使用：
    // 區間起始的 as-of 搜尋一律含起始日
    #[allow(dead_code)]
    closed_start: bool,
    closed_end: bool,
    index: OnceCell<IntervalIndex>,
}

impl ConfigVersion {
    /// 以預設邊界策略建立版本（起始封閉、結束開放）
    pub fn new(
        version: VersionId,
        tag: Option<String>,
        item_info: ItemInfoTable,
        items: ItemTable,
    ) -> Self {
        Self::with_closure(version, tag, item_info, items, true, false)
    }

    /// 以指定的區間邊界策略建立版本
    ///
    /// `closed_end=false` 表示項目有效期在 `end_date` 之前嚴格結束；
    /// `closed_end=true` 表示 `end_date` 當日仍然有效。
    pub fn with_closure(
        version: VersionId,
        tag: Option<String>,
        item_info: ItemInfoTable,
        items: ItemTable,
        closed_start: bool,
        closed_end: bool,
    ) -> Self {
        Self {
            version,
            tag,
            item_info,
            items,
            closed_start,
            closed_end,
            index: OnceCell::new(),
        }
    }

    /// 版本 id
    pub fn version(&self) -> VersionId {
        self.version
    }

    /// 版本標籤
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// 區間索引（首次存取時建立，之後重用）
    fn index(&self) -> &IntervalIndex {
        self.index.get_or_init(|| IntervalIndex::build(&self.item_info))
    }

    /// 依基底、群組與日期解析配置項目
    ///
    /// 未指定日期時，日期區間型的基底取排序最後的區間（「目前」查詢）；
    /// 無日期限定的基底則不論日期一律直接命中。
    pub fn get_item(
        &self,
        base: &str,
        group: Option<&str>,
        date: Option<DateTime<Utc>>,
    ) -> ConfigResult<ConfigItem> {
        let group_set = self
            .index()
            .group(group)
            .ok_or_else(|| ConfigError::GroupNotFound {
                group: group.map(str::to_string),
            })?;
        let entry = group_set.get(base).ok_or_else(|| ConfigError::BaseNotFound {
            base: base.to_string(),
            group: group.map(str::to_string),
        })?;

        let name = match entry {
            IntervalEntry::Unconditional(name) => name.as_str(),
            IntervalEntry::Dated(entries) => {
                let hit = match date {
                    None => entries.last(),
                    Some(d) => asof(entries, d),
                };
                let hit = hit.ok_or_else(|| ConfigError::NoItemInRange {
                    base: base.to_string(),
                    date: date.unwrap_or(DateTime::UNIX_EPOCH),
                })?;

                if let (Some(d), Some(end)) = (date, hit.end) {
                    let expired = if self.closed_end { end < d } else { end <= d };
                    if expired {
                        return Err(ConfigError::ItemExpired {
                            base: base.to_string(),
                            date: d,
                            end,
                        });
                    }
                }
                hit.item.as_str()
            }
        };

        self.build_item(name)
    }

    /// 依項目名稱直接查詢（精確匹配，不做日期解析）
    pub fn item(&self, name: &str) -> ConfigResult<ConfigItem> {
        if !self.item_info.contains_key(name) {
            return Err(ConfigError::ItemNotFound {
                name: name.to_string(),
            });
        }
        self.build_item(name)
    }

    fn build_item(&self, name: &str) -> ConfigResult<ConfigItem> {
        let info = self
            .item_info
            .get(name)
            .ok_or_else(|| ConfigError::ItemNotFound {
                name: name.to_string(),
            })?;
        let params = self
            .items
            .get(name)
            .ok_or_else(|| ConfigError::ParamsMissing {
                name: name.to_string(),
            })?;
        Ok(ConfigItem::new(
            &info.base,
            name,
            info.group.as_deref(),
            info.start_date,
            info.end_date,
            params.clone(),
        ))
    }
}
