use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{ConfigError, ConfigResult};

/// 開放式參數鍵值集（參數值為任意 JSON 值）
pub type ParamSet = HashMap<String, Value>;

/// 單次查詢解析出的配置項目
///
/// 不可變值物件：每次成功查詢都會建構一個新的實例，建構後不再修改，
/// 也不會在查詢之間共享。`name` 在單一版本內唯一對應一組參數集。
#[derive(Debug, Clone)]
pub struct ConfigItem {
    /// 項目基底（同一概念項目在不同日期區間共享的家族名稱）
    pub base: String,
    /// 具體項目名稱（可能帶日期限定的唯一鍵）
    pub name: String,
    /// 所屬群組命名空間
    pub group: Option<String>,
    /// 有效區間起始日期
    pub start_date: Option<DateTime<Utc>>,
    /// 有效區間結束日期
    pub end_date: Option<DateTime<Utc>>,
    params: ParamSet,
}

impl ConfigItem {
    pub fn new(
        base: &str,
        name: &str,
        group: Option<&str>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        params: ParamSet,
    ) -> Self {
        Self {
            base: base.to_string(),
            name: name.to_string(),
            group: group.map(str::to_string),
            start_date,
            end_date,
            params,
        }
    }

    /// 取得參數值，鍵不存在時回傳 `KeyNotFound`
    pub fn get(&self, key: &str) -> ConfigResult<&Value> {
        self.params.get(key).ok_or_else(|| ConfigError::KeyNotFound {
            key: key.to_string(),
            item: self.name.clone(),
        })
    }

    /// 取得字串參數值，鍵不存在或非字串時回傳錯誤
    pub fn get_str(&self, key: &str) -> ConfigResult<&str> {
        self.get(key)?.as_str().ok_or_else(|| self.key_error(key))
    }

    /// 取得整數參數值
    pub fn get_i64(&self, key: &str) -> ConfigResult<i64> {
        self.get(key)?.as_i64().ok_or_else(|| self.key_error(key))
    }

    /// 取得浮點數參數值
    pub fn get_f64(&self, key: &str) -> ConfigResult<f64> {
        self.get(key)?.as_f64().ok_or_else(|| self.key_error(key))
    }

    /// 取得布林參數值
    pub fn get_bool(&self, key: &str) -> ConfigResult<bool> {
        self.get(key)?.as_bool().ok_or_else(|| self.key_error(key))
    }

    /// 參數鍵值集的唯讀視圖
    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    fn key_error(&self, key: &str) -> ConfigError {
        ConfigError::KeyNotFound {
            key: key.to_string(),
            item: self.name.clone(),
        }
    }
}
