// time_utils.rs
//
// 提供日期轉換相關的工具函數，用於在後端存儲層、配置解析層與測試
// 夾具之間轉換日期格式。
// 主要功能：
// 1. 將純日期轉換為 UTC 時間戳（取當日零點）
// 2. 解析常見的日期字串格式
// 3. 產生帶日期限定的項目名稱所使用的日期鍵

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// 將 NaiveDate 轉換為當日零點的 DateTime<Utc>
pub fn naive_date_to_datetime(date: NaiveDate) -> DateTime<Utc> {
    // and_hms_opt(0, 0, 0) 對任何合法日期都存在
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
}

/// 建構指定年月日零點的 DateTime<Utc>，日期不合法時回傳錯誤
pub fn ymd(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow!("不合法的日期: {}-{}-{}", year, month, day))?;
    Ok(naive_date_to_datetime(date))
}

/// 解析日期字串為 DateTime<Utc>
///
/// 依序嘗試 RFC 3339、`%Y-%m-%d %H:%M:%S`、`%Y-%m-%d` 三種格式。
pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }
    if let Ok(nd) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(naive_date_to_datetime(nd));
    }
    Err(anyhow!("無法解析日期字串: {}", s))
}

/// 產生 `%Y%m%d` 形式的日期鍵
///
/// 帶日期限定的項目名稱慣例為 `<群組>_<基底>_<日期鍵>`。
pub fn date_key(date: &DateTime<Utc>) -> String {
    date.format("%Y%m%d").to_string()
}
