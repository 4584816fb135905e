// Shared test fixture:
// 10 versions (ids 0-9) with weekly creation dates starting 2012-01-01,
// version 0 tagged "1.0" and version 4 tagged "2.0". Every version carries
// the same item layout; the parameter sets embed the materialized version id
// in their "key" parameter so version-scoped divergence is observable.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use config_store::domain_types::{
    ItemInfo, ItemInfoTable, ItemTable, ParamSet, VersionId, VersionRecord, VersionTable,
};
use config_store::manager::ConfigManager;
use config_store::source::ConfigSource;
use config_store::storage::ConfigStore;
use config_store::utils::time_utils::ymd;

pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    ymd(year, month, day).unwrap()
}

/// In-test ConfigStore implementation computing its tables on every load
pub struct FixtureStore;

fn param_set(pairs: &[(&str, serde_json::Value)]) -> ParamSet {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[async_trait::async_trait]
impl ConfigStore for FixtureStore {
    async fn load_versions(&self) -> Result<VersionTable> {
        let mut table = VersionTable::new();
        for id in 0..10 {
            let tag = match id {
                0 => Some("1.0"),
                4 => Some("2.0"),
                _ => None,
            };
            let author = if id % 2 == 0 { "Mr. Foo" } else { "Ms. Bar" };
            let created = date(2012, 1, 1) + Duration::days(7 * id);
            table.insert(id, VersionRecord::new(tag, created, author));
        }
        Ok(table)
    }

    async fn load_item_info(&self, _version: VersionId) -> Result<ItemInfoTable> {
        let mut info = ItemInfoTable::new();
        info.insert(
            "quantmodel_us_largecap_20120101".to_string(),
            ItemInfo::new(
                "us_largecap",
                Some("quantmodel"),
                Some(date(2012, 1, 1)),
                Some(date(2012, 2, 1)),
            ),
        );
        info.insert(
            "quantmodel_us_largecap_20120201".to_string(),
            ItemInfo::new(
                "us_largecap",
                Some("quantmodel"),
                Some(date(2012, 2, 1)),
                Some(date(2012, 3, 1)),
            ),
        );
        info.insert(
            "riskmodel_US_RiskModel".to_string(),
            ItemInfo::new("US_RiskModel", Some("riskmodel"), None, None),
        );
        Ok(info)
    }

    async fn load_items(&self, version: VersionId) -> Result<ItemTable> {
        let mut items = ItemTable::new();
        items.insert(
            "quantmodel_us_largecap_20120101".to_string(),
            param_set(&[
                ("universe", json!("SPX")),
                ("riskmodel", json!("US_RiskModel")),
                ("key", json!(version)),
            ]),
        );
        items.insert(
            "quantmodel_us_largecap_20120201".to_string(),
            param_set(&[
                ("universe", json!("Russell")),
                ("riskmodel", json!("US_RiskModel")),
                ("key", json!(version + 1)),
            ]),
        );
        items.insert(
            "riskmodel_US_RiskModel".to_string(),
            param_set(&[("a", json!(1)), ("b", json!(2)), ("c", json!(5 + version))]),
        );
        Ok(items)
    }
}

pub fn fixture_source() -> ConfigSource {
    let mut settings = HashMap::new();
    settings.insert("x".to_string(), json!(5));
    ConfigSource::new("test", Arc::new(FixtureStore)).with_settings(settings)
}

/// Fixture source with an explicit interval closure policy
pub fn fixture_source_with_closure(closed_start: bool, closed_end: bool) -> ConfigSource {
    fixture_source().with_closure(closed_start, closed_end)
}

pub fn fixture_manager() -> ConfigManager {
    ConfigManager::new("prod", fixture_source())
}
