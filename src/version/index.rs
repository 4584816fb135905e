//! Interval index for date-scoped item resolution
//!
//! Organizes one version's raw item metadata into per-(group, base) entries
//! that answer "which item was in effect on this date" with a single as-of
//! search over a date-sorted sequence.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use crate::domain_types::ItemInfoTable;

/// One validity window inside a (group, base) sequence
#[derive(Debug, Clone)]
pub struct DatedEntry {
    /// Start of the validity window; None sorts first and means
    /// "valid from the beginning"
    pub start: Option<DateTime<Utc>>,
    /// End of the validity window; None means the window never closes
    pub end: Option<DateTime<Utc>>,
    /// Name of the item served by this window
    pub item: String,
}

/// Resolution entry for one (group, base) pair, decided once at build time
#[derive(Debug, Clone)]
pub enum IntervalEntry {
    /// Exactly one metadata row with neither start nor end date: the item
    /// is served for any query date, including none at all
    Unconditional(String),
    /// Date-ordered windows, ascending by start date
    Dated(Vec<DatedEntry>),
}

/// Per-(group, base) interval index derived from raw item metadata
///
/// Entries within a Dated sequence are expected to be non-overlapping under
/// the version's closure policy; overlap is not validated here, and a
/// malformed table simply yields whichever window the as-of search lands on.
#[derive(Debug, Default)]
pub struct IntervalIndex {
    groups: HashMap<Option<String>, HashMap<String, IntervalEntry>>,
}

impl IntervalIndex {
    /// Build the index from one version's item metadata table
    pub fn build(info: &ItemInfoTable) -> Self {
        let mut buckets: HashMap<(Option<String>, String), Vec<DatedEntry>> = HashMap::new();
        for (name, row) in info {
            buckets
                .entry((row.group.clone(), row.base.clone()))
                .or_default()
                .push(DatedEntry {
                    start: row.start_date,
                    end: row.end_date,
                    item: name.clone(),
                });
        }

        let mut groups: HashMap<Option<String>, HashMap<String, IntervalEntry>> = HashMap::new();
        for ((group, base), mut rows) in buckets {
            let entry = if rows.len() == 1 && rows[0].start.is_none() && rows[0].end.is_none() {
                IntervalEntry::Unconditional(rows.remove(0).item)
            } else {
                // ties on start break on item name so the order is deterministic
                rows.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.item.cmp(&b.item)));
                IntervalEntry::Dated(rows)
            };
            groups.entry(group).or_default().insert(base, entry);
        }

        debug!("區間索引建立完成: {} 個群組", groups.len());
        Self { groups }
    }

    /// Look up all entries of one group namespace
    pub fn group(&self, group: Option<&str>) -> Option<&HashMap<String, IntervalEntry>> {
        self.groups.get(&group.map(str::to_string))
    }

    /// Number of group namespaces in the index
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// As-of search: the window with the greatest start date <= `date`
///
/// `entries` must be sorted ascending by start date (None first), which
/// `IntervalIndex::build` guarantees. A None start compares before any date.
pub fn asof(entries: &[DatedEntry], date: DateTime<Utc>) -> Option<&DatedEntry> {
    let idx = entries.partition_point(|e| e.start <= Some(date));
    if idx == 0 {
        None
    } else {
        Some(&entries[idx - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_types::ItemInfo;
    use crate::utils::time_utils::ymd;

    fn dated_info() -> ItemInfoTable {
        let mut info = ItemInfoTable::new();
        info.insert(
            "quantmodel_us_largecap_20120101".to_string(),
            ItemInfo::new(
                "us_largecap",
                Some("quantmodel"),
                Some(ymd(2012, 1, 1).unwrap()),
                Some(ymd(2012, 2, 1).unwrap()),
            ),
        );
        info.insert(
            "quantmodel_us_largecap_20120201".to_string(),
            ItemInfo::new(
                "us_largecap",
                Some("quantmodel"),
                Some(ymd(2012, 2, 1).unwrap()),
                Some(ymd(2012, 3, 1).unwrap()),
            ),
        );
        info.insert(
            "riskmodel_US_RiskModel".to_string(),
            ItemInfo::new("US_RiskModel", Some("riskmodel"), None, None),
        );
        info
    }

    #[test]
    fn test_build_variants() {
        let index = IntervalIndex::build(&dated_info());
        assert_eq!(index.group_count(), 2);

        let quant = index.group(Some("quantmodel")).unwrap();
        match quant.get("us_largecap").unwrap() {
            IntervalEntry::Dated(entries) => {
                assert_eq!(entries.len(), 2);
                // ascending by start
                assert_eq!(entries[0].item, "quantmodel_us_largecap_20120101");
                assert_eq!(entries[1].item, "quantmodel_us_largecap_20120201");
            }
            other => panic!("expected dated entry, got {:?}", other),
        }

        let risk = index.group(Some("riskmodel")).unwrap();
        match risk.get("US_RiskModel").unwrap() {
            IntervalEntry::Unconditional(name) => {
                assert_eq!(name, "riskmodel_US_RiskModel");
            }
            other => panic!("expected unconditional entry, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_group() {
        let index = IntervalIndex::build(&dated_info());
        assert!(index.group(Some("execmodel")).is_none());
        assert!(index.group(None).is_none());
    }

    #[test]
    fn test_null_start_sorts_first() {
        let mut info = ItemInfoTable::new();
        info.insert(
            "g_b_open".to_string(),
            ItemInfo::new("b", Some("g"), None, Some(ymd(2012, 1, 1).unwrap())),
        );
        info.insert(
            "g_b_20120101".to_string(),
            ItemInfo::new("b", Some("g"), Some(ymd(2012, 1, 1).unwrap()), None),
        );

        let index = IntervalIndex::build(&info);
        match index.group(Some("g")).unwrap().get("b").unwrap() {
            IntervalEntry::Dated(entries) => {
                assert!(entries[0].start.is_none());
                assert_eq!(entries[1].item, "g_b_20120101");
            }
            other => panic!("expected dated entry, got {:?}", other),
        }
    }

    #[test]
    fn test_asof_search() {
        let index = IntervalIndex::build(&dated_info());
        let entries = match index.group(Some("quantmodel")).unwrap().get("us_largecap").unwrap() {
            IntervalEntry::Dated(entries) => entries,
            other => panic!("expected dated entry, got {:?}", other),
        };

        // inside the first window
        let hit = asof(entries, ymd(2012, 1, 15).unwrap()).unwrap();
        assert_eq!(hit.item, "quantmodel_us_largecap_20120101");

        // exactly on the second window's start
        let hit = asof(entries, ymd(2012, 2, 1).unwrap()).unwrap();
        assert_eq!(hit.item, "quantmodel_us_largecap_20120201");

        // past every window start: still lands on the last window
        let hit = asof(entries, ymd(2012, 12, 31).unwrap()).unwrap();
        assert_eq!(hit.item, "quantmodel_us_largecap_20120201");

        // before every window start
        assert!(asof(entries, ymd(2011, 12, 31).unwrap()).is_none());
    }
}
