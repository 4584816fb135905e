pub mod item;
pub mod records;
pub mod version_ref;

pub use item::{ConfigItem, ParamSet};
pub use records::{ItemInfo, ItemInfoTable, ItemTable, VersionId, VersionRecord, VersionTable};
pub use version_ref::VersionRef;
