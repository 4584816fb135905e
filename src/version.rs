pub mod index;
pub mod snapshot;

// Re-export commonly used types
pub use index::{asof, DatedEntry, IntervalEntry, IntervalIndex};
pub use snapshot::ConfigVersion;
