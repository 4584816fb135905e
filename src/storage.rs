pub mod json_file;
pub mod memory;
pub mod store;

// 匯出後端存儲接口和實現
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::ConfigStore;
