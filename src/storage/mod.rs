//! Storage backends for users and todos

pub mod memory;
pub mod traits;

// Re-export main components
pub use memory::MemoryStorage;
pub use traits::{StorageProvider, StorageSession, TodoStorage, UserStorage};
