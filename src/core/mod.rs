//! Core server state

pub mod state;

// Re-export main components
pub use state::AppState;
