//! Todo resources and their ownership gate

pub mod enrichment;
pub mod gate;
pub mod model;

// Re-export main components
pub use enrichment::{Enricher, HttpEnricher, NoopEnricher};
pub use gate::TodoGate;
pub use model::{Todo, TodoFields, TodoId, TodoRequest};
