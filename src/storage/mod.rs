//! Storage implementations for different backends

pub mod in_memory;
pub mod json_lines;

pub use in_memory::InMemoryRecordStore;
pub use json_lines::JsonLinesRecordStore;
