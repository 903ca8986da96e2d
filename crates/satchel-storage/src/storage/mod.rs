//! The storage engine and field extraction.

mod engine;
mod extract;

pub use engine::JsonStorage;
pub use extract::extract_fields;
