// src/extractors/mod.rs
pub mod case_info;
pub mod fields;
pub mod parties;

// Re-export key extraction types for convenience
pub use case_info::{parse_case_info, NOT_INFORMED};
pub use fields::FieldSet;
pub use parties::parse_parties;
