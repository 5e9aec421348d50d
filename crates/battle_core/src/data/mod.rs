//! Data structures for unit configuration.
//!
//! Pure data types designed to be deserialized from RON documents.
//!
//! **Note:** This module contains no IO - it only parses strings.
//! File loading is handled by `battle_headless`.

mod catalog;
mod unit_data;

pub use catalog::UnitCatalog;
pub use unit_data::{UnitData, DEFAULT_RADIUS};
