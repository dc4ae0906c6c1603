//! Persisted player data
//!
//! A single JSON record kept in LocalStorage on the web. Native builds keep
//! it in memory only.

pub mod save_data;

pub use save_data::SaveData;
