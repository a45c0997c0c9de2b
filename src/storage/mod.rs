//! Storage Layer
//!
//! On-disk layout resolution and JSON configuration.

pub mod config;
pub mod layout;

pub use config::{ConfigService, ConfigUpdate, StoreConfig};
pub use layout::DataLayout;
