//! pressgen Core Library
//!
//! Content records, configuration, data loading and formatting helpers for the
//! pressgen static page generator.

pub mod config;
pub mod content;
pub mod error;
pub mod format;
pub mod loader;
pub mod lookup;

pub use config::Config;
pub use content::{Author, Category, Page, Post, Product, RecordId};
pub use error::{CoreError, Result};
pub use loader::SiteData;
pub use lookup::Lookup;
