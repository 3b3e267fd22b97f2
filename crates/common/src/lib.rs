//! Broadsheet Common Library
//!
//! Shared code for the Broadsheet article service including:
//! - Database models, schema bootstrap and repository
//! - Cursor-based pagination
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod pagination;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{ArticleWithAuthor, DbPool, NewArticle, Repository};
pub use errors::{AppError, Result};
pub use pagination::{Cursor, Page, PageRequest};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
