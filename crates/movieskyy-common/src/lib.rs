//! Movieskyy-Common: Shared catalog types.
//!
//! This crate provides the types that travel between the upstream client, the
//! normalizer, the proxy routes and the fetch orchestrator:
//!
//! - **Categories**: The fixed set of listing modes and their upstream paths
//! - **Records**: Raw catalog records and pages as received from TMDB, and the
//!   display records derived from them
//!
//! # Examples
//!
//! ```
//! use movieskyy_common::{Category, CatalogMode};
//!
//! let category: Category = "now_playing".parse().unwrap();
//! assert_eq!(category.upstream_path(), "/movie/now_playing");
//!
//! let mode = CatalogMode::search("batman");
//! assert!(mode.is_search());
//! ```

pub mod category;
pub mod record;

pub use category::{CatalogMode, Category, ParseCategoryError};
pub use record::{CatalogPage, CatalogRecord, DisplayRecord};
