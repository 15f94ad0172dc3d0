//! Upstream catalog access.
//!
//! # Module layout
//!
//! - [`provider`] -- The [`CatalogClient`] trait.
//! - [`tmdb`] -- TMDB implementation of the trait.
//! - [`credentials`] -- API key lookup, repeated for every request.
//! - [`normalize`] -- Raw record to display record mapping.
//! - [`error`] -- [`FetchError`], the typed failure of a request.

pub mod credentials;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod tmdb;

pub use credentials::{CredentialSource, EnvFileCredentials, StaticCredentials};
pub use error::FetchError;
pub use normalize::{format_release_date, DateLocale, Normalizer};
pub use provider::CatalogClient;
pub use tmdb::TmdbCatalogClient;
