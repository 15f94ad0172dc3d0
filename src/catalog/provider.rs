//! Trait definition for upstream catalog clients.

use async_trait::async_trait;
use movieskyy_common::{CatalogMode, CatalogPage};

use super::FetchError;

/// Issues a single catalog request.
///
/// Implementations perform no retries and return every failure as a
/// [`FetchError`]; deciding what the user sees is left to the caller.
/// Clients are shared across tasks behind an `Arc`.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Whether a usable credential is available right now.
    fn has_credential(&self) -> bool {
        true
    }

    /// Fetch `page` (1-based) of the listing or search described by `mode`.
    async fn fetch_catalog(&self, mode: &CatalogMode, page: u32)
        -> Result<CatalogPage, FetchError>;
}
