#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod catalog;
mod error;
pub mod indexer;
pub mod linker;
pub mod normalizer;
pub mod resolver;

pub use crate::catalog::{
    ArtifactRecord, ArtifactRef, BareRef, Catalog, IndexedCatalog, LinkedCatalog, POOL_GROUP,
    ResolvedArtifact, ResolvedCatalog,
};
pub use crate::error::ArchgraphError;
pub use crate::normalizer::{ApiClientRule, NameRule, Normalizer};

/// Runs the full pipeline over `catalog` with the stock [`Normalizer`].
pub fn resolve(catalog: Catalog) -> Result<ResolvedCatalog, ArchgraphError> {
    resolve_with(catalog, &Normalizer::default())
}

/// Runs the full pipeline — index, link, resolve — with a caller-provided
/// [`Normalizer`].
pub fn resolve_with(
    catalog: Catalog,
    normalizer: &Normalizer,
) -> Result<ResolvedCatalog, ArchgraphError> {
    let indexed = indexer::index(catalog);
    let linked = linker::link(&indexed, normalizer)?;
    resolver::resolve(&linked)
}
