//! Data model for the architecture catalog across its pipeline stages.
//!
//! A dependency edge takes three successive shapes as the catalog moves
//! through the pipeline, and each shape is a distinct type so that every
//! stage's contract is checked at compile time:
//!
//! * a *bare reference* — just the dependency's name ([`BareRef`]);
//! * a *typed reference* — name plus the group it was found in
//!   ([`ArtifactRef`]), produced by the linker;
//! * a *resolved reference* — the fully expanded record behind a shared
//!   [`Arc`] ([`ResolvedArtifact`]), produced by the resolver.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The group that pool records without an explicit group fall back to.
pub const POOL_GROUP: &str = "artifacts";

/// A dependency as declared in the source catalog, by bare name.
pub type BareRef = String;

/// A dependency after linking: the artifact's name and the group the linker
/// found it in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub name: String,
    pub group: String,
}

/// A single artifact record, generic over the dependency stage `D`.
///
/// Descriptive fields other than `name` and `group` are carried through the
/// pipeline untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord<D> {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
    #[serde(default)]
    pub dependencies: Vec<D>,
}

impl<D> ArtifactRecord<D> {
    /// Rewrites the record to the next dependency stage, keeping every other
    /// field as-is.
    pub fn with_dependencies<T>(&self, dependencies: Vec<T>) -> ArtifactRecord<T> {
        ArtifactRecord {
            name: self.name.clone(),
            group: self.group.clone(),
            extra: self.extra.clone(),
            dependencies,
        }
    }
}

/// The raw catalog as loaded from its source: a flat `artifacts` pool used as
/// the authoritative lookup table during linking, plus any number of named
/// group sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub artifacts: Vec<ArtifactRecord<BareRef>>,
    #[serde(flatten)]
    pub groups: IndexMap<String, Vec<ArtifactRecord<BareRef>>>,
}

impl Catalog {
    /// Parses a catalog from its JSON source form.
    pub fn from_json(raw: &str) -> Result<Self, crate::error::ArchgraphError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// The catalog after indexing: every group re-keyed by artifact name, with
/// the flat pool indexed by name as well. Pool records are also reachable
/// under their own group so later stages can dereference typed references.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedCatalog {
    pub pool: IndexMap<String, ArtifactRecord<BareRef>>,
    pub groups: IndexMap<String, IndexMap<String, ArtifactRecord<BareRef>>>,
}

impl IndexedCatalog {
    /// Flattens the indexed catalog back into its raw sequence form. Mostly
    /// useful for feeding an already-indexed catalog through the pipeline
    /// again.
    ///
    /// Pool records are copied into their group's map at index time, so the
    /// group maps are filtered against the pool here; otherwise each pool
    /// record would be emitted twice.
    pub fn into_catalog(self) -> Catalog {
        let Self { pool, groups } = self;

        let groups = groups
            .into_iter()
            .map(|(name, records)| {
                let records = records
                    .into_values()
                    .filter(|record| pool.get(&record.name) != Some(record))
                    .collect();
                (name, records)
            })
            .collect();

        Catalog {
            artifacts: pool.into_values().collect(),
            groups,
        }
    }
}

/// The catalog after linking: same shape as [`IndexedCatalog`], with every
/// dependency turned into a typed [`ArtifactRef`]. The flat pool has served
/// its lookup purpose by this point, so only the grouped maps remain.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedCatalog {
    pub groups: IndexMap<String, IndexMap<String, ArtifactRecord<ArtifactRef>>>,
}

/// A fully expanded artifact: its dependencies are resolved records
/// themselves, shared via [`Arc`] with every other parent that depends on
/// them.
#[derive(Debug, PartialEq, Serialize)]
pub struct ResolvedArtifact {
    pub name: String,
    pub group: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
    pub dependencies: Vec<Arc<ResolvedArtifact>>,
}

/// Terminal output of the pipeline: group name to artifact name to shared
/// resolved record. Serializes as a plain nested mapping.
#[derive(Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedCatalog {
    pub groups: IndexMap<String, IndexMap<String, Arc<ResolvedArtifact>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_deserialization() {
        let catalog: Catalog = serde_json::from_value(json!({
            "artifacts": [
                { "name": "bar", "group": "libraries", "team": "platform", "dependencies": [] }
            ],
            "applications": [
                { "name": "foo", "dependencies": ["bar"] }
            ]
        }))
        .unwrap();

        assert_eq!(catalog.artifacts.len(), 1);
        assert_eq!(catalog.artifacts[0].extra["team"], json!("platform"));
        assert_eq!(catalog.groups["applications"][0].dependencies, vec!["bar"]);
        // The section name is not a record field, so the group is filled in
        // later by the indexer.
        assert_eq!(catalog.groups["applications"][0].group, "");
    }

    #[test]
    fn test_catalog_roundtrip() {
        let value = json!({
            "artifacts": [
                { "name": "bar", "group": "libraries", "dependencies": [] }
            ],
            "services": [
                { "name": "gateway", "group": "services", "owner": "infra", "dependencies": ["bar"] }
            ]
        });

        let catalog: Catalog = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&catalog).unwrap(), value);
    }

    #[test]
    fn test_missing_dependencies_defaults_to_empty() {
        let record: ArtifactRecord<BareRef> =
            serde_json::from_value(json!({ "name": "baz" })).unwrap();
        assert!(record.dependencies.is_empty());
    }
}
