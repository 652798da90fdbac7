//! Stage two of the pipeline: turning bare dependency names into typed
//! references against the flat artifact pool.
//!
//! Dependencies are always expressed as references into the pool of base
//! artifacts, never into sibling groups directly. The group recorded on a
//! typed reference is the one declared by the matched pool record, which is
//! exactly where the resolver will look the record up again.

use indexmap::IndexMap;

use crate::catalog::{ArtifactRecord, ArtifactRef, BareRef, IndexedCatalog, LinkedCatalog};
use crate::error::ArchgraphError;
use crate::normalizer::Normalizer;

/// Links every record of the indexed catalog.
///
/// Each bare dependency name is normalized with the rule of the *owning*
/// record's group, then looked up in the pool by exact name. A miss is an
/// [`ArchgraphError::UnresolvedReference`] naming the dependency and its
/// owner; deferring that hole to resolution time would only trade a clear
/// error for a fault deep inside the resolver.
pub fn link(
    indexed: &IndexedCatalog,
    normalizer: &Normalizer,
) -> Result<LinkedCatalog, ArchgraphError> {
    let mut groups = IndexMap::with_capacity(indexed.groups.len());

    for (name, records) in &indexed.groups {
        let mut linked = IndexMap::with_capacity(records.len());
        for (key, record) in records {
            linked.insert(key.clone(), link_record(record, indexed, normalizer)?);
        }
        groups.insert(name.clone(), linked);
    }

    Ok(LinkedCatalog { groups })
}

fn link_record(
    record: &ArtifactRecord<BareRef>,
    indexed: &IndexedCatalog,
    normalizer: &Normalizer,
) -> Result<ArtifactRecord<ArtifactRef>, ArchgraphError> {
    let mut dependencies = Vec::with_capacity(record.dependencies.len());

    for bare in &record.dependencies {
        let wanted = normalizer.normalize(bare, &record.group);

        let target = indexed.pool.get(&wanted).ok_or_else(|| {
            ArchgraphError::UnresolvedReference {
                dependency: wanted.clone(),
                owner: record.name.clone(),
                group: record.group.clone(),
            }
        })?;

        dependencies.push(ArtifactRef {
            name: wanted,
            group: target.group.clone(),
        });
    }

    Ok(record.with_dependencies(dependencies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::indexer::index;

    fn record(name: &str, deps: &[&str]) -> ArtifactRecord<BareRef> {
        ArtifactRecord {
            name: name.to_string(),
            group: String::new(),
            extra: IndexMap::new(),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn pool_record(name: &str, group: &str, deps: &[&str]) -> ArtifactRecord<BareRef> {
        let mut record = record(name, deps);
        record.group = group.to_string();
        record
    }

    fn indexed(artifacts: Vec<ArtifactRecord<BareRef>>, apps: Vec<ArtifactRecord<BareRef>>) -> IndexedCatalog {
        let mut groups = IndexMap::new();
        groups.insert("applications".to_string(), apps);
        index(Catalog { artifacts, groups })
    }

    #[test]
    fn test_typed_reference_takes_pool_group() {
        let indexed = indexed(
            vec![pool_record("bar", "libraries", &[])],
            vec![record("foo", &["bar"])],
        );

        let linked = link(&indexed, &Normalizer::default()).unwrap();
        let foo = &linked.groups["applications"]["foo"];

        assert_eq!(
            foo.dependencies,
            vec![ArtifactRef {
                name: "bar".to_string(),
                group: "libraries".to_string(),
            }]
        );
    }

    #[test]
    fn test_normalization_runs_before_lookup() {
        let indexed = indexed(
            vec![
                pool_record("widget-api", "services", &[]),
                pool_record("ui", "libraries", &["@api/widget-client"]),
            ],
            vec![],
        );

        let linked = link(&indexed, &Normalizer::default()).unwrap();
        let ui = &linked.groups["libraries"]["ui"];

        assert_eq!(ui.dependencies[0].name, "widget-api");
        assert_eq!(ui.dependencies[0].group, "services");
    }

    #[test]
    fn test_unresolved_reference_fails_fast() {
        let indexed = indexed(vec![], vec![record("foo", &["missing"])]);

        let err = link(&indexed, &Normalizer::default()).unwrap_err();
        match err {
            ArchgraphError::UnresolvedReference {
                dependency, owner, ..
            } => {
                assert_eq!(dependency, "missing");
                assert_eq!(owner, "foo");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pool_records_link_against_pool() {
        let indexed = indexed(
            vec![
                pool_record("baz", "libraries", &[]),
                pool_record("bar", "libraries", &["baz"]),
            ],
            vec![],
        );

        let linked = link(&indexed, &Normalizer::default()).unwrap();
        let bar = &linked.groups["libraries"]["bar"];
        assert_eq!(bar.dependencies[0].name, "baz");
    }
}
