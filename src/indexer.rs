//! Stage one of the pipeline: re-keying the catalog's record sequences by
//! artifact name.

use indexmap::IndexMap;

use crate::catalog::{ArtifactRecord, BareRef, Catalog, IndexedCatalog, POOL_GROUP};

/// Indexes every group of the catalog by artifact name.
///
/// Records in a named group section take that section's name as their group.
/// Pool records keep their declared group, falling back to [`POOL_GROUP`]
/// when none is set, and are additionally placed into their group's map so
/// that typed references can be dereferenced later.
///
/// If two records in the same group share a name, the later one wins. That
/// merge policy is part of the output contract, so a collision is only
/// surfaced as a warning.
pub fn index(catalog: Catalog) -> IndexedCatalog {
    let mut groups: IndexMap<String, IndexMap<String, ArtifactRecord<BareRef>>> = IndexMap::new();

    for (section, records) in catalog.groups {
        let indexed = groups.entry(section.clone()).or_default();
        for mut record in records {
            record.group = section.clone();
            insert_keyed(indexed, record);
        }
    }

    let mut pool = IndexMap::new();
    for mut record in catalog.artifacts {
        if record.group.is_empty() {
            record.group = POOL_GROUP.to_string();
        }
        insert_keyed(groups.entry(record.group.clone()).or_default(), record.clone());
        insert_keyed(&mut pool, record);
    }

    IndexedCatalog { pool, groups }
}

fn insert_keyed(
    map: &mut IndexMap<String, ArtifactRecord<BareRef>>,
    record: ArtifactRecord<BareRef>,
) {
    let key = record.name.clone();
    if let Some(previous) = map.insert(key, record) {
        tracing::warn!(
            name = %previous.name,
            group = %previous.group,
            "duplicate artifact name, keeping the later record"
        );
    }
}
