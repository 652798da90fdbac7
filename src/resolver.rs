//! Stage three of the pipeline: expanding typed references into fully
//! resolved, shared sub-trees.
//!
//! Expansion is depth-first over an explicit arena keyed by `(group, name)`.
//! Each arena slot is either `InProgress` (the artifact is somewhere on the
//! current expansion path) or `Done` (the finished sub-tree, behind an `Arc`
//! handed out to every parent). The arena doubles as the cycle detector:
//! reaching an `InProgress` slot again means the dependency chain closed on
//! itself, which is reported with the offending path instead of recursing
//! until the stack runs out.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::catalog::{ArtifactRecord, ArtifactRef, LinkedCatalog, ResolvedArtifact, ResolvedCatalog};
use crate::error::ArchgraphError;

/// Resolves every record of every group in the linked catalog.
///
/// The arena is shared across the whole pass, so an artifact reachable from
/// multiple parents is expanded exactly once and each parent receives the
/// same `Arc`.
pub fn resolve(linked: &LinkedCatalog) -> Result<ResolvedCatalog, ArchgraphError> {
    let mut resolver = Resolver::new(linked);
    let mut groups = IndexMap::with_capacity(linked.groups.len());

    for (group, records) in &linked.groups {
        let mut resolved = IndexMap::with_capacity(records.len());
        for name in records.keys() {
            let reference = ArtifactRef {
                name: name.clone(),
                group: group.clone(),
            };
            resolved.insert(name.clone(), resolver.resolve_ref(&reference)?);
        }
        groups.insert(group.clone(), resolved);
    }

    tracing::debug!(
        fetches = resolver.fetches,
        hits = resolver.hits,
        "resolution pass finished"
    );

    Ok(ResolvedCatalog { groups })
}

enum Slot {
    InProgress,
    Done(Arc<ResolvedArtifact>),
}

struct Resolver<'a> {
    linked: &'a LinkedCatalog,
    arena: IndexMap<ArtifactRef, Slot>,
    /// Current expansion path, for cycle reporting.
    stack: Vec<ArtifactRef>,
    /// Raw record fetches; one per unique artifact on a healthy catalog.
    fetches: usize,
    hits: usize,
}

impl<'a> Resolver<'a> {
    fn new(linked: &'a LinkedCatalog) -> Self {
        Self {
            linked,
            arena: IndexMap::new(),
            stack: Vec::new(),
            fetches: 0,
            hits: 0,
        }
    }

    fn resolve_ref(
        &mut self,
        reference: &ArtifactRef,
    ) -> Result<Arc<ResolvedArtifact>, ArchgraphError> {
        match self.arena.get(reference) {
            Some(Slot::Done(node)) => {
                self.hits += 1;
                return Ok(node.clone());
            }
            Some(Slot::InProgress) => return Err(self.cycle_error(reference)),
            None => {}
        }

        self.arena.insert(reference.clone(), Slot::InProgress);
        self.stack.push(reference.clone());

        let record = self.fetch(reference)?;
        let mut dependencies = Vec::with_capacity(record.dependencies.len());
        for dependency in &record.dependencies {
            dependencies.push(self.resolve_ref(dependency)?);
        }

        let node = Arc::new(ResolvedArtifact {
            name: record.name.clone(),
            group: record.group.clone(),
            extra: record.extra.clone(),
            dependencies,
        });

        self.stack.pop();
        self.arena.insert(reference.clone(), Slot::Done(node.clone()));

        Ok(node)
    }

    fn fetch(
        &mut self,
        reference: &ArtifactRef,
    ) -> Result<&'a ArtifactRecord<ArtifactRef>, ArchgraphError> {
        let records = self
            .linked
            .groups
            .get(&reference.group)
            .ok_or_else(|| ArchgraphError::UnknownGroup(reference.group.clone()))?;

        let record = records.get(&reference.name).ok_or_else(|| {
            ArchgraphError::UnknownArtifact {
                name: reference.name.clone(),
                group: reference.group.clone(),
            }
        })?;

        self.fetches += 1;
        Ok(record)
    }

    fn cycle_error(&self, reference: &ArtifactRef) -> ArchgraphError {
        let start = self
            .stack
            .iter()
            .position(|r| r == reference)
            .unwrap_or_default();

        let mut cycle: Vec<String> = self.stack[start..]
            .iter()
            .map(|r| r.name.clone())
            .collect();
        cycle.push(reference.name.clone());

        ArchgraphError::CyclicDependency { cycle }
    }
}
