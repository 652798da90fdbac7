use thiserror::Error;

/// Structural catalog-integrity failures. None of these are transient: each
/// one aborts the run before any resolved output is produced.
#[derive(Debug, Error)]
pub enum ArchgraphError {
    #[error("Dependency '{dependency}' of '{owner}' ({group}) does not exist in the artifact pool")]
    UnresolvedReference {
        dependency: String,
        owner: String,
        group: String,
    },

    #[error("Cyclic dependency: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("Reference into unknown group '{0}'")]
    UnknownGroup(String),

    #[error("Artifact '{name}' not found in group '{group}'")]
    UnknownArtifact { name: String, group: String },

    #[error("Couldn't parse the catalog.\n{0}")]
    Catalog(#[from] serde_json::Error),
}
