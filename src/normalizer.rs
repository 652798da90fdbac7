//! Group-specific rewriting of dependency names before pool lookup.
//!
//! Some groups declare dependencies using an external naming convention that
//! differs from the names in the artifact pool. A [`Normalizer`] holds one
//! rewrite rule per group tag and applies the matching rule (identity when
//! none is registered) to a dependency name before the linker looks it up.

use std::collections::HashMap;
use std::fmt::Debug;

const API_PREFIX: &str = "@api/";
const CLIENT_SUFFIX: &str = "-client";
const API_SUFFIX: &str = "-api";

/// A single dependency-name rewrite rule.
pub trait NameRule: Send + Sync {
    fn rewrite(&self, name: &str) -> String;
}

/// Built-in rule for library artifacts referencing generated API clients:
/// `@api/widget-client` refers to the pool artifact named `widget-api`, so
/// the `@api/` prefix is stripped and the `-client` suffix replaced with
/// `-api`. Names without the prefix pass through unchanged.
pub struct ApiClientRule;

impl NameRule for ApiClientRule {
    fn rewrite(&self, name: &str) -> String {
        match name.strip_prefix(API_PREFIX) {
            Some(rest) => rest.replacen(CLIENT_SUFFIX, API_SUFFIX, 1),
            None => name.to_string(),
        }
    }
}

/// Registry of per-group [`NameRule`]s, consulted by the linker with the
/// group of the artifact that *owns* the dependency.
pub struct Normalizer {
    rules: HashMap<String, Box<dyn NameRule>>,
}

impl Normalizer {
    /// A normalizer with no rules at all; every name passes through as-is.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Registers `rule` for artifacts of `group`, replacing any rule already
    /// registered for it.
    pub fn register(&mut self, group: impl Into<String>, rule: impl NameRule + 'static) -> &mut Self {
        self.rules.insert(group.into(), Box::new(rule));
        self
    }

    /// Rewrites `name` according to the rule registered for `group`, or
    /// returns it unchanged when the group has no rule.
    pub fn normalize(&self, name: &str, group: &str) -> String {
        match self.rules.get(group) {
            Some(rule) => rule.rewrite(name),
            None => name.to_string(),
        }
    }
}

impl Default for Normalizer {
    /// The stock registry: the [`ApiClientRule`] for library artifacts,
    /// registered under both the singular and the plural group tag.
    fn default() -> Self {
        let mut normalizer = Self::empty();
        normalizer.register("library", ApiClientRule);
        normalizer.register("libraries", ApiClientRule);
        normalizer
    }
}

impl Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Normalizer({} rules)", self.rules.len())
    }
}
