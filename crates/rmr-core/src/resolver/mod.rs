//! Resolver contract: selector identity, parameter validation, resolution.
//!
//! The orchestrator depends only on the [`ManifestResolver`] trait and routes
//! each remote reference to a backend by selector label match; it knows
//! nothing about the hub API or the bundle format behind a backend.

pub mod bundle;
pub mod hub;

mod error;
pub use error::ResolutionError;

use std::collections::HashMap;

use crate::context::ResolutionContext;
use crate::params::Param;

/// Label key under which every backend publishes its type identifier.
pub const LABEL_KEY_RESOLVER_TYPE: &str = "resolution.rmr.dev/type";

/// Label set identifying a resolver type. Produced fresh per request and
/// never mutated by the caller.
pub type Selector = HashMap<String, String>;

/// Manifest bytes produced by a successful resolution. Created fresh per
/// `resolve` call and owned exclusively by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    pub content: Vec<u8>,
}

impl ResolvedResource {
    pub fn new(content: Vec<u8>) -> Self {
        ResolvedResource { content }
    }
}

/// Contract implemented by every resolver backend (hub, bundles, future
/// types).
///
/// Backends hold only immutable configuration, so a single instance is safe
/// to call concurrently from independent workers without locking.
pub trait ManifestResolver: Send + Sync {
    /// Returns the selector identifying this backend. Pure: no I/O, no error
    /// path, stable across calls.
    fn selector(&self, ctx: &ResolutionContext) -> Selector;

    /// Checks enablement first, then required parameter names and
    /// backend-specific constraints. Performs no network I/O.
    fn validate_params(
        &self,
        ctx: &ResolutionContext,
        params: &[Param],
    ) -> Result<(), ResolutionError>;

    /// Performs the fetch. Re-checks enablement and re-derives inputs from
    /// `params`; callers are not required to run `validate_params` first.
    fn resolve(
        &self,
        ctx: &ResolutionContext,
        params: &[Param],
    ) -> Result<ResolvedResource, ResolutionError>;
}

/// Registry of backends, routed by selector label match.
#[derive(Default)]
pub struct ResolverRegistry {
    resolvers: Vec<Box<dyn ManifestResolver>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, resolver: Box<dyn ManifestResolver>) {
        self.resolvers.push(resolver);
    }

    /// Returns the first backend whose selector labels are all present in
    /// `requested` with equal values, or `None` when no backend matches.
    pub fn route(
        &self,
        ctx: &ResolutionContext,
        requested: &HashMap<String, String>,
    ) -> Option<&dyn ManifestResolver> {
        self.resolvers.iter().map(|r| r.as_ref()).find(|r| {
            let selector = r.selector(ctx);
            selector
                .iter()
                .all(|(key, value)| requested.get(key) == Some(value))
        })
    }

    /// Routes by the resolver type label alone.
    pub fn route_type(
        &self,
        ctx: &ResolutionContext,
        type_label: &str,
    ) -> Option<&dyn ManifestResolver> {
        let mut requested = HashMap::new();
        requested.insert(
            LABEL_KEY_RESOLVER_TYPE.to_string(),
            type_label.to_string(),
        );
        self.route(ctx, &requested)
    }
}
