//! `rmr validate --type T -p name=value` – validate a parameter set against
//! a resolver type without fetching anything.

use anyhow::{bail, Context, Result};
use std::sync::Arc;

use rmr_core::config::RmrConfig;
use rmr_core::context::ResolutionContext;
use rmr_core::params::Param;
use rmr_core::resolver::bundle::{BundleFetcher, BundleRequest, BundleResolver};
use rmr_core::resolver::ResolverRegistry;

/// Stand-in fetch backend: the CLI has no OCI puller wired in, so bundle
/// params can be validated but resolution through it fails cleanly.
struct UnconfiguredFetcher;

impl BundleFetcher for UnconfiguredFetcher {
    fn fetch(
        &self,
        _ctx: &ResolutionContext,
        _request: &BundleRequest,
    ) -> anyhow::Result<Vec<u8>> {
        bail!("no bundle fetch backend configured")
    }
}

pub fn run_validate(cfg: &RmrConfig, resolver_type: &str, raw_params: &[String]) -> Result<()> {
    let params = parse_params(raw_params)?;

    let mut registry = ResolverRegistry::new();
    registry.register(Box::new(cfg.hub_resolver()));
    registry.register(Box::new(BundleResolver::new(Arc::new(UnconfiguredFetcher))));

    let ctx = ResolutionContext::new().with_gates(cfg.gates());
    let resolver = registry
        .route_type(&ctx, resolver_type)
        .with_context(|| format!("no resolver registered for type \"{resolver_type}\""))?;

    resolver.validate_params(&ctx, &params)?;
    println!("params valid for resolver type \"{resolver_type}\"");
    Ok(())
}

/// Parses repeated `name=value` pairs into a parameter set, preserving order.
fn parse_params(raw: &[String]) -> Result<Vec<Param>> {
    raw.iter()
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => Ok(Param::string(name, value)),
            None => bail!("param \"{pair}\" is not in name=value form"),
        })
        .collect()
}
