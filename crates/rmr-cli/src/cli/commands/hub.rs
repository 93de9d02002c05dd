//! `rmr hub <name> --version <v> --catalog <c>` – resolve a manifest from
//! the catalog hub.

use anyhow::{Context, Result};
use std::time::Duration;

use rmr_core::config::RmrConfig;
use rmr_core::context::ResolutionContext;
use rmr_core::params::{Param, PARAM_KIND, PARAM_NAME};
use rmr_core::resolver::hub::{PARAM_CATALOG, PARAM_VERSION};
use rmr_core::resolver::ManifestResolver;

pub fn run_hub(
    cfg: &RmrConfig,
    kind: &str,
    name: &str,
    version: &str,
    catalog: &str,
    output: Option<&str>,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let resolver = cfg.hub_resolver();

    let mut ctx = ResolutionContext::new().with_gates(cfg.gates());
    if let Some(secs) = timeout_secs {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }

    let params = vec![
        Param::string(PARAM_KIND, kind),
        Param::string(PARAM_NAME, name),
        Param::string(PARAM_VERSION, version),
        Param::string(PARAM_CATALOG, catalog),
    ];

    let resource = resolver.resolve(&ctx, &params)?;
    if resource.content.is_empty() {
        // The hub reports "not found" as empty content, not an error.
        anyhow::bail!("no {kind} named \"{name}\" (version {version}) in catalog \"{catalog}\"");
    }

    match output {
        Some(path) => {
            std::fs::write(path, &resource.content)
                .with_context(|| format!("write manifest to {path}"))?;
            println!("Wrote {} bytes to {path}", resource.content.len());
        }
        None => {
            print!("{}", String::from_utf8_lossy(&resource.content));
        }
    }
    Ok(())
}
