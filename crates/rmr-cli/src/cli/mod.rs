//! CLI for the rmr remote manifest resolver.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rmr_core::config;

use commands::{run_config, run_hub, run_validate};

/// Top-level CLI for the rmr remote manifest resolver.
#[derive(Debug, Parser)]
#[command(name = "rmr")]
#[command(about = "rmr: remote manifest resolution for pipeline orchestrators", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a manifest from the catalog hub and print it.
    Hub {
        /// Resource name in the catalog.
        name: String,

        /// Resource kind: "task" or "pipeline".
        #[arg(long, default_value = "task")]
        kind: String,

        /// Resource version, e.g. "0.1".
        #[arg(long)]
        version: String,

        /// Catalog to pull the resource from.
        #[arg(long)]
        catalog: String,

        /// Write the manifest to a file instead of stdout.
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<String>,

        /// Abort resolution after N seconds.
        #[arg(long, value_name = "N")]
        timeout_secs: Option<u64>,
    },

    /// Validate a parameter set against a resolver type without fetching.
    Validate {
        /// Resolver type label ("hub" or "bundles").
        #[arg(long = "type", value_name = "TYPE")]
        resolver_type: String,

        /// Parameter in name=value form; repeatable.
        #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,
    },

    /// Show the config file path and effective configuration.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Hub {
                name,
                kind,
                version,
                catalog,
                output,
                timeout_secs,
            } => run_hub(
                &cfg,
                &kind,
                &name,
                &version,
                &catalog,
                output.as_deref(),
                timeout_secs,
            )?,
            CliCommand::Validate {
                resolver_type,
                params,
            } => run_validate(&cfg, &resolver_type, &params)?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}
