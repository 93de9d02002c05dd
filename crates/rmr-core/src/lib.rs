//! rmr-core: resolver contract and reference backends for remote manifest
//! resolution.
//!
//! A pipeline orchestrator hands a parameter set and a per-request context to
//! a backend selected by label match; the backend fetches the manifest and
//! returns its raw bytes. See [`resolver`] for the contract and the hub and
//! bundle backends.

pub mod config;
pub mod context;
pub mod logging;
pub mod params;
pub mod resolver;
