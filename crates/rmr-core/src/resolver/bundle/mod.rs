//! Bundle backend: resolves a manifest from a content-addressable OCI-style
//! artifact bundle.
//!
//! The pull/extraction mechanism lives behind the [`BundleFetcher`] trait;
//! this backend validates the bundle-identifying parameters, delegates the
//! fetch, and wraps the returned bytes. Fetch errors (not-found, auth
//! failure, corrupt bundle) are propagated without reinterpretation.

use std::str::FromStr;
use std::sync::Arc;

use crate::context::ResolutionContext;
use crate::params::{self, Param, ResourceKind, PARAM_KIND, PARAM_NAME};
use crate::resolver::{
    ManifestResolver, ResolutionError, ResolvedResource, Selector, LABEL_KEY_RESOLVER_TYPE,
};

/// Selector value identifying the bundle backend.
pub const LABEL_VALUE_BUNDLE_RESOLVER_TYPE: &str = "bundles";

/// Parameter name for the artifact bundle reference (an image reference
/// string), passed through to the fetch mechanism uninterpreted.
pub const PARAM_BUNDLE: &str = "bundle";
/// Parameter name for the credential identity the fetch mechanism should
/// use; passed through, never interpreted here.
pub const PARAM_SERVICE_ACCOUNT: &str = "serviceAccount";

/// Fixed message returned whenever the bundle resolver type is disabled.
pub const DISABLED_ERROR: &str =
    "cannot handle resolution request, enable-bundles-resolver feature flag not true";

const REQUIRED_PARAMS: &[&str] = &[PARAM_KIND, PARAM_NAME, PARAM_BUNDLE, PARAM_SERVICE_ACCOUNT];

/// Everything the external fetch mechanism needs to locate one manifest
/// inside a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    /// Artifact bundle reference, e.g. "registry.example.com/catalog:v1".
    pub bundle: String,
    pub kind: ResourceKind,
    pub name: String,
    /// Credential identity used by the fetch mechanism.
    pub service_account: String,
}

/// Opaque content fetcher for artifact bundles.
///
/// Implementations perform the pull and layer extraction; each call is a
/// single fetch with no retry and no partial results.
pub trait BundleFetcher: Send + Sync {
    fn fetch(&self, ctx: &ResolutionContext, request: &BundleRequest) -> anyhow::Result<Vec<u8>>;
}

/// Resolver backed by an external artifact-bundle fetch mechanism.
#[derive(Clone)]
pub struct BundleResolver {
    fetcher: Arc<dyn BundleFetcher>,
}

impl BundleResolver {
    pub fn new(fetcher: Arc<dyn BundleFetcher>) -> Self {
        BundleResolver { fetcher }
    }

    /// Enablement plus parameter checks shared by `validate_params` and
    /// `resolve`.
    fn validated(
        &self,
        ctx: &ResolutionContext,
        params: &[Param],
    ) -> Result<BundleRequest, ResolutionError> {
        if !ctx.bundles_enabled() {
            return Err(ResolutionError::Disabled {
                message: DISABLED_ERROR,
            });
        }
        let values = params::require_string_params("bundle", params, REQUIRED_PARAMS)?;
        let kind = ResourceKind::from_str(values[PARAM_KIND])?;
        Ok(BundleRequest {
            bundle: values[PARAM_BUNDLE].to_string(),
            kind,
            name: values[PARAM_NAME].to_string(),
            service_account: values[PARAM_SERVICE_ACCOUNT].to_string(),
        })
    }
}

impl ManifestResolver for BundleResolver {
    fn selector(&self, _ctx: &ResolutionContext) -> Selector {
        let mut selector = Selector::new();
        selector.insert(
            LABEL_KEY_RESOLVER_TYPE.to_string(),
            LABEL_VALUE_BUNDLE_RESOLVER_TYPE.to_string(),
        );
        selector
    }

    fn validate_params(
        &self,
        ctx: &ResolutionContext,
        params: &[Param],
    ) -> Result<(), ResolutionError> {
        self.validated(ctx, params).map(|_| ())
    }

    fn resolve(
        &self,
        ctx: &ResolutionContext,
        params: &[Param],
    ) -> Result<ResolvedResource, ResolutionError> {
        let request = self.validated(ctx, params)?;
        tracing::debug!(
            bundle = %request.bundle,
            kind = %request.kind,
            name = %request.name,
            "resolving manifest from bundle"
        );
        let content = self.fetcher.fetch(ctx, &request)?;
        Ok(ResolvedResource::new(content))
    }
}
