//! Catalog-hub backend: resolves a manifest by name/version/kind/catalog
//! from a hub-style HTTP API.
//!
//! Uses the curl crate (libcurl) for the blocking GET, with the request
//! context's deadline bounding total transfer time and its abort token
//! polled from the progress callback.

mod response;

use std::str::FromStr;
use std::time::Duration;

use crate::context::ResolutionContext;
use crate::params::{self, Param, ResourceKind, PARAM_KIND, PARAM_NAME};
use crate::resolver::{
    ManifestResolver, ResolutionError, ResolvedResource, Selector, LABEL_KEY_RESOLVER_TYPE,
};
use response::HubResponse;

/// Selector value identifying the hub backend.
pub const LABEL_VALUE_HUB_RESOLVER_TYPE: &str = "hub";

/// Parameter name for the catalog version of the resource.
pub const PARAM_VERSION: &str = "version";
/// Parameter name for the catalog to pull the resource from.
pub const PARAM_CATALOG: &str = "catalog";

/// Fixed message returned whenever the hub resolver type is disabled.
pub const DISABLED_ERROR: &str =
    "cannot handle resolution request, enable-hub-resolver feature flag not true";

/// Default endpoint template joined onto the hub base URL. The hub's exact
/// path layout is an upstream contract, so it stays configurable.
pub const YAML_ENDPOINT: &str = "resource/{catalog}/{kind}/{name}/{version}/yaml";

const REQUIRED_PARAMS: &[&str] = &[PARAM_KIND, PARAM_NAME, PARAM_VERSION, PARAM_CATALOG];

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolver backed by a catalog hub HTTP API.
///
/// Holds only immutable configuration set at construction, so one instance
/// can serve concurrent resolution requests without locking.
#[derive(Debug, Clone)]
pub struct HubResolver {
    /// Base URL of the hub API, e.g. "https://hub.example.com". Treated as
    /// an origin; the endpoint template is joined under it.
    pub hub_url: String,
    /// Endpoint template with `{catalog}`, `{kind}`, `{name}` and
    /// `{version}` placeholders.
    pub yaml_endpoint: String,
    /// Connect timeout for the GET.
    pub connect_timeout: Duration,
    /// Total request timeout used when the context carries no deadline.
    pub request_timeout: Duration,
}

impl HubResolver {
    pub fn new(hub_url: impl Into<String>) -> Self {
        HubResolver {
            hub_url: hub_url.into(),
            yaml_endpoint: YAML_ENDPOINT.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_yaml_endpoint(mut self, yaml_endpoint: impl Into<String>) -> Self {
        self.yaml_endpoint = yaml_endpoint.into();
        self
    }

    /// Enablement plus parameter checks shared by `validate_params` and
    /// `resolve`; the latter never trusts that validation already ran.
    fn validated<'a>(
        &self,
        ctx: &ResolutionContext,
        params: &'a [Param],
    ) -> Result<HubRequest<'a>, ResolutionError> {
        if !ctx.hub_enabled() {
            return Err(ResolutionError::Disabled {
                message: DISABLED_ERROR,
            });
        }
        let values = params::require_string_params("hub", params, REQUIRED_PARAMS)?;
        let kind = ResourceKind::from_str(values[PARAM_KIND])?;
        Ok(HubRequest {
            kind,
            name: values[PARAM_NAME],
            version: values[PARAM_VERSION],
            catalog: values[PARAM_CATALOG],
        })
    }

    /// Builds the yaml endpoint URL for a validated request.
    fn resource_url(&self, request: &HubRequest<'_>) -> Result<url::Url, ResolutionError> {
        let path = self
            .yaml_endpoint
            .replace("{catalog}", request.catalog)
            .replace("{kind}", request.kind.as_str())
            .replace("{name}", request.name)
            .replace("{version}", request.version);

        let mut base = url::Url::parse(&self.hub_url).map_err(ResolutionError::InvalidUrl)?;
        // Url::join replaces the last path segment unless the base ends in a
        // slash, which would silently drop part of a configured base path.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        base.join(&path).map_err(ResolutionError::InvalidUrl)
    }
}

/// Validated hub coordinates, borrowed from the parameter set.
#[derive(Debug, Clone, Copy)]
struct HubRequest<'a> {
    kind: ResourceKind,
    name: &'a str,
    version: &'a str,
    catalog: &'a str,
}

impl ManifestResolver for HubResolver {
    fn selector(&self, _ctx: &ResolutionContext) -> Selector {
        let mut selector = Selector::new();
        selector.insert(
            LABEL_KEY_RESOLVER_TYPE.to_string(),
            LABEL_VALUE_HUB_RESOLVER_TYPE.to_string(),
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
        let url = self.resource_url(&request)?;
        tracing::debug!(url = %url, kind = %request.kind, "resolving manifest from hub");

        let body = http_get(&url, self.connect_timeout, self.request_timeout, ctx)?;

        // The hub answers "not found" with a sentinel body, not a status
        // code; that body deserializes to an empty yaml payload. Anything
        // that fails to parse is a malformed response, including an empty
        // body.
        let envelope: HubResponse =
            serde_json::from_slice(&body).map_err(ResolutionError::MalformedResponse)?;
        Ok(ResolvedResource::new(envelope.data.yaml.into_bytes()))
    }
}

/// Blocking GET returning the full response body.
fn http_get(
    url: &url::Url,
    connect_timeout: Duration,
    request_timeout: Duration,
    ctx: &ResolutionContext,
) -> Result<Vec<u8>, ResolutionError> {
    let remaining = ctx.remaining();
    if remaining.map_or(false, |d| d.is_zero()) {
        return Err(ResolutionError::DeadlineExceeded);
    }
    let had_deadline = remaining.is_some();

    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url.as_str()).map_err(ResolutionError::Transport)?;
    easy.get(true).map_err(ResolutionError::Transport)?;
    easy.follow_location(true).map_err(ResolutionError::Transport)?;
    easy.max_redirections(10).map_err(ResolutionError::Transport)?;
    easy.connect_timeout(connect_timeout)
        .map_err(ResolutionError::Transport)?;
    easy.timeout(remaining.unwrap_or(request_timeout))
        .map_err(ResolutionError::Transport)?;
    easy.progress(true).map_err(ResolutionError::Transport)?;

    {
        let mut transfer = easy.transfer();
        // Progress callback returning false aborts the transfer; this is how
        // a context cancel reaches an in-flight request.
        transfer
            .progress_function(|_, _, _, _| !ctx.is_aborted())
            .map_err(ResolutionError::Transport)?;
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(ResolutionError::Transport)?;
        transfer
            .perform()
            .map_err(|e| classify_transfer_error(e, ctx, had_deadline))?;
    }

    let code = easy.response_code().map_err(ResolutionError::Transport)?;
    if !(200..300).contains(&code) {
        return Err(ResolutionError::HttpStatus { code });
    }
    Ok(body)
}

/// Maps a curl transfer failure to cancel/deadline/transport.
fn classify_transfer_error(
    e: curl::Error,
    ctx: &ResolutionContext,
    had_deadline: bool,
) -> ResolutionError {
    if e.is_aborted_by_callback() || ctx.is_aborted() {
        return ResolutionError::Canceled;
    }
    if e.is_operation_timedout() && had_deadline {
        return ResolutionError::DeadlineExceeded;
    }
    ResolutionError::Transport(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub_context() -> ResolutionContext {
        ResolutionContext::new().with_hub_enabled()
    }

    fn valid_params(kind: &str) -> Vec<Param> {
        vec![
            Param::string(PARAM_KIND, kind),
            Param::string(PARAM_NAME, "foo"),
            Param::string(PARAM_VERSION, "bar"),
            Param::string(PARAM_CATALOG, "baz"),
        ]
    }

    #[test]
    fn selector_is_stable_and_typed() {
        let resolver = HubResolver::new("https://hub.example.com");
        let selector = resolver.selector(&hub_context());
        assert_eq!(
            selector.get(LABEL_KEY_RESOLVER_TYPE).map(String::as_str),
            Some(LABEL_VALUE_HUB_RESOLVER_TYPE)
        );
        assert_eq!(selector, resolver.selector(&ResolutionContext::new()));
    }

    #[test]
    fn validate_accepts_task_and_pipeline() {
        let resolver = HubResolver::new("https://hub.example.com");
        for kind in ["task", "pipeline"] {
            resolver
                .validate_params(&hub_context(), &valid_params(kind))
                .unwrap();
        }
    }

    #[test]
    fn validate_disabled_returns_fixed_message() {
        let resolver = HubResolver::new("https://hub.example.com");
        let err = resolver
            .validate_params(&ResolutionContext::new(), &valid_params("task"))
            .unwrap_err();
        assert_eq!(err.to_string(), DISABLED_ERROR);
    }

    #[test]
    fn validate_reports_missing_fields_by_name() {
        let resolver = HubResolver::new("https://hub.example.com");
        let ctx = hub_context();

        let missing_name = vec![
            Param::string(PARAM_KIND, "task"),
            Param::string(PARAM_VERSION, "bar"),
            Param::string(PARAM_CATALOG, "baz"),
        ];
        let err = resolver.validate_params(&ctx, &missing_name).unwrap_err();
        assert!(err.to_string().contains("name"), "got: {err}");

        let missing_version = vec![
            Param::string(PARAM_KIND, "task"),
            Param::string(PARAM_NAME, "foo"),
            Param::string(PARAM_CATALOG, "baz"),
        ];
        let err = resolver.validate_params(&ctx, &missing_version).unwrap_err();
        assert!(err.to_string().contains("version"), "got: {err}");
    }

    #[test]
    fn validate_rejects_unrecognized_kind() {
        let resolver = HubResolver::new("https://hub.example.com");
        let err = resolver
            .validate_params(&hub_context(), &valid_params("not-taskpipeline"))
            .unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidKind { .. }));
    }

    #[test]
    fn resolve_disabled_returns_fixed_message_without_fetching() {
        // hub_url is unroutable on purpose: the disabled check must fire
        // before any network work.
        let resolver = HubResolver::new("http://127.0.0.1:1");
        let err = resolver
            .resolve(&ResolutionContext::new(), &valid_params("task"))
            .unwrap_err();
        assert_eq!(err.to_string(), DISABLED_ERROR);
    }

    #[test]
    fn resource_url_interpolates_template() {
        let resolver = HubResolver::new("https://hub.example.com");
        let request = HubRequest {
            kind: ResourceKind::Task,
            name: "foo",
            version: "baz",
            catalog: "acme",
        };
        let url = resolver.resource_url(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://hub.example.com/resource/acme/task/foo/baz/yaml"
        );
    }

    #[test]
    fn resource_url_preserves_base_path() {
        let resolver = HubResolver::new("https://hub.example.com/api/v1");
        let request = HubRequest {
            kind: ResourceKind::Pipeline,
            name: "foo",
            version: "0.1",
            catalog: "acme",
        };
        let url = resolver.resource_url(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://hub.example.com/api/v1/resource/acme/pipeline/foo/0.1/yaml"
        );
    }

    #[test]
    fn resource_url_rejects_invalid_base() {
        let resolver = HubResolver::new("not a url");
        let request = HubRequest {
            kind: ResourceKind::Task,
            name: "foo",
            version: "bar",
            catalog: "baz",
        };
        let err = resolver.resource_url(&request).unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidUrl(_)));
    }

    #[test]
    fn expired_deadline_fails_before_the_request() {
        let url = url::Url::parse("http://127.0.0.1:1/resource").unwrap();
        let ctx = hub_context().with_timeout(Duration::ZERO);
        let err = http_get(&url, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, &ctx)
            .unwrap_err();
        assert!(matches!(err, ResolutionError::DeadlineExceeded));
    }
}
