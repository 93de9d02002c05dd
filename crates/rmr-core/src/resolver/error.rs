//! Typed errors returned by resolver backends.
//!
//! Classification matters to the caller: validation-class errors mean the
//! input must change, transport-class errors may be retried by the caller,
//! and malformed-response errors indicate upstream contract drift. "Not
//! found" at the hub is deliberately not an error; it surfaces as empty
//! content instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The resolver type is not enabled in the request context. The message
    /// is fixed per backend so callers can match it exactly.
    #[error("{message}")]
    Disabled { message: &'static str },

    /// One or more required parameters are absent or empty.
    #[error("missing required {} resolver params: {}", .resolver, .missing.join(", "))]
    MissingParams {
        resolver: &'static str,
        missing: Vec<String>,
    },

    /// A recognized parameter name appeared more than once.
    #[error("duplicated param \"{name}\": recognized params may appear at most once")]
    DuplicateParam { name: String },

    /// A recognized parameter was bound to an array or object value.
    #[error("param \"{name}\" must be a string value")]
    WrongParamType { name: String },

    /// `kind` was present but not one of the two recognized literals.
    #[error("unsupported kind \"{kind}\": must be one of \"task\" or \"pipeline\"")]
    InvalidKind { kind: String },

    /// The configured hub URL or endpoint template does not form a valid URL.
    #[error("invalid hub url: {0}")]
    InvalidUrl(#[source] url::ParseError),

    /// Network-level failure reaching the upstream, propagated verbatim.
    #[error("error requesting remote resource: {0}")]
    Transport(#[source] curl::Error),

    /// The upstream answered with a non-2xx status.
    #[error("remote resource request returned HTTP {code}")]
    HttpStatus { code: u32 },

    /// The hub body was not valid JSON. The underlying parser message is
    /// preserved verbatim.
    #[error("error unmarshalling json response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// The request context was canceled while the call was in flight.
    #[error("resolution canceled by caller")]
    Canceled,

    /// The request context deadline passed while the call was in flight.
    #[error("resolution deadline exceeded")]
    DeadlineExceeded,

    /// Error from the external bundle fetch mechanism, passed through
    /// without reinterpretation.
    #[error(transparent)]
    Fetch(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_params_message_names_every_field() {
        let err = ResolutionError::MissingParams {
            resolver: "hub",
            missing: vec!["name".to_string(), "version".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required hub resolver params: name, version"
        );
    }

    #[test]
    fn invalid_kind_message_names_the_value() {
        let err = ResolutionError::InvalidKind {
            kind: "not-taskpipeline".to_string(),
        };
        assert!(err.to_string().contains("not-taskpipeline"));
    }

    #[test]
    fn fetch_errors_pass_through_unchanged() {
        let err: ResolutionError = anyhow::anyhow!("bundle not found: gcr.io/x/y").into();
        assert_eq!(err.to_string(), "bundle not found: gcr.io/x/y");
    }

    #[test]
    fn malformed_response_preserves_parser_text() {
        let parse_err = serde_json::from_slice::<serde_json::Value>(b"value").unwrap_err();
        let expected = parse_err.to_string();
        let err = ResolutionError::MalformedResponse(parse_err);
        let msg = err.to_string();
        assert!(msg.starts_with("error unmarshalling json response: "));
        assert!(msg.ends_with(&expected));
    }
}
